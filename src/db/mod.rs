use crate::domain::models::{
    Evaluation, ExperienceBracket, InterviewLevel, InterviewSession, InterviewType, Question,
    SessionResponse,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    job_description: String,
    resume: String,
    interview_type: InterviewType,
    num_questions: i32,
    level: InterviewLevel,
    experience: ExperienceBracket,
    focus: Vec<String>,
    questions: Json<Vec<Question>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for InterviewSession {
    fn from(row: SessionRow) -> Self {
        InterviewSession {
            id: row.id,
            user_id: row.user_id,
            job_description: row.job_description,
            resume: row.resume,
            interview_type: row.interview_type,
            num_questions: row.num_questions,
            level: row.level,
            experience: row.experience,
            focus: row.focus,
            questions: row.questions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ResponseRow {
    id: Uuid,
    session_id: Uuid,
    question_text: String,
    user_answer: Option<String>,
    video_url: Option<String>,
    evaluation: Json<Evaluation>,
    emotions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResponseRow> for SessionResponse {
    fn from(row: ResponseRow) -> Self {
        SessionResponse {
            id: row.id,
            session_id: row.session_id,
            question_text: row.question_text,
            user_answer: row.user_answer,
            video_url: row.video_url,
            evaluation: row.evaluation.0,
            emotions: row.emotions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub job_description: String,
    pub resume: String,
    pub interview_type: InterviewType,
    pub num_questions: i32,
    pub level: InterviewLevel,
    pub experience: ExperienceBracket,
    pub focus: Vec<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub session_id: Uuid,
    pub question_text: String,
    pub user_answer: String,
    pub video_url: Option<String>,
    pub evaluation: Evaluation,
}

const SESSION_COLUMNS: &str = r#"
    id,
    user_id,
    job_description,
    resume,
    interview_type,
    num_questions,
    level,
    experience,
    focus,
    questions,
    created_at,
    updated_at
"#;

const RESPONSE_COLUMNS: &str = r#"
    id,
    session_id,
    question_text,
    user_answer,
    video_url,
    evaluation,
    emotions,
    created_at,
    updated_at
"#;

pub async fn user_exists(pool: &PgPool, id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn insert_session(pool: &PgPool, new: &NewSession) -> Result<InterviewSession> {
    let row = sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        INSERT INTO interview_sessions
            (id, user_id, job_description, resume, interview_type, num_questions,
             level, experience, focus, questions)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.job_description)
    .bind(&new.resume)
    .bind(new.interview_type)
    .bind(new.num_questions)
    .bind(new.level)
    .bind(new.experience)
    .bind(&new.focus)
    .bind(Json(&new.questions))
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn find_session(pool: &PgPool, id: Uuid) -> Result<Option<InterviewSession>> {
    let row = sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM interview_sessions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// Looks a session up only if `user_id` owns it.
pub async fn find_user_session(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<InterviewSession>> {
    let row = sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM interview_sessions WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// All sessions of a user, newest first.
pub async fn list_user_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<InterviewSession>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        SELECT {SESSION_COLUMNS}
        FROM interview_sessions
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_responses_for_sessions(
    pool: &PgPool,
    session_ids: &[Uuid],
) -> Result<Vec<SessionResponse>> {
    if session_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ResponseRow>(&format!(
        r#"
        SELECT {RESPONSE_COLUMNS}
        FROM session_responses
        WHERE session_id = ANY($1)
        ORDER BY created_at ASC
        "#
    ))
    .bind(session_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_session_responses(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<SessionResponse>> {
    list_responses_for_sessions(pool, &[session_id]).await
}

pub async fn insert_response(pool: &PgPool, new: &NewResponse) -> Result<SessionResponse> {
    let row = sqlx::query_as::<_, ResponseRow>(&format!(
        r#"
        INSERT INTO session_responses
            (id, session_id, question_text, user_answer, video_url, evaluation, emotions)
        VALUES ($1, $2, $3, $4, $5, $6, '{{}}')
        RETURNING {RESPONSE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.session_id)
    .bind(&new.question_text)
    .bind(&new.user_answer)
    .bind(&new.video_url)
    .bind(Json(&new.evaluation))
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}
