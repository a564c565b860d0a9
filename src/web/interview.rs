use crate::db::{self, NewResponse, NewSession};
use crate::domain::models::{
    AnswerFeedback, Evaluation, ExperienceBracket, InterviewLevel, InterviewType, Question,
    SessionResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::services::interviewer::{self, InterviewBrief};
use crate::services::resume;
use crate::state::SharedState;
use crate::web::auth::AuthUser;
use crate::web::extract::{ApiJson, ApiMultipart};
use crate::web::form::FormData;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_QUESTION_COUNT: i32 = 5;
const MAX_QUESTION_COUNT: i32 = 20;
const DEFAULT_AUDIO_NAME: &str = "answer.webm";
const DEFAULT_AUDIO_MIME: &str = "audio/webm";

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/session", post(create_session))
        .route("/generate-questions/:session_id", post(generate_question))
        .route("/save-response", post(save_response))
        .route("/transcribe-and-evaluate", post(transcribe_and_evaluate))
        .route("/evaluate-video", post(evaluate_video))
        .route("/evaluate-response", post(evaluate_response))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionCreated {
    success: bool,
    message: &'static str,
    session_id: Uuid,
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct GeneratedQuestions {
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct SavedResponse {
    success: bool,
    saved: SessionResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateVideoRequest {
    #[serde(default)]
    question: Option<String>,
    /// Base64-encoded audio of the answer.
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Deserialize)]
struct EvaluateResponseRequest {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Serialize)]
struct ReviewedAnswer {
    success: bool,
    evaluation: Evaluation,
}

pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("Invalid session id."))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_choice<T>(form: &FormData, name: &str) -> ApiResult<T>
where
    T: Default + for<'a> TryFrom<&'a str>,
{
    match form.text(name) {
        None => Ok(T::default()),
        Some(raw) => {
            T::try_from(raw).map_err(|_| ApiError::bad_request(format!("Invalid {name}: {raw}")))
        }
    }
}

fn parse_question_count(form: &FormData) -> ApiResult<i32> {
    let Some(raw) = form.text("numQuestions") else {
        return Ok(DEFAULT_QUESTION_COUNT);
    };
    match raw.parse::<i32>() {
        Ok(n) if (1..=MAX_QUESTION_COUNT).contains(&n) => Ok(n),
        _ => Err(ApiError::bad_request(format!(
            "numQuestions must be between 1 and {MAX_QUESTION_COUNT}."
        ))),
    }
}

fn parse_focus(form: &FormData) -> ApiResult<Vec<String>> {
    let Some(raw) = form.text("focus") else {
        return Ok(Vec::new());
    };
    let focus: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| ApiError::bad_request("focus must be a JSON array of strings."))?;
    Ok(focus
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect())
}

async fn create_session(
    AuthUser(user_id): AuthUser,
    State(state): State<SharedState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Json<SessionCreated>)> {
    let mut form = FormData::read(multipart).await?;

    let job_description = form
        .text("jd")
        .ok_or_else(|| ApiError::bad_request("Job description is required."))?
        .to_string();
    let interview_type: InterviewType = parse_choice(&form, "type")?;
    let level: InterviewLevel = parse_choice(&form, "level")?;
    let experience: ExperienceBracket = parse_choice(&form, "experience")?;
    let num_questions = parse_question_count(&form)?;
    let focus = parse_focus(&form)?;

    let resume = match form.take_file("resumePdf") {
        Some(pdf) => resume::extract_pdf_text_async(pdf.bytes).await.map_err(|e| {
            tracing::warn!("Resume PDF rejected: {}", e);
            ApiError::bad_request("Could not read resume PDF.")
        })?,
        None => form.text("resumeText").unwrap_or_default().to_string(),
    };
    if resume.trim().is_empty() {
        return Err(ApiError::bad_request("Resume text or PDF is required."));
    }

    let brief = InterviewBrief {
        job_description: &job_description,
        resume: &resume,
        interview_type,
        num_questions,
        level,
        experience,
        focus: &focus,
    };
    let questions = interviewer::generate_question_set(state.ai.as_ref(), &brief)
        .await
        .map_err(|e| ApiError::failed("Failed to generate interview questions.", e))?;

    let session = db::insert_session(
        &state.pool,
        &NewSession {
            user_id,
            job_description,
            resume,
            interview_type,
            num_questions,
            level,
            experience,
            focus,
            questions,
        },
    )
    .await?;

    tracing::info!(
        "User {} created interview session {} with {} questions",
        user_id,
        session.id,
        session.questions.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            success: true,
            message: "Interview session created.",
            session_id: session.id,
            questions: session.questions,
        }),
    ))
}

async fn generate_question(
    AuthUser(user_id): AuthUser,
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<GeneratedQuestions>> {
    let session_id = parse_id(&session_id)?;
    let session = db::find_user_session(&state.pool, session_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found. Please restart the session."))?;

    let brief = InterviewBrief::from(&session);
    let question = interviewer::generate_single_question(state.ai.as_ref(), &brief)
        .await
        .map_err(|e| ApiError::failed("Server Error", e))?;

    Ok(Json(GeneratedQuestions {
        questions: vec![question],
    }))
}

async fn save_response(
    State(state): State<SharedState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Json<SavedResponse>)> {
    let mut form = FormData::read(multipart).await?;

    let (Some(session_id), Some(question_text), Some(transcript)) = (
        form.text("sessionId"),
        form.text("questionText"),
        form.text("transcript"),
    ) else {
        return Err(ApiError::bad_request("Missing required fields."));
    };
    let session_id = parse_id(session_id)?;
    let question_text = question_text.to_string();
    let transcript = transcript.to_string();

    if db::find_session(&state.pool, session_id).await?.is_none() {
        return Err(ApiError::not_found("Session not found"));
    }

    let evaluation = interviewer::coach_answer(state.ai.as_ref(), &question_text, &transcript)
        .await
        .map_err(|e| ApiError::failed("Internal Server Error", e))?;

    let video_url = match form.take_file("video") {
        Some(video) => Some(
            state
                .uploads
                .save_video(&video.bytes)
                .await
                .map_err(|e| ApiError::failed("Internal Server Error", e))?,
        ),
        None => None,
    };

    let new_response = NewResponse {
        session_id,
        question_text,
        user_answer: transcript,
        video_url,
        evaluation,
    };
    let saved = match db::insert_response(&state.pool, &new_response).await {
        Ok(saved) => saved,
        Err(e) => {
            if let Some(url) = &new_response.video_url {
                state.uploads.remove(url).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!("Saved response {} for session {}", saved.id, session_id);

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            success: true,
            saved,
        }),
    ))
}

async fn transcribe_and_evaluate(
    State(state): State<SharedState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Json<AnswerFeedback>> {
    let mut form = FormData::read(multipart).await?;

    let question = form.text("question").map(str::to_string);
    let (Some(question), Some(audio)) = (question, form.take_file("audio")) else {
        return Err(ApiError::bad_request("Missing audio or question"));
    };

    let file_name = audio
        .file_name
        .unwrap_or_else(|| DEFAULT_AUDIO_NAME.to_string());
    let mime = audio
        .content_type
        .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());

    let feedback = interviewer::transcribe_and_evaluate(
        state.ai.as_ref(),
        &question,
        audio.bytes,
        &file_name,
        &mime,
    )
    .await
    .map_err(|e| ApiError::failed("Evaluation failed", e))?;

    Ok(Json(feedback))
}

async fn evaluate_video(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<EvaluateVideoRequest>,
) -> ApiResult<Json<AnswerFeedback>> {
    let Some(question) = non_blank(payload.question) else {
        return Err(ApiError::bad_request("Missing audio or question"));
    };

    let feedback = match (non_blank(payload.audio), non_blank(payload.transcript)) {
        (Some(audio_b64), _) => {
            let audio = general_purpose::STANDARD
                .decode(audio_b64.trim())
                .map_err(|_| ApiError::bad_request("audio must be base64 encoded"))?;
            let mime = payload
                .mime_type
                .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());
            interviewer::transcribe_and_evaluate(
                state.ai.as_ref(),
                &question,
                audio,
                DEFAULT_AUDIO_NAME,
                &mime,
            )
            .await
        }
        (None, Some(transcript)) => {
            interviewer::feedback_for_transcript(state.ai.as_ref(), &question, &transcript).await
        }
        (None, None) => return Err(ApiError::bad_request("Missing audio or question")),
    }
    .map_err(|e| ApiError::failed("Evaluation failed", e))?;

    Ok(Json(feedback))
}

async fn evaluate_response(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<EvaluateResponseRequest>,
) -> ApiResult<Json<ReviewedAnswer>> {
    let (Some(question), Some(answer)) = (non_blank(payload.question), non_blank(payload.answer))
    else {
        return Err(ApiError::bad_request(
            "Both 'question' and 'answer' are required.",
        ));
    };

    let evaluation = interviewer::review_answer(state.ai.as_ref(), &question, &answer)
        .await
        .map_err(|e| ApiError::failed("Failed to evaluate the answer.", e))?;

    Ok(Json(ReviewedAnswer {
        success: true,
        evaluation,
    }))
}
