//! Prompt construction and interpretation of model output for every
//! interview feature.

use crate::domain::evaluation::{
    parse_object, parse_question_list, unparsed_coaching, unparsed_feedback, unparsed_review,
};
use crate::domain::models::{
    AnswerFeedback, Evaluation, ExperienceBracket, InterviewLevel, InterviewSession,
    InterviewType, Question,
};
use crate::services::ai::LanguageModel;
use anyhow::{bail, Result};

/// Everything the model needs to tailor questions to a candidate.
#[derive(Debug, Clone, Copy)]
pub struct InterviewBrief<'a> {
    pub job_description: &'a str,
    pub resume: &'a str,
    pub interview_type: InterviewType,
    pub num_questions: i32,
    pub level: InterviewLevel,
    pub experience: ExperienceBracket,
    pub focus: &'a [String],
}

impl<'a> From<&'a InterviewSession> for InterviewBrief<'a> {
    fn from(session: &'a InterviewSession) -> Self {
        Self {
            job_description: &session.job_description,
            resume: &session.resume,
            interview_type: session.interview_type,
            num_questions: session.num_questions,
            level: session.level,
            experience: session.experience,
            focus: &session.focus,
        }
    }
}

fn focus_list(focus: &[String], empty: &str) -> String {
    if focus.is_empty() {
        empty.to_string()
    } else {
        focus.join(", ")
    }
}

pub fn question_set_prompt(brief: &InterviewBrief<'_>) -> String {
    format!(
        r#"You are an AI mock interview question generator.

Generate {count} unique, professional-level interview questions of type "{kind}" based on:

- Job Description: """{jd}"""
- Resume: """{resume}"""
- Experience: {experience}
- Level: {level}
- Focus Areas: {focus}

Output format: A JSON array of plain strings. No explanation. No formatting."#,
        count = brief.num_questions,
        kind = brief.interview_type.as_str(),
        jd = brief.job_description,
        resume = brief.resume,
        experience = brief.experience.as_str(),
        level = brief.level.as_str(),
        focus = focus_list(brief.focus, "General"),
    )
}

pub fn single_question_prompt(brief: &InterviewBrief<'_>) -> String {
    let kind = brief.interview_type.as_str();
    format!(
        r#"You're an AI interview coach generating a single mock {kind} interview question.

Context:
- Job Description: """{jd}"""
- Resume Summary: """{resume}"""
- Candidate Experience: {experience}
- Interview Level: {level}
- Preferred Focus Areas: {focus}

Guidelines:
- Tailor the question based on job level, skills, and domain.
- Match tone with a startup company unless otherwise stated.
- Focus on one of the areas: {focus_hint}.

Generate **only one** {kind} question.
Do NOT add explanations or formatting."#,
        jd = brief.job_description,
        resume = brief.resume,
        experience = brief.experience.as_str(),
        level = brief.level.as_str(),
        focus = focus_list(brief.focus, "General"),
        focus_hint = focus_list(brief.focus, "any common interview topic"),
    )
}

pub fn review_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"You are an AI mock interview evaluator. A candidate just gave the following answer to the question:

Question: "{question}"

Answer: "{answer}"

Give a short structured feedback including:
1. A brief overall evaluation.
2. 2 strengths in the answer.
3. 1 improvement suggestion.
4. Tone of the answer: (e.g., confident, hesitant, vague, enthusiastic, etc.)

Respond in plain JSON with keys: summary, strengths, improvement, tone."#
    )
}

pub fn coaching_prompt(question: &str, transcript: &str) -> String {
    format!(
        r#"You're an AI interview coach. The candidate answered:

Q: "{question}"
A: "{transcript}"

Evaluate the response and provide:
- A short summary (1-2 sentences)
- 2 strengths
- 1 area for improvement
- Tone (Confident, Nervous, etc.)
- An ideal model answer for this question

Return JSON:
{{
  "summary": "...",
  "strengths": ["...", "..."],
  "improvement": "...",
  "tone": "...",
  "idealAnswer": "..."
}}"#
    )
}

pub fn feedback_prompt(question: &str, transcript: &str) -> String {
    format!(
        r#"You are an AI interviewer. Evaluate the candidate's answer to the following question:
"{question}"

Candidate's answer (transcribed):
"{transcript}"

Return a JSON object like:
{{
  "transcript": "...",
  "feedback": {{
    "summary": "...",
    "strengths": ["...","..."],
    "improvement": "...",
    "tone": "..."
  }}
}}"#
    )
}

/// Asks the model for the full question set of a new session.
pub async fn generate_question_set(
    ai: &dyn LanguageModel,
    brief: &InterviewBrief<'_>,
) -> Result<Vec<Question>> {
    let raw = ai.complete(&question_set_prompt(brief)).await?;
    let Some(list) = parse_question_list(&raw) else {
        tracing::error!(raw = %raw, "model returned an unparsable question list");
        bail!("unparsable question list");
    };
    Ok(list
        .into_iter()
        .map(|question_text| Question {
            question_type: brief.interview_type,
            question_text,
        })
        .collect())
}

/// Asks the model for one more question for an existing session.
pub async fn generate_single_question(
    ai: &dyn LanguageModel,
    brief: &InterviewBrief<'_>,
) -> Result<Question> {
    let raw = ai.complete(&single_question_prompt(brief)).await?;
    let text = raw.trim();
    if text.is_empty() {
        bail!("model returned an empty question");
    }
    tracing::info!(question = %text, "generated follow-up question");
    Ok(Question {
        question_type: brief.interview_type,
        question_text: text.to_string(),
    })
}

/// Short review of an answer. Unparsable output degrades to a fallback that
/// keeps a preview of the raw text.
pub async fn review_answer(
    ai: &dyn LanguageModel,
    question: &str,
    answer: &str,
) -> Result<Evaluation> {
    let raw = ai.complete(&review_prompt(question, answer)).await?;
    Ok(parse_object::<Evaluation>(&raw).unwrap_or_else(|| {
        tracing::warn!("review output was not valid JSON, using fallback");
        unparsed_review(&raw)
    }))
}

/// Full coaching evaluation stored with a response, including an ideal answer.
pub async fn coach_answer(
    ai: &dyn LanguageModel,
    question: &str,
    transcript: &str,
) -> Result<Evaluation> {
    let raw = ai.complete(&coaching_prompt(question, transcript)).await?;
    Ok(parse_object::<Evaluation>(&raw).unwrap_or_else(|| {
        tracing::warn!("coaching output was not valid JSON, using fallback");
        unparsed_coaching()
    }))
}

/// Feedback on a transcribed answer. The known transcript always wins over
/// whatever transcript the model echoes back.
pub async fn feedback_for_transcript(
    ai: &dyn LanguageModel,
    question: &str,
    transcript: &str,
) -> Result<AnswerFeedback> {
    let raw = ai.complete(&feedback_prompt(question, transcript)).await?;
    match parse_object::<AnswerFeedback>(&raw) {
        Some(mut parsed) => {
            parsed.transcript = transcript.to_string();
            Ok(parsed)
        }
        None => {
            tracing::warn!("feedback output was not valid JSON, using fallback");
            Ok(unparsed_feedback(Some(transcript)))
        }
    }
}

/// Transcribes an audio answer and evaluates it.
pub async fn transcribe_and_evaluate(
    ai: &dyn LanguageModel,
    question: &str,
    audio: Vec<u8>,
    file_name: &str,
    mime: &str,
) -> Result<AnswerFeedback> {
    let transcript = ai.transcribe(audio, file_name, mime).await?;
    if transcript.trim().is_empty() {
        tracing::warn!("transcription came back empty");
        return Ok(unparsed_feedback(None));
    }
    feedback_for_transcript(ai, question, &transcript).await
}
