use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "interview_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    #[default]
    Technical,
    #[serde(alias = "behavioral")]
    Behavioural,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioural => "behavioural",
        }
    }
}

impl TryFrom<&str> for InterviewType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioural" | "behavioral" => Ok(InterviewType::Behavioural),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "interview_level", rename_all = "PascalCase")]
pub enum InterviewLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl InterviewLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewLevel::Beginner => "Beginner",
            InterviewLevel::Intermediate => "Intermediate",
            InterviewLevel::Advanced => "Advanced",
        }
    }
}

impl TryFrom<&str> for InterviewLevel {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Ok(InterviewLevel::Beginner),
            "intermediate" => Ok(InterviewLevel::Intermediate),
            "advanced" => Ok(InterviewLevel::Advanced),
            _ => Err(()),
        }
    }
}

/// Years-of-experience bracket. The stored labels use an en dash (`1–2 Years`).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "experience_bracket")]
pub enum ExperienceBracket {
    #[default]
    #[sqlx(rename = "Fresher")]
    Fresher,
    #[sqlx(rename = "1–2 Years")]
    #[serde(rename = "1–2 Years", alias = "1-2 Years")]
    OneToTwoYears,
    #[sqlx(rename = "3–5 Years")]
    #[serde(rename = "3–5 Years", alias = "3-5 Years")]
    ThreeToFiveYears,
    #[sqlx(rename = "5+ Years")]
    #[serde(rename = "5+ Years")]
    FivePlusYears,
}

impl ExperienceBracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceBracket::Fresher => "Fresher",
            ExperienceBracket::OneToTwoYears => "1–2 Years",
            ExperienceBracket::ThreeToFiveYears => "3–5 Years",
            ExperienceBracket::FivePlusYears => "5+ Years",
        }
    }
}

impl TryFrom<&str> for ExperienceBracket {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase().replace(['–', '—'], "-");
        match normalized.as_str() {
            "fresher" => Ok(ExperienceBracket::Fresher),
            "1-2 years" => Ok(ExperienceBracket::OneToTwoYears),
            "3-5 years" => Ok(ExperienceBracket::ThreeToFiveYears),
            "5+ years" => Ok(ExperienceBracket::FivePlusYears),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_type: InterviewType,
    pub question_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub job_description: String,
    pub resume: String,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub num_questions: i32,
    pub level: InterviewLevel,
    pub experience: ExperienceBracket,
    pub focus: Vec<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structured feedback for one answer. Every field is optional because the
/// model is free to omit any of them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub strengths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal_answer: Option<String>,
}

impl Evaluation {
    /// Tone label with absent or blank tones counted as `Neutral`.
    pub fn tone_label(&self) -> &str {
        self.tone
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Neutral")
    }

    pub fn has_improvement(&self) -> bool {
        self.improvement
            .as_deref()
            .is_some_and(|i| !i.trim().is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_text: String,
    pub user_answer: Option<String>,
    pub video_url: Option<String>,
    pub evaluation: Evaluation,
    pub emotions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transcript plus feedback, as returned by the audio/video evaluation routes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerFeedback {
    #[serde(default)]
    pub transcript: String,
    pub feedback: Evaluation,
}
