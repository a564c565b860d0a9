//! Lenient parsing of model output and the fallback payloads used when the
//! output cannot be parsed.

use crate::domain::models::{AnswerFeedback, Evaluation};
use serde::de::DeserializeOwned;

const SUMMARY_PREVIEW_CHARS: usize = 250;

/// Returns the slice between the first `open` and the last `close`
/// delimiter, or the trimmed input when either is missing.
fn outermost(text: &str, open: char, close: char) -> &str {
    match (text.find(open), text.rfind(close)) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    }
}

pub fn extract_json_array(text: &str) -> &str {
    outermost(text, '[', ']')
}

pub fn extract_json_object(text: &str) -> &str {
    outermost(text, '{', '}')
}

/// Parses the outermost JSON object in `text`, ignoring code fences and prose.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_str(extract_json_object(text)).ok()
}

/// Parses a list of question strings from model output.
pub fn parse_question_list(text: &str) -> Option<Vec<String>> {
    let list: Vec<String> = serde_json::from_str(extract_json_array(text)).ok()?;
    let list: Vec<String> = list
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Fallback for a short review: keeps a preview of whatever the model said.
pub fn unparsed_review(raw: &str) -> Evaluation {
    Evaluation {
        summary: Some(raw.chars().take(SUMMARY_PREVIEW_CHARS).collect()),
        strengths: Vec::new(),
        improvement: Some("Could not extract improvement due to malformed response.".to_string()),
        tone: Some("Unclear".to_string()),
        ideal_answer: None,
    }
}

/// Fallback for a stored coaching evaluation.
pub fn unparsed_coaching() -> Evaluation {
    Evaluation {
        summary: Some("Could not parse evaluation".to_string()),
        strengths: Vec::new(),
        improvement: Some("N/A".to_string()),
        tone: Some("Unknown".to_string()),
        ideal_answer: Some("N/A".to_string()),
    }
}

/// Fallback for transcript feedback. A known transcript is preserved.
pub fn unparsed_feedback(transcript: Option<&str>) -> AnswerFeedback {
    AnswerFeedback {
        transcript: transcript
            .map(str::to_string)
            .unwrap_or_else(|| "Could not parse transcript".to_string()),
        feedback: Evaluation {
            summary: Some("Response could not be analyzed".to_string()),
            strengths: Vec::new(),
            improvement: Some("Please retry".to_string()),
            tone: Some("Unknown".to_string()),
            ideal_answer: None,
        },
    }
}
