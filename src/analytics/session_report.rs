//! Per-session detail view: retake grouping and latest-attempt analytics.

use crate::domain::models::{InterviewSession, SessionResponse};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const SECONDS_PER_WORD: f64 = 0.4;
const NO_RESPONSES_TIP: &str = "No responses recorded for this session yet.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    #[serde(flatten)]
    pub response: SessionResponse,
    pub question_number: usize,
    pub attempt_number: usize,
    pub total_attempts: usize,
    pub is_latest_attempt: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalytics {
    pub question_number: usize,
    pub question: String,
    pub tone: String,
    pub word_count: usize,
    pub confidence: u32,
    pub total_attempts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetakeAnalytics {
    pub total_retakes: usize,
    pub questions_with_retakes: usize,
    pub avg_attempts_per_question: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalytics {
    pub avg_confidence: u32,
    pub avg_word_count: u32,
    pub tone_distribution: BTreeMap<String, usize>,
    pub emotion_distribution: BTreeMap<String, usize>,
    pub total_duration_estimate: u32,
    pub question_analytics: Vec<QuestionAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retake_analytics: Option<RetakeAnalytics>,
    pub tips: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session: InterviewSession,
    pub responses: Vec<AttemptView>,
    pub analytics: SessionAnalytics,
}

/// Heuristic confidence from the evaluated tone.
pub fn tone_confidence(tone: &str) -> u32 {
    match tone {
        "Confident" => 90,
        "Neutral" => 80,
        _ => 70,
    }
}

/// Counts whitespace-separated words. Runs of spaces, tabs and newlines
/// count as one separator.
pub fn word_count(transcript: Option<&str>) -> usize {
    transcript.map(|t| t.split_whitespace().count()).unwrap_or(0)
}

/// Groups responses by question text, in order of each question's first
/// answer, with every group sorted by creation time.
fn group_attempts(mut responses: Vec<SessionResponse>) -> Vec<AttemptView> {
    responses.sort_by_key(|r| r.created_at);

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<SessionResponse>> = Vec::new();
    for response in responses {
        let idx = *order
            .entry(response.question_text.clone())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[idx].push(response);
    }

    let mut views = Vec::new();
    for (group_idx, group) in groups.into_iter().enumerate() {
        let total = group.len();
        for (attempt_idx, response) in group.into_iter().enumerate() {
            views.push(AttemptView {
                response,
                question_number: group_idx + 1,
                attempt_number: attempt_idx + 1,
                total_attempts: total,
                is_latest_attempt: attempt_idx + 1 == total,
            });
        }
    }
    views
}

fn tip_for(avg_confidence: f64, total_retakes: usize) -> String {
    if avg_confidence < 75.0 {
        "Practice more structured responses (use STAR method).".to_string()
    } else if total_retakes > 0 {
        format!(
            "Good confidence! You made {total_retakes} retakes - keep practicing for consistency."
        )
    } else {
        "Excellent performance! Great confidence and consistency.".to_string()
    }
}

pub fn build_report(session: InterviewSession, responses: Vec<SessionResponse>) -> SessionReport {
    if responses.is_empty() {
        return SessionReport {
            session,
            responses: Vec::new(),
            analytics: SessionAnalytics {
                avg_confidence: 0,
                avg_word_count: 0,
                tone_distribution: BTreeMap::new(),
                emotion_distribution: BTreeMap::new(),
                total_duration_estimate: 0,
                question_analytics: Vec::new(),
                retake_analytics: None,
                tips: NO_RESPONSES_TIP.to_string(),
            },
        };
    }

    let attempts = group_attempts(responses);
    let latest: Vec<&AttemptView> = attempts.iter().filter(|a| a.is_latest_attempt).collect();

    let question_analytics: Vec<QuestionAnalytics> = latest
        .iter()
        .map(|a| {
            let tone = a.response.evaluation.tone_label().to_string();
            QuestionAnalytics {
                question_number: a.question_number,
                question: a.response.question_text.clone(),
                confidence: tone_confidence(&tone),
                word_count: word_count(a.response.user_answer.as_deref()),
                tone,
                total_attempts: a.total_attempts,
            }
        })
        .collect();

    let count = question_analytics.len() as f64;
    let avg_confidence =
        question_analytics.iter().map(|q| q.confidence as f64).sum::<f64>() / count;
    let avg_word_count =
        question_analytics.iter().map(|q| q.word_count as f64).sum::<f64>() / count;

    let mut tone_distribution = BTreeMap::new();
    for q in &question_analytics {
        *tone_distribution.entry(q.tone.clone()).or_insert(0) += 1;
    }

    let mut emotion_distribution = BTreeMap::new();
    for a in &latest {
        for emotion in &a.response.emotions {
            *emotion_distribution.entry(emotion.clone()).or_insert(0) += 1;
        }
    }

    let total_duration_estimate = avg_word_count * count * SECONDS_PER_WORD;

    let retakes = RetakeAnalytics {
        total_retakes: attempts.len() - latest.len(),
        questions_with_retakes: question_analytics
            .iter()
            .filter(|q| q.total_attempts > 1)
            .count(),
        avg_attempts_per_question: attempts.len() as f64 / count,
    };
    let tips = tip_for(avg_confidence, retakes.total_retakes);

    SessionReport {
        session,
        analytics: SessionAnalytics {
            avg_confidence: avg_confidence.round() as u32,
            avg_word_count: avg_word_count.round() as u32,
            tone_distribution,
            emotion_distribution,
            total_duration_estimate: total_duration_estimate.round() as u32,
            question_analytics,
            retake_analytics: Some(retakes),
            tips,
        },
        responses: attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{response, session};

    #[test]
    fn test_attempts_ordered_by_creation_time() {
        let s = session(0);
        // Inserted out of order on purpose.
        let responses = vec![
            response(s.id, "Q1", 30, Some("Confident")),
            response(s.id, "Q2", 10, Some("Neutral")),
            response(s.id, "Q1", 0, Some("Nervous")),
            response(s.id, "Q1", 20, None),
        ];
        let first_q1 = responses[2].id;
        let last_q1 = responses[0].id;

        let report = build_report(s, responses);
        let q1: Vec<&AttemptView> = report
            .responses
            .iter()
            .filter(|a| a.response.question_text == "Q1")
            .collect();

        assert_eq!(q1.len(), 3);
        assert_eq!(q1[0].response.id, first_q1);
        assert_eq!(
            q1.iter().map(|a| a.attempt_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(q1.iter().all(|a| a.total_attempts == 3));
        assert_eq!(q1.iter().filter(|a| a.is_latest_attempt).count(), 1);
        assert!(q1[2].is_latest_attempt);
        assert_eq!(q1[2].response.id, last_q1);
        // Q1 was answered first, so it is question 1.
        assert!(q1.iter().all(|a| a.question_number == 1));
    }

    #[test]
    fn test_analytics_use_latest_attempts_only() {
        let s = session(0);
        let mut old = response(s.id, "Q1", 0, Some("Nervous"));
        old.user_answer = Some("one two three four five six seven eight nine ten".into());
        old.emotions = vec!["fear".into()];
        let mut latest_q1 = response(s.id, "Q1", 10, Some("Confident"));
        latest_q1.user_answer = Some("one two three four".into());
        latest_q1.emotions = vec!["happy".into()];
        let mut q2 = response(s.id, "Q2", 20, None);
        q2.user_answer = Some("one  two".into());

        let report = build_report(s, vec![old, latest_q1, q2]);
        let analytics = &report.analytics;

        assert_eq!(report.responses.len(), 3);
        assert_eq!(analytics.question_analytics.len(), 2);
        assert_eq!(analytics.avg_word_count, 3);
        // 3.0 words * 2 answers * 0.4s
        assert_eq!(analytics.total_duration_estimate, 2);
        assert_eq!(analytics.avg_confidence, 85);
        assert_eq!(analytics.tone_distribution.values().sum::<usize>(), 2);
        assert_eq!(analytics.tone_distribution.get("Neutral"), Some(&1));
        assert_eq!(analytics.tone_distribution.get("Nervous"), None);
        assert_eq!(analytics.emotion_distribution.get("happy"), Some(&1));
        assert_eq!(analytics.emotion_distribution.get("fear"), None);

        let retakes = analytics.retake_analytics.as_ref().unwrap();
        assert_eq!(retakes.total_retakes, 1);
        assert_eq!(retakes.questions_with_retakes, 1);
        assert!((retakes.avg_attempts_per_question - 1.5).abs() < f64::EPSILON);
        assert_eq!(
            analytics.tips,
            "Good confidence! You made 1 retakes - keep practicing for consistency."
        );
    }

    #[test]
    fn test_low_confidence_tip() {
        let s = session(0);
        let report = build_report(
            s.clone(),
            vec![
                response(s.id, "Q1", 0, Some("Hesitant")),
                response(s.id, "Q2", 1, Some("Nervous")),
            ],
        );
        assert_eq!(report.analytics.avg_confidence, 70);
        assert_eq!(
            report.analytics.tips,
            "Practice more structured responses (use STAR method)."
        );
    }

    #[test]
    fn test_excellent_tip_without_retakes() {
        let s = session(0);
        let report = build_report(s.clone(), vec![response(s.id, "Q1", 0, Some("Confident"))]);
        assert_eq!(
            report.analytics.tips,
            "Excellent performance! Great confidence and consistency."
        );
    }

    #[test]
    fn test_empty_session_report() {
        let report = build_report(session(0), Vec::new());
        assert!(report.responses.is_empty());
        assert_eq!(report.analytics.tips, NO_RESPONSES_TIP);
        assert!(report.analytics.retake_analytics.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["analytics"].get("retakeAnalytics").is_none());
        assert_eq!(json["analytics"]["totalDurationEstimate"], 0);
    }

    #[test]
    fn test_attempt_view_flattens_response() {
        let s = session(0);
        let report = build_report(s.clone(), vec![response(s.id, "Q1", 0, None)]);
        let json = serde_json::to_value(&report.responses[0]).unwrap();

        assert_eq!(json["questionText"], "Q1");
        assert_eq!(json["attemptNumber"], 1);
        assert_eq!(json["isLatestAttempt"], true);
        assert!(json["_id"].is_string());
    }

    #[test]
    fn test_tone_confidence_mapping() {
        assert_eq!(tone_confidence("Confident"), 90);
        assert_eq!(tone_confidence("Neutral"), 80);
        assert_eq!(tone_confidence("confident"), 70);
        assert_eq!(word_count(None), 0);
        assert_eq!(word_count(Some("  ")), 0);
    }

    #[test]
    fn test_word_count_collapses_repeated_whitespace() {
        assert_eq!(word_count(Some("one  two")), 2);
        assert_eq!(word_count(Some(" lead\tand\ntrail ")), 3);
    }
}
