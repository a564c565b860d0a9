use crate::domain::models::{InterviewSession, SessionResponse};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOverview {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_description: String,
    pub num_questions: i32,
    pub questions_answered: usize,
    pub confidence: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub avg_confidence: u32,
    pub total_sessions: usize,
    pub strengths: usize,
    pub weaknesses: usize,
    pub tone_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfidencePoint {
    pub name: String,
    pub confidence: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub confidence_trend: Vec<ConfidencePoint>,
    pub strengths_weaknesses: Vec<NamedValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub sessions: Vec<SessionOverview>,
    pub analytics: DashboardAnalytics,
    pub charts: DashboardCharts,
}

/// Placeholder confidence for a session with answers. Not derived from the
/// evaluations yet.
fn mock_confidence<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(70..90)
}

/// Builds the per-user dashboard. `sessions` keep their given order (newest
/// first when loaded from the database).
pub fn summarize<R: Rng + ?Sized>(
    sessions: &[InterviewSession],
    responses: &[SessionResponse],
    rng: &mut R,
) -> DashboardSummary {
    let mut by_session: HashMap<Uuid, Vec<&SessionResponse>> = HashMap::new();
    for response in responses {
        by_session.entry(response.session_id).or_default().push(response);
    }

    let overviews: Vec<SessionOverview> = sessions
        .iter()
        .map(|session| {
            let answers = by_session.get(&session.id).map(Vec::as_slice).unwrap_or(&[]);
            let distinct: HashSet<&str> =
                answers.iter().map(|r| r.question_text.as_str()).collect();
            let confidence = if answers.is_empty() {
                0
            } else {
                mock_confidence(rng)
            };

            SessionOverview {
                id: session.id,
                created_at: session.created_at,
                job_description: session.job_description.clone(),
                num_questions: session.num_questions,
                questions_answered: distinct.len(),
                confidence,
            }
        })
        .collect();

    let confidence_sum: u32 = overviews.iter().map(|s| s.confidence).sum();
    let avg_confidence = (confidence_sum as f64 / overviews.len().max(1) as f64).round() as u32;

    let strengths: usize = responses.iter().map(|r| r.evaluation.strengths.len()).sum();
    let weaknesses = responses
        .iter()
        .filter(|r| r.evaluation.has_improvement())
        .count();

    let mut tone_distribution = BTreeMap::new();
    for response in responses {
        *tone_distribution
            .entry(response.evaluation.tone_label().to_string())
            .or_insert(0) += 1;
    }

    let confidence_trend = overviews
        .iter()
        .enumerate()
        .map(|(idx, s)| ConfidencePoint {
            name: format!("Session {}", idx + 1),
            confidence: s.confidence,
        })
        .collect();

    DashboardSummary {
        analytics: DashboardAnalytics {
            avg_confidence,
            total_sessions: sessions.len(),
            strengths,
            weaknesses,
            tone_distribution,
        },
        charts: DashboardCharts {
            confidence_trend,
            strengths_weaknesses: vec![
                NamedValue {
                    name: "Strengths".to_string(),
                    value: strengths,
                },
                NamedValue {
                    name: "Weaknesses".to_string(),
                    value: weaknesses,
                },
            ],
        },
        sessions: overviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{response, session};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_questions_answered_ignores_retakes() {
        let s = session(0);
        let responses = vec![
            response(s.id, "Tell me about yourself", 0, Some("Confident")),
            response(s.id, "Tell me about yourself", 10, Some("Nervous")),
            response(s.id, "Why Rust?", 20, None),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        let summary = summarize(&[s], &responses, &mut rng);

        assert_eq!(summary.sessions[0].questions_answered, 2);
        assert_eq!(summary.analytics.total_sessions, 1);
    }

    #[test]
    fn test_confidence_is_zero_without_answers_and_in_range_otherwise() {
        let answered = session(0);
        let empty = session(1);
        let responses = vec![response(answered.id, "Q1", 0, None)];

        let mut rng = StdRng::seed_from_u64(42);
        let summary = summarize(&[answered, empty], &responses, &mut rng);

        assert!((70..90).contains(&summary.sessions[0].confidence));
        assert_eq!(summary.sessions[1].confidence, 0);
        assert_eq!(summary.charts.confidence_trend[0].name, "Session 1");
        assert_eq!(summary.charts.confidence_trend[1].confidence, 0);
    }

    #[test]
    fn test_strengths_weaknesses_and_tones() {
        let s = session(0);
        let mut first = response(s.id, "Q1", 0, Some("Confident"));
        first.evaluation.strengths = vec!["clear".into(), "structured".into()];
        first.evaluation.improvement = Some("Add metrics".into());
        let mut second = response(s.id, "Q2", 5, None);
        second.evaluation.strengths = vec!["concise".into()];
        second.evaluation.improvement = Some(String::new());
        let third = response(s.id, "Q3", 9, Some("Confident"));

        let mut rng = StdRng::seed_from_u64(1);
        let summary = summarize(&[s], &[first, second, third], &mut rng);

        assert_eq!(summary.analytics.strengths, 3);
        assert_eq!(summary.analytics.weaknesses, 1);
        assert_eq!(summary.analytics.tone_distribution.get("Confident"), Some(&2));
        assert_eq!(summary.analytics.tone_distribution.get("Neutral"), Some(&1));
        assert_eq!(summary.charts.strengths_weaknesses[0].value, 3);
        assert_eq!(summary.charts.strengths_weaknesses[1].value, 1);
    }

    #[test]
    fn test_empty_dashboard() {
        let mut rng = StdRng::seed_from_u64(3);
        let summary = summarize(&[], &[], &mut rng);

        assert_eq!(summary.analytics.avg_confidence, 0);
        assert_eq!(summary.analytics.total_sessions, 0);
        assert!(summary.analytics.tone_distribution.is_empty());
        assert!(summary.charts.confidence_trend.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let s = session(0);
        let responses = vec![response(s.id, "Q1", 0, Some("Calm"))];
        let mut rng = StdRng::seed_from_u64(9);
        let json = serde_json::to_value(summarize(&[s], &responses, &mut rng)).unwrap();

        assert!(json["sessions"][0]["_id"].is_string());
        assert_eq!(json["sessions"][0]["questionsAnswered"], 1);
        assert_eq!(json["analytics"]["toneDistribution"]["Calm"], 1);
        assert_eq!(json["charts"]["strengthsWeaknesses"][0]["name"], "Strengths");
    }
}
