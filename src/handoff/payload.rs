use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::scorecard::{Pillar, ScorecardConfig, ScoredPillar};
use crate::scoring::{highest_pillars, lowest_pillars, Answers, ScoreResult, ScoringError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarAveragesPayload {
    pub soul_avg: f64,
    pub heart_avg: f64,
    pub hands_avg: f64,
    pub align_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub overall_avg: f64,
    pub pillar_averages: PillarAveragesPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub pillar_id: Pillar,
    pub score: u8,
}

/// Completed result as the plan-generation service expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsPayload {
    pub source: String,
    pub route_tag: String,
    /// RFC 3339, UTC, millisecond precision
    pub completed_at: String,
    pub totals: Totals,
    pub lowest_pillars: [ScoredPillar; 2],
    pub highest_pillars: [ScoredPillar; 2],
    pub answers: Vec<AnswerEntry>,
}

/// Assemble the payload for a scored run. Answers are listed in question
/// declaration order.
pub fn build_payload(
    config: &ScorecardConfig,
    answers: &Answers,
    score: &ScoreResult,
    completed_at: DateTime<Utc>,
) -> Result<InsightsPayload, ScoringError> {
    let answer_entries = config
        .questions
        .iter()
        .map(|q| {
            Ok(AnswerEntry {
                question_id: q.id.clone(),
                pillar_id: q.pillar,
                score: answers.score_of(&q.id)?,
            })
        })
        .collect::<Result<Vec<_>, ScoringError>>()?;

    let averages = &score.averages;

    Ok(InsightsPayload {
        source: config.handoff.source.clone(),
        route_tag: config.handoff.route_tag.clone(),
        completed_at: completed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        totals: Totals {
            overall_avg: averages.overall(),
            pillar_averages: PillarAveragesPayload {
                soul_avg: averages.soul,
                heart_avg: averages.heart,
                hands_avg: averages.hands,
                align_avg: averages.alignment,
            },
        },
        lowest_pillars: lowest_pillars(averages),
        highest_pillars: highest_pillars(averages),
        answers: answer_entries,
    })
}

/// How the plan service answered a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The service created an editable plan at this URL
    Redirect(String),
    Accepted,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    #[serde(default)]
    edit_url: Option<String>,
}

/// Interpret the body of a 2xx reply. Bodies that are not JSON, or that
/// lack a non-empty `editUrl`, count as a plain acceptance.
pub fn interpret_plan_response(body: &str) -> PlanOutcome {
    match serde_json::from_str::<PlanResponse>(body) {
        Ok(PlanResponse {
            edit_url: Some(url),
        }) if !url.trim().is_empty() => PlanOutcome::Redirect(url.trim().to_string()),
        _ => PlanOutcome::Accepted,
    }
}
