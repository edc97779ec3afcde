use serde::Serialize;

use super::answers::Answers;
use super::error::ScoringError;
use crate::scorecard::{Pillar, ScorecardConfig};

/// How many questions the diagnosis explains itself with.
pub const DEFAULT_LOWEST_COUNT: usize = 3;

/// One of the answers that drove the diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowestQuestion<'a> {
    pub id: &'a str,
    /// 1-based position in the scorecard
    pub number: usize,
    pub pillar: Pillar,
    pub text: &'a str,
    pub score: u8,
}

/// The `count` lowest-scoring questions, lowest first.
///
/// Equal scores keep configuration order, so identical input always
/// yields the same list.
pub fn lowest_questions<'a>(
    config: &'a ScorecardConfig,
    answers: &Answers,
    count: usize,
) -> Result<Vec<LowestQuestion<'a>>, ScoringError> {
    answers.ensure_complete(config)?;

    let mut scored = config
        .questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            Ok(LowestQuestion {
                id: question.id.as_str(),
                number: idx + 1,
                pillar: question.pillar,
                text: question.text.as_str(),
                score: answers.score_of(&question.id)?,
            })
        })
        .collect::<Result<Vec<_>, ScoringError>>()?;

    // Stable sort: ties stay in declaration order
    scored.sort_by_key(|q| q.score);
    scored.truncate(count);

    Ok(scored)
}
