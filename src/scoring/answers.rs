use serde::Serialize;
use std::collections::BTreeMap;

use super::error::ScoringError;
use crate::scorecard::ScorecardConfig;

/// Lowest point on the answer scale ("Strongly Disagree").
pub const MIN_SCORE: u8 = 1;
/// Highest point on the answer scale ("Strongly Agree").
pub const MAX_SCORE: u8 = 5;

/// Question id -> score on the 1-5 scale.
///
/// Built up one answer at a time; a later answer for the same question
/// overwrites the earlier one. Scores outside the scale never get in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, u8>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, returning the previous score for that question if any.
    pub fn record(&mut self, question_id: impl Into<String>, score: u8) -> Result<Option<u8>, ScoringError> {
        let question_id = question_id.into();
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(ScoringError::ScoreOutOfRange { question_id, score });
        }
        Ok(self.0.insert(question_id, score))
    }

    /// Like [`record`](Self::record), but also rejects ids the scorecard does not declare.
    pub fn record_for(
        &mut self,
        config: &ScorecardConfig,
        question_id: &str,
        score: u8,
    ) -> Result<Option<u8>, ScoringError> {
        if config.question(question_id).is_none() {
            return Err(ScoringError::UnknownQuestion {
                question_id: question_id.to_string(),
            });
        }
        self.record(question_id, score)
    }

    pub fn get(&self, question_id: &str) -> Option<u8> {
        self.0.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(id, score)| (id.as_str(), *score))
    }

    /// Unanswered question ids, in configuration order.
    pub fn missing<'a>(&self, config: &'a ScorecardConfig) -> Vec<&'a str> {
        config
            .questions
            .iter()
            .filter(|q| !self.0.contains_key(&q.id))
            .map(|q| q.id.as_str())
            .collect()
    }

    /// True when every question in the scorecard has an answer.
    pub fn is_complete(&self, config: &ScorecardConfig) -> bool {
        config.questions.iter().all(|q| self.0.contains_key(&q.id))
    }

    /// Gate for the engine: fails with `IncompleteAnswers` listing what is missing.
    pub fn ensure_complete(&self, config: &ScorecardConfig) -> Result<(), ScoringError> {
        let missing = self.missing(config);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScoringError::IncompleteAnswers {
                missing: missing.into_iter().map(String::from).collect(),
            })
        }
    }

    /// Score for a question the caller already knows is answered.
    pub(crate) fn score_of(&self, question_id: &str) -> Result<u8, ScoringError> {
        self.get(question_id)
            .ok_or_else(|| ScoringError::IncompleteAnswers {
                missing: vec![question_id.to_string()],
            })
    }

    /// Build from a raw map such as an answers file. Every id must belong to
    /// `config` and every score must be on the scale.
    pub fn from_map(config: &ScorecardConfig, map: BTreeMap<String, u8>) -> Result<Self, ScoringError> {
        let mut answers = Answers::new();
        for (question_id, score) in map {
            answers.record_for(config, &question_id, score)?;
        }
        Ok(answers)
    }
}
