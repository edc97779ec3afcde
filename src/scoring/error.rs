use thiserror::Error;

/// Errors raised by the scoring engine and its copy lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// Scoring was requested before every question had an answer.
    /// `missing` lists the unanswered ids in configuration order.
    #[error("{} question(s) still need an answer: {}", .missing.len(), .missing.join(", "))]
    IncompleteAnswers { missing: Vec<String> },

    /// The scorecard lacks an entry it claims to support. Registered
    /// scorecards are validated on load, so this points at an unvalidated config.
    #[error("scorecard has no {table} entry for {key}")]
    MissingConfigEntry { table: &'static str, key: String },

    #[error("score {score} for question '{question_id}' is outside the 1-5 scale")]
    ScoreOutOfRange { question_id: String, score: u8 },

    #[error("question '{question_id}' is not part of this scorecard")]
    UnknownQuestion { question_id: String },
}

impl ScoringError {
    pub(crate) fn missing_entry(table: &'static str, key: impl ToString) -> Self {
        ScoringError::MissingConfigEntry {
            table,
            key: key.to_string(),
        }
    }
}
