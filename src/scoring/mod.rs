pub mod answers;
pub mod copy;
pub mod diagnosis;
pub mod engine;
pub mod error;
pub mod lowest;
pub mod severity;

pub use answers::{Answers, MAX_SCORE, MIN_SCORE};
pub use copy::{AlignmentNote, AlignmentStrength, STALL_WARNING};
pub use diagnosis::{diagnose, Diagnosis};
pub use engine::{
    compute_score, highest_pillars, lowest_pillars, pillar_averages, ranked_pillars, round_to_one,
    PillarAverages, ScoreResult,
};
pub use error::ScoringError;
pub use lowest::{lowest_questions, LowestQuestion, DEFAULT_LOWEST_COUNT};
pub use severity::{severity_band, SeverityBand};
