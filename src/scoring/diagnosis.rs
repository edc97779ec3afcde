use serde::Serialize;

use super::answers::Answers;
use super::copy::{self, AlignmentNote};
use super::engine::{compute_score, ScoreResult};
use super::error::ScoringError;
use super::lowest::{lowest_questions, LowestQuestion, DEFAULT_LOWEST_COUNT};
use super::severity::SeverityBand;
use crate::scorecard::{DiagnosisInsight, PackageRecommendation, ScorecardConfig};

/// Everything a front end needs to render one result.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis<'a> {
    pub slug: &'a str,
    pub score: ScoreResult,
    pub overall_average: f64,
    pub severity: SeverityBand,
    pub pattern: &'a str,
    pub insight: &'a DiagnosisInsight,
    pub thirty_day_rule: &'a str,
    pub severity_copy: &'a str,
    /// Present only for Critical and Leaking results
    pub severity_warning: Option<&'static str>,
    pub package: Option<&'a PackageRecommendation>,
    pub alignment_note: Option<AlignmentNote>,
    pub lowest_questions: Vec<LowestQuestion<'a>>,
}

/// Score the answers and resolve all copy for the result.
pub fn diagnose<'a>(config: &'a ScorecardConfig, answers: &Answers) -> Result<Diagnosis<'a>, ScoringError> {
    let score = compute_score(config, answers)?;
    let severity = score.severity();
    let primary = score.primary;

    Ok(Diagnosis {
        slug: config.slug.as_str(),
        overall_average: score.averages.overall(),
        severity,
        pattern: copy::pattern(config, primary, severity)?,
        insight: copy::diagnosis_insight(config, primary)?,
        thirty_day_rule: copy::thirty_day_rule(config, primary)?,
        severity_copy: copy::severity_copy(config, severity)?,
        severity_warning: severity.is_critical_leaning().then_some(copy::STALL_WARNING),
        package: copy::package_recommendation(config, primary)?,
        alignment_note: copy::alignment_note(config, primary, score.averages.alignment)?,
        lowest_questions: lowest_questions(config, answers, DEFAULT_LOWEST_COUNT)?,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::{builtin_scorecard, ScoredPillar};
    use crate::scoring::copy::AlignmentStrength;

    fn answers_from(scores: [u8; 12]) -> Answers {
        let mut answers = Answers::new();
        for (i, score) in scores.iter().enumerate() {
            answers.record(format!("q{}", i + 1), *score).unwrap();
        }
        answers
    }

    #[test]
    fn test_diagnose_scenario_a() {
        let config = builtin_scorecard("marketing-reality-check").unwrap();
        let answers = answers_from([5, 5, 5, 1, 1, 1, 3, 3, 3, 3, 4, 4]);

        let diagnosis = diagnose(&config, &answers).unwrap();
        assert_eq!(diagnosis.score.primary, ScoredPillar::Heart);
        assert_eq!(diagnosis.severity, SeverityBand::Critical);
        assert_eq!(diagnosis.pattern, "Safe Voice, Slow Trust");
        assert_eq!(diagnosis.insight.title, "Your primary issue: HEART");
        assert_eq!(diagnosis.severity_warning, Some(copy::STALL_WARNING));
        assert_eq!(
            diagnosis.package.unwrap().recommended.title,
            "Human Presence Kit (Story + Video Plan)"
        );
        // Alignment at 4.0 is strong
        assert_eq!(
            diagnosis.alignment_note.as_ref().map(|n| n.strength),
            Some(AlignmentStrength::Strong)
        );
        let ids: Vec<_> = diagnosis.lowest_questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["q4", "q5", "q6"]);
        assert_eq!(diagnosis.overall_average, 3.3);
    }

    #[test]
    fn test_diagnose_healthy_without_packages() {
        let config = builtin_scorecard("flashbuzz-video-growth").unwrap();
        let answers = answers_from([4, 5, 4, 5, 5, 5, 4, 4, 4, 4, 3, 3]);

        let diagnosis = diagnose(&config, &answers).unwrap();
        assert_eq!(diagnosis.score.primary, ScoredPillar::Hands);
        assert_eq!(diagnosis.severity, SeverityBand::Healthy);
        assert_eq!(diagnosis.pattern, "Inconsistent Output");
        assert_eq!(diagnosis.severity_warning, None);
        assert!(diagnosis.package.is_none());
        assert!(diagnosis.alignment_note.is_none());
    }

    #[test]
    fn test_diagnose_incomplete() {
        let config = builtin_scorecard("hutt-studio-momentum").unwrap();
        let answers = Answers::new();
        assert!(matches!(
            diagnose(&config, &answers),
            Err(ScoringError::IncompleteAnswers { .. })
        ));
    }
}
