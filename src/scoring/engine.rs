use serde::Serialize;

use super::answers::Answers;
use super::error::ScoringError;
use super::severity::{severity_band, SeverityBand};
use crate::scorecard::{Pillar, ScorecardConfig, ScoredPillar};

/// Per-pillar averages, each rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarAverages {
    pub soul: f64,
    pub heart: f64,
    pub hands: f64,
    pub alignment: f64,
}

impl PillarAverages {
    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Soul => self.soul,
            Pillar::Heart => self.heart,
            Pillar::Hands => self.hands,
            Pillar::Alignment => self.alignment,
        }
    }

    pub fn scored(&self, pillar: ScoredPillar) -> f64 {
        self.get(pillar.pillar())
    }

    /// Mean of the four rounded averages, rounded again to one decimal.
    pub fn overall(&self) -> f64 {
        round_to_one((self.soul + self.heart + self.hands + self.alignment) / 4.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub averages: PillarAverages,
    /// Lowest-scoring scored pillar: the diagnosed root issue
    pub primary: ScoredPillar,
    pub secondary: ScoredPillar,
}

impl ScoreResult {
    pub fn primary_average(&self) -> f64 {
        self.averages.scored(self.primary)
    }

    /// Severity of the primary pillar.
    pub fn severity(&self) -> SeverityBand {
        severity_band(self.primary_average())
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average every pillar over its questions, in configuration order.
///
/// Fails with `IncompleteAnswers` unless every question has an answer.
pub fn pillar_averages(config: &ScorecardConfig, answers: &Answers) -> Result<PillarAverages, ScoringError> {
    answers.ensure_complete(config)?;

    Ok(PillarAverages {
        soul: pillar_mean(config, answers, Pillar::Soul)?,
        heart: pillar_mean(config, answers, Pillar::Heart)?,
        hands: pillar_mean(config, answers, Pillar::Hands)?,
        alignment: pillar_mean(config, answers, Pillar::Alignment)?,
    })
}

fn pillar_mean(config: &ScorecardConfig, answers: &Answers, pillar: Pillar) -> Result<f64, ScoringError> {
    let mut total = 0u32;
    let mut count = 0u32;
    for question in config.questions_for(pillar) {
        total += u32::from(answers.score_of(&question.id)?);
        count += 1;
    }

    if count == 0 {
        return Err(ScoringError::missing_entry("questions", pillar));
    }

    Ok(round_to_one(f64::from(total) / f64::from(count)))
}

/// Scored pillars from lowest to highest average.
///
/// The sort is stable over canonical order, so equal averages keep
/// Soul ahead of Heart ahead of Hands.
pub fn ranked_pillars(averages: &PillarAverages) -> [ScoredPillar; 3] {
    let mut ranked = ScoredPillar::ALL;
    ranked.sort_by(|a, b| averages.scored(*a).total_cmp(&averages.scored(*b)));
    ranked
}

/// The two lowest scored pillars, lowest first.
pub fn lowest_pillars(averages: &PillarAverages) -> [ScoredPillar; 2] {
    let ranked = ranked_pillars(averages);
    [ranked[0], ranked[1]]
}

/// The two highest scored pillars, highest first; ties keep canonical order.
pub fn highest_pillars(averages: &PillarAverages) -> [ScoredPillar; 2] {
    let mut ranked = ScoredPillar::ALL;
    ranked.sort_by(|a, b| averages.scored(*b).total_cmp(&averages.scored(*a)));
    [ranked[0], ranked[1]]
}

/// Score a complete set of answers against a scorecard.
pub fn compute_score(config: &ScorecardConfig, answers: &Answers) -> Result<ScoreResult, ScoringError> {
    let averages = pillar_averages(config, answers)?;
    let [primary, secondary, _] = ranked_pillars(&averages);

    Ok(ScoreResult {
        averages,
        primary,
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::builtin_scorecard;
    use proptest::prelude::*;

    fn config() -> ScorecardConfig {
        builtin_scorecard("marketing-reality-check").unwrap()
    }

    /// Answers q1..q12 in order.
    fn answers_from(scores: [u8; 12]) -> Answers {
        let mut answers = Answers::new();
        for (i, score) in scores.iter().enumerate() {
            answers.record(format!("q{}", i + 1), *score).unwrap();
        }
        answers
    }

    fn averages(soul: f64, heart: f64, hands: f64) -> PillarAverages {
        PillarAverages {
            soul,
            heart,
            hands,
            alignment: 3.0,
        }
    }

    #[test]
    fn test_round_to_one_half_away_from_zero() {
        assert_eq!(round_to_one(3.05), 3.1);
        assert_eq!(round_to_one(3.04), 3.0);
        assert_eq!(round_to_one(2.25), 2.3);
        assert_eq!(round_to_one(10.0 / 3.0), 3.3);
        assert_eq!(round_to_one(11.0 / 3.0), 3.7);
    }

    #[test]
    fn test_scenario_a_distinct_pillars() {
        let config = config();
        let answers = answers_from([5, 5, 5, 1, 1, 1, 3, 3, 3, 3, 4, 4]);

        let result = compute_score(&config, &answers).unwrap();
        assert_eq!(result.averages.soul, 5.0);
        assert_eq!(result.averages.heart, 1.0);
        assert_eq!(result.averages.hands, 3.0);
        assert_eq!(result.averages.alignment, 4.0);
        assert_eq!(result.primary, ScoredPillar::Heart);
        assert_eq!(result.secondary, ScoredPillar::Hands);
        assert_eq!(result.severity(), SeverityBand::Critical);
    }

    #[test]
    fn test_scenario_b_all_equal() {
        let config = config();
        let answers = answers_from([3; 12]);

        let result = compute_score(&config, &answers).unwrap();
        for pillar in Pillar::ALL {
            assert_eq!(result.averages.get(pillar), 3.0);
        }
        assert_eq!(result.primary, ScoredPillar::Soul);
        assert_eq!(result.secondary, ScoredPillar::Heart);
        assert_eq!(result.severity(), SeverityBand::Improving);
    }

    #[test]
    fn test_alignment_never_primary() {
        let config = config();
        // Alignment is by far the lowest, but is not ranked
        let answers = answers_from([4, 4, 4, 5, 5, 5, 3, 4, 4, 4, 1, 1]);

        let result = compute_score(&config, &answers).unwrap();
        assert_eq!(result.averages.alignment, 1.0);
        assert_eq!(result.primary, ScoredPillar::Hands);
        assert_eq!(result.secondary, ScoredPillar::Soul);
    }

    #[test]
    fn test_averages_are_rounded() {
        let config = config();
        // Soul: 2,3,3 -> 2.666.. -> 2.7; Hands: 1,2,2,2 -> 1.75 -> 1.8
        let answers = answers_from([2, 3, 3, 4, 4, 5, 1, 2, 2, 2, 3, 4]);

        let result = compute_score(&config, &answers).unwrap();
        assert_eq!(result.averages.soul, 2.7);
        assert_eq!(result.averages.heart, 4.3);
        assert_eq!(result.averages.hands, 1.8);
        assert_eq!(result.averages.alignment, 3.5);
    }

    #[test]
    fn test_tie_between_later_pillars() {
        let ranked = ranked_pillars(&averages(4.0, 2.5, 2.5));
        assert_eq!(ranked, [ScoredPillar::Heart, ScoredPillar::Hands, ScoredPillar::Soul]);

        let ranked = ranked_pillars(&averages(2.0, 3.0, 2.0));
        assert_eq!(ranked, [ScoredPillar::Soul, ScoredPillar::Hands, ScoredPillar::Heart]);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let config = config();
        let answers = answers_from([2, 2, 2, 2, 2, 2, 4, 4, 4, 4, 3, 3]);
        let first = compute_score(&config, &answers).unwrap();
        for _ in 0..20 {
            let again = compute_score(&config, &answers).unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(first.primary, ScoredPillar::Soul);
        assert_eq!(first.secondary, ScoredPillar::Heart);
    }

    #[test]
    fn test_highest_and_lowest_pillars() {
        let avgs = averages(5.0, 1.0, 3.0);
        assert_eq!(lowest_pillars(&avgs), [ScoredPillar::Heart, ScoredPillar::Hands]);
        assert_eq!(highest_pillars(&avgs), [ScoredPillar::Soul, ScoredPillar::Hands]);

        let tied = averages(3.0, 3.0, 3.0);
        assert_eq!(highest_pillars(&tied), [ScoredPillar::Soul, ScoredPillar::Heart]);
    }

    #[test]
    fn test_overall_average() {
        let avgs = PillarAverages {
            soul: 5.0,
            heart: 1.0,
            hands: 3.0,
            alignment: 4.0,
        };
        assert_eq!(avgs.overall(), 3.3);
    }

    #[test]
    fn test_incomplete_answers_rejected() {
        let config = config();
        let mut answers = Answers::new();
        for q in config.questions.iter().filter(|q| q.id != "q7") {
            answers.record(q.id.clone(), 3).unwrap();
        }

        let err = compute_score(&config, &answers).unwrap_err();
        assert_eq!(
            err,
            ScoringError::IncompleteAnswers {
                missing: vec!["q7".to_string()]
            }
        );
    }

    #[test]
    fn test_empty_pillar_reports_missing_entry() {
        let mut config = config();
        config.questions.retain(|q| q.pillar != Pillar::Alignment);
        let answers = answers_from([3; 12]);

        let err = pillar_averages(&config, &answers).unwrap_err();
        assert_eq!(
            err,
            ScoringError::MissingConfigEntry {
                table: "questions",
                key: "Alignment".to_string()
            }
        );
    }

    #[test]
    fn test_extra_answers_are_ignored() {
        let config = config();
        let mut answers = answers_from([4; 12]);
        answers.record("q99", 1).unwrap();

        let result = compute_score(&config, &answers).unwrap();
        assert_eq!(result.averages.soul, 4.0);
    }

    proptest! {
        #[test]
        fn prop_averages_stay_on_scale(scores in proptest::array::uniform12(1u8..=5)) {
            let config = config();
            let answers = answers_from(scores);
            let result = compute_score(&config, &answers).unwrap();
            for pillar in Pillar::ALL {
                let avg = result.averages.get(pillar);
                prop_assert!((1.0..=5.0).contains(&avg), "{} average {} off scale", pillar, avg);
            }
        }

        #[test]
        fn prop_scoring_is_idempotent(scores in proptest::array::uniform12(1u8..=5)) {
            let config = config();
            let answers = answers_from(scores);
            prop_assert_eq!(
                compute_score(&config, &answers).unwrap(),
                compute_score(&config, &answers).unwrap()
            );
        }

        #[test]
        fn prop_primary_has_lowest_average(scores in proptest::array::uniform12(1u8..=5)) {
            let config = config();
            let result = compute_score(&config, &answers_from(scores)).unwrap();
            let primary = result.primary_average();
            for pillar in ScoredPillar::ALL {
                prop_assert!(primary <= result.averages.scored(pillar));
            }
            prop_assert!(result.averages.scored(result.secondary) >= primary);
        }
    }
}
