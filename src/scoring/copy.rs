use serde::Serialize;

use super::error::ScoringError;
use super::severity::SeverityBand;
use crate::scorecard::{DiagnosisInsight, PackageRecommendation, ScorecardConfig, ScoredPillar};

/// Alignment at or below this average is called out as weak.
pub const WEAK_ALIGNMENT_MAX: f64 = 2.5;
/// Alignment at or above this average is called out as strong.
pub const STRONG_ALIGNMENT_MIN: f64 = 4.0;

const WEAK_ALIGNMENT_LEAD: &str = "Alignment is currently weak. Strategy and output are not reinforcing each other, so results stall quickly.";
const STRONG_ALIGNMENT_TEXT: &str = "Alignment looks strong. Strategy is showing up in the work, so keep it tight and consistent.";

/// Shown alongside Critical and Leaking diagnoses.
pub const STALL_WARNING: &str = "Left unchecked, this usually stalls growth even if spend increases.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStrength {
    Weak,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentNote {
    pub strength: AlignmentStrength,
    pub text: String,
}

pub fn diagnosis_insight(config: &ScorecardConfig, primary: ScoredPillar) -> Result<&DiagnosisInsight, ScoringError> {
    config
        .diagnosis_insights
        .get(&primary)
        .ok_or_else(|| ScoringError::missing_entry("diagnosis_insights", primary))
}

/// Pattern label for the primary pillar. Critical and Leaking use the
/// `critical` label; Improving and Healthy use `improving`.
pub fn pattern(config: &ScorecardConfig, primary: ScoredPillar, severity: SeverityBand) -> Result<&str, ScoringError> {
    let pair = config
        .patterns
        .get(&primary)
        .ok_or_else(|| ScoringError::missing_entry("patterns", primary))?;

    Ok(if severity.is_critical_leaning() {
        pair.critical.as_str()
    } else {
        pair.improving.as_str()
    })
}

pub fn thirty_day_rule(config: &ScorecardConfig, primary: ScoredPillar) -> Result<&str, ScoringError> {
    config
        .thirty_day_rules
        .get(&primary)
        .map(String::as_str)
        .ok_or_else(|| ScoringError::missing_entry("thirty_day_rules", primary))
}

pub fn severity_copy(config: &ScorecardConfig, severity: SeverityBand) -> Result<&str, ScoringError> {
    config
        .severity_copy
        .get(&severity)
        .map(String::as_str)
        .ok_or_else(|| ScoringError::missing_entry("severity_copy", severity))
}

/// `Ok(None)` when the scorecard carries no recommendations at all.
pub fn package_recommendation(
    config: &ScorecardConfig,
    primary: ScoredPillar,
) -> Result<Option<&PackageRecommendation>, ScoringError> {
    match config.package_recommendations {
        None => Ok(None),
        Some(ref packages) => packages
            .get(&primary)
            .map(Some)
            .ok_or_else(|| ScoringError::missing_entry("package_recommendations", primary)),
    }
}

/// Supplementary alignment note, surfaced only at the extremes.
pub fn alignment_note(
    config: &ScorecardConfig,
    primary: ScoredPillar,
    alignment_average: f64,
) -> Result<Option<AlignmentNote>, ScoringError> {
    if alignment_average <= WEAK_ALIGNMENT_MAX {
        let pillar_note = config
            .alignment_notes
            .get(&primary)
            .ok_or_else(|| ScoringError::missing_entry("alignment_notes", primary))?;
        Ok(Some(AlignmentNote {
            strength: AlignmentStrength::Weak,
            text: format!("{} {}", WEAK_ALIGNMENT_LEAD, pillar_note),
        }))
    } else if alignment_average >= STRONG_ALIGNMENT_MIN {
        Ok(Some(AlignmentNote {
            strength: AlignmentStrength::Strong,
            text: STRONG_ALIGNMENT_TEXT.to_string(),
        }))
    } else {
        Ok(None)
    }
}
