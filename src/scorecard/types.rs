use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the four question categories.
///
/// `Soul`, `Heart` and `Hands` are ranked against each other to find the
/// primary issue. `Alignment` is averaged and reported but never ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Pillar {
    Soul,
    Heart,
    Hands,
    Alignment,
}

impl Pillar {
    /// All pillars in declaration order.
    pub const ALL: [Pillar; 4] = [Pillar::Soul, Pillar::Heart, Pillar::Hands, Pillar::Alignment];

    /// The ranked counterpart of this pillar, or `None` for `Alignment`.
    pub fn scored(self) -> Option<ScoredPillar> {
        match self {
            Pillar::Soul => Some(ScoredPillar::Soul),
            Pillar::Heart => Some(ScoredPillar::Heart),
            Pillar::Hands => Some(ScoredPillar::Hands),
            Pillar::Alignment => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pillar::Soul => "Soul",
            Pillar::Heart => "Heart",
            Pillar::Hands => "Hands",
            Pillar::Alignment => "Alignment",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pillar eligible for primary/secondary diagnosis.
///
/// The derived `Ord` is the canonical tie-break order: Soul, then Heart, then Hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum ScoredPillar {
    Soul,
    Heart,
    Hands,
}

impl ScoredPillar {
    /// Scored pillars in canonical order.
    pub const ALL: [ScoredPillar; 3] = [ScoredPillar::Soul, ScoredPillar::Heart, ScoredPillar::Hands];

    pub fn pillar(self) -> Pillar {
        match self {
            ScoredPillar::Soul => Pillar::Soul,
            ScoredPillar::Heart => Pillar::Heart,
            ScoredPillar::Hands => Pillar::Hands,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.pillar().as_str()
    }
}

impl fmt::Display for ScoredPillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of the primary pillar, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum SeverityBand {
    Critical,
    Leaking,
    Improving,
    Healthy,
}

impl SeverityBand {
    /// All bands from worst to best.
    pub const ALL: [SeverityBand; 4] = [
        SeverityBand::Critical,
        SeverityBand::Leaking,
        SeverityBand::Improving,
        SeverityBand::Healthy,
    ];

    /// Critical and Leaking share the "critical" pattern copy and the stall warning.
    pub fn is_critical_leaning(self) -> bool {
        matches!(self, SeverityBand::Critical | SeverityBand::Leaking)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityBand::Critical => "Critical",
            SeverityBand::Leaking => "Leaking",
            SeverityBand::Improving => "Improving",
            SeverityBand::Healthy => "Healthy",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub id: String,
    pub pillar: Pillar,
    pub text: String,
}

/// Display metadata for one pillar section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PillarSection {
    pub id: Pillar,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Free-form hint such as "Q1-3"
    #[serde(default)]
    pub question_range: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Intro {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub brand_name: String,
    pub accent: String,
    pub accent_hover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Routing information forwarded with every insights submission.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Handoff {
    pub source: String,
    pub route_tag: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResultsCta {
    pub label: String,
    pub description: String,
    pub button_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiagnosisInsight {
    pub title: String,
    pub pattern: String,
    pub consequence: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageCard {
    pub title: String,
    pub audience: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub outcome: String,
    pub cta: CallToAction,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageRecommendation {
    pub recommended: PackageCard,
    pub alternative: PackageCard,
}

/// Pattern labels for one pillar, split by severity leaning.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatternPair {
    pub critical: String,
    pub improving: String,
}

/// Complete definition of one scorecard variant.
///
/// Copy tables default to empty so that a missing table is reported by
/// [`validate_scorecard`](super::validate_scorecard) with the rest of the
/// problems instead of failing the parse.
///
/// Example YAML (abridged):
/// ```yaml
/// slug: marketing-reality-check
/// title: Marketing Reality Check
/// questions:
///   - { id: q1, pillar: Soul, text: "We know what we stand for." }
/// scale_labels: [Strongly Disagree, Disagree, Neutral, Agree, Strongly Agree]
/// patterns:
///   Soul: { critical: Drifting Direction, improving: Unclear Edge }
/// severity_copy:
///   Critical: "Keep it fast and simple."
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScorecardConfig {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub intro: Intro,
    pub pillars: Vec<PillarSection>,
    pub questions: Vec<Question>,
    pub scale_labels: Vec<String>,
    pub theme: Theme,
    pub handoff: Handoff,
    pub results_cta: ResultsCta,

    #[serde(default)]
    pub diagnosis_insights: BTreeMap<ScoredPillar, DiagnosisInsight>,

    /// Optional: when absent the recommendation section is omitted entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_recommendations: Option<BTreeMap<ScoredPillar, PackageRecommendation>>,

    #[serde(default)]
    pub severity_copy: BTreeMap<SeverityBand, String>,

    #[serde(default)]
    pub thirty_day_rules: BTreeMap<ScoredPillar, String>,

    #[serde(default)]
    pub patterns: BTreeMap<ScoredPillar, PatternPair>,

    #[serde(default)]
    pub alignment_notes: BTreeMap<ScoredPillar, String>,
}

impl ScorecardConfig {
    /// Questions belonging to `pillar`, in configuration order.
    pub fn questions_for(&self, pillar: Pillar) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter().filter(move |q| q.pillar == pillar)
    }

    /// 1-based position of a question in the configuration.
    pub fn question_number(&self, question_id: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|q| q.id == question_id)
            .map(|idx| idx + 1)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn pillar_section(&self, pillar: Pillar) -> Option<&PillarSection> {
        self.pillars.iter().find(|p| p.id == pillar)
    }

    /// Display title for a pillar; variants may rename pillars (e.g. Soul -> "Story").
    pub fn pillar_title(&self, pillar: Pillar) -> &str {
        self.pillar_section(pillar)
            .map(|section| section.title.as_str())
            .unwrap_or_else(|| pillar.as_str())
    }
}
