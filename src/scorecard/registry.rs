use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::ScorecardConfig;
use super::validation::validate_scorecard;

/// Slug served when the caller does not name one.
pub const DEFAULT_SLUG: &str = "marketing-reality-check";

/// Scorecards compiled into the binary, in registration order.
const BUILTIN_SCORECARDS: [(&str, &str); 3] = [
    (
        "marketing-reality-check",
        include_str!("../../scorecards/marketing-reality-check.yaml"),
    ),
    (
        "flashbuzz-video-growth",
        include_str!("../../scorecards/flashbuzz-video-growth.yaml"),
    ),
    (
        "hutt-studio-momentum",
        include_str!("../../scorecards/hutt-studio-momentum.yaml"),
    ),
];

#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("invalid scorecard YAML: {0}")]
    Parse(String),

    #[error("scorecard '{slug}' is invalid:\n  - {}", .errors.join("\n  - "))]
    Invalid { slug: String, errors: Vec<String> },
}

/// Parse a scorecard from YAML and validate it for completeness.
pub fn parse_scorecard(yaml: &str) -> Result<ScorecardConfig, ScorecardError> {
    let config: ScorecardConfig =
        serde_saphyr::from_str(yaml).map_err(|e| ScorecardError::Parse(e.to_string()))?;
    validate_scorecard(&config).map_err(|errors| ScorecardError::Invalid {
        slug: config.slug.clone(),
        errors,
    })?;
    Ok(config)
}

/// Raw YAML of a built-in scorecard.
pub fn builtin_source(slug: &str) -> Option<&'static str> {
    BUILTIN_SCORECARDS
        .iter()
        .find(|(builtin_slug, _)| *builtin_slug == slug)
        .map(|(_, yaml)| *yaml)
}

/// Parsed and validated built-in scorecard.
pub fn builtin_scorecard(slug: &str) -> Option<ScorecardConfig> {
    builtin_source(slug).and_then(|yaml| parse_scorecard(yaml).ok())
}

/// Resolves slugs to validated scorecard configurations.
///
/// Every entry passed validation on the way in, so copy lookups against a
/// registered scorecard never hit a missing entry.
#[derive(Debug, Clone, Default)]
pub struct ScorecardRegistry {
    scorecards: Vec<ScorecardConfig>,
}

impl ScorecardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in scorecards.
    pub fn with_builtins() -> Result<Self, ScorecardError> {
        let mut registry = Self::new();
        for (_, yaml) in BUILTIN_SCORECARDS {
            registry.insert(parse_scorecard(yaml)?);
        }
        Ok(registry)
    }

    /// Validate and add a scorecard. An existing entry with the same slug is
    /// replaced in place and returned.
    pub fn register(&mut self, config: ScorecardConfig) -> Result<Option<ScorecardConfig>, ScorecardError> {
        validate_scorecard(&config).map_err(|errors| ScorecardError::Invalid {
            slug: config.slug.clone(),
            errors,
        })?;
        Ok(self.insert(config))
    }

    /// Add a scorecard that `parse_scorecard` already validated.
    fn insert(&mut self, config: ScorecardConfig) -> Option<ScorecardConfig> {
        match self.scorecards.iter_mut().find(|s| s.slug == config.slug) {
            Some(existing) => Some(std::mem::replace(existing, config)),
            None => {
                self.scorecards.push(config);
                None
            }
        }
    }

    /// Load every `*.yaml` / `*.yml` file in `dir`, in file name order.
    ///
    /// A missing directory is not an error. Returns the number of scorecards loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "scorecard directory not found, skipping");
            return Ok(0);
        }

        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read scorecard directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        paths.sort();

        for path in &paths {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("Failed to read scorecard {}", path.display()))?;
            let config = parse_scorecard(&yaml)
                .with_context(|| format!("Failed to load scorecard {}", path.display()))?;
            let slug = config.slug.clone();
            if self.insert(config).is_some() {
                warn!(slug = %slug, file = %path.display(), "scorecard overrides an existing slug");
            } else {
                debug!(slug = %slug, file = %path.display(), "loaded scorecard");
            }
        }

        Ok(paths.len())
    }

    /// Exact slug match. `None` is the normal "not found" outcome.
    pub fn get(&self, slug: &str) -> Option<&ScorecardConfig> {
        self.scorecards.iter().find(|s| s.slug == slug)
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.scorecards.iter().map(|s| s.slug.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScorecardConfig> {
        self.scorecards.iter()
    }

    pub fn len(&self) -> usize {
        self.scorecards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorecards.is_empty()
    }
}
