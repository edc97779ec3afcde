use std::collections::{BTreeMap, HashSet};

use super::types::{Pillar, ScorecardConfig, ScoredPillar, SeverityBand};

/// Number of points on the answer scale.
pub const SCALE_POINTS: usize = 5;

/// Validate a scorecard at load time.
/// Returns all validation errors at once (not just the first).
pub fn validate_scorecard(config: &ScorecardConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.slug.is_empty() {
        errors.push("slug: must not be empty".to_string());
    } else if !is_valid_slug(&config.slug) {
        errors.push(format!(
            "slug: invalid '{}' - use lowercase letters, digits and '-'",
            config.slug
        ));
    }

    if config.title.trim().is_empty() {
        errors.push("title: must not be empty".to_string());
    }

    if config.scale_labels.len() != SCALE_POINTS {
        errors.push(format!(
            "scale_labels: expected {} entries, found {}",
            SCALE_POINTS,
            config.scale_labels.len()
        ));
    }

    // Pillar metadata
    let mut declared = HashSet::new();
    for (i, section) in config.pillars.iter().enumerate() {
        if !declared.insert(section.id) {
            errors.push(format!("pillars[{}].id: duplicate pillar '{}'", i, section.id));
        }
    }

    // Questions
    let mut seen_ids = HashSet::new();
    for (i, question) in config.questions.iter().enumerate() {
        if question.id.trim().is_empty() {
            errors.push(format!("questions[{}].id: must not be empty", i));
        } else if !seen_ids.insert(question.id.as_str()) {
            errors.push(format!("questions[{}].id: duplicate id '{}'", i, question.id));
        }
        if !declared.contains(&question.pillar) {
            errors.push(format!(
                "questions[{}].pillar: '{}' is not declared in pillars",
                i, question.pillar
            ));
        }
        if question.text.trim().is_empty() {
            errors.push(format!("questions[{}].text: must not be empty", i));
        }
    }

    // Every pillar is averaged, so every pillar needs at least one question
    for pillar in Pillar::ALL {
        if config.questions_for(pillar).next().is_none() {
            errors.push(format!("questions: no question for pillar '{}'", pillar));
        }
    }

    // Copy tables keyed by scored pillar
    check_pillar_table("diagnosis_insights", &config.diagnosis_insights, &mut errors);
    check_pillar_table("thirty_day_rules", &config.thirty_day_rules, &mut errors);
    check_pillar_table("patterns", &config.patterns, &mut errors);
    check_pillar_table("alignment_notes", &config.alignment_notes, &mut errors);
    if let Some(ref packages) = config.package_recommendations {
        check_pillar_table("package_recommendations", packages, &mut errors);
    }

    for band in SeverityBand::ALL {
        match config.severity_copy.get(&band) {
            None => errors.push(format!("severity_copy.{}: missing entry", band)),
            Some(copy) if copy.trim().is_empty() => {
                errors.push(format!("severity_copy.{}: must not be empty", band))
            }
            Some(_) => {}
        }
    }

    if config.handoff.source.trim().is_empty() {
        errors.push("handoff.source: must not be empty".to_string());
    }
    if config.handoff.route_tag.trim().is_empty() {
        errors.push("handoff.route_tag: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_pillar_table<T>(name: &str, table: &BTreeMap<ScoredPillar, T>, errors: &mut Vec<String>) {
    for pillar in ScoredPillar::ALL {
        if !table.contains_key(&pillar) {
            errors.push(format!("{}.{}: missing entry", name, pillar));
        }
    }
}

/// Slugs travel in URLs and file names: lowercase ascii, digits and '-'.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::builtin_scorecard;

    fn valid_config() -> ScorecardConfig {
        builtin_scorecard("marketing-reality-check").unwrap()
    }

    #[test]
    fn test_builtin_is_valid() {
        assert!(validate_scorecard(&valid_config()).is_ok());
    }

    #[test]
    fn test_scale_labels_must_have_five_entries() {
        let mut config = valid_config();
        config.scale_labels.pop();
        let errors = validate_scorecard(&config).unwrap_err();
        assert_eq!(errors, vec!["scale_labels: expected 5 entries, found 4".to_string()]);
    }

    #[test]
    fn test_duplicate_question_id() {
        let mut config = valid_config();
        config.questions[3].id = "q3".to_string();
        let errors = validate_scorecard(&config).unwrap_err();
        assert!(errors[0].contains("questions[3].id: duplicate id 'q3'"));
    }

    #[test]
    fn test_question_pillar_must_be_declared() {
        let mut config = valid_config();
        config.pillars.retain(|p| p.id != Pillar::Alignment);
        let errors = validate_scorecard(&config).unwrap_err();
        assert_eq!(errors.len(), 2); // q11 and q12
        assert!(errors[0].contains("questions[10].pillar"));
    }

    #[test]
    fn test_pillar_without_questions() {
        let mut config = valid_config();
        config.questions.retain(|q| q.pillar != Pillar::Heart);
        let errors = validate_scorecard(&config).unwrap_err();
        assert_eq!(errors, vec!["questions: no question for pillar 'Heart'".to_string()]);
    }

    #[test]
    fn test_missing_copy_entries() {
        let mut config = valid_config();
        config.patterns.remove(&ScoredPillar::Heart);
        config.severity_copy.remove(&SeverityBand::Leaking);
        let errors = validate_scorecard(&config).unwrap_err();
        assert!(errors.contains(&"patterns.Heart: missing entry".to_string()));
        assert!(errors.contains(&"severity_copy.Leaking: missing entry".to_string()));
    }

    #[test]
    fn test_package_recommendations_optional_but_complete() {
        let mut config = valid_config();
        config.package_recommendations = None;
        assert!(validate_scorecard(&config).is_ok());

        let mut config = valid_config();
        if let Some(ref mut packages) = config.package_recommendations {
            packages.remove(&ScoredPillar::Hands);
        }
        let errors = validate_scorecard(&config).unwrap_err();
        assert_eq!(errors, vec!["package_recommendations.Hands: missing entry".to_string()]);
    }

    #[test]
    fn test_invalid_slug() {
        let mut config = valid_config();
        config.slug = "Marketing Check".to_string();
        let errors = validate_scorecard(&config).unwrap_err();
        assert!(errors[0].starts_with("slug: invalid"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.slug = String::new(); // Error 1
        config.scale_labels.clear(); // Error 2
        config.handoff.route_tag = " ".to_string(); // Error 3
        let errors = validate_scorecard(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hutt-studio-momentum"));
        assert!(is_valid_slug("check2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("under_score"));
        assert!(!is_valid_slug("Upper"));
    }
}
