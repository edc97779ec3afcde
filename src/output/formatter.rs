use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::handoff::PlanOutcome;
use crate::leads::LeadReceipt;
use crate::scorecard::{PackageCard, Pillar, ScorecardConfig, SeverityBand};
use crate::scoring::{Diagnosis, MAX_SCORE};

/// Width of the average bar in the pillar table
const BAR_WIDTH: usize = 20;

/// Format available scorecards as one line each
/// Format: "{slug} | {title}"
pub fn format_scorecard_list<'a>(
    scorecards: impl IntoIterator<Item = &'a ScorecardConfig>,
    use_colors: bool,
) -> String {
    let lines: Vec<String> = scorecards
        .into_iter()
        .map(|config| {
            if use_colors {
                format!("{} | {}", config.slug.cyan(), config.title.bold())
            } else {
                format!("{} | {}", config.slug, config.title)
            }
        })
        .collect();

    if lines.is_empty() {
        "No scorecards found.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Multi-line view of a scorecard: questions grouped by pillar plus the scale legend
pub fn format_scorecard_detail(config: &ScorecardConfig, use_colors: bool) -> String {
    let mut out = Vec::new();

    out.push(heading(&config.title, use_colors));
    if !config.subtitle.is_empty() {
        out.push(config.subtitle.clone());
    }
    out.push(format!("Slug: {}", config.slug));
    out.push(format!("Scale: {}", crate::survey::scale_legend(config)));

    for pillar in Pillar::ALL {
        let title = config.pillar_title(pillar);
        let range = config
            .pillar_section(pillar)
            .map(|s| s.question_range.as_str())
            .filter(|r| !r.is_empty())
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();

        out.push(String::new());
        out.push(heading(&format!("{}{}", title, range), use_colors));
        for question in config.questions_for(pillar) {
            let number = config.question_number(&question.id).unwrap_or_default();
            out.push(format!("  {:>2}. {}", number, question.text));
        }
    }

    out.join("\n")
}

/// Render a full diagnosis report, wrapping prose to the terminal width
pub fn format_diagnosis(diagnosis: &Diagnosis, config: &ScorecardConfig, use_colors: bool) -> String {
    format_diagnosis_with_width(diagnosis, config, use_colors, get_terminal_width())
}

/// Same as [`format_diagnosis`] with an explicit wrap width (None = no wrapping)
pub fn format_diagnosis_with_width(
    diagnosis: &Diagnosis,
    config: &ScorecardConfig,
    use_colors: bool,
    width: Option<usize>,
) -> String {
    let averages = &diagnosis.score.averages;
    let mut out = Vec::new();

    out.push(heading(&format!("{}: results", config.title), use_colors));
    out.push(String::new());

    let title_width = Pillar::ALL
        .iter()
        .map(|p| config.pillar_title(*p).chars().count())
        .max()
        .unwrap_or(0);

    for pillar in Pillar::ALL {
        let avg = averages.get(pillar);
        let marker = if pillar.scored() == Some(diagnosis.score.primary) {
            "  <- primary"
        } else if pillar.scored() == Some(diagnosis.score.secondary) {
            "  <- secondary"
        } else {
            ""
        };
        out.push(format!(
            "  {:<width$}  {:>3.1}  {}{}",
            config.pillar_title(pillar),
            avg,
            format_bar(avg),
            marker,
            width = title_width
        ));
    }
    out.push(format!("  {:<width$}  {:>3.1}", "Overall", diagnosis.overall_average, width = title_width));
    out.push(String::new());

    out.push(format!(
        "Severity: {}",
        format_severity(diagnosis.severity, use_colors)
    ));
    out.push(format!("Pattern: {}", diagnosis.pattern));
    out.push(wrap_text(diagnosis.severity_copy, width, 0));
    if let Some(warning) = diagnosis.severity_warning {
        out.push(if use_colors {
            warning.yellow().to_string()
        } else {
            warning.to_string()
        });
    }
    out.push(String::new());

    out.push(heading(&diagnosis.insight.title, use_colors));
    out.push(wrap_text(&diagnosis.insight.pattern, width, 2));
    out.push(wrap_text(&diagnosis.insight.consequence, width, 2));

    if let Some(ref note) = diagnosis.alignment_note {
        out.push(String::new());
        out.push(wrap_text(&note.text, width, 0));
    }

    if !diagnosis.lowest_questions.is_empty() {
        out.push(String::new());
        out.push(heading("What drove this", use_colors));
        for question in &diagnosis.lowest_questions {
            out.push(wrap_text(
                &format!(
                    "Q{} ({}, {}/{}): {}",
                    question.number,
                    config.pillar_title(question.pillar),
                    question.score,
                    MAX_SCORE,
                    question.text
                ),
                width,
                2,
            ));
        }
    }

    out.push(String::new());
    out.push(heading("Your 30-day rule", use_colors));
    out.push(wrap_text(diagnosis.thirty_day_rule, width, 2));

    if let Some(package) = diagnosis.package {
        out.push(String::new());
        out.push(format_package("Recommended", &package.recommended, use_colors, width));
        out.push(String::new());
        out.push(format_package("Alternative", &package.alternative, use_colors, width));
    }

    out.push(String::new());
    out.push(heading(&config.results_cta.label, use_colors));
    out.push(wrap_text(&config.results_cta.description, width, 2));

    out.join("\n")
}

fn format_package(kind: &str, card: &PackageCard, use_colors: bool, width: Option<usize>) -> String {
    let mut lines = vec![heading(&format!("{}: {}", kind, card.title), use_colors)];
    lines.push(wrap_text(&card.audience, width, 2));
    for bullet in &card.bullets {
        lines.push(wrap_text(&format!("- {}", bullet), width, 2));
    }
    lines.push(wrap_text(&format!("Outcome: {}", card.outcome), width, 2));
    lines.push(format!("  {}: {}", card.cta.label, card.cta.href));
    lines.join("\n")
}

/// Severity band name, colored by urgency
pub fn format_severity(band: SeverityBand, use_colors: bool) -> String {
    if !use_colors {
        return band.to_string();
    }
    match band {
        SeverityBand::Critical => band.as_str().red().bold().to_string(),
        SeverityBand::Leaking => band.as_str().yellow().bold().to_string(),
        SeverityBand::Improving => band.as_str().cyan().to_string(),
        SeverityBand::Healthy => band.as_str().green().to_string(),
    }
}

/// Proportional bar for an average on the 1-5 scale
pub fn format_bar(average: f64) -> String {
    let ratio = (average / MAX_SCORE as f64).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn format_plan_outcome(outcome: &PlanOutcome, use_colors: bool) -> String {
    match outcome {
        PlanOutcome::Redirect(url) => {
            if use_colors {
                format!("Your 90-day plan is ready: {}", url.underline())
            } else {
                format!("Your 90-day plan is ready: {}", url)
            }
        }
        PlanOutcome::Accepted => "Your results were submitted. The plan will follow shortly.".to_string(),
    }
}

pub fn format_lead_receipt(receipt: &LeadReceipt, email: &str) -> String {
    match receipt.lead_id {
        Some(ref id) => format!("Action plan will be sent to {} (reference {}).", email, id),
        None => format!("Action plan will be sent to {}.", email),
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Greedy word wrap with a uniform indent. `None` width only applies the indent.
pub fn wrap_text(text: &str, width: Option<usize>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let Some(width) = width.filter(|w| *w > indent + 10) else {
        return format!("{}{}", pad, text);
    };
    let available = width - indent;

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > available && !current.is_empty() {
            lines.push(format!("{}{}", pad, current));
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(format!("{}{}", pad, current));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::{builtin_scorecard, ScorecardRegistry};
    use crate::scoring::{diagnose, Answers};

    fn answers_from(scores: [u8; 12]) -> Answers {
        let mut answers = Answers::new();
        for (i, score) in scores.iter().enumerate() {
            answers.record(format!("q{}", i + 1), *score).unwrap();
        }
        answers
    }

    #[test]
    fn test_format_scorecard_list() {
        let registry = ScorecardRegistry::with_builtins().unwrap();
        let result = format_scorecard_list(registry.iter(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("marketing-reality-check | "));
    }

    #[test]
    fn test_format_scorecard_list_empty() {
        let result = format_scorecard_list(Vec::<&ScorecardConfig>::new(), false);
        assert_eq!(result, "No scorecards found.");
    }

    #[test]
    fn test_format_scorecard_detail() {
        let config = builtin_scorecard("hutt-studio-momentum").unwrap();
        let result = format_scorecard_detail(&config, false);
        assert!(result.contains("Slug: hutt-studio-momentum"));
        assert!(result.contains("Scale: 1 = "));
        assert!(result.contains("Story"));
        assert!(result.contains("   1. "));
        assert!(result.contains("  12. "));
    }

    #[test]
    fn test_format_diagnosis_critical() {
        let config = builtin_scorecard("marketing-reality-check").unwrap();
        let answers = answers_from([5, 5, 5, 1, 1, 1, 3, 3, 3, 3, 4, 4]);
        let diagnosis = diagnose(&config, &answers).unwrap();

        let report = format_diagnosis_with_width(&diagnosis, &config, false, None);
        assert!(report.contains("Severity: Critical"));
        assert!(report.contains("Pattern: Safe Voice, Slow Trust"));
        assert!(report.contains("<- primary"));
        assert!(report.contains(crate::scoring::STALL_WARNING));
        assert!(report.contains("Your primary issue: HEART"));
        assert!(report.contains("Recommended: Human Presence Kit (Story + Video Plan)"));
        assert!(report.contains("Alignment looks strong."));
        assert!(report.contains("Q4 ("));
        assert!(report.contains("Overall"));
    }

    #[test]
    fn test_format_diagnosis_without_packages() {
        let config = builtin_scorecard("flashbuzz-video-growth").unwrap();
        let answers = answers_from([4, 5, 4, 5, 5, 5, 4, 4, 4, 4, 3, 3]);
        let diagnosis = diagnose(&config, &answers).unwrap();

        let report = format_diagnosis_with_width(&diagnosis, &config, false, None);
        assert!(report.contains("Severity: Healthy"));
        assert!(!report.contains("Recommended:"));
        assert!(!report.contains(crate::scoring::STALL_WARNING));
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0), "#".repeat(20));
        assert_eq!(format_bar(2.5), format!("{}{}", "#".repeat(10), ".".repeat(10)));
        assert_eq!(format_bar(1.0).matches('#').count(), 4);
    }

    #[test]
    fn test_format_severity_plain() {
        assert_eq!(format_severity(SeverityBand::Leaking, false), "Leaking");
    }

    #[test]
    fn test_wrap_text() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let wrapped = wrap_text(text, Some(24), 2);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 24);
            assert!(line.starts_with("  "));
        }
        assert_eq!(wrapped.split_whitespace().count(), 12);
    }

    #[test]
    fn test_wrap_text_no_width() {
        assert_eq!(wrap_text("a b c", None, 2), "  a b c");
    }

    #[test]
    fn test_wrap_text_long_word() {
        let wrapped = wrap_text("tiny supercalifragilisticexpialidocious", Some(20), 0);
        assert_eq!(wrapped, "tiny\nsupercalifragilisticexpialidocious");
    }

    #[test]
    fn test_format_plan_outcome() {
        let redirect = PlanOutcome::Redirect("https://plans.example.com/1".to_string());
        assert_eq!(
            format_plan_outcome(&redirect, false),
            "Your 90-day plan is ready: https://plans.example.com/1"
        );
        assert!(format_plan_outcome(&PlanOutcome::Accepted, false).contains("submitted"));
    }

    #[test]
    fn test_format_lead_receipt() {
        let receipt = LeadReceipt {
            ok: true,
            lead_id: Some("abc".to_string()),
            error: None,
        };
        assert_eq!(
            format_lead_receipt(&receipt, "ana@example.com"),
            "Action plan will be sent to ana@example.com (reference abc)."
        );
    }
}
