//! Interactive question-by-question run of a scorecard on the terminal.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

use crate::scorecard::{Pillar, ScorecardConfig};
use crate::scoring::{Answers, MAX_SCORE, MIN_SCORE};

/// Line-oriented prompting over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write to stdout")
    }

    /// Returns `None` once input is exhausted.
    fn read_trimmed(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let read = self
            .input
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(input.trim().to_string()))
        }
    }

    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write to stdout")?;
        self.output.flush().context("Failed to flush stdout")?;
        Ok(self.read_trimmed()?.unwrap_or_default())
    }

    pub fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    pub fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Walk every question in order and collect a complete answer set.
    ///
    /// Accepts a score between 1 and 5, or `b` to step back one question.
    pub fn collect_answers(&mut self, config: &ScorecardConfig) -> Result<Answers> {
        self.say(&format!("\n{}\n{}\n", config.intro.heading, config.intro.body))?;
        self.say(&scale_legend(config))?;

        let total = config.questions.len();
        let mut answers = Answers::new();
        let mut idx = 0;
        let mut current_pillar: Option<Pillar> = None;

        while idx < total {
            let question = &config.questions[idx];

            if current_pillar != Some(question.pillar) {
                current_pillar = Some(question.pillar);
                self.say(&section_heading(config, question.pillar))?;
            }

            let previous = answers
                .get(&question.id)
                .map(|s| format!(" [{}]", s))
                .unwrap_or_default();
            let message = format!(
                "Q{} of {}. {}\n  Your answer ({}-{}){}: ",
                idx + 1,
                total,
                question.text,
                MIN_SCORE,
                MAX_SCORE,
                previous
            );

            write!(self.output, "{}", message).context("Failed to write to stdout")?;
            self.output.flush().context("Failed to flush stdout")?;

            let Some(input) = self.read_trimmed()? else {
                bail!(
                    "Input ended after {} of {} questions",
                    answers.len(),
                    total
                );
            };

            if input.eq_ignore_ascii_case("b") {
                if idx > 0 {
                    idx -= 1;
                    // Force the section heading to print again when stepping back across pillars
                    current_pillar = None;
                } else {
                    self.say("  Already at the first question.")?;
                }
                continue;
            }

            if input.is_empty() {
                if answers.get(&question.id).is_some() {
                    idx += 1;
                } else {
                    self.say(&format!("  Please enter a number from {} to {}.", MIN_SCORE, MAX_SCORE))?;
                }
                continue;
            }

            match input.parse::<u8>() {
                Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => {
                    answers.record_for(config, &question.id, score)?;
                    idx += 1;
                }
                _ => {
                    self.say(&format!("  Please enter a number from {} to {}.", MIN_SCORE, MAX_SCORE))?;
                }
            }
        }

        Ok(answers)
    }
}

/// "1 = Never  2 = Rarely ..." built from the scorecard's scale labels.
pub fn scale_legend(config: &ScorecardConfig) -> String {
    config
        .scale_labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{} = {}", i + 1, label))
        .collect::<Vec<_>>()
        .join("   ")
}

fn section_heading(config: &ScorecardConfig, pillar: Pillar) -> String {
    match config.pillar_section(pillar) {
        Some(section) if !section.subtitle.is_empty() => {
            format!("\n== {} ==\n{}", section.title, section.subtitle)
        }
        _ => format!("\n== {} ==", config.pillar_title(pillar)),
    }
}
