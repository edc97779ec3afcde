use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::registry::{builtin_source, parse_scorecard, DEFAULT_SLUG};
use super::validation::is_valid_slug;

/// Render a starter scorecard: the default built-in under a new slug.
pub fn render_template(slug: &str) -> Result<String> {
    if !is_valid_slug(slug) {
        anyhow::bail!(
            "Invalid slug '{}': use lowercase letters, digits and '-'",
            slug
        );
    }

    let source = builtin_source(DEFAULT_SLUG)
        .with_context(|| format!("Built-in scorecard '{}' is missing", DEFAULT_SLUG))?;
    let yaml = source.replacen(
        &format!("slug: {}", DEFAULT_SLUG),
        &format!("slug: {}", slug),
        1,
    );

    // The template must load cleanly before it is handed to anyone
    parse_scorecard(&yaml).context("Generated template failed validation")?;

    Ok(yaml)
}

/// Write a starter scorecard to `path` atomically.
///
/// Refuses to replace an existing file unless `force` is set. Creates
/// parent directories as needed.
pub fn write_template(path: &Path, slug: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    let yaml = render_template(slug)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write scorecard to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save scorecard to {}", path.display()))?;

    Ok(())
}
