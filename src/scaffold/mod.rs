//! Starter project scaffolding.
//!
//! Writes the fixed set of starter files and directories a new
//! repository gets. Existing files are never overwritten, which makes
//! the writer idempotent: a second run over the same directory changes
//! nothing.

pub mod gitignore;
mod templates;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What a scaffold run actually did.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    /// Files written by this run.
    pub created: Vec<PathBuf>,
    /// Files left alone because they already existed.
    pub skipped: Vec<PathBuf>,
}

/// Write the starter layout into `dir`.
///
/// Creates `src/`, `tests/`, `docs/`, `.github/` and the standard
/// community files. `readme_content` replaces the stock README body
/// when provided. Only missing files are written.
pub fn write_scaffold(
    dir: &Path,
    name: &str,
    create_editorconfig: bool,
    readme_content: Option<&str>,
) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for subdir in ["src", "tests", "docs", ".github"] {
        fs::create_dir_all(dir.join(subdir))
            .with_context(|| format!("Failed to create directory '{}'", subdir))?;
    }

    let readme = match readme_content {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => templates::default_readme(name),
    };

    write_if_absent(dir.join("README.md"), &readme, &mut report)?;
    write_if_absent(dir.join("docs/index.md"), templates::DOCS_INDEX, &mut report)?;
    write_if_absent(dir.join("CHANGELOG.md"), templates::CHANGELOG, &mut report)?;
    write_if_absent(dir.join("CONTRIBUTING.md"), templates::CONTRIBUTING, &mut report)?;
    write_if_absent(
        dir.join("CODE_OF_CONDUCT.md"),
        templates::CODE_OF_CONDUCT,
        &mut report,
    )?;
    write_if_absent(dir.join("SECURITY.md"), templates::SECURITY, &mut report)?;
    write_if_absent(
        dir.join(".github/ISSUE_TEMPLATE.md"),
        templates::ISSUE_TEMPLATE,
        &mut report,
    )?;
    write_if_absent(
        dir.join(".github/PULL_REQUEST_TEMPLATE.md"),
        templates::PULL_REQUEST_TEMPLATE,
        &mut report,
    )?;
    write_if_absent(dir.join(".gitattributes"), templates::GITATTRIBUTES, &mut report)?;

    if create_editorconfig {
        write_if_absent(dir.join(".editorconfig"), templates::EDITORCONFIG, &mut report)?;
    }

    Ok(report)
}

fn write_if_absent(
    path: PathBuf,
    content: impl AsRef<str>,
    report: &mut ScaffoldReport,
) -> Result<()> {
    if path.exists() {
        report.skipped.push(path);
        return Ok(());
    }

    fs::write(&path, content.as_ref())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    report.created.push(path);
    Ok(())
}
