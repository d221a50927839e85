//! Scaffold command - write the starter layout into the current
//! directory without touching any forge.

use anyhow::{Context, Result};
use colored::Colorize;
use std::env;

use reposmith::scaffold;

pub fn execute(name: Option<String>, no_editorconfig: bool) -> Result<()> {
    let dir = env::current_dir().context("Failed to determine the current directory")?;

    let name = match name {
        Some(name) => name,
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string()),
    };

    let report = scaffold::write_scaffold(&dir, &name, !no_editorconfig, None)?;

    for path in &report.created {
        let shown = path.strip_prefix(&dir).unwrap_or(path);
        println!("  {} {}", "✓".green(), shown.display());
    }
    for path in &report.skipped {
        let shown = path.strip_prefix(&dir).unwrap_or(path);
        println!("  {} {} (exists, left untouched)", "-".dimmed(), shown.display());
    }

    println!(
        "\n{} files written, {} left untouched",
        report.created.len(),
        report.skipped.len()
    );

    Ok(())
}
