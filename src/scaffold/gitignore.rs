//! `.gitignore` materialization and merge.
//!
//! Two sources of ignore content exist: provider-hosted templates
//! (fetched through the forge client) and a curated local set for
//! ecosystems the provider's library handles poorly. Either way, an
//! existing `.gitignore` is never clobbered: the original is backed up
//! to `.gitignore.bak` and the two files are merged by sorted line-set
//! deduplication under a timestamped marker. The sort may reorder
//! lines and collapse repeated comments; that is the long-standing
//! observable policy of the merge and is kept as-is.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Templates written locally instead of being requested from the
/// provider at repository creation.
pub const CURATED_TEMPLATES: &[&str] = &[
    "C++",
    "C#",
    "Dart",
    "Go",
    "Java",
    "JavaScript",
    "Kotlin",
    "PHP",
    "R",
    "Ruby",
    "Rust",
    "Scala",
    "Swift",
    "TypeScript",
];

/// Whether `name` belongs to the curated local template set.
pub fn is_curated(name: &str) -> bool {
    CURATED_TEMPLATES.contains(&name)
}

/// What applying a template did to `.gitignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreOutcome {
    /// No `.gitignore` existed; the template was written as-is.
    Written,
    /// An existing `.gitignore` was backed up and merged.
    Merged,
}

/// Write or merge template `content` into `dir/.gitignore`.
pub fn apply(dir: &Path, template: &str, content: &str) -> Result<GitignoreOutcome> {
    let path = dir.join(".gitignore");

    if !path.exists() {
        fs::write(&path, content).context("Failed to write .gitignore")?;
        return Ok(GitignoreOutcome::Written);
    }

    let existing =
        fs::read_to_string(&path).context("Failed to read existing .gitignore")?;
    fs::copy(&path, dir.join(".gitignore.bak"))
        .context("Failed to back up .gitignore to .gitignore.bak")?;

    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    fs::write(&path, merge(&existing, content, template, &stamp))
        .context("Failed to write merged .gitignore")?;

    Ok(GitignoreOutcome::Merged)
}

/// Merge two gitignore bodies: sorted line-set dedup plus an appended
/// marker naming the template and merge time. Blank lines are dropped.
fn merge(existing: &str, incoming: &str, template: &str, stamp: &str) -> String {
    let lines: BTreeSet<&str> = existing
        .lines()
        .chain(incoming.lines())
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    let mut merged = lines.into_iter().collect::<Vec<_>>().join("\n");
    merged.push_str(&format!(
        "\n# merged '{}' gitignore template on {}\n",
        template, stamp
    ));
    merged
}

/// Suggested ignore content for a curated template.
///
/// Nothing is ignored by default; the file documents common patterns
/// for the ecosystem and leaves enabling them to the user.
pub fn curated_content(name: &str) -> String {
    let mut content = format!("# .gitignore for {} projects\n", name);
    content.push_str(
        "# No files are ignored by default\n\
         # Add specific patterns as needed for your project\n\n\
         # Common patterns you might want to add:\n",
    );

    let suggestions: &[&str] = match name {
        "Rust" => &["# target/", "# Cargo.lock", "# *.pdb"],
        "Go" => &[
            "# bin/", "# pkg/", "# *.exe", "# *.dll", "# *.so", "# *.dylib", "# go.work",
        ],
        "JavaScript" | "TypeScript" => &[
            "# node_modules/",
            "# .env",
            "# .env.local",
            "# npm-debug.log*",
            "# yarn-error.log*",
            "# dist/",
            "# build/",
        ],
        "Java" | "Kotlin" | "Scala" => &[
            "# target/", "# *.class", "# *.jar", "# .gradle/", "# build/", "# out/",
            "# .idea/", "# *.iml",
        ],
        "C++" => &[
            "# build/",
            "# bin/",
            "# obj/",
            "# *.o",
            "# *.a",
            "# *.so",
            "# CMakeFiles/",
            "# CMakeCache.txt",
        ],
        "C#" => &[
            "# bin/", "# obj/", "# *.user", "# *.suo", "# *.pdb", "# .vs/", "# packages/",
        ],
        _ => &[
            "# build/", "# dist/", "# .env", "# *.log", "# .cache/", "# .tmp/",
        ],
    };

    for line in suggestions {
        content.push_str(line);
        content.push('\n');
    }
    content
}
