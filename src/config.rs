//! Repository configuration: the immutable snapshot handed to the
//! creation worker, plus user defaults loaded from disk.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Repository visibility on the forge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// The `gh repo create` flag for this visibility.
    pub fn flag(self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }
}

/// Transport used for the `origin` remote URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RemoteTransport {
    #[default]
    Https,
    Ssh,
}

/// License applied at repository creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum License {
    Mit,
    #[value(name = "apache-2.0")]
    #[serde(rename = "apache-2.0")]
    Apache2,
    #[value(name = "gpl-3.0")]
    #[serde(rename = "gpl-3.0")]
    Gpl3,
    #[default]
    None,
}

impl License {
    /// Provider license key, or None when no license should be applied.
    pub fn key(self) -> Option<&'static str> {
        match self {
            License::Mit => Some("mit"),
            License::Apache2 => Some("apache-2.0"),
            License::Gpl3 => Some("gpl-3.0"),
            License::None => None,
        }
    }
}

/// Immutable snapshot of the user's choices, captured once when
/// creation starts. The worker only ever reads this snapshot.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Repository name on the forge.
    pub name: String,
    /// Directory the local repository lives in (created if missing).
    pub location: PathBuf,
    /// Short description shown on the repository page.
    pub description: String,
    pub visibility: Visibility,
    /// Gitignore template name. Provider-hosted templates are passed to
    /// the forge at creation; curated local templates are written by
    /// the scaffold writer instead.
    pub gitignore_template: Option<String>,
    pub license: License,
    /// Topics applied to the remote repository, already normalized.
    pub topics: Vec<String>,
    pub remote: RemoteTransport,
    /// Open the repository page in a browser once created.
    pub open_browser: bool,
    pub create_scaffold: bool,
    pub create_editorconfig: bool,
    /// Custom README body; a stock body is generated when absent.
    pub readme_content: Option<String>,
}

/// Trim, drop empties, and lowercase raw topic input.
///
/// The provider lowercases topics on its side; normalizing up front
/// keeps validation and what ends up on the remote in agreement.
pub fn normalize_topics(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// User defaults persisted at `~/.config/reposmith/defaults.toml`.
///
/// CLI flags always win over these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub visibility: Visibility,
    pub license: License,
    pub remote: RemoteTransport,
    pub open_browser: bool,
    pub create_scaffold: bool,
    pub create_editorconfig: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            visibility: Visibility::Public,
            license: License::None,
            remote: RemoteTransport::Https,
            open_browser: false,
            create_scaffold: false,
            create_editorconfig: true,
        }
    }
}

impl Defaults {
    /// Path of the defaults file, if a config directory exists.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("reposmith").join("defaults.toml"))
    }

    /// Load defaults from the default location; missing file means
    /// stock defaults.
    pub fn load() -> Result<Self> {
        let path = match Self::path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Defaults::default()),
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read defaults: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse defaults: {}", path.display()))
    }
}
