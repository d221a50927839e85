//! GitHub implementation of ForgeClient.
//!
//! Uses the `gh` CLI for all operations. Authentication is handled by
//! `gh auth login`; this code never sees a token.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::process::Command;

use crate::config::{RemoteTransport, RepositoryConfig};
use crate::forge::ForgeClient;

/// GitHub forge client backed by the `gh` CLI.
pub struct GitHubCli;

#[derive(Debug, Deserialize)]
struct GhGitignoreTemplate {
    source: String,
}

impl ForgeClient for GitHubCli {
    fn is_available(&self) -> Result<bool> {
        Ok(which::which("gh").is_ok())
    }

    fn is_authenticated(&self) -> Result<bool> {
        let output = Command::new("gh")
            .args(["auth", "status"])
            .output()
            .context("Failed to run `gh auth status`. Is `gh` CLI installed?")?;

        Ok(output.status.success())
    }

    fn current_user(&self) -> Result<String> {
        let output = Command::new("gh")
            .args(["api", "user", "--jq", ".login"])
            .output()
            .context("Failed to get current GitHub user. Is 'gh' installed and authenticated?")?;

        if !output.status.success() {
            bail!(
                "Failed to get GitHub user: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn create_repository(
        &self,
        config: &RepositoryConfig,
        gitignore: Option<&str>,
    ) -> Result<()> {
        let mut args = vec!["repo", "create", config.name.as_str()];
        args.push(config.visibility.flag());

        if !config.description.is_empty() {
            args.extend(["--description", config.description.as_str()]);
        }
        if let Some(template) = gitignore {
            args.extend(["--gitignore", template]);
        }
        if let Some(license) = config.license.key() {
            args.extend(["--license", license]);
        }

        let output = Command::new("gh")
            .args(&args)
            .output()
            .context("Failed to create GitHub repository")?;

        if !output.status.success() {
            bail!(
                "Failed to create repository: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(())
    }

    fn remote_url(&self, owner: &str, repo: &str, transport: RemoteTransport) -> String {
        match transport {
            RemoteTransport::Https => format!("https://github.com/{}/{}.git", owner, repo),
            RemoteTransport::Ssh => format!("git@github.com:{}/{}.git", owner, repo),
        }
    }

    fn set_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()> {
        if topics.is_empty() {
            return Ok(());
        }

        let topics_json =
            serde_json::to_string(topics).context("Failed to encode topics as JSON")?;

        let output = Command::new("gh")
            .args([
                "api",
                "-X",
                "PATCH",
                &format!("repos/{}/{}", owner, repo),
                "-F",
                &format!("topics={}", topics_json),
                "-H",
                "Accept: application/vnd.github.mercy-preview+json",
            ])
            .output()
            .context("Failed to set repository topics")?;

        if !output.status.success() {
            bail!(
                "Failed to set topics: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(())
    }

    fn gitignore_templates(&self) -> Result<Vec<String>> {
        let output = Command::new("gh")
            .args(["api", "gitignore/templates"])
            .output()
            .context("Failed to run `gh api gitignore/templates`")?;

        if !output.status.success() {
            bail!(
                "Failed to list gitignore templates: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        serde_json::from_slice(&output.stdout)
            .context("Failed to parse gitignore template list JSON")
    }

    fn gitignore_template_source(&self, name: &str) -> Result<String> {
        let output = Command::new("gh")
            .args(["api", &format!("gitignore/templates/{}", name)])
            .output()
            .context("Failed to fetch gitignore template")?;

        if !output.status.success() {
            bail!(
                "Failed to fetch gitignore template '{}': {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let template: GhGitignoreTemplate = serde_json::from_slice(&output.stdout)
            .context("Failed to parse gitignore template JSON")?;

        Ok(template.source)
    }

    fn open_in_browser(&self, owner: &str, repo: &str) -> Result<()> {
        let output = Command::new("gh")
            .args(["repo", "view", &format!("{}/{}", owner, repo), "--web"])
            .output()
            .context("Failed to open repository in browser")?;

        if !output.status.success() {
            bail!(
                "Failed to open repository in browser: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(())
    }
}
