//! Forge operations for repository publishing.
//!
//! This module provides a trait-based abstraction over the hosting
//! provider for the write operations repository creation needs:
//! authentication, repository creation, topics, gitignore templates,
//! and opening the repository page.
//!
//! All provider traffic goes through the provider's own CLI tool as a
//! subprocess; there is no direct HTTP here.
//!
//! # Example
//!
//! ```ignore
//! use reposmith::forge::{ForgeClient, GitHubCli};
//!
//! let forge = GitHubCli;
//! if forge.is_authenticated()? {
//!     let user = forge.current_user()?;
//!     println!("Logged in as: {}", user);
//! }
//! ```

mod github;

pub use github::GitHubCli;

use anyhow::Result;

use crate::config::{RemoteTransport, RepositoryConfig};

/// Write operations on the hosting provider.
///
/// Implementations wrap the provider's CLI; results carry the tool's
/// own error text so it can be surfaced to the user verbatim. The
/// trait is the seam tests use to run the creation pipeline without a
/// provider.
pub trait ForgeClient: Send {
    /// Check the provider CLI is installed and resolvable on PATH.
    fn is_available(&self) -> Result<bool>;

    /// Check if the CLI reports an authenticated session.
    fn is_authenticated(&self) -> Result<bool>;

    /// Get the current authenticated username.
    fn current_user(&self) -> Result<String>;

    /// Create the remote repository described by `config`.
    ///
    /// `gitignore` is the provider-hosted template to apply at
    /// creation, already filtered by the caller; curated local
    /// templates are written by the scaffold writer instead.
    fn create_repository(&self, config: &RepositoryConfig, gitignore: Option<&str>)
        -> Result<()>;

    /// URL for the `origin` remote under the chosen transport.
    fn remote_url(&self, owner: &str, repo: &str, transport: RemoteTransport) -> String;

    /// Apply topics to the remote repository. No-op for an empty list.
    fn set_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()>;

    /// List the provider-hosted gitignore template names.
    fn gitignore_templates(&self) -> Result<Vec<String>>;

    /// Fetch the content of one provider-hosted gitignore template.
    fn gitignore_template_source(&self, name: &str) -> Result<String>;

    /// Open the repository's web page. Callers treat failure as
    /// best-effort.
    fn open_in_browser(&self, owner: &str, repo: &str) -> Result<()>;
}
