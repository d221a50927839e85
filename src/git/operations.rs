//! Low-level git operations
//!
//! Every function runs `git` against an explicit directory so the
//! worker never depends on the process working directory.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Check whether `dir` is itself the top of a git repository.
///
/// Deliberately a plain `.git` check rather than `rev-parse --git-dir`:
/// a target directory nested inside some other repository must still be
/// initialized on its own.
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Check if the repository has at least one commit
pub fn has_commits(dir: &Path) -> Result<bool> {
    let output = Command::new("git")
        .args(["rev-parse", "--verify", "HEAD"])
        .current_dir(dir)
        .output()
        .context("Failed to check for existing commits")?;

    Ok(output.status.success())
}

/// Get the current branch name, falling back to "main" when it cannot
/// be determined (fresh repository, detached HEAD, not a repository)
pub fn current_branch(dir: &Path) -> String {
    let output = Command::new("git")
        .args(["symbolic-ref", "--short", "HEAD"])
        .current_dir(dir)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if name.is_empty() {
                "main".to_string()
            } else {
                name
            }
        }
        _ => "main".to_string(),
    }
}

/// Initialize a git repository
pub fn init(dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .arg("init")
        .current_dir(dir)
        .output()
        .context("Failed to initialize git repository")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to initialize git repository: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Stage all changes
pub fn add_all(dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .output()
        .context("Failed to stage changes")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to stage changes: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Create a commit
pub fn commit(dir: &Path, message: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(dir)
        .output()
        .context("Failed to create commit")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Check whether any remote is configured
pub fn has_remote(dir: &Path) -> Result<bool> {
    let output = Command::new("git")
        .arg("remote")
        .current_dir(dir)
        .output()
        .context("Failed to list remotes")?;

    Ok(!output.stdout.is_empty())
}

/// Add a git remote
pub fn add_remote(dir: &Path, name: &str, url: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["remote", "add", name, url])
        .current_dir(dir)
        .output()
        .context("Failed to add remote")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to add remote: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Fetch from remote
pub fn fetch(dir: &Path, remote: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["fetch", remote])
        .current_dir(dir)
        .output()
        .context("Failed to fetch from remote")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to fetch {}: {}",
            remote,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Check whether a branch exists on a fetched remote
pub fn remote_branch_exists(dir: &Path, remote: &str, branch: &str) -> Result<bool> {
    let output = Command::new("git")
        .args([
            "rev-parse",
            "--verify",
            &format!("refs/remotes/{}/{}", remote, branch),
        ])
        .current_dir(dir)
        .output()
        .context("Failed to check remote branch")?;

    Ok(output.status.success())
}

/// Rebase current branch onto another.
/// Returns Ok(true) if rebase succeeded, Ok(false) if conflicts, Err on other failure
pub fn rebase(dir: &Path, onto: &str) -> Result<bool> {
    let output = Command::new("git")
        .args(["rebase", onto])
        .current_dir(dir)
        .output()
        .context("Failed to rebase")?;

    if output.status.success() {
        Ok(true)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stderr.contains("CONFLICT")
            || stdout.contains("CONFLICT")
            || stderr.contains("could not apply")
        {
            Ok(false) // Conflicts - caller should handle
        } else {
            anyhow::bail!("Failed to rebase onto {}: {}", onto, stderr);
        }
    }
}

/// Abort an in-progress rebase
pub fn rebase_abort(dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["rebase", "--abort"])
        .current_dir(dir)
        .output()
        .context("Failed to abort rebase")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to abort rebase: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Push a branch and set its upstream
pub fn push_upstream(dir: &Path, branch: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["push", "-u", "origin", branch])
        .current_dir(dir)
        .output()
        .context("Failed to push to remote")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to push {}: {}",
            branch,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Force-push a branch with lease protection.
/// Fails if the remote moved since it was last fetched.
pub fn push_force_with_lease(dir: &Path, branch: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["push", "--force-with-lease", "-u", "origin", branch])
        .current_dir(dir)
        .output()
        .context("Failed to force-push to remote")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to force-push {}: {}",
            branch,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}
