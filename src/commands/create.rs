//! Create command - run the full repository creation pipeline.
//!
//! Gathers the configuration from flags merged over the defaults file,
//! hands an immutable snapshot to the background worker, and renders
//! progress on this thread. Ctrl-C flips the worker's cancellation
//! flag; the worker observes it at the next step boundary.

use anyhow::{Context, Result};
use colored::Colorize;
use signal_hook::consts::SIGINT;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use reposmith::config::{
    normalize_topics, Defaults, License, RemoteTransport, RepositoryConfig, Visibility,
};
use reposmith::forge::GitHubCli;
use reposmith::worker::{
    self, CancelToken, FailureKind, Outcome, PushConflictInfo, PushDecision, StepResult,
    StepStatus, WorkerEvent,
};

/// How long to wait for the worker after a cancellation request before
/// abandoning it.
const CANCEL_GRACE: Duration = Duration::from_secs(3);

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Repository name
    pub name: String,

    /// Directory to create the repository in
    #[arg(long, default_value = ".")]
    pub location: String,

    /// Short repository description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Create a private repository
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Create a public repository
    #[arg(long)]
    pub public: bool,

    /// Gitignore template name (see `reposmith templates`)
    #[arg(long)]
    pub gitignore: Option<String>,

    /// License to apply at creation
    #[arg(long, value_enum)]
    pub license: Option<License>,

    /// Topics to set on the repository (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub topics: Vec<String>,

    /// Use an SSH remote URL instead of HTTPS
    #[arg(long)]
    pub ssh: bool,

    /// Open the repository page in a browser when done
    #[arg(long)]
    pub open: bool,

    /// Generate the starter project scaffold
    #[arg(long)]
    pub scaffold: bool,

    /// Skip the .editorconfig when scaffolding
    #[arg(long)]
    pub no_editorconfig: bool,

    /// Read the README body from a file
    #[arg(long)]
    pub readme: Option<PathBuf>,
}

pub fn execute(args: CreateArgs) -> Result<i32> {
    let defaults = Defaults::load()?;
    let config = build_config(args, &defaults)?;

    println!("🚀 Creating repository '{}'\n", config.name);

    let cancel = CancelToken::new();
    signal_hook::flag::register(SIGINT, cancel.flag())
        .context("Failed to install the Ctrl-C handler")?;

    let handle = worker::spawn_with_cancel(config, Box::new(GitHubCli), cancel.clone())?;

    let mut cancel_deadline: Option<Instant> = None;
    let outcome = loop {
        if cancel.is_cancelled() && cancel_deadline.is_none() {
            println!(
                "\n{}",
                "Cancelling, waiting for the worker to stop...".yellow()
            );
            cancel_deadline = Some(Instant::now() + CANCEL_GRACE);
        }
        if let Some(deadline) = cancel_deadline {
            if Instant::now() >= deadline && !handle.wait_timeout(Duration::ZERO) {
                eprintln!(
                    "{}",
                    "Worker did not stop in time; abandoning the operation. \
                     An external command may still be running."
                        .red()
                );
                return Ok(130);
            }
        }

        match handle.events().recv_timeout(Duration::from_millis(150)) {
            Ok(WorkerEvent::Progress {
                percent, message, ..
            }) => {
                println!("  [{:>3}%] {}...", percent, message);
            }
            Ok(WorkerEvent::StepDone(result)) => render_step(&result),
            Ok(WorkerEvent::DecisionRequired(conflict)) => {
                handle.decide(prompt_force_push(&conflict));
            }
            Ok(WorkerEvent::Finished(outcome)) => break Some(outcome),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break None,
        }
    };
    handle.join();

    match outcome {
        Some(Outcome::Done { message, .. }) => {
            println!("\n{} {}", "✓".green().bold(), message.green());
            Ok(0)
        }
        Some(Outcome::Failed { kind, message, .. }) => {
            eprintln!("\n{} {}", "✗".red().bold(), message.red());
            if kind == FailureKind::PushConflict {
                eprintln!("  The local branch was restored; nothing was pushed.");
            }
            Ok(1)
        }
        Some(Outcome::Cancelled { .. }) => {
            println!("\n{}", "Operation cancelled".yellow());
            Ok(130)
        }
        None => {
            eprintln!("{}", "Worker stopped without reporting an outcome".red());
            Ok(1)
        }
    }
}

/// Merge CLI flags over the defaults file into the immutable snapshot
/// the worker runs on.
fn build_config(args: CreateArgs, defaults: &Defaults) -> Result<RepositoryConfig> {
    let location = PathBuf::from(shellexpand::tilde(&args.location).as_ref());
    fs::create_dir_all(&location)
        .with_context(|| format!("Cannot create repository location: {}", location.display()))?;

    let visibility = if args.private {
        Visibility::Private
    } else if args.public {
        Visibility::Public
    } else {
        defaults.visibility
    };

    let remote = if args.ssh {
        RemoteTransport::Ssh
    } else {
        defaults.remote
    };

    let readme_content = match &args.readme {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read README file: {}", path.display()))?,
        ),
        None => None,
    };

    Ok(RepositoryConfig {
        name: args.name.trim().to_string(),
        location,
        description: args.description.trim().to_string(),
        visibility,
        gitignore_template: args.gitignore.filter(|t| !t.trim().is_empty()),
        license: args.license.unwrap_or(defaults.license),
        topics: normalize_topics(&args.topics),
        remote,
        open_browser: args.open || defaults.open_browser,
        create_scaffold: args.scaffold || defaults.create_scaffold,
        create_editorconfig: !args.no_editorconfig && defaults.create_editorconfig,
        readme_content,
    })
}

fn render_step(result: &StepResult) {
    match &result.status {
        StepStatus::Success => println!("  {} {}", "✓".green(), result.message),
        StepStatus::Failure(FailureKind::BestEffort) => {
            println!("  {} {}", "⚠".yellow(), result.message);
        }
        StepStatus::Failure(_) => {
            eprintln!("  {} {}", "✗".red(), result.message);
            if let Some(detail) = &result.detail {
                for line in detail.lines() {
                    eprintln!("      {}", line);
                }
            }
        }
        StepStatus::Cancelled => println!("  {} {}", "⚠".yellow(), result.message),
    }
}

/// Ask the user whether to force-push after a rebase conflict.
/// Declines automatically when stdin is not a terminal.
fn prompt_force_push(conflict: &PushConflictInfo) -> PushDecision {
    println!("\n{}", "Push conflict".yellow().bold());
    println!("  {}", conflict.detail);

    if !atty::is(atty::Stream::Stdin) {
        println!("  Not an interactive session; declining force-push.");
        return PushDecision::Abort;
    }

    print!(
        "Force-push '{}' with lease? This replaces the remote branch. [y/N] ",
        conflict.branch
    );
    let _ = io::stdout().flush();

    let mut response = String::new();
    if io::stdin().read_line(&mut response).is_err() {
        return PushDecision::Abort;
    }

    if response.trim().eq_ignore_ascii_case("y") {
        PushDecision::ForceWithLease
    } else {
        PushDecision::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(name: &str, location: &str) -> CreateArgs {
        CreateArgs {
            name: name.to_string(),
            location: location.to_string(),
            description: "  trimmed  ".to_string(),
            private: false,
            public: false,
            gitignore: Some("  ".to_string()),
            license: None,
            topics: vec!["Rust".to_string(), " CLI ".to_string()],
            ssh: false,
            open: false,
            scaffold: false,
            no_editorconfig: false,
            readme: None,
        }
    }

    #[test]
    fn test_build_config_applies_defaults_and_normalizes() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("new-project");

        let defaults = Defaults {
            visibility: Visibility::Private,
            license: License::Mit,
            remote: RemoteTransport::Ssh,
            open_browser: true,
            create_scaffold: true,
            create_editorconfig: true,
        };

        let config = build_config(
            args(" demo ", location.to_str().unwrap()),
            &defaults,
        )
        .unwrap();

        assert_eq!(config.name, "demo");
        assert_eq!(config.description, "trimmed");
        assert_eq!(config.visibility, Visibility::Private);
        assert_eq!(config.license, License::Mit);
        assert_eq!(config.remote, RemoteTransport::Ssh);
        assert!(config.open_browser);
        assert!(config.create_scaffold);
        assert!(config.create_editorconfig);
        assert_eq!(config.topics, vec!["rust", "cli"]);
        // Blank template names are treated as unset
        assert_eq!(config.gitignore_template, None);
        // The location was created
        assert!(location.is_dir());
    }

    #[test]
    fn test_build_config_flags_override_defaults() {
        let temp = TempDir::new().unwrap();
        let mut a = args("demo", temp.path().to_str().unwrap());
        a.public = true;
        a.ssh = true;
        a.no_editorconfig = true;

        let defaults = Defaults {
            visibility: Visibility::Private,
            ..Defaults::default()
        };

        let config = build_config(a, &defaults).unwrap();
        assert_eq!(config.visibility, Visibility::Public);
        assert_eq!(config.remote, RemoteTransport::Ssh);
        assert!(!config.create_editorconfig);
    }
}
