//! Background repository-creation worker.
//!
//! One worker thread runs the pipeline: validate, check dependencies
//! and authentication, create the remote repository, scaffold, init
//! and commit, set the remote, push, set topics, open the browser.
//! The controlling thread gets progress and the terminal outcome over
//! an mpsc channel; cancellation is cooperative through a shared flag
//! polled at every step boundary.
//!
//! Once a step has completed, its external side effects stay: a remote
//! repository created before cancellation is not deleted. The external
//! tools are not transactional and the worker does not pretend
//! otherwise.

mod step;

pub use step::{FailureKind, Outcome, Step, StepResult, StepStatus};

use anyhow::{Context, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::RepositoryConfig;
use crate::forge::ForgeClient;
use crate::git;
use crate::scaffold::{self, gitignore};
use crate::validate;

/// Cooperative cancellation flag shared between the controlling thread
/// and the worker.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. The worker observes this at the next step
    /// boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for signal handler registration.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Details of a rebase conflict awaiting a user decision.
#[derive(Debug, Clone)]
pub struct PushConflictInfo {
    pub branch: String,
    pub detail: String,
}

/// The user's answer to a push conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDecision {
    ForceWithLease,
    Abort,
}

/// Messages the worker sends to the controlling thread.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A step is starting.
    Progress {
        step: Step,
        percent: u8,
        message: String,
    },
    /// A step finished (success, failure, or best-effort warning).
    StepDone(StepResult),
    /// The push hit a rebase conflict; the worker is blocked on a
    /// [`PushDecision`].
    DecisionRequired(PushConflictInfo),
    /// Terminal outcome; no further events follow.
    Finished(Outcome),
}

/// Handle held by the controlling thread.
pub struct WorkerHandle {
    events: Receiver<WorkerEvent>,
    decisions: Sender<PushDecision>,
    cancel: CancelToken,
    finished: Arc<(Mutex<bool>, Condvar)>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// The event channel. Drain until [`WorkerEvent::Finished`].
    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Answer a pending [`WorkerEvent::DecisionRequired`].
    pub fn decide(&self, decision: PushDecision) {
        let _ = self.decisions.send(decision);
    }

    /// Wait for the worker to finish, up to `timeout`.
    /// Returns true once the worker has finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.finished;
        let mut done = lock.lock();
        if !*done {
            cvar.wait_for(&mut done, timeout);
        }
        *done
    }

    /// Block until the worker thread exits.
    pub fn join(mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Start a worker for `config` with a fresh cancellation token.
pub fn spawn(config: RepositoryConfig, forge: Box<dyn ForgeClient>) -> Result<WorkerHandle> {
    spawn_with_cancel(config, forge, CancelToken::new())
}

/// Start a worker for `config` observing an existing cancellation
/// token (so a signal handler registered on the token's flag cancels
/// the run).
pub fn spawn_with_cancel(
    config: RepositoryConfig,
    forge: Box<dyn ForgeClient>,
    cancel: CancelToken,
) -> Result<WorkerHandle> {
    let (event_tx, event_rx) = mpsc::channel();
    let (decision_tx, decision_rx) = mpsc::channel();
    let finished = Arc::new((Mutex::new(false), Condvar::new()));

    let worker_finished = Arc::clone(&finished);
    let worker_cancel = cancel.clone();
    let thread = thread::Builder::new()
        .name("repo-worker".to_string())
        .spawn(move || {
            let pipeline = Pipeline {
                config,
                forge,
                cancel: worker_cancel,
                events: event_tx.clone(),
                decisions: decision_rx,
                log: Vec::new(),
                owner: String::new(),
            };
            let outcome = pipeline.run();
            let _ = event_tx.send(WorkerEvent::Finished(outcome));

            let (lock, cvar) = &*worker_finished;
            *lock.lock() = true;
            cvar.notify_all();
        })
        .context("Failed to spawn worker thread")?;

    Ok(WorkerHandle {
        events: event_rx,
        decisions: decision_tx,
        cancel,
        finished,
        thread: Some(thread),
    })
}

struct Pipeline {
    config: RepositoryConfig,
    forge: Box<dyn ForgeClient>,
    cancel: CancelToken,
    events: Sender<WorkerEvent>,
    decisions: Receiver<PushDecision>,
    log: Vec<StepResult>,
    owner: String,
}

impl Pipeline {
    fn run(mut self) -> Outcome {
        let dir = self.config.location.clone();

        // Validating
        if !self.enter(Step::Validating) {
            return self.cancelled(Step::Validating);
        }
        let problems = validate::validate(&self.config);
        if !problems.is_empty() {
            return self.fail(
                Step::Validating,
                FailureKind::ValidationFailed,
                "Input validation failed",
                Some(problems.join("\n")),
            );
        }
        self.ok(Step::Validating, "Input validated".to_string());

        // CheckingDeps
        if !self.enter(Step::CheckingDeps) {
            return self.cancelled(Step::CheckingDeps);
        }
        if which::which("git").is_err() {
            return self.fail(
                Step::CheckingDeps,
                FailureKind::MissingDependency,
                "git is not installed or not on PATH",
                None,
            );
        }
        match self.forge.is_available() {
            Ok(true) => {}
            Ok(false) => {
                return self.fail(
                    Step::CheckingDeps,
                    FailureKind::MissingDependency,
                    "GitHub CLI (gh) is not installed or not on PATH",
                    None,
                );
            }
            Err(e) => {
                return self.fail(
                    Step::CheckingDeps,
                    FailureKind::MissingDependency,
                    "Could not check for the GitHub CLI",
                    Some(format!("{:#}", e)),
                );
            }
        }
        self.ok(Step::CheckingDeps, "git and gh found".to_string());

        // CheckingAuth
        if !self.enter(Step::CheckingAuth) {
            return self.cancelled(Step::CheckingAuth);
        }
        match self.forge.is_authenticated() {
            Ok(true) => {}
            Ok(false) => {
                return self.fail(
                    Step::CheckingAuth,
                    FailureKind::AuthRequired,
                    "GitHub CLI is not authenticated. Run 'gh auth login' first",
                    None,
                );
            }
            Err(e) => {
                return self.fail(
                    Step::CheckingAuth,
                    FailureKind::AuthRequired,
                    "Could not check authentication",
                    Some(format!("{:#}", e)),
                );
            }
        }
        self.owner = match self.forge.current_user() {
            Ok(user) => user,
            Err(e) => {
                return self.fail(
                    Step::CheckingAuth,
                    FailureKind::AuthRequired,
                    "Could not determine the authenticated user",
                    Some(format!("{:#}", e)),
                );
            }
        };
        let auth_message = format!("Authenticated as {}", self.owner);
        self.ok(Step::CheckingAuth, auth_message);

        // CreatingRemote
        if !self.enter(Step::CreatingRemote) {
            return self.cancelled(Step::CreatingRemote);
        }
        // Curated templates are written locally by the scaffold step;
        // only provider-hosted templates go to the forge.
        let provider_gitignore = self
            .config
            .gitignore_template
            .clone()
            .filter(|t| !gitignore::is_curated(t));
        if let Err(e) = self
            .forge
            .create_repository(&self.config, provider_gitignore.as_deref())
        {
            return self.fail(
                Step::CreatingRemote,
                FailureKind::RemoteCreateFailed,
                "Failed to create the remote repository",
                Some(format!("{:#}", e)),
            );
        }
        let created_message = format!("Created {}/{}", self.owner, self.config.name);
        self.ok(Step::CreatingRemote, created_message);

        // ScaffoldingLocal
        if !self.enter(Step::ScaffoldingLocal) {
            return self.cancelled(Step::ScaffoldingLocal);
        }
        let mut notes: Vec<String> = Vec::new();
        if self.config.create_scaffold {
            match scaffold::write_scaffold(
                &dir,
                &self.config.name,
                self.config.create_editorconfig,
                self.config.readme_content.as_deref(),
            ) {
                Ok(report) => notes.push(format!(
                    "{} files written, {} left untouched",
                    report.created.len(),
                    report.skipped.len()
                )),
                Err(e) => {
                    return self.fail(
                        Step::ScaffoldingLocal,
                        FailureKind::ScaffoldFailed,
                        "Failed to write project scaffold",
                        Some(format!("{:#}", e)),
                    );
                }
            }
        }
        if let Some(template) = self.config.gitignore_template.clone() {
            if gitignore::is_curated(&template) {
                let content = gitignore::curated_content(&template);
                match gitignore::apply(&dir, &template, &content) {
                    Ok(outcome) => notes.push(gitignore_note(&template, outcome)),
                    Err(e) => {
                        return self.fail(
                            Step::ScaffoldingLocal,
                            FailureKind::ScaffoldFailed,
                            "Failed to write .gitignore",
                            Some(format!("{:#}", e)),
                        );
                    }
                }
            } else {
                match self.forge.gitignore_template_source(&template) {
                    Ok(source) if !source.is_empty() => {
                        match gitignore::apply(&dir, &template, &source) {
                            Ok(outcome) => notes.push(gitignore_note(&template, outcome)),
                            Err(e) => {
                                return self.fail(
                                    Step::ScaffoldingLocal,
                                    FailureKind::ScaffoldFailed,
                                    "Failed to write .gitignore",
                                    Some(format!("{:#}", e)),
                                );
                            }
                        }
                    }
                    // Fetch failure is fine: the provider already
                    // applied the template to the remote repository.
                    Ok(_) | Err(_) => notes.push(format!(
                        "could not fetch '{}' template locally (already applied on remote)",
                        template
                    )),
                }
            }
        }
        let message = if notes.is_empty() {
            "Nothing to scaffold".to_string()
        } else {
            notes.join("; ")
        };
        self.ok(Step::ScaffoldingLocal, message);

        // InitCommit
        if !self.enter(Step::InitCommit) {
            return self.cancelled(Step::InitCommit);
        }
        let initialized = git::is_git_repo(&dir);
        let committed = if initialized {
            match git::has_commits(&dir) {
                Ok(committed) => committed,
                Err(e) => {
                    return self.fail(
                        Step::InitCommit,
                        FailureKind::GitFailed,
                        "Could not inspect the local repository",
                        Some(format!("{:#}", e)),
                    );
                }
            }
        } else {
            false
        };
        if committed {
            self.ok(
                Step::InitCommit,
                "Existing commit found, nothing to commit".to_string(),
            );
        } else {
            if !initialized {
                if let Err(e) = git::init(&dir) {
                    return self.fail(
                        Step::InitCommit,
                        FailureKind::GitFailed,
                        "Failed to initialize the local repository",
                        Some(format!("{:#}", e)),
                    );
                }
            }
            if let Err(e) = git::add_all(&dir) {
                return self.fail(
                    Step::InitCommit,
                    FailureKind::GitFailed,
                    "Failed to stage files",
                    Some(format!("{:#}", e)),
                );
            }
            if let Err(e) = git::commit(&dir, "Initial commit") {
                return self.fail(
                    Step::InitCommit,
                    FailureKind::GitFailed,
                    "Failed to create the initial commit",
                    Some(format!("{:#}", e)),
                );
            }
            self.ok(
                Step::InitCommit,
                "Staged files and created initial commit".to_string(),
            );
        }

        // SettingRemote
        if !self.enter(Step::SettingRemote) {
            return self.cancelled(Step::SettingRemote);
        }
        match git::has_remote(&dir) {
            Err(e) => {
                return self.fail(
                    Step::SettingRemote,
                    FailureKind::GitFailed,
                    "Could not list remotes",
                    Some(format!("{:#}", e)),
                );
            }
            Ok(true) => {
                // Never overwrite an existing remote.
                self.ok(
                    Step::SettingRemote,
                    "A remote is already configured, leaving it as-is".to_string(),
                );
            }
            Ok(false) => {
                let url = self
                    .forge
                    .remote_url(&self.owner, &self.config.name, self.config.remote);
                if let Err(e) = git::add_remote(&dir, "origin", &url) {
                    return self.fail(
                        Step::SettingRemote,
                        FailureKind::GitFailed,
                        "Failed to add the origin remote",
                        Some(format!("{:#}", e)),
                    );
                }
                let message = format!("Remote origin set to {}", url);
                self.ok(Step::SettingRemote, message);
            }
        }

        // Pushing
        if !self.enter(Step::Pushing) {
            return self.cancelled(Step::Pushing);
        }
        let branch = git::current_branch(&dir);
        if let Err(e) = git::fetch(&dir, "origin") {
            return self.fail(
                Step::Pushing,
                FailureKind::GitFailed,
                "Failed to fetch from origin",
                Some(format!("{:#}", e)),
            );
        }
        let mut pushed = false;
        match git::remote_branch_exists(&dir, "origin", &branch) {
            Err(e) => {
                return self.fail(
                    Step::Pushing,
                    FailureKind::GitFailed,
                    "Could not inspect the remote branch",
                    Some(format!("{:#}", e)),
                );
            }
            Ok(false) => {}
            Ok(true) => match git::rebase(&dir, &format!("origin/{}", branch)) {
                Err(e) => {
                    return self.fail(
                        Step::Pushing,
                        FailureKind::GitFailed,
                        "Rebase onto the remote branch failed",
                        Some(format!("{:#}", e)),
                    );
                }
                Ok(true) => {}
                Ok(false) => {
                    if let Err(e) = git::rebase_abort(&dir) {
                        return self.fail(
                            Step::Pushing,
                            FailureKind::GitFailed,
                            "Failed to abort the conflicted rebase",
                            Some(format!("{:#}", e)),
                        );
                    }
                    let info = PushConflictInfo {
                        branch: branch.clone(),
                        detail: format!(
                            "Rebasing onto origin/{} hit conflicts; the rebase was aborted",
                            branch
                        ),
                    };
                    let _ = self.events.send(WorkerEvent::DecisionRequired(info));
                    match self.await_decision() {
                        None => return self.cancelled(Step::Pushing),
                        Some(PushDecision::Abort) => {
                            return self.fail(
                                Step::Pushing,
                                FailureKind::PushConflict,
                                "Push declined after rebase conflict",
                                None,
                            );
                        }
                        Some(PushDecision::ForceWithLease) => {
                            if let Err(e) = git::push_force_with_lease(&dir, &branch) {
                                return self.fail(
                                    Step::Pushing,
                                    FailureKind::GitFailed,
                                    "Force-push with lease failed",
                                    Some(format!("{:#}", e)),
                                );
                            }
                            let message = format!("Force-pushed {} with lease", branch);
                            self.ok(Step::Pushing, message);
                            pushed = true;
                        }
                    }
                }
            },
        }
        if !pushed {
            if let Err(e) = git::push_upstream(&dir, &branch) {
                return self.fail(
                    Step::Pushing,
                    FailureKind::GitFailed,
                    "Failed to push to origin",
                    Some(format!("{:#}", e)),
                );
            }
            let message = format!("Pushed {} to origin", branch);
            self.ok(Step::Pushing, message);
        }

        // SettingTopics
        if !self.enter(Step::SettingTopics) {
            return self.cancelled(Step::SettingTopics);
        }
        if self.config.topics.is_empty() {
            self.ok(Step::SettingTopics, "No topics to set".to_string());
        } else {
            match self
                .forge
                .set_topics(&self.owner, &self.config.name, &self.config.topics)
            {
                Ok(()) => {
                    let message = format!("Applied {} topics", self.config.topics.len());
                    self.ok(Step::SettingTopics, message);
                }
                Err(e) => self.warn(
                    Step::SettingTopics,
                    "Warning: failed to set topics",
                    Some(format!("{:#}", e)),
                ),
            }
        }

        // OpeningBrowser
        if !self.enter(Step::OpeningBrowser) {
            return self.cancelled(Step::OpeningBrowser);
        }
        if self.config.open_browser {
            match self.forge.open_in_browser(&self.owner, &self.config.name) {
                Ok(()) => self.ok(Step::OpeningBrowser, "Opened repository page".to_string()),
                Err(e) => self.warn(
                    Step::OpeningBrowser,
                    "Warning: could not open the repository page",
                    Some(format!("{:#}", e)),
                ),
            }
        } else {
            self.ok(Step::OpeningBrowser, "Skipped".to_string());
        }

        Outcome::Done {
            message: format!(
                "Repository '{}' created successfully!",
                self.config.name
            ),
            log: std::mem::take(&mut self.log),
        }
    }

    /// Poll the cancellation flag and announce the step. Returns false
    /// when the run must stop.
    fn enter(&mut self, step: Step) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let _ = self.events.send(WorkerEvent::Progress {
            step,
            percent: step.percent(),
            message: step.label().to_string(),
        });
        true
    }

    fn ok(&mut self, step: Step, message: String) {
        self.record(StepResult {
            step,
            status: StepStatus::Success,
            message,
            detail: None,
        });
    }

    fn warn(&mut self, step: Step, message: &str, detail: Option<String>) {
        self.record(StepResult {
            step,
            status: StepStatus::Failure(FailureKind::BestEffort),
            message: message.to_string(),
            detail,
        });
    }

    fn fail(
        &mut self,
        step: Step,
        kind: FailureKind,
        message: &str,
        detail: Option<String>,
    ) -> Outcome {
        self.record(StepResult {
            step,
            status: StepStatus::Failure(kind),
            message: message.to_string(),
            detail,
        });
        Outcome::Failed {
            kind,
            message: message.to_string(),
            log: std::mem::take(&mut self.log),
        }
    }

    fn cancelled(&mut self, step: Step) -> Outcome {
        self.record(StepResult {
            step,
            status: StepStatus::Cancelled,
            message: "Operation cancelled".to_string(),
            detail: None,
        });
        Outcome::Cancelled {
            log: std::mem::take(&mut self.log),
        }
    }

    fn record(&mut self, result: StepResult) {
        let _ = self.events.send(WorkerEvent::StepDone(result.clone()));
        self.log.push(result);
    }

    /// Block until the controlling thread answers a push conflict,
    /// still honoring cancellation. None means cancelled.
    fn await_decision(&self) -> Option<PushDecision> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            match self.decisions.recv_timeout(Duration::from_millis(200)) {
                Ok(decision) => return Some(decision),
                Err(RecvTimeoutError::Timeout) => {}
                // Controlling thread went away; treat as a decline.
                Err(RecvTimeoutError::Disconnected) => return Some(PushDecision::Abort),
            }
        }
    }
}

fn gitignore_note(template: &str, outcome: gitignore::GitignoreOutcome) -> String {
    match outcome {
        gitignore::GitignoreOutcome::Written => {
            format!("wrote .gitignore from '{}' template", template)
        }
        gitignore::GitignoreOutcome::Merged => format!(
            "merged '{}' template into existing .gitignore (backup in .gitignore.bak)",
            template
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{License, RemoteTransport, Visibility};
    use std::path::Path;
    use tempfile::TempDir;

    struct MockForge {
        calls: Arc<Mutex<Vec<String>>>,
        cancel_on_create: Option<CancelToken>,
        sleep_on_create: Option<Duration>,
    }

    impl MockForge {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                MockForge {
                    calls: Arc::clone(&calls),
                    cancel_on_create: None,
                    sleep_on_create: None,
                },
                calls,
            )
        }

        fn record(&self, call: &str) {
            self.calls.lock().push(call.to_string());
        }
    }

    impl ForgeClient for MockForge {
        fn is_available(&self) -> anyhow::Result<bool> {
            self.record("is_available");
            Ok(true)
        }

        fn is_authenticated(&self) -> anyhow::Result<bool> {
            self.record("is_authenticated");
            Ok(true)
        }

        fn current_user(&self) -> anyhow::Result<String> {
            self.record("current_user");
            Ok("octo".to_string())
        }

        fn create_repository(
            &self,
            _config: &RepositoryConfig,
            _gitignore: Option<&str>,
        ) -> anyhow::Result<()> {
            self.record("create_repository");
            if let Some(delay) = self.sleep_on_create {
                thread::sleep(delay);
            }
            if let Some(token) = &self.cancel_on_create {
                token.cancel();
            }
            Ok(())
        }

        fn remote_url(
            &self,
            owner: &str,
            repo: &str,
            _transport: RemoteTransport,
        ) -> String {
            format!("https://github.com/{}/{}.git", owner, repo)
        }

        fn set_topics(
            &self,
            _owner: &str,
            _repo: &str,
            _topics: &[String],
        ) -> anyhow::Result<()> {
            self.record("set_topics");
            Ok(())
        }

        fn gitignore_templates(&self) -> anyhow::Result<Vec<String>> {
            self.record("gitignore_templates");
            Ok(Vec::new())
        }

        fn gitignore_template_source(&self, _name: &str) -> anyhow::Result<String> {
            self.record("gitignore_template_source");
            Ok("node_modules/\n".to_string())
        }

        fn open_in_browser(&self, _owner: &str, _repo: &str) -> anyhow::Result<()> {
            self.record("open_in_browser");
            Ok(())
        }
    }

    fn sample_config(dir: &Path) -> RepositoryConfig {
        RepositoryConfig {
            name: "demo".to_string(),
            location: dir.to_path_buf(),
            description: String::new(),
            visibility: Visibility::Public,
            gitignore_template: None,
            license: License::None,
            topics: Vec::new(),
            remote: RemoteTransport::Https,
            open_browser: false,
            create_scaffold: true,
            create_editorconfig: true,
            readme_content: None,
        }
    }

    fn drain_outcome(handle: &WorkerHandle) -> Outcome {
        loop {
            match handle.events().recv_timeout(Duration::from_secs(10)) {
                Ok(WorkerEvent::Finished(outcome)) => return outcome,
                Ok(_) => {}
                Err(e) => panic!("worker hung: {}", e),
            }
        }
    }

    #[test]
    fn test_validation_failure_blocks_external_calls() {
        let temp = TempDir::new().unwrap();
        let mut config = sample_config(temp.path());
        config.name = "bad name!".to_string();

        let (forge, calls) = MockForge::new();
        let handle = spawn(config, Box::new(forge)).unwrap();
        let outcome = drain_outcome(&handle);
        handle.join();

        match outcome {
            Outcome::Failed { kind, .. } => assert_eq!(kind, FailureKind::ValidationFailed),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_cancellation_between_create_and_scaffold() {
        if which::which("git").is_err() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let config = sample_config(temp.path());

        let token = CancelToken::new();
        let (mut forge, calls) = MockForge::new();
        forge.cancel_on_create = Some(token.clone());

        let handle = spawn_with_cancel(config, Box::new(forge), token).unwrap();
        let outcome = drain_outcome(&handle);
        handle.join();

        match &outcome {
            Outcome::Cancelled { log } => {
                let last = log.last().unwrap();
                assert_eq!(last.step, Step::ScaffoldingLocal);
                assert_eq!(last.status, StepStatus::Cancelled);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }

        // The remote was created but nothing local happened
        let calls = calls.lock();
        assert!(calls.contains(&"create_repository".to_string()));
        assert!(!calls.contains(&"set_topics".to_string()));
        assert!(!temp.path().join(".git").exists());
        assert!(!temp.path().join("README.md").exists());
    }

    #[test]
    fn test_progress_percent_increases() {
        if which::which("git").is_err() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let config = sample_config(temp.path());

        let token = CancelToken::new();
        let (mut forge, _calls) = MockForge::new();
        forge.cancel_on_create = Some(token.clone());

        let handle = spawn_with_cancel(config, Box::new(forge), token).unwrap();

        let mut percents = Vec::new();
        loop {
            match handle.events().recv_timeout(Duration::from_secs(10)) {
                Ok(WorkerEvent::Progress { step, percent, .. }) => {
                    percents.push((step, percent));
                }
                Ok(WorkerEvent::Finished(_)) => break,
                Ok(_) => {}
                Err(e) => panic!("worker hung: {}", e),
            }
        }
        handle.join();

        assert_eq!(percents.first().map(|(s, _)| *s), Some(Step::Validating));
        for pair in percents.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn test_wait_timeout_bounded_escalation() {
        if which::which("git").is_err() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let config = sample_config(temp.path());

        let token = CancelToken::new();
        let (mut forge, _calls) = MockForge::new();
        forge.sleep_on_create = Some(Duration::from_millis(400));
        forge.cancel_on_create = Some(token.clone());

        let handle = spawn_with_cancel(config, Box::new(forge), token).unwrap();

        // The worker is still inside the blocking create call
        assert!(!handle.wait_timeout(Duration::from_millis(20)));
        // Given time, the cancellation is observed at the step boundary
        assert!(handle.wait_timeout(Duration::from_secs(5)));

        let outcome = drain_outcome(&handle);
        handle.join();
        assert!(matches!(outcome, Outcome::Cancelled { .. }));
    }
}
