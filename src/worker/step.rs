//! Pipeline steps and their results.

/// One step of the creation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Validating,
    CheckingDeps,
    CheckingAuth,
    CreatingRemote,
    ScaffoldingLocal,
    InitCommit,
    SettingRemote,
    Pushing,
    SettingTopics,
    OpeningBrowser,
}

impl Step {
    /// Execution order of the pipeline.
    pub const ALL: [Step; 10] = [
        Step::Validating,
        Step::CheckingDeps,
        Step::CheckingAuth,
        Step::CreatingRemote,
        Step::ScaffoldingLocal,
        Step::InitCommit,
        Step::SettingRemote,
        Step::Pushing,
        Step::SettingTopics,
        Step::OpeningBrowser,
    ];

    /// Human-readable label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            Step::Validating => "Validating input",
            Step::CheckingDeps => "Checking dependencies",
            Step::CheckingAuth => "Checking authentication",
            Step::CreatingRemote => "Creating remote repository",
            Step::ScaffoldingLocal => "Writing project scaffold",
            Step::InitCommit => "Initializing and committing",
            Step::SettingRemote => "Setting remote origin",
            Step::Pushing => "Pushing to remote",
            Step::SettingTopics => "Setting repository topics",
            Step::OpeningBrowser => "Opening in browser",
        }
    }

    /// Completion estimate when this step starts, 0-100.
    pub fn percent(self) -> u8 {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        (index * 100 / Self::ALL.len()) as u8
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// git or the provider CLI is not installed.
    MissingDependency,
    /// The provider CLI has no authenticated session.
    AuthRequired,
    /// The configuration violated an input rule.
    ValidationFailed,
    /// The provider refused to create the repository.
    RemoteCreateFailed,
    /// A scaffold or gitignore write failed.
    ScaffoldFailed,
    /// A local git operation failed.
    GitFailed,
    /// The rebase before push conflicted and no force-push was
    /// confirmed.
    PushConflict,
    /// A non-essential operation failed; the pipeline continued.
    BestEffort,
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Failure(FailureKind),
    Cancelled,
}

/// Outcome of one pipeline step, accumulated into the worker log.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step: Step,
    pub status: StepStatus,
    pub message: String,
    /// Underlying error text, usually the external tool's stderr.
    pub detail: Option<String>,
}

/// Terminal result of a worker run.
#[derive(Debug, Clone)]
pub enum Outcome {
    Done {
        message: String,
        log: Vec<StepResult>,
    },
    Failed {
        kind: FailureKind,
        message: String,
        log: Vec<StepResult>,
    },
    Cancelled {
        log: Vec<StepResult>,
    },
}

impl Outcome {
    /// The accumulated step log, whatever the terminal state.
    pub fn log(&self) -> &[StepResult] {
        match self {
            Outcome::Done { log, .. } => log,
            Outcome::Failed { log, .. } => log,
            Outcome::Cancelled { log } => log,
        }
    }
}
