//! End-to-end pipeline tests.
//!
//! A local bare repository stands in for the forge remote and a mock
//! ForgeClient answers the provider calls, so the whole worker runs
//! against real git with no network. Tests return early when git is
//! not installed.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use reposmith::config::{License, RemoteTransport, RepositoryConfig, Visibility};
use reposmith::forge::ForgeClient;
use reposmith::worker::{
    self, FailureKind, Outcome, PushDecision, Step, StepStatus, WorkerEvent, WorkerHandle,
};

struct LocalForge {
    remote: PathBuf,
    calls: Arc<Mutex<Vec<String>>>,
}

impl LocalForge {
    fn new(remote: PathBuf) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            LocalForge {
                remote,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl ForgeClient for LocalForge {
    fn is_available(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn is_authenticated(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn current_user(&self) -> anyhow::Result<String> {
        Ok("octo".to_string())
    }

    fn create_repository(
        &self,
        _config: &RepositoryConfig,
        _gitignore: Option<&str>,
    ) -> anyhow::Result<()> {
        self.calls.lock().push("create_repository".to_string());
        Ok(())
    }

    fn remote_url(&self, _owner: &str, _repo: &str, _transport: RemoteTransport) -> String {
        self.remote.display().to_string()
    }

    fn set_topics(
        &self,
        _owner: &str,
        _repo: &str,
        topics: &[String],
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push(format!("set_topics:{}", topics.join(",")));
        Ok(())
    }

    fn gitignore_templates(&self) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn gitignore_template_source(&self, _name: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }

    fn open_in_browser(&self, _owner: &str, _repo: &str) -> anyhow::Result<()> {
        self.calls.lock().push("open_in_browser".to_string());
        Ok(())
    }
}

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

fn init_bare(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "--bare"]);
}

fn config(name: &str, dir: &Path) -> RepositoryConfig {
    RepositoryConfig {
        name: name.to_string(),
        location: dir.to_path_buf(),
        description: String::new(),
        visibility: Visibility::Public,
        gitignore_template: None,
        license: License::None,
        topics: Vec::new(),
        remote: RemoteTransport::Https,
        open_browser: false,
        create_scaffold: false,
        create_editorconfig: false,
        readme_content: None,
    }
}

fn run_to_outcome(handle: &WorkerHandle, on_conflict: Option<PushDecision>) -> Outcome {
    loop {
        match handle.events().recv_timeout(Duration::from_secs(30)) {
            Ok(WorkerEvent::DecisionRequired(_)) => match on_conflict {
                Some(decision) => handle.decide(decision),
                None => panic!("unexpected push conflict"),
            },
            Ok(WorkerEvent::Finished(outcome)) => return outcome,
            Ok(_) => {}
            Err(e) => panic!("worker hung: {}", e),
        }
    }
}

#[test]
fn test_full_pipeline_creates_scaffolds_and_pushes() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local");
    let bare = temp.path().join("remote.git");
    std::fs::create_dir_all(&local).unwrap();
    init_repo(&local);
    init_bare(&bare);

    let mut cfg = config("demo", &local);
    cfg.create_scaffold = true;
    cfg.create_editorconfig = true;
    cfg.topics = vec!["rust".to_string(), "cli".to_string()];
    cfg.open_browser = true;

    let (forge, calls) = LocalForge::new(bare.clone());
    let handle = worker::spawn(cfg, Box::new(forge)).unwrap();
    let outcome = run_to_outcome(&handle, None);
    handle.join();

    match &outcome {
        Outcome::Done { message, log } => {
            assert!(message.contains("demo"));
            assert!(log
                .iter()
                .all(|r| !matches!(r.status, StepStatus::Failure(_))));
        }
        other => panic!("expected success, got {:?}", other),
    }

    // Scaffold landed
    for file in ["README.md", "CHANGELOG.md", ".editorconfig", ".gitattributes"] {
        assert!(local.join(file).exists(), "missing {}", file);
    }

    // A commit exists and reached the bare remote on the local branch
    let branch = git(&local, &["symbolic-ref", "--short", "HEAD"]);
    git(&bare, &["rev-parse", "--verify", &format!("refs/heads/{}", branch)]);

    let calls = calls.lock();
    assert!(calls.contains(&"create_repository".to_string()));
    assert!(calls.contains(&"set_topics:rust,cli".to_string()));
    assert!(calls.contains(&"open_in_browser".to_string()));
}

#[test]
fn test_existing_commit_and_remote_are_left_alone() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local");
    let bare = temp.path().join("remote.git");
    std::fs::create_dir_all(&local).unwrap();
    init_repo(&local);
    init_bare(&bare);

    std::fs::write(local.join("README.md"), "# mine\n").unwrap();
    git(&local, &["add", "."]);
    git(&local, &["commit", "-m", "Existing commit"]);
    git(&local, &["remote", "add", "origin", bare.to_str().unwrap()]);

    let (forge, _calls) = LocalForge::new(bare.clone());
    let handle = worker::spawn(config("demo", &local), Box::new(forge)).unwrap();
    let outcome = run_to_outcome(&handle, None);
    handle.join();

    let log = match &outcome {
        Outcome::Done { log, .. } => log,
        other => panic!("expected success, got {:?}", other),
    };

    // InitCommit was a no-op: still exactly one commit
    let init_result = log.iter().find(|r| r.step == Step::InitCommit).unwrap();
    assert!(init_result.message.contains("nothing to commit"));
    assert_eq!(git(&local, &["rev-list", "--count", "HEAD"]), "1");

    // The pre-existing remote was not overwritten
    let remote_result = log.iter().find(|r| r.step == Step::SettingRemote).unwrap();
    assert!(remote_result.message.contains("leaving it as-is"));
    assert_eq!(
        git(&local, &["remote", "get-url", "origin"]),
        bare.to_str().unwrap()
    );
}

/// Seed the bare remote with a conflicting commit on the same branch
/// the local repository uses, then set up the local side.
fn conflicting_setup(temp: &TempDir) -> (PathBuf, PathBuf) {
    let seed = temp.path().join("seed");
    let local = temp.path().join("local");
    let bare = temp.path().join("remote.git");
    init_bare(&bare);

    std::fs::create_dir_all(&seed).unwrap();
    init_repo(&seed);
    std::fs::write(seed.join("README.md"), "# upstream\n").unwrap();
    git(&seed, &["add", "."]);
    git(&seed, &["commit", "-m", "Upstream commit"]);
    let branch = git(&seed, &["symbolic-ref", "--short", "HEAD"]);
    git(&seed, &["remote", "add", "origin", bare.to_str().unwrap()]);
    git(&seed, &["push", "-u", "origin", &branch]);

    std::fs::create_dir_all(&local).unwrap();
    init_repo(&local);
    std::fs::write(local.join("README.md"), "# local\n").unwrap();

    (local, bare)
}

#[test]
fn test_push_conflict_declined_leaves_remote_untouched() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let (local, bare) = conflicting_setup(&temp);

    let (forge, _calls) = LocalForge::new(bare.clone());
    let handle = worker::spawn(config("demo", &local), Box::new(forge)).unwrap();
    let outcome = run_to_outcome(&handle, Some(PushDecision::Abort));
    handle.join();

    match &outcome {
        Outcome::Failed { kind, .. } => assert_eq!(*kind, FailureKind::PushConflict),
        other => panic!("expected push conflict, got {:?}", other),
    }

    // The aborted rebase restored the local branch
    let readme = std::fs::read_to_string(local.join("README.md")).unwrap();
    assert_eq!(readme, "# local\n");

    // Nothing was pushed: the remote still has the upstream commit
    let branch = git(&local, &["symbolic-ref", "--short", "HEAD"]);
    assert_eq!(
        git(&bare, &["log", "-1", "--pretty=%s", &branch]),
        "Upstream commit"
    );
}

#[test]
fn test_push_conflict_confirmed_force_pushes_with_lease() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let (local, bare) = conflicting_setup(&temp);

    let (forge, _calls) = LocalForge::new(bare.clone());
    let handle = worker::spawn(config("demo", &local), Box::new(forge)).unwrap();
    let outcome = run_to_outcome(&handle, Some(PushDecision::ForceWithLease));
    handle.join();

    assert!(matches!(outcome, Outcome::Done { .. }));

    // The remote branch was replaced by the local commit
    let branch = git(&local, &["symbolic-ref", "--short", "HEAD"]);
    assert_eq!(
        git(&bare, &["log", "-1", "--pretty=%s", &branch]),
        "Initial commit"
    );
}
