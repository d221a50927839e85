//! Git subprocess wrappers for repository publishing
//!
//! Handles:
//! - Repository and commit detection
//! - init / stage / commit
//! - Remote management
//! - Rebase-then-push with conflict detection

mod operations;

pub use operations::{
    add_all, add_remote, commit, current_branch, fetch, has_commits, has_remote, init,
    is_git_repo, push_force_with_lease, push_upstream, rebase, rebase_abort,
    remote_branch_exists,
};
