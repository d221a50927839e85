pub mod config;
pub mod forge;
pub mod git;
pub mod scaffold;
pub mod validate;
pub mod worker;

// Re-export commonly used types
pub use config::{Defaults, License, RemoteTransport, RepositoryConfig, Visibility};
pub use forge::{ForgeClient, GitHubCli};
pub use worker::{CancelToken, Outcome, WorkerEvent, WorkerHandle};
