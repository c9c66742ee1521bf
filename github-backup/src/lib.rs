#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod forge;
pub mod git;
pub mod reconcile;
pub mod runner;
pub mod summary;
pub mod types;

pub use config::{split_git_args, RunConfig, Settings, SettingsError};
pub use forge::{resolve_owners, Credentials, Forge, ForgeError, GitHubForge};
pub use git::{GitCli, GitError, Vcs};
pub use reconcile::{ReconcileError, Reconciler, METADATA_KEYS};
pub use runner::{run_batch, Runner, RunnerConfig, RunnerError};
pub use summary::{OperationResult, Outcome, RunSummary};
pub use types::{OwnerInfo, Repository};
