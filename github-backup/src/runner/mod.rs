//! Orchestrates a backup run.
//!
//! All forge traffic (listing and owner lookups) completes before the first
//! clone, then repositories are reconciled one at a time in listing order.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::forge::{resolve_owners, Credentials, Forge, GitHubForge};
use crate::git::{GitCli, Vcs};
use crate::reconcile::Reconciler;
use crate::summary::{OperationResult, Outcome, RunSummary};
use crate::types::{OwnerInfo, Repository};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use tracing::{error, info, warn};

/// Orchestrates a full backup run.
pub struct Runner<F = GitHubForge, V = GitCli> {
    config: RunnerConfig,
    forge: F,
    reconciler: Reconciler<V>,
}

impl Runner {
    /// Builds a runner talking to GitHub and the `git` binary.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Forge`] if the API client can't be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let auth = config.credentials().map_or("anonymous", Credentials::kind);
        info!(user = config.username(), auth, "Connecting to GitHub");

        let forge = GitHubForge::new(config.credentials(), config.api_url())?;
        Ok(Self::with_adapters(config, forge, GitCli::new()))
    }
}

impl<F: Forge, V: Vcs> Runner<F, V> {
    /// Builds a runner from explicit forge and VCS adapters.
    pub fn with_adapters(config: RunnerConfig, forge: F, vcs: V) -> Self {
        let reconciler = Reconciler::new(vcs, config.run_config().clone());
        Self {
            config,
            forge,
            reconciler,
        }
    }

    /// Returns the forge adapter.
    pub fn forge(&self) -> &F {
        &self.forge
    }

    /// Returns the reconciler used for each repository.
    pub fn reconciler(&self) -> &Reconciler<V> {
        &self.reconciler
    }

    /// Executes the full backup flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the backup directory is unusable or the
    /// forge can't be queried. Per-repository failures are reported in the
    /// summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let backup_root = self.config.run_config().backup_root();
        prepare_backup_root(backup_root).await?;

        let (owner, is_organization) = self.config.listing_target();
        info!(owner, is_organization, "Listing repositories");
        let repositories = self.forge.list_repositories(owner, is_organization).await?;

        if repositories.is_empty() {
            warn!(owner, "No repositories found");
            return Ok(RunSummary::new(0));
        }
        info!(count = repositories.len(), "Found repositories");

        let owners = resolve_owners(&self.forge, &repositories).await?;

        let mut summary = RunSummary::new(repositories.len());
        for result in run_batch(&self.reconciler, &repositories, &owners).await {
            summary.record_result(result);
        }

        info!(
            cloned = summary.cloned,
            updated = summary.updated,
            failed = summary.failures().count(),
            "Backup run complete"
        );
        Ok(summary)
    }
}

/// Reconciles every repository in order, one result per repository.
///
/// Reconciler errors, missing owner information and panics are converted
/// into [`Outcome::UnexpectedError`] results; the loop always continues.
pub async fn run_batch<V: Vcs>(
    reconciler: &Reconciler<V>,
    repositories: &[Repository],
    owners: &HashMap<String, OwnerInfo>,
) -> Vec<OperationResult> {
    let total = repositories.len();
    let mut results = Vec::with_capacity(total);

    for (index, repo) in repositories.iter().enumerate() {
        info!(repo = %repo.full_name, index = index + 1, total, "Processing repository");

        let Some(owner) = owners.get(&repo.owner_login) else {
            error!(repo = %repo.full_name, owner = %repo.owner_login, "Owner was not resolved");
            results.push(unexpected(
                repo,
                format!("no owner information for '{}'", repo.owner_login),
            ));
            continue;
        };

        let result = match AssertUnwindSafe(reconciler.reconcile(repo, owner))
            .catch_unwind()
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(repo = %repo.full_name, error = %e, "Reconciliation failed");
                unexpected(repo, e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(repo = %repo.full_name, panic = %message, "Reconciliation panicked");
                unexpected(repo, message)
            }
        };
        results.push(result);
    }

    results
}

fn unexpected(repo: &Repository, detail: String) -> OperationResult {
    OperationResult::new(&repo.full_name, Outcome::UnexpectedError).with_detail(detail)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Creates the backup root if needed and checks it is a directory.
async fn prepare_backup_root(path: &Path) -> Result<(), RunnerError> {
    let unusable = |source: std::io::Error| RunnerError::BackupRoot {
        path: path.display().to_string(),
        source,
    };

    tokio::fs::create_dir_all(path).await.map_err(unusable)?;
    let metadata = tokio::fs::metadata(path).await.map_err(unusable)?;
    if !metadata.is_dir() {
        return Err(unusable(std::io::Error::other("not a directory")));
    }
    Ok(())
}
