//! Per-repository reconciliation.
//!
//! Brings one local copy in line with the forge as a strict pipeline:
//!
//! 1. Clone, only when the marker file of a previous backup is absent
//! 2. Update (fetch for mirrors, pull for working copies)
//! 3. Write gitweb/cgit metadata into the local git config
//!
//! The first two stages short-circuit on failure. Metadata is best-effort:
//! every key is attempted and failures never undo the clone or update.

mod error;

pub use error::ReconcileError;

use crate::config::RunConfig;
use crate::git::{GitError, Vcs};
use crate::summary::{OperationResult, Outcome};
use crate::types::{OwnerInfo, Repository};
use std::path::Path;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Git config keys written for gitweb and cgit, in write order.
pub const METADATA_KEYS: [&str; 5] = [
    "gitweb.description",
    "gitweb.owner",
    "cgit.name",
    "cgit.defbranch",
    "cgit.clone-url",
];

/// Reconciles repositories against local copies using a [`Vcs`].
#[derive(Debug)]
pub struct Reconciler<V> {
    vcs: V,
    config: RunConfig,
}

impl<V: Vcs> Reconciler<V> {
    /// Creates a reconciler for one run.
    pub fn new(vcs: V, config: RunConfig) -> Self {
        Self { vcs, config }
    }

    /// Returns the underlying VCS adapter.
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Brings the local copy of `repo` up to date.
    ///
    /// Failed git invocations are reported through the returned
    /// [`OperationResult`]; they are never propagated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] if the existence of a local copy can't be
    /// determined.
    pub async fn reconcile(
        &self,
        repo: &Repository,
        owner: &OwnerInfo,
    ) -> Result<OperationResult, ReconcileError> {
        let span = info_span!("reconcile", repo = %repo.full_name);

        async {
            let local_path = self.config.local_path(repo);
            let exists = self.marker_exists(repo).await?;

            if exists {
                info!(path = %local_path.display(), "Local copy exists, updating");
            } else {
                info!(path = %local_path.display(), "No local copy, cloning");
                if let Err(detail) = self.clone_repository(repo, &local_path).await {
                    return Ok(OperationResult::new(&repo.full_name, Outcome::CloneFailed)
                        .with_detail(detail));
                }
            }
            let cloned = !exists;

            if let Err(e) = self.update(&local_path).await {
                log_git_failure("Update failed", &e);
                let outcome = if cloned {
                    Outcome::ClonedThenUpdateFailed
                } else {
                    Outcome::UpdateFailed
                };
                return Ok(
                    OperationResult::new(&repo.full_name, outcome).with_detail(e.to_string())
                );
            }

            let failures = self.write_metadata(&local_path, repo, owner).await;
            if failures.is_empty() {
                let outcome = if cloned {
                    Outcome::Cloned
                } else {
                    Outcome::Updated
                };
                info!(outcome = outcome.as_str(), "Repository backed up");
                return Ok(OperationResult::new(&repo.full_name, outcome));
            }

            let detail = failures
                .iter()
                .map(|(key, e)| format!("{key}: {e}"))
                .collect::<Vec<_>>()
                .join("\n");
            let failed_keys = failures
                .into_iter()
                .map(|(key, _)| key.to_string())
                .collect();
            Ok(OperationResult::new(
                &repo.full_name,
                Outcome::MetadataPartialFailure {
                    failed_keys,
                    cloned,
                },
            )
            .with_detail(detail))
        }
        .instrument(span)
        .await
    }

    async fn marker_exists(&self, repo: &Repository) -> Result<bool, ReconcileError> {
        let marker = self.config.marker_path(repo);
        self.vcs
            .local_copy_exists(&marker)
            .await
            .map_err(|e| ReconcileError::MarkerCheck {
                path: marker.display().to_string(),
                source: e,
            })
    }

    /// Clones `repo` and checks the marker file is in place afterwards.
    ///
    /// Returns the failure detail on error.
    async fn clone_repository(
        &self,
        repo: &Repository,
        local_path: &Path,
    ) -> Result<(), String> {
        let mut args = self.config.vcs_args();
        if self.config.mirror() {
            args.push("--mirror".to_string());
        }
        let source = repo.source_url(self.config.use_ssh());

        if let Err(e) = self.vcs.clone_repository(source, local_path, &args).await {
            log_git_failure("Clone failed", &e);
            return Err(e.to_string());
        }

        // Without the marker the next run would try to clone again.
        match self.marker_exists(repo).await {
            Ok(true) => {
                debug!("Clone complete");
                Ok(())
            }
            Ok(false) => {
                let marker = self.config.marker_path(repo);
                error!(marker = %marker.display(), "Clone left no marker file");
                Err(format!(
                    "clone reported success but '{}' does not exist",
                    marker.display()
                ))
            }
            Err(e) => {
                error!(error = %e, "Clone left no readable marker file");
                Err(e.to_string())
            }
        }
    }

    async fn update(&self, local_path: &Path) -> Result<(), GitError> {
        let mut args = self.config.vcs_args();
        if self.config.mirror() {
            args.push("--prune".to_string());
            self.vcs.update_mirror(local_path, &args).await
        } else {
            self.vcs.update_working_copy(local_path, &args).await
        }
    }

    /// Writes every metadata key, returning the ones that failed.
    async fn write_metadata(
        &self,
        local_path: &Path,
        repo: &Repository,
        owner: &OwnerInfo,
    ) -> Vec<(&'static str, GitError)> {
        let mut failures = Vec::new();

        for (key, value) in METADATA_KEYS.into_iter().zip(metadata_values(repo, owner)) {
            if let Err(e) = self.vcs.set_config(local_path, key, &value).await {
                warn!(
                    key,
                    command = %e.command(),
                    exit_code = ?e.exit_code(),
                    output = %e.output().trim(),
                    "Failed to write metadata"
                );
                failures.push((key, e));
            }
        }

        failures
    }
}

/// Values for [`METADATA_KEYS`], in the same order.
fn metadata_values(repo: &Repository, owner: &OwnerInfo) -> [String; 5] {
    [
        repo.description.clone().unwrap_or_default(),
        owner.gitweb_owner(),
        repo.name.clone(),
        repo.default_branch.clone(),
        repo.clone_url.clone(),
    ]
}

fn log_git_failure(message: &str, e: &GitError) {
    error!(
        command = %e.command(),
        exit_code = ?e.exit_code(),
        output = %e.output().trim(),
        error = %e,
        "{message}"
    );
}
