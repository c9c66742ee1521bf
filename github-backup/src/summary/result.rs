//! Per-repository operation results.

use serde::Serialize;

/// What happened to one repository during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Freshly cloned, updated, and annotated.
    Cloned,

    /// Existing copy updated and annotated.
    Updated,

    /// Clone failed; nothing else was attempted.
    CloneFailed,

    /// Update of an existing copy failed; metadata was skipped.
    UpdateFailed,

    /// Clone succeeded but the follow-up update failed; metadata was skipped.
    ClonedThenUpdateFailed,

    /// Copy is backed up, but some metadata keys could not be written.
    MetadataPartialFailure {
        /// Keys whose write failed, in write order.
        failed_keys: Vec<String>,
        /// Whether the copy was cloned during this run.
        cloned: bool,
    },

    /// Reconciliation failed in a way not tied to a git invocation.
    UnexpectedError,
}

impl Outcome {
    /// Returns true if the outcome should fail the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Cloned | Self::Updated)
    }

    /// Returns the outcome as a short label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloned => "cloned",
            Self::Updated => "updated",
            Self::CloneFailed => "clone_failed",
            Self::UpdateFailed => "update_failed",
            Self::ClonedThenUpdateFailed => "cloned_then_update_failed",
            Self::MetadataPartialFailure { .. } => "metadata_partial_failure",
            Self::UnexpectedError => "unexpected_error",
        }
    }
}

/// Result of reconciling a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    /// Repository full name.
    pub repository: String,

    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Captured command output or error text; empty on success.
    pub detail: String,
}

impl OperationResult {
    /// Creates a result without detail.
    pub fn new(repository: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            repository: repository.into(),
            outcome,
            detail: String::new(),
        }
    }

    /// Attaches detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Returns true if this result should fail the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }
}
