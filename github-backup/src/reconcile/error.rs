//! Reconciler error types.

use thiserror::Error;

/// Failures of the reconciler itself, as opposed to failed git invocations
/// (which are reported through [`crate::summary::Outcome`]).
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Could not determine whether a local copy exists.
    #[error("Failed to check for local copy at '{path}': {source}")]
    MarkerCheck {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
