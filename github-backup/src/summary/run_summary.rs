//! Run summary types.

use super::result::{OperationResult, Outcome};
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of repositories listed on the forge.
    pub repositories_discovered: usize,

    /// Number of repositories cloned this run.
    pub cloned: usize,

    /// Number of existing copies updated.
    pub updated: usize,

    /// Number of failed clones.
    pub clone_failures: usize,

    /// Number of failed updates, after a clone or not.
    pub update_failures: usize,

    /// Number of repositories with at least one failed metadata key.
    pub metadata_failures: usize,

    /// Number of repositories that failed outside any git invocation.
    pub unexpected_errors: usize,

    /// Every result, in processing order.
    pub results: Vec<OperationResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(repositories_discovered: usize) -> Self {
        Self {
            repositories_discovered,
            ..Default::default()
        }
    }

    /// Updates the summary with a result.
    pub fn record_result(&mut self, result: OperationResult) {
        match &result.outcome {
            Outcome::Cloned => self.cloned += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::CloneFailed => self.clone_failures += 1,
            Outcome::UpdateFailed => self.update_failures += 1,
            Outcome::ClonedThenUpdateFailed => {
                self.cloned += 1;
                self.update_failures += 1;
            }
            Outcome::MetadataPartialFailure { cloned, .. } => {
                if *cloned {
                    self.cloned += 1;
                } else {
                    self.updated += 1;
                }
                self.metadata_failures += 1;
            }
            Outcome::UnexpectedError => self.unexpected_errors += 1,
        }
        self.results.push(result);
    }

    /// Returns true if any repository has a failing outcome.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(OperationResult::is_failure)
    }

    /// Returns true if every repository was cloned or updated cleanly.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }

    /// Iterates over failing results.
    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|result| result.is_failure())
    }
}
