//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{OperationResult, Outcome};
pub use run_summary::RunSummary;
