//! Forge error types.

use thiserror::Error;

/// Errors that can occur while talking to the forge.
///
/// All of them are fatal to a run: without a complete repository list and
/// owner information there is nothing safe to reconcile.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Credentials were rejected.
    #[error("GitHub rejected the credentials: {0}")]
    Auth(#[source] octocrab::Error),

    /// Any other API or transport failure.
    #[error("GitHub API error: {0}")]
    Network(#[source] octocrab::Error),

    /// The API client could not be constructed.
    #[error("Failed to build GitHub client: {0}")]
    Client(#[source] octocrab::Error),

    /// A listed repository lacks a field needed to back it up.
    #[error("Repository '{repository}' is missing '{field}' in the API response")]
    IncompleteRepository {
        repository: String,
        field: &'static str,
    },
}

impl From<octocrab::Error> for ForgeError {
    fn from(error: octocrab::Error) -> Self {
        match &error {
            octocrab::Error::GitHub { source, .. }
                if matches!(source.status_code.as_u16(), 401 | 403) =>
            {
                Self::Auth(error)
            }
            _ => Self::Network(error),
        }
    }
}
