//! Repository listing and owner lookup on the forge.

mod credentials;
mod error;
mod github;

pub use credentials::Credentials;
pub use error::ForgeError;
pub use github::GitHubForge;

use crate::types::{OwnerInfo, Repository};
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info};

/// Forge operations needed before a backup run.
pub trait Forge {
    /// Lists every repository owned by a user, or by an organization.
    fn list_repositories(
        &self,
        owner: &str,
        is_organization: bool,
    ) -> impl Future<Output = Result<Vec<Repository>, ForgeError>> + Send;

    /// Looks up the profile of a user or organization.
    fn resolve_user(&self, login: &str)
        -> impl Future<Output = Result<OwnerInfo, ForgeError>> + Send;
}

/// Resolves the owner of every repository, once per distinct login.
///
/// Runs to completion before any clone starts so a forge outage surfaces
/// up front instead of halfway through the batch.
///
/// # Errors
///
/// Returns the first [`ForgeError`] encountered.
pub async fn resolve_owners<F: Forge>(
    forge: &F,
    repositories: &[Repository],
) -> Result<HashMap<String, OwnerInfo>, ForgeError> {
    let mut owners = HashMap::new();

    for repo in repositories {
        if owners.contains_key(&repo.owner_login) {
            continue;
        }
        debug!(login = %repo.owner_login, "Resolving owner");
        let owner = forge.resolve_user(&repo.owner_login).await?;
        owners.insert(repo.owner_login.clone(), owner);
    }

    info!(count = owners.len(), "Resolved repository owners");
    Ok(owners)
}
