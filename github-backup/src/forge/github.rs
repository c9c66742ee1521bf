//! GitHub implementation of [`Forge`] using octocrab.

use super::{Credentials, Forge, ForgeError};
use crate::types::{OwnerInfo, Repository};
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

/// Results per page when listing repositories.
const RESULTS_PER_PAGE: u8 = 100;

/// Branch assumed when the API omits one (e.g., empty repositories).
const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// [`Forge`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubForge {
    octocrab: Octocrab,
}

impl GitHubForge {
    /// Builds a client, optionally authenticated and pointed at a
    /// GitHub Enterprise API.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Client`] if the client can't be constructed.
    pub fn new(
        credentials: Option<&Credentials>,
        api_url: Option<&str>,
    ) -> Result<Self, ForgeError> {
        let mut builder = Octocrab::builder();

        builder = match credentials {
            Some(Credentials::Token(token)) => builder.personal_token(token.clone()),
            Some(Credentials::Password { username, password }) => {
                builder.basic_auth(username.clone(), password.clone())
            }
            None => builder,
        };

        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url).map_err(ForgeError::Client)?;
        }

        let octocrab = builder.build().map_err(ForgeError::Client)?;
        Ok(Self { octocrab })
    }
}

impl Forge for GitHubForge {
    async fn list_repositories(
        &self,
        owner: &str,
        is_organization: bool,
    ) -> Result<Vec<Repository>, ForgeError> {
        let span = info_span!("list_repositories", owner, is_organization);

        async {
            let route = listing_route(owner, is_organization);
            let params = ListParams {
                per_page: RESULTS_PER_PAGE,
                kind: if is_organization { "all" } else { "owner" },
            };
            debug!(route = %route, "Listing repositories");

            let first: Page<RepositoryPayload> = self.octocrab.get(&route, Some(&params)).await?;
            let payloads = self.octocrab.all_pages(first).await?;

            let repositories = payloads
                .into_iter()
                .map(RepositoryPayload::into_repository)
                .collect::<Result<Vec<_>, _>>()?;

            info!(count = repositories.len(), "Listed repositories");
            Ok(repositories)
        }
        .instrument(span)
        .await
    }

    async fn resolve_user(&self, login: &str) -> Result<OwnerInfo, ForgeError> {
        let profile: UserPayload = self
            .octocrab
            .get(format!("/users/{login}"), None::<&()>)
            .await?;
        Ok(OwnerInfo::from_profile(
            &profile.login,
            profile.name,
            profile.email,
        ))
    }
}

fn listing_route(owner: &str, is_organization: bool) -> String {
    if is_organization {
        format!("/orgs/{owner}/repos")
    } else {
        format!("/users/{owner}/repos")
    }
}

/// Query parameters for repository listing.
#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Subset of the repository payload the backup needs.
#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    full_name: Option<String>,
    git_url: Option<String>,
    ssh_url: Option<String>,
    clone_url: Option<String>,
    description: Option<String>,
    default_branch: Option<String>,
    owner: Option<OwnerPayload>,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

impl RepositoryPayload {
    fn into_repository(mut self) -> Result<Repository, ForgeError> {
        let owner_login = match self.owner.take() {
            Some(owner) => owner.login,
            None => return Err(self.missing("owner")),
        };
        let full_name = self
            .full_name
            .unwrap_or_else(|| format!("{}/{}", owner_login, self.name));

        let require = |value: Option<String>, field: &'static str| {
            value.ok_or_else(|| ForgeError::IncompleteRepository {
                repository: full_name.clone(),
                field,
            })
        };
        let git_url = require(self.git_url, "git_url")?;
        let ssh_url = require(self.ssh_url, "ssh_url")?;
        let clone_url = require(self.clone_url, "clone_url")?;

        Ok(Repository {
            name: self.name,
            full_name,
            git_url,
            ssh_url,
            clone_url,
            description: self.description,
            default_branch: self
                .default_branch
                .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string()),
            owner_login,
        })
    }

    fn missing(&self, field: &'static str) -> ForgeError {
        ForgeError::IncompleteRepository {
            repository: self.full_name.clone().unwrap_or_else(|| self.name.clone()),
            field,
        }
    }
}
