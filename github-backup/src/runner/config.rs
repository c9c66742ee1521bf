//! Runner configuration.

use crate::config::RunConfig;
use crate::forge::Credentials;

/// Configuration for a complete backup run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Forge account whose repositories are backed up.
    username: String,
    /// Organization to back up instead of the user's repositories.
    organization: Option<String>,
    /// Authentication against the forge API.
    credentials: Option<Credentials>,
    /// Base URL of the forge API.
    api_url: Option<String>,
    /// Settings shared by every repository.
    run: RunConfig,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(username: String, run: RunConfig) -> Self {
        Self {
            username,
            organization: None,
            credentials: None,
            api_url: None,
            run,
        }
    }

    /// Backs up an organization's repositories instead.
    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }

    /// Sets the forge credentials.
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets a custom forge API base URL.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url;
        self
    }

    /// Returns the configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the forge credentials.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the forge API base URL.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Returns the per-repository configuration.
    pub fn run_config(&self) -> &RunConfig {
        &self.run
    }

    /// Returns the login to list repositories for, and whether it is an
    /// organization.
    pub fn listing_target(&self) -> (&str, bool) {
        match &self.organization {
            Some(organization) => (organization, true),
            None => (&self.username, false),
        }
    }
}
