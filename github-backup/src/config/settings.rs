//! Optional TOML settings file.

use super::SettingsError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Settings read from a TOML file.
///
/// Every key is optional; command-line flags take precedence.
///
/// ```toml
/// backup-dir = "/srv/backups/github"
/// mirror = true
/// git-args = ["--quiet"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Directory receiving the local copies.
    pub backup_dir: Option<PathBuf>,

    /// Prefix for repository directory names.
    pub prefix: Option<String>,

    /// Suffix for repository directory names.
    pub suffix: Option<String>,

    /// Keep bare mirrors instead of working copies.
    pub mirror: Option<bool>,

    /// Clone over SSH.
    pub ssh: Option<bool>,

    /// Extra arguments passed to git clone, fetch and pull.
    #[serde(default)]
    pub git_args: Vec<String>,

    /// Organization to back up instead of the user's own repositories.
    pub organization: Option<String>,

    /// Base URL of the forge API, for GitHub Enterprise installations.
    pub api_url: Option<String>,
}

impl Settings {
    /// Loads and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file can't be read, isn't valid TOML,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| SettingsError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), SettingsError> {
        let path_str = path.display().to_string();

        if let Some(api_url) = &self.api_url {
            if Url::parse(api_url).is_err() {
                return Err(SettingsError::ValidationError {
                    path: path_str,
                    message: format!("api-url is not a valid URL: {api_url}"),
                });
            }
        }

        if self.git_args.iter().any(|arg| arg.trim().is_empty()) {
            return Err(SettingsError::ValidationError {
                path: path_str,
                message: "git-args must not contain empty entries".to_string(),
            });
        }

        Ok(())
    }
}
