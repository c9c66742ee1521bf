//! Runner error types.

use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Settings file loading errors.
    #[error(transparent)]
    Settings(#[from] crate::config::SettingsError),

    /// Forge listing, lookup and client errors.
    #[error(transparent)]
    Forge(#[from] crate::forge::ForgeError),

    /// No backup directory was configured.
    #[error("No backup directory given on the command line or in the settings file")]
    MissingBackupDir,

    /// The backup directory can't be created or isn't a directory.
    #[error("Backup directory '{path}' is unusable: {source}")]
    BackupRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
