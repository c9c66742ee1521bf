//! Git invocation error types.

use thiserror::Error;

/// Errors returned by a failed git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started.
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The git process ran and reported failure.
    #[error("`{command}` failed with {}: {}", exit_label(.exit_code), .output.trim())]
    Failed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },
}

impl GitError {
    /// Returns the command line that failed.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. } | Self::Failed { command, .. } => command,
        }
    }

    /// Returns the exit code, if the process exited normally.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { exit_code, .. } => *exit_code,
        }
    }

    /// Returns the captured stdout and stderr of the process.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::Failed { output, .. } => output,
        }
    }
}

fn exit_label(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
