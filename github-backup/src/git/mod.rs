//! Version-control operations on local copies.
//!
//! The [`Vcs`] trait is the narrow surface the reconciler needs. Every call
//! names the directory it operates on explicitly, so nothing here touches the
//! process working directory. [`GitCli`] implements it by running the `git`
//! binary with an argument vector; no shell is involved, so metadata values
//! containing quotes or other metacharacters are passed through verbatim.

mod error;

pub use error::GitError;

use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Operations the reconciler performs against local copies.
pub trait Vcs {
    /// Returns whether the marker file of a local copy exists.
    fn local_copy_exists(&self, marker: &Path) -> impl Future<Output = io::Result<bool>> + Send {
        async move { tokio::fs::try_exists(marker).await }
    }

    /// Clones `source` into `dest`.
    fn clone_repository(
        &self,
        source: &str,
        dest: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Fetches into the bare mirror at `dest`.
    fn update_mirror(
        &self,
        dest: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Pulls into the working copy at `dest`.
    fn update_working_copy(
        &self,
        dest: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Sets a key in the local configuration of the copy at `dest`.
    fn set_config(
        &self,
        dest: &Path,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), GitError>> + Send;
}

/// [`Vcs`] implementation backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Uses `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Uses a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs git with `args`, optionally inside `dir`.
    async fn run(&self, dir: Option<&Path>, args: Vec<OsString>) -> Result<(), GitError> {
        let command_line = render_command(&self.program, &args);
        debug!(command = %command_line, dir = ?dir, "Running git");

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| GitError::Spawn {
            command: command_line.clone(),
            source: e,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(GitError::Failed {
                command: command_line,
                exit_code: output.status.code(),
                output: combined,
            });
        }

        if !combined.trim().is_empty() {
            debug!(command = %command_line, output = %combined.trim(), "git output");
        }
        Ok(())
    }
}

impl Vcs for GitCli {
    async fn clone_repository(
        &self,
        source: &str,
        dest: &Path,
        args: &[String],
    ) -> Result<(), GitError> {
        self.run(None, clone_args(source, dest, args)).await
    }

    async fn update_mirror(&self, dest: &Path, args: &[String]) -> Result<(), GitError> {
        self.run(Some(dest), subcommand_args("fetch", args)).await
    }

    async fn update_working_copy(&self, dest: &Path, args: &[String]) -> Result<(), GitError> {
        self.run(Some(dest), subcommand_args("pull", args)).await
    }

    async fn set_config(&self, dest: &Path, key: &str, value: &str) -> Result<(), GitError> {
        self.run(Some(dest), config_args(key, value)).await
    }
}

fn clone_args(source: &str, dest: &Path, args: &[String]) -> Vec<OsString> {
    let mut argv: Vec<OsString> = vec!["clone".into()];
    argv.extend(args.iter().map(OsString::from));
    argv.push(source.into());
    argv.push(dest.as_os_str().to_owned());
    argv
}

fn subcommand_args(subcommand: &str, args: &[String]) -> Vec<OsString> {
    let mut argv: Vec<OsString> = vec![subcommand.into()];
    argv.extend(args.iter().map(OsString::from));
    argv
}

fn config_args(key: &str, value: &str) -> Vec<OsString> {
    vec!["config".into(), "--local".into(), key.into(), value.into()]
}

/// Renders an argument vector for logs and error messages.
fn render_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
