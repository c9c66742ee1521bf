//! Per-run backup configuration.

use crate::types::Repository;
use std::path::{Path, PathBuf};

/// Flag appended to clone/fetch/pull calls when running quietly.
const QUIET_FLAG: &str = "--quiet";

/// Configuration shared by every repository in a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding one local copy per repository.
    backup_root: PathBuf,
    /// Prepended to each repository directory name.
    path_prefix: String,
    /// Appended to each repository directory name.
    path_suffix: String,
    /// Whether to keep bare mirrors instead of working copies.
    mirror: bool,
    /// Whether to clone over SSH instead of the git protocol.
    use_ssh: bool,
    /// Extra arguments passed to clone, fetch and pull.
    extra_args: Vec<String>,
    /// Whether to pass `--quiet` to clone, fetch and pull.
    quiet: bool,
}

impl RunConfig {
    /// Creates a configuration backing up into `backup_root` with defaults
    /// for everything else.
    pub fn new(backup_root: PathBuf) -> Self {
        Self {
            backup_root,
            path_prefix: String::new(),
            path_suffix: String::new(),
            mirror: false,
            use_ssh: false,
            extra_args: Vec::new(),
            quiet: false,
        }
    }

    /// Sets the directory name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Sets the directory name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = suffix.into();
        self
    }

    /// Enables or disables mirror mode.
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Enables or disables cloning over SSH.
    pub fn with_ssh(mut self, use_ssh: bool) -> Self {
        self.use_ssh = use_ssh;
        self
    }

    /// Sets the extra VCS arguments.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Enables or disables quiet VCS output.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Returns the backup root directory.
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Returns the directory name prefix.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Returns the directory name suffix.
    pub fn path_suffix(&self) -> &str {
        &self.path_suffix
    }

    /// Returns whether mirror mode is enabled.
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Returns whether cloning uses SSH.
    pub fn use_ssh(&self) -> bool {
        self.use_ssh
    }

    /// Arguments common to every clone, fetch and pull call.
    pub fn vcs_args(&self) -> Vec<String> {
        let mut args = self.extra_args.clone();
        if self.quiet {
            args.push(QUIET_FLAG.to_string());
        }
        args
    }

    /// Directory holding the local copy of `repo`.
    pub fn local_path(&self, repo: &Repository) -> PathBuf {
        self.backup_root
            .join(format!("{}{}{}", self.path_prefix, repo.name, self.path_suffix))
    }

    /// File whose presence means `repo` was backed up before.
    ///
    /// Mirrors are bare, so their `config` sits at the top level.
    pub fn marker_path(&self, repo: &Repository) -> PathBuf {
        let local_path = self.local_path(repo);
        if self.mirror {
            local_path.join("config")
        } else {
            local_path.join(".git").join("config")
        }
    }
}

/// Splits a space-delimited argument string into individual arguments.
pub fn split_git_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}
