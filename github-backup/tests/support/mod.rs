//! Recording fakes for the forge and VCS adapters.

#![allow(dead_code)]

use github_backup::{Forge, ForgeError, GitError, OwnerInfo, Repository, Vcs};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Ordered log shared between fakes, to check cross-adapter ordering.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// A VCS call as seen by [`RecordingVcs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clone {
        source: String,
        dest: PathBuf,
        args: Vec<String>,
    },
    Fetch {
        dest: PathBuf,
        args: Vec<String>,
    },
    Pull {
        dest: PathBuf,
        args: Vec<String>,
    },
    SetConfig {
        dest: PathBuf,
        key: String,
        value: String,
    },
}

/// Fake [`Vcs`] that records calls and fails on request.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<Call>>,
    markers: Mutex<HashSet<PathBuf>>,
    unreadable_markers: HashSet<PathBuf>,
    clone_exit_code: Option<i32>,
    update_exit_code: Option<i32>,
    failing_keys: HashSet<String>,
    panicking_dests: HashSet<PathBuf>,
    clone_leaves_marker: bool,
    journal: Option<Journal>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self {
            clone_leaves_marker: true,
            ..Default::default()
        }
    }

    /// Pretends a previous run left `marker` behind.
    pub fn with_marker(self, marker: PathBuf) -> Self {
        self.markers.lock().unwrap().insert(marker);
        self
    }

    /// Makes the existence check for `marker` fail.
    pub fn with_unreadable_marker(mut self, marker: PathBuf) -> Self {
        self.unreadable_markers.insert(marker);
        self
    }

    pub fn failing_clone(mut self, exit_code: i32) -> Self {
        self.clone_exit_code = Some(exit_code);
        self
    }

    pub fn failing_update(mut self, exit_code: i32) -> Self {
        self.update_exit_code = Some(exit_code);
        self
    }

    pub fn failing_key(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Panics when cloning or updating into `dest`.
    pub fn panicking_for(mut self, dest: PathBuf) -> Self {
        self.panicking_dests.insert(dest);
        self
    }

    /// Clones succeed without creating the marker file.
    pub fn clone_without_marker(mut self) -> Self {
        self.clone_leaves_marker = false;
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clone_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Clone { .. }))
    }

    pub fn update_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Fetch { .. } | Call::Pull { .. }))
    }

    pub fn config_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SetConfig { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: Call) {
        if let Some(journal) = &self.journal {
            let entry = match &call {
                Call::Clone { dest, .. } => format!("clone {}", dest.display()),
                Call::Fetch { dest, .. } => format!("fetch {}", dest.display()),
                Call::Pull { dest, .. } => format!("pull {}", dest.display()),
                Call::SetConfig { key, .. } => format!("config {key}"),
            };
            journal.lock().unwrap().push(entry);
        }
        self.calls.lock().unwrap().push(call);
    }

    fn maybe_panic(&self, dest: &Path) {
        if self.panicking_dests.contains(dest) {
            panic!("simulated adapter bug for {}", dest.display());
        }
    }
}

fn failure(command: String, exit_code: i32) -> GitError {
    GitError::Failed {
        command,
        exit_code: Some(exit_code),
        output: "fatal: simulated failure\n".to_string(),
    }
}

impl Vcs for RecordingVcs {
    async fn local_copy_exists(&self, marker: &Path) -> io::Result<bool> {
        if self.unreadable_markers.contains(marker) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        Ok(self.markers.lock().unwrap().contains(marker))
    }

    async fn clone_repository(
        &self,
        source: &str,
        dest: &Path,
        args: &[String],
    ) -> Result<(), GitError> {
        self.record(Call::Clone {
            source: source.to_string(),
            dest: dest.to_path_buf(),
            args: args.to_vec(),
        });
        self.maybe_panic(dest);

        if let Some(code) = self.clone_exit_code {
            return Err(failure(format!("git clone {source}"), code));
        }

        if self.clone_leaves_marker {
            let marker = if args.iter().any(|arg| arg == "--mirror") {
                dest.join("config")
            } else {
                dest.join(".git").join("config")
            };
            self.markers.lock().unwrap().insert(marker);
        }
        Ok(())
    }

    async fn update_mirror(&self, dest: &Path, args: &[String]) -> Result<(), GitError> {
        self.record(Call::Fetch {
            dest: dest.to_path_buf(),
            args: args.to_vec(),
        });
        self.maybe_panic(dest);

        match self.update_exit_code {
            Some(code) => Err(failure("git fetch".to_string(), code)),
            None => Ok(()),
        }
    }

    async fn update_working_copy(&self, dest: &Path, args: &[String]) -> Result<(), GitError> {
        self.record(Call::Pull {
            dest: dest.to_path_buf(),
            args: args.to_vec(),
        });
        self.maybe_panic(dest);

        match self.update_exit_code {
            Some(code) => Err(failure("git pull".to_string(), code)),
            None => Ok(()),
        }
    }

    async fn set_config(&self, dest: &Path, key: &str, value: &str) -> Result<(), GitError> {
        self.record(Call::SetConfig {
            dest: dest.to_path_buf(),
            key: key.to_string(),
            value: value.to_string(),
        });

        if self.failing_keys.contains(key) {
            return Err(failure(format!("git config --local {key}"), 1));
        }
        Ok(())
    }
}

/// Fake [`Forge`] serving a fixed repository list.
#[derive(Debug, Default)]
pub struct FakeForge {
    pub repositories: Vec<Repository>,
    pub owners: HashMap<String, OwnerInfo>,
    pub fail_listing: bool,
    pub journal: Option<Journal>,
    pub listed: Mutex<Vec<(String, bool)>>,
}

impl Forge for FakeForge {
    async fn list_repositories(
        &self,
        owner: &str,
        is_organization: bool,
    ) -> Result<Vec<Repository>, ForgeError> {
        self.listed
            .lock()
            .unwrap()
            .push((owner.to_string(), is_organization));
        if self.fail_listing {
            return Err(ForgeError::IncompleteRepository {
                repository: format!("{owner}/broken"),
                field: "clone_url",
            });
        }
        Ok(self.repositories.clone())
    }

    async fn resolve_user(&self, login: &str) -> Result<OwnerInfo, ForgeError> {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(format!("resolve {login}"));
        }
        Ok(self
            .owners
            .get(login)
            .cloned()
            .unwrap_or_else(|| OwnerInfo::from_profile(login, None, None)))
    }
}

/// Builds a repository descriptor with GitHub-style URLs.
pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        git_url: format!("git://github.com/{owner}/{name}.git"),
        ssh_url: format!("git@github.com:{owner}/{name}.git"),
        clone_url: format!("https://github.com/{owner}/{name}.git"),
        description: Some(format!("The {name} project")),
        default_branch: "main".to_string(),
        owner_login: owner.to_string(),
    }
}

pub fn owner(name: &str, email: &str) -> OwnerInfo {
    OwnerInfo::from_profile(name, Some(name.to_string()), Some(email.to_string()))
}
