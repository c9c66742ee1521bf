//! Run configuration and the optional settings file.
//!
//! [`RunConfig`] holds everything the reconciler needs to place and update
//! local copies. [`Settings`] is the on-disk TOML form the CLI merges with
//! its own flags.

mod error;
mod run_config;
mod settings;

pub use error::SettingsError;
pub use run_config::{split_git_args, RunConfig};
pub use settings::Settings;
