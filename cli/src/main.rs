//! CLI for github-backup.
//!
//! Backs up every repository of a GitHub user or organization into a local
//! directory, cloning new repositories and updating existing copies.

use clap::{Parser, ValueEnum};
use github_backup::{
    split_git_args, Credentials, RunConfig, RunSummary, Runner, RunnerConfig, RunnerError,
    Settings,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Makes a backup of all of a GitHub user's repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A GitHub username.
    username: String,

    /// The folder where you want your backups to go.
    backupdir: Option<PathBuf>,

    /// Use this when running from a cron job.
    #[arg(short, long)]
    cron: bool,

    /// Create a bare mirror.
    #[arg(short, long, overrides_with = "no_mirror")]
    mirror: bool,

    /// Create working copies, even if the settings file enables mirrors.
    #[arg(long, overrides_with = "mirror")]
    no_mirror: bool,

    /// Pass extra arguments to git.
    #[arg(short = 'g', long = "git-args", value_name = "ARGS", allow_hyphen_values = true)]
    git_args: Option<String>,

    /// Add suffix to repository directory names.
    #[arg(short, long)]
    suffix: Option<String>,

    /// Add prefix to repository directory names.
    #[arg(short = 'P', long)]
    prefix: Option<String>,

    /// Authenticate with the GitHub API using a password.
    #[arg(short, long, env = "GITHUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Authenticate with the GitHub API using an OAuth token (wins over --password).
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Back up an organization's repositories.
    #[arg(short, long)]
    organization: Option<String>,

    /// Use the SSH protocol.
    #[arg(short = 'S', long, overrides_with = "no_ssh")]
    ssh: bool,

    /// Use HTTPS, even if the settings file enables SSH.
    #[arg(long, overrides_with = "ssh")]
    no_ssh: bool,

    /// Log level.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// GitHub API base URL, for GitHub Enterprise.
    #[arg(long)]
    api_url: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Accepted values for `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    /// Level actually used, capped at warn for cron runs.
    fn effective(self, cron: bool) -> Self {
        if cron {
            self.max(Self::Warn)
        } else {
            self
        }
    }

    /// Filter directive for this level. `critical` maps to `error`.
    fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_level.effective(args.cron));

    // Both rustls providers end up in the dependency graph; pick one.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let (cron, json) = (args.cron, args.json);

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            if json {
                print_json_summary(&summary);
            } else if !cron || summary.has_failures() {
                print_summary(&summary);
            }

            ExitCode::from(exit_status(&summary))
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Exit status for a completed run: 0 when clean, 1 when any repository failed.
fn exit_status(summary: &RunSummary) -> u8 {
    if summary.all_success() {
        0
    } else {
        1
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var, falling back to `level`
fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.directive())),
        )
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = build_config(args)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Merges command-line arguments over the optional settings file.
fn build_config(args: Args) -> Result<RunnerConfig, RunnerError> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let backup_dir = args
        .backupdir
        .or(settings.backup_dir)
        .ok_or(RunnerError::MissingBackupDir)?;

    let extra_args = match &args.git_args {
        Some(git_args) => split_git_args(git_args),
        None => settings.git_args,
    };

    let run = RunConfig::new(backup_dir)
        .with_prefix(args.prefix.or(settings.prefix).unwrap_or_default())
        .with_suffix(args.suffix.or(settings.suffix).unwrap_or_default())
        .with_mirror(switch(args.mirror, args.no_mirror, settings.mirror))
        .with_ssh(switch(args.ssh, args.no_ssh, settings.ssh))
        .with_extra_args(extra_args)
        .with_quiet(args.cron);

    let credentials = Credentials::select(&args.username, args.password, args.token);

    Ok(RunnerConfig::new(args.username, run)
        .with_organization(args.organization.or(settings.organization))
        .with_credentials(credentials)
        .with_api_url(args.api_url.or(settings.api_url)))
}

/// Resolves an on/off flag pair over a settings value; off by default.
fn switch(on: bool, off: bool, setting: Option<bool>) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        setting.unwrap_or(false)
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Repositories discovered: {}",
        summary.repositories_discovered
    );
    println!("  Cloned: {}", summary.cloned);
    println!("  Updated: {}", summary.updated);
    println!("  Clone failures: {}", summary.clone_failures);
    println!("  Update failures: {}", summary.update_failures);
    println!("  Metadata failures: {}", summary.metadata_failures);
    println!("  Unexpected errors: {}", summary.unexpected_errors);

    for failure in summary.failures() {
        println!("  [{}] {}", failure.outcome.as_str(), failure.repository);
        for line in failure.detail.lines().take(10) {
            println!("    {line}");
        }
    }
}

/// Prints the run summary as JSON.
fn print_json_summary(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to serialize summary"),
    }
}
