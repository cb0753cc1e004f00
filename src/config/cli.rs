use crate::config::{OrbitConfig, SyncPolicy, DEFAULT_BASE_URL};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "orbit")]
#[command(about = "orbit puts your development environment in the cloud.")]
pub struct Cli {
    /// Base URL of orbit
    #[arg(long, env = "ORBIT_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub url: String,

    /// Git executable used for syncing and cloning
    #[arg(long, env = "ORBIT_GIT", default_value = "git", global = true)]
    pub git_bin: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the orbit daemon that watches for and acts on file changes
    Daemon(DaemonArgs),

    /// Create a new project on orbit
    CreateProject {
        /// Name of the project and of the directory it is cloned into
        name: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DaemonArgs {
    /// Times a failing sync step is retried before the daemon gives up
    #[arg(long, default_value_t = 0)]
    pub sync_retries: u32,

    /// Delay before the first retry, in milliseconds; grows linearly
    #[arg(long, default_value_t = 2000)]
    pub sync_backoff_ms: u64,
}

impl DaemonArgs {
    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy::new(self.sync_retries, Duration::from_millis(self.sync_backoff_ms))
    }
}

impl Cli {
    pub fn orbit_config(&self) -> Result<OrbitConfig> {
        OrbitConfig::from_base_url(&self.url)
    }
}

impl Validate for Cli {
    fn validate(&self) -> Result<()> {
        self.orbit_config()?;
        validate_non_empty_string("git_bin", &self.git_bin)?;
        if let Command::CreateProject { name } = &self.command {
            validate_non_empty_string("name", name)?;
        }
        Ok(())
    }
}
