pub mod cli;
pub mod server;

use crate::utils::error::{OrbitError, Result};
use crate::utils::validation::validate_url;
use std::time::Duration;
use url::Url;

pub use cli::Cli;
pub use server::ServerConfig;

pub const DEFAULT_BASE_URL: &str = "http://mew.hackedu.us:4000";

/// Client-side configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitConfig {
    base_url: Url,
    api_root: Url,
    git_root: Url,
}

impl OrbitConfig {
    pub fn from_base_url(raw: &str) -> Result<Self> {
        let base_url = validate_url("url", raw)?;
        let resolve = |path: &str| {
            base_url
                .join(path)
                .map_err(|e| OrbitError::InvalidConfigValueError {
                    field: "url".to_string(),
                    value: raw.to_string(),
                    reason: format!("cannot resolve {}: {}", path, e),
                })
        };
        let api_root = resolve("/api/")?;
        let git_root = resolve("/git/")?;

        Ok(Self {
            base_url,
            api_root,
            git_root,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/api/`, the root every API path is resolved against.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub fn git_root(&self) -> &Url {
        &self.git_root
    }

    pub fn api_url(&self, path: &str) -> Result<Url> {
        self.api_root
            .join(path)
            .map_err(|e| OrbitError::ConfigValidationError {
                field: "api path".to_string(),
                message: format!("cannot resolve {:?}: {}", path, e),
            })
    }

    /// Resolves a project's `gitPath` against `<base>/git/` using URL
    /// reference rules, so an absolute path replaces the `/git/` prefix.
    pub fn clone_url(&self, git_path: &str) -> Result<Url> {
        if git_path.trim().is_empty() {
            return Err(OrbitError::ConfigValidationError {
                field: "gitPath".to_string(),
                message: "gitPath is empty".to_string(),
            });
        }
        self.git_root
            .join(git_path)
            .map_err(|e| OrbitError::ConfigValidationError {
                field: "gitPath".to_string(),
                message: format!("cannot resolve {:?}: {}", git_path, e),
            })
    }
}

/// How hard the sync loop tries before giving up on a step.
///
/// The default is fail-fast: no retries, the first failing step stops the
/// daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub max_retries: u32,
    /// Delay before the first retry; later retries wait a multiple of it.
    pub backoff: Duration,
}

impl SyncPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Wait before retry number `attempt` (1-based). Saturates instead of
    /// overflowing for very large backoffs.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::new(0, Duration::from_secs(2))
    }
}
