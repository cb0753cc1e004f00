use crate::domain::model::{ContainerId, ImageRef, PortSpec, Project, Service, ServiceDraft, ServiceId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// Captured result of an external command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "termination by signal".to_string(),
        }
    }

    /// Whatever the process printed about its failure, stderr first.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        self.status_text()
    }
}

/// Runs an external program and waits for it to exit.
///
/// `Err` means the program could not be started at all (missing binary,
/// permission denied); a non-zero exit is reported through [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> std::io::Result<CommandOutput>;
}

#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Starts a detached, long-running instance of `image` with `ports` bound.
    async fn launch(&self, image: &ImageRef, ports: &PortSpec) -> Result<ContainerId>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Persists a launched service and assigns its id.
    async fn insert(&self, draft: ServiceDraft) -> Result<Service>;

    async fn get(&self, id: ServiceId) -> Result<Option<Service>>;
}

/// The three operations of a sync cycle against one working tree.
#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn stage_all(&self) -> Result<()>;
    async fn commit(&self) -> Result<()>;
    async fn push(&self) -> Result<()>;
}

#[async_trait]
pub trait RepositoryCloner: Send + Sync {
    async fn clone_repository(&self, url: &Url, destination: &Path) -> Result<()>;
}

#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn create_project(&self) -> Result<Project>;
}
