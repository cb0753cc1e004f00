use crate::config::OrbitConfig;
use crate::core::{ProjectApi, RepositoryCloner};
use crate::utils::error::{OrbitError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path};
use std::path::PathBuf;

/// Creates a project on the orbit server and clones it next to the caller.
pub struct ProjectProvisioner<'a, A: ProjectApi, C: RepositoryCloner> {
    config: &'a OrbitConfig,
    api: A,
    cloner: C,
}

impl<'a, A: ProjectApi, C: RepositoryCloner> ProjectProvisioner<'a, A, C> {
    pub fn new(config: &'a OrbitConfig, api: A, cloner: C) -> Self {
        Self { config, api, cloner }
    }

    /// Returns the local directory the project was cloned into.
    pub async fn create_project(&self, name: &str) -> Result<PathBuf> {
        validate_non_empty_string("name", name)?;
        validate_path("name", name)?;

        let project = self.api.create_project().await.map_err(|e| match e {
            e @ OrbitError::RemoteCreateFailed { .. } => e,
            other => OrbitError::RemoteCreateFailed {
                message: other.to_string(),
            },
        })?;
        tracing::info!(project_id = project.id, git_path = %project.git_path, "project created remotely");

        let clone_url = match self.config.clone_url(&project.git_path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(
                    project_id = project.id,
                    git_path = %project.git_path,
                    error = %e,
                    "orphaned project: created remotely but its gitPath is unusable"
                );
                return Err(OrbitError::RemoteCreateFailed {
                    message: format!("server returned an unusable gitPath: {}", e),
                });
            }
        };

        let destination = PathBuf::from(name);
        tracing::debug!(url = %clone_url, destination = %destination.display(), "cloning project");

        if let Err(e) = self.cloner.clone_repository(&clone_url, &destination).await {
            tracing::error!(
                project_id = project.id,
                url = %clone_url,
                error = %e,
                "orphaned project: created remotely but the local clone failed"
            );
            return Err(match e {
                e @ OrbitError::CloneFailed { .. } => e,
                other => OrbitError::CloneFailed {
                    url: clone_url.to_string(),
                    diagnostic: other.to_string(),
                },
            });
        }

        Ok(destination)
    }
}
