use crate::domain::model::{ContainerId, ImageRef, PortSpec};
use crate::domain::ports::{CommandRunner, ProcessLauncher};
use crate::utils::error::{OrbitError, Result};
use async_trait::async_trait;

/// Launches service containers through the docker CLI (or a compatible one).
///
/// Runs `<binary> run -d -p <ports> <image> /bin/sh -c <keep_alive>` and
/// waits only for that command; the container keeps running afterwards.
pub struct DockerLauncher<R: CommandRunner> {
    runner: R,
    binary: String,
    keep_alive: String,
}

impl<R: CommandRunner> DockerLauncher<R> {
    pub fn new(runner: R, binary: impl Into<String>, keep_alive: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            keep_alive: keep_alive.into(),
        }
    }
}

#[async_trait]
impl<R: CommandRunner> ProcessLauncher for DockerLauncher<R> {
    async fn launch(&self, image: &ImageRef, ports: &PortSpec) -> Result<ContainerId> {
        let args = [
            "run",
            "-d",
            "-p",
            ports.as_str(),
            image.as_str(),
            "/bin/sh",
            "-c",
            self.keep_alive.as_str(),
        ];

        let output = self
            .runner
            .run(&self.binary, &args, None)
            .await
            .map_err(|e| OrbitError::LaunchFailed {
                diagnostic: format!("failed to run {}: {}", self.binary, e),
            })?;

        if !output.success() {
            tracing::warn!(
                image = %image,
                ports = %ports,
                status = %output.status_text(),
                "container runtime rejected launch"
            );
            return Err(OrbitError::LaunchFailed {
                diagnostic: output.diagnostic(),
            });
        }

        let container_id = ContainerId::from_output(&output.stdout).ok_or_else(|| {
            OrbitError::LaunchFailed {
                diagnostic: format!("{} run succeeded but printed no container id", self.binary),
            }
        })?;

        tracing::debug!(image = %image, container_id = %container_id, "container started");
        Ok(container_id)
    }
}
