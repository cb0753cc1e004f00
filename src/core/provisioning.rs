use crate::core::{ProcessLauncher, ServiceStore};
use crate::domain::model::{ImageRef, NewService, PortSpec, Service, ServiceDraft, ServiceId};
use crate::utils::error::{OrbitError, Result};

/// Turns service requests into running containers with a stored record.
pub struct ProvisioningService<L: ProcessLauncher, S: ServiceStore> {
    launcher: L,
    store: S,
}

impl<L: ProcessLauncher, S: ServiceStore> ProvisioningService<L, S> {
    pub fn new(launcher: L, store: S) -> Self {
        Self { launcher, store }
    }

    /// Validates the request, launches the container, then records it.
    ///
    /// A record is only written once the launch produced a container id, so a
    /// failed launch leaves nothing behind. A store failure after the launch
    /// is reported as [`OrbitError::PersistenceFailed`] and the container is
    /// left running for an operator to reconcile.
    pub async fn create(&self, request: NewService) -> Result<Service> {
        let image = ImageRef::parse(&request.image)?;
        let port_exposed = PortSpec::parse(&request.port_exposed)?;

        tracing::debug!(image = %image, ports = %port_exposed, "launching service container");
        let container_id = self.launcher.launch(&image, &port_exposed).await?;

        let draft = ServiceDraft {
            image,
            port_exposed,
            container_id: container_id.clone(),
        };

        match self.store.insert(draft).await {
            Ok(service) => {
                tracing::info!(
                    id = %service.id,
                    image = %service.image,
                    container_id = %service.container_id,
                    "service provisioned"
                );
                Ok(service)
            }
            Err(e) => {
                tracing::error!(
                    container_id = %container_id,
                    error = %e,
                    "orphaned container: launched but service record was not persisted"
                );
                Err(OrbitError::PersistenceFailed {
                    container_id: container_id.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    pub async fn get(&self, id: ServiceId) -> Result<Service> {
        self.store
            .get(id)
            .await?
            .ok_or(OrbitError::NotFound { id: id.get() })
    }
}
