pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{Cli, OrbitConfig, ServerConfig, SyncPolicy};
pub use core::{
    daemon::SyncDaemon, project::ProjectProvisioner, provisioning::ProvisioningService,
    sync::SyncPipeline,
};
pub use domain::model::{ChangeEvent, ChangeKind, NewService, Project, Service, ServiceId, WatchSignal};
pub use utils::error::{OrbitError, Result};
