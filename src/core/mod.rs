pub mod daemon;
pub mod project;
pub mod provisioning;
pub mod sync;

pub use crate::domain::model::{ChangeEvent, ChangeKind, Project, Service, ServiceId, WatchSignal};
pub use crate::domain::ports::{
    CommandOutput, CommandRunner, ProcessLauncher, ProjectApi, RepositoryCloner, ServiceStore,
    VersionControl,
};
pub use crate::utils::error::Result;
