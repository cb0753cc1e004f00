// Adapters layer: concrete implementations of the domain ports for external
// systems (container runtime, git, orbit HTTP API, record storage, filesystem events).

pub mod command;
pub mod docker;
pub mod git;
pub mod http;
pub mod store;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

pub use command::TokioCommandRunner;
pub use docker::DockerLauncher;
pub use git::GitCli;
pub use http::HttpProjectApi;
pub use store::{InMemoryServiceStore, JsonFileServiceStore};
pub use watcher::{ChangeWatcher, WatchState};
