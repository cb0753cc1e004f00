//! Filesystem change source for the sync daemon.
//!
//! `ChangeWatcher` moves through `Idle -> Watching -> Stopped` and cannot be
//! restarted. While watching, the notify backend thread is the only producer
//! on an unbounded channel; the daemon loop is the only consumer.

use crate::domain::model::{ChangeEvent, ChangeKind, WatchSignal};
use crate::utils::error::{OrbitError, Result};
use notify::event::{EventKind, ModifyKind};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
    Stopped,
}

pub struct ChangeWatcher {
    root: PathBuf,
    state: WatchState,
    watcher: Option<RecommendedWatcher>,
}

impl ChangeWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: WatchState::Idle,
            watcher: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Subscribes to the root recursively and returns the signal stream.
    ///
    /// Fails with [`OrbitError::WatchSetupFailed`] when the watcher was
    /// already started once, leaving its state untouched, or when the
    /// subscription cannot be made, which moves it to `Stopped`.
    pub fn start(&mut self) -> Result<UnboundedReceiver<WatchSignal>> {
        if self.state != WatchState::Idle {
            return Err(self.setup_error("watcher was already started"));
        }

        let (tx, rx) = unbounded_channel();
        let handler = move |res: notify::Result<Event>| {
            let signal = match res {
                Ok(event) => match classify(&event) {
                    Some(change) => WatchSignal::Change(change),
                    None => return,
                },
                Err(e) => WatchSignal::Error(e.to_string()),
            };
            // The receiver is gone once the daemon stopped; nothing left to do.
            let _ = tx.send(signal);
        };

        let subscribed = notify::recommended_watcher(handler).and_then(|mut watcher| {
            watcher.watch(&self.root, RecursiveMode::Recursive)?;
            Ok(watcher)
        });

        match subscribed {
            Ok(watcher) => {
                self.watcher = Some(watcher);
                self.state = WatchState::Watching;
                tracing::info!(root = %self.root.display(), "watching for changes");
                Ok(rx)
            }
            Err(e) => {
                self.state = WatchState::Stopped;
                Err(self.setup_error(&e.to_string()))
            }
        }
    }

    /// Drops the subscription. The signal channel closes once the backend
    /// has released its sender.
    pub fn stop(&mut self) {
        if self.watcher.take().is_some() {
            tracing::debug!(root = %self.root.display(), "watcher stopped");
        }
        self.state = WatchState::Stopped;
    }

    fn setup_error(&self, message: &str) -> OrbitError {
        OrbitError::WatchSetupFailed {
            path: self.root.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Converts a backend event into a change event, dropping events that only
/// touch git's own metadata so a commit does not trigger another sync.
pub fn classify(event: &Event) -> Option<ChangeEvent> {
    let paths: Vec<PathBuf> = event
        .paths
        .iter()
        .filter(|path| !is_git_internal(path))
        .cloned()
        .collect();

    if paths.is_empty() && !event.paths.is_empty() {
        return None;
    }

    Some(ChangeEvent::new(change_kind(&event.kind), paths))
}

fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::Write
        }
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Metadata,
        EventKind::Modify(ModifyKind::Other) => ChangeKind::Other,
        EventKind::Create(_) => ChangeKind::Create,
        EventKind::Remove(_) => ChangeKind::Remove,
        EventKind::Access(_) => ChangeKind::Access,
        EventKind::Any | EventKind::Other => ChangeKind::Other,
    }
}

fn is_git_internal(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == ".git"))
}
