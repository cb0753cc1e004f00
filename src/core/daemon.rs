use crate::core::sync::{SyncOutcome, SyncPipeline};
use crate::core::VersionControl;
use crate::domain::model::WatchSignal;
use crate::utils::error::Result;
use std::future::Future;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonReport {
    pub events: u64,
    pub cycles: u64,
    pub delivery_errors: u64,
}

/// Single consumer of watcher signals. Each signal is handled to completion
/// before the next one is read, so sync cycles never overlap.
pub struct SyncDaemon<V: VersionControl> {
    pipeline: SyncPipeline<V>,
}

impl<V: VersionControl> SyncDaemon<V> {
    pub fn new(pipeline: SyncPipeline<V>) -> Self {
        Self { pipeline }
    }

    /// Runs until the signal channel closes or `shutdown` resolves.
    ///
    /// Delivery errors are logged and skipped. A failed sync ends the loop
    /// with [`crate::OrbitError::SyncFailed`].
    pub async fn run<F>(
        mut self,
        mut signals: UnboundedReceiver<WatchSignal>,
        shutdown: F,
    ) -> Result<DaemonReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut report = DaemonReport::default();

        loop {
            let signal = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, stopping daemon");
                    break;
                }
                signal = signals.recv() => signal,
            };

            match signal {
                Some(WatchSignal::Change(event)) => {
                    report.events += 1;
                    if let SyncOutcome::Synced { .. } = self.pipeline.handle(&event).await? {
                        report.cycles = self.pipeline.cycles_completed();
                    }
                }
                Some(WatchSignal::Error(message)) => {
                    report.delivery_errors += 1;
                    tracing::warn!(error = %message, "watcher error");
                }
                None => {
                    tracing::info!("watcher closed, stopping daemon");
                    break;
                }
            }
        }

        Ok(report)
    }
}
