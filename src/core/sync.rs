use crate::config::SyncPolicy;
use crate::core::VersionControl;
use crate::domain::model::ChangeEvent;
use crate::utils::error::{OrbitError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Stage,
    Commit,
    Push,
}

impl SyncStep {
    pub const CYCLE: [SyncStep; 3] = [SyncStep::Stage, SyncStep::Commit, SyncStep::Push];
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Stage => "stage",
            SyncStep::Commit => "commit",
            SyncStep::Push => "push",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The event was not write-class; nothing ran.
    Skipped,
    /// A full stage-commit-push cycle completed.
    Synced { cycle: u64 },
}

/// Pushes the working tree to its remote after every write event.
///
/// Cycles run one at a time in event order. There is no coalescing: each
/// write event gets its own stage, commit and push.
pub struct SyncPipeline<V: VersionControl> {
    vcs: V,
    policy: SyncPolicy,
    cycles: u64,
}

impl<V: VersionControl> SyncPipeline<V> {
    pub fn new(vcs: V, policy: SyncPolicy) -> Self {
        Self {
            vcs,
            policy,
            cycles: 0,
        }
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles
    }

    pub async fn handle(&mut self, event: &ChangeEvent) -> Result<SyncOutcome> {
        if !event.is_write() {
            tracing::trace!(kind = ?event.kind, paths = ?event.paths, "ignoring non-write event");
            return Ok(SyncOutcome::Skipped);
        }

        tracing::debug!(paths = ?event.paths, "write detected, syncing");
        let cycle = self.sync_cycle().await?;
        Ok(SyncOutcome::Synced { cycle })
    }

    /// Runs stage, commit and push in order, stopping at the first step that
    /// still fails once the retry policy is exhausted.
    pub async fn sync_cycle(&mut self) -> Result<u64> {
        for step in SyncStep::CYCLE {
            self.run_step(step).await?;
        }

        self.cycles += 1;
        tracing::info!(cycle = self.cycles, "changes committed and pushed");
        Ok(self.cycles)
    }

    async fn run_step(&self, step: SyncStep) -> Result<()> {
        let mut attempt: u32 = 0;
        loop {
            let result = match step {
                SyncStep::Stage => self.vcs.stage_all().await,
                SyncStep::Commit => self.vcs.commit().await,
                SyncStep::Push => self.vcs.push().await,
            };

            let err = match result {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            if attempt >= self.policy.max_retries {
                tracing::error!(%step, attempts = attempt + 1, error = %err, "sync step failed");
                return Err(OrbitError::SyncFailed {
                    step: step.to_string(),
                    diagnostic: err.to_string(),
                });
            }

            attempt += 1;
            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                %step,
                attempt,
                max_retries = self.policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "sync step failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
