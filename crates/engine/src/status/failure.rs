// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::engine::Engine;
use crate::error::StatusError;
use bf_adapters::{BuildQueue, BuildStore, ContentStore, NotifyAdapter, WorkerClient};
use bf_core::{Build, BuildStatus, Clock, QueueRecord, SlaveStatus};

impl<L, S, Q, N, C> Engine<L, S, Q, N, C>
where
    L: ContentStore,
    S: BuildStore,
    Q: BuildQueue,
    N: NotifyAdapter,
    C: Clock,
{
    /// Shared handling for PACKAGEFAIL, DEPFAIL and CHROOTFAIL.
    ///
    /// The status is committed before the log is fetched, and the queue
    /// record is only released once that commit has happened.
    pub(super) async fn handle_generic_failure<W: WorkerClient>(
        &self,
        build: &mut Build,
        queue_record: &QueueRecord,
        worker: &W,
        slave_status: &SlaveStatus,
        status: BuildStatus,
        notify: bool,
    ) -> Result<(), StatusError> {
        build.update_status(
            status,
            Some(&queue_record.builder),
            Some(slave_status),
            self.clock.epoch_ms(),
        );
        self.store.commit(build).await?;

        self.store_log(worker, build).await;
        if notify {
            self.send_notification(build, None).await;
        }

        self.queue.destroy(queue_record).await?;
        self.store.commit(build).await?;
        tracing::info!(build_id = %build.id, %status, "gathered failed build");
        Ok(())
    }

    /// Confirm a cancellation the scheduler asked for.
    pub(super) async fn handle_aborted(
        &self,
        build: &Build,
        queue_record: &QueueRecord,
    ) -> Result<(), StatusError> {
        if build.status != BuildStatus::Cancelling {
            return Err(StatusError::NotCancelling {
                build_id: build.id.clone(),
                status: build.status,
            });
        }
        self.queue.mark_as_cancelled(queue_record).await?;
        self.store.commit(build).await?;
        tracing::info!(build_id = %build.id, "build cancelled");
        Ok(())
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
