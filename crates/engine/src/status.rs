// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status dispatcher: route a worker's report to its handler.

mod failure;
mod ok;

use crate::engine::Engine;
use crate::error::StatusError;
use bf_adapters::{BuildQueue, BuildStore, ContentStore, NotifyAdapter, WorkerClient};
use bf_core::{Build, BuildStatus, Clock, QueueRecord, SlaveStatus, WorkerStatus};

impl<L, S, Q, N, C> Engine<L, S, Q, N, C>
where
    L: ContentStore,
    S: BuildStore,
    Q: BuildQueue,
    N: NotifyAdapter,
    C: Clock,
{
    /// Process the status `status_name` reported for `build`.
    ///
    /// `queue_record` must be the record the build currently points at.
    /// Unknown status names are logged and dropped. On any handler error the
    /// store is asked to abort before the error is returned.
    pub async fn handle_status<W: WorkerClient>(
        &self,
        build: &mut Build,
        queue_record: &QueueRecord,
        worker: &W,
        status_name: &str,
        slave_status: &SlaveStatus,
    ) -> Result<(), StatusError> {
        check_ownership(build, queue_record, slave_status)?;

        let Some(status) = WorkerStatus::parse(status_name) else {
            tracing::error!(
                critical = true,
                build_id = %build.id,
                builder = %queue_record.builder,
                status = status_name,
                "unhandled build status; dropping report"
            );
            return Ok(());
        };
        let notify = status.allows_notification();
        tracing::info!(
            build_id = %build.id,
            cookie = %build.build_cookie,
            builder = %queue_record.builder,
            %status,
            "processing finished {}",
            build.title()
        );

        let result = match status {
            WorkerStatus::Ok => self.handle_ok(build, queue_record, worker, slave_status, notify).await,
            WorkerStatus::PackageFail => {
                self.handle_generic_failure(
                    build,
                    queue_record,
                    worker,
                    slave_status,
                    BuildStatus::FailedToBuild,
                    notify,
                )
                .await
            }
            WorkerStatus::DepFail => {
                self.handle_generic_failure(
                    build,
                    queue_record,
                    worker,
                    slave_status,
                    BuildStatus::ManualDepWait,
                    notify,
                )
                .await
            }
            WorkerStatus::ChrootFail => {
                self.handle_generic_failure(
                    build,
                    queue_record,
                    worker,
                    slave_status,
                    BuildStatus::ChrootWait,
                    notify,
                )
                .await
            }
            WorkerStatus::BuilderFail => {
                Err(StatusError::BuilderFail { builder: queue_record.builder.clone() })
            }
            WorkerStatus::Aborted => self.handle_aborted(build, queue_record).await,
            WorkerStatus::GivenBack => Err(StatusError::GivenBack {
                builder: queue_record.builder.clone(),
                build_id: build.id.clone(),
            }),
        };

        if let Err(e) = &result {
            tracing::warn!(build_id = %build.id, %status, error = %e, "status handling failed");
            self.store.abort(&build.id).await;
        }
        result
    }
}

/// The report must come through the build's own queue record and, when it
/// names a cookie, the build's own cookie.
fn check_ownership(
    build: &Build,
    queue_record: &QueueRecord,
    slave_status: &SlaveStatus,
) -> Result<(), StatusError> {
    if queue_record.build_id != build.id || build.queue_record.as_ref() != Some(&queue_record.id) {
        return Err(StatusError::QueueRecordMismatch {
            build_id: build.id.clone(),
            expected: build.queue_record.clone(),
            actual: queue_record.id.clone(),
        });
    }
    match &slave_status.build_cookie {
        Some(reported) if *reported != build.build_cookie => Err(StatusError::CorruptCookie {
            expected: build.build_cookie.clone(),
            reported: reported.clone(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
