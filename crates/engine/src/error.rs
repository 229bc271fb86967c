// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by dispatch and status handling

use bf_adapters::{QueueError, StoreError, WorkerError};
use bf_core::{BuildId, BuildStatus, JobType, QueueRecordId};
use thiserror::Error;

/// Errors from a job-type composer
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("{expected} composer cannot handle a {actual}")]
    WrongJobType { expected: JobType, actual: JobType },
    #[error("{0}")]
    Invalid(String),
}

/// Errors that prevent a build from being started on a worker
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The build cannot run as configured; retrying will not help.
    #[error("cannot build: {0}")]
    CannotBuild(String),
    #[error("no composer registered for {0}")]
    NoComposer(JobType),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// Transport or worker-side failure.
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Errors raised while processing a worker's status report.
///
/// When one of these is returned the store has already been asked to
/// abort anything the handler left uncommitted.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("queue record {actual} does not own build {build_id} (build points at {expected:?})")]
    QueueRecordMismatch { build_id: BuildId, expected: Option<QueueRecordId>, actual: QueueRecordId },
    #[error("status report cookie {reported} does not match build cookie {expected}")]
    CorruptCookie { expected: String, reported: String },
    #[error("build {build_id} was aborted by its worker while {status}, not CANCELLING")]
    NotCancelling { build_id: BuildId, status: BuildStatus },
    #[error("builder {builder} reported BUILDERFAIL")]
    BuilderFail { builder: String },
    #[error("builder {builder} gave back build {build_id}")]
    GivenBack { builder: String, build_id: BuildId },
    #[error("illegal build: {0}")]
    IllegalBuild(String),
    #[error("no composer registered for {0}")]
    NoComposer(JobType),
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("upload directory error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatusError {
    /// The scheduler should put the build back in the queue.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatusError::GivenBack { .. })
    }

    /// The worker itself misbehaved and should be looked at.
    pub fn is_builder_fault(&self) -> bool {
        matches!(self, StatusError::BuilderFail { .. } | StatusError::Worker(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
