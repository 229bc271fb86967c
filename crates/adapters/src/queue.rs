// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle-terminating operations on scheduler queue records.

use async_trait::async_trait;
use bf_core::QueueRecord;
use thiserror::Error;

/// Errors from queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue record {0} no longer exists")]
    Gone(String),
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

/// The scheduler's build queue.
///
/// Records are owned by the scheduler; the engine only ends them.
#[async_trait]
pub trait BuildQueue: Clone + Send + Sync + 'static {
    /// Release the worker slot after a normal completion or failure.
    async fn destroy(&self, record: &QueueRecord) -> Result<(), QueueError>;

    /// Finalise an explicit cancellation.
    async fn mark_as_cancelled(&self, record: &QueueRecord) -> Result<(), QueueError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildQueue, QueueError};
    use async_trait::async_trait;
    use bf_core::{QueueRecord, QueueRecordId};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded queue call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum QueueCall {
        Destroy(QueueRecordId),
        MarkAsCancelled(QueueRecordId),
    }

    /// Fake build queue for testing
    #[derive(Clone, Default)]
    pub struct FakeBuildQueue {
        calls: Arc<Mutex<Vec<QueueCall>>>,
    }

    impl FakeBuildQueue {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<QueueCall> {
            self.calls.lock().clone()
        }

        pub fn destroyed(&self) -> usize {
            self.calls.lock().iter().filter(|c| matches!(c, QueueCall::Destroy(_))).count()
        }

        pub fn cancelled(&self) -> usize {
            self.calls.lock().iter().filter(|c| matches!(c, QueueCall::MarkAsCancelled(_))).count()
        }
    }

    #[async_trait]
    impl BuildQueue for FakeBuildQueue {
        async fn destroy(&self, record: &QueueRecord) -> Result<(), QueueError> {
            let mut calls = self.calls.lock();
            if calls.iter().any(|c| matches!(c, QueueCall::Destroy(id) if *id == record.id)) {
                return Err(QueueError::Gone(record.id.to_string()));
            }
            calls.push(QueueCall::Destroy(record.id.clone()));
            Ok(())
        }

        async fn mark_as_cancelled(&self, record: &QueueRecord) -> Result<(), QueueError> {
            self.calls.lock().push(QueueCall::MarkAsCancelled(record.id.clone()));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBuildQueue, QueueCall};

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
