// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use bf_core::Build;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for telling interested people about a build's outcome
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Announce the build's current status, with optional extra detail
    async fn notify(&self, build: &Build, extra_info: Option<&str>) -> Result<(), NotifyError>;
}

/// Notification adapter that only writes to the tracing log.
///
/// Mail delivery is handled elsewhere; this keeps a record of every
/// notification the engine decided to send.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifyAdapter;

#[async_trait]
impl NotifyAdapter for TracingNotifyAdapter {
    async fn notify(&self, build: &Build, extra_info: Option<&str>) -> Result<(), NotifyError> {
        tracing::info!(
            build_id = %build.id,
            status = %build.status,
            extra_info = extra_info.unwrap_or(""),
            "build notification: {}",
            build.title()
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use bf_core::{Build, BuildId, BuildStatus};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded notification
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NotifyCall {
        pub build_id: BuildId,
        pub status: BuildStatus,
        pub extra_info: Option<String>,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        calls: Arc<Mutex<Vec<NotifyCall>>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded notifications
        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, build: &Build, extra_info: Option<&str>) -> Result<(), NotifyError> {
            self.calls.lock().push(NotifyCall {
                build_id: build.id.clone(),
                status: build.status,
                extra_info: extra_info.map(str::to_string),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
