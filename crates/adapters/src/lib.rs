// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bf-adapters: Seams to the systems the build-farm engine talks to

pub mod librarian;
pub mod notify;
pub mod queue;
pub mod store;
pub mod worker;

pub use librarian::{ContentStore, ContentStoreError, FsContentStore, StoredFile, StoredMeta};
pub use notify::{NotifyAdapter, NotifyError, TracingNotifyAdapter};
pub use queue::{BuildQueue, QueueError};
pub use store::{BuildStore, JsonBuildStore, StoreError};
pub use worker::{BuildStarted, Credentials, StartBuild, WorkerClient, WorkerError};

#[cfg(any(test, feature = "test-support"))]
pub use librarian::{FakeContentStore, StoreCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use queue::{FakeBuildQueue, QueueCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::FakeBuildStore;
#[cfg(any(test, feature = "test-support"))]
pub use worker::{FakeWorker, WorkerCall};
