// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bf-core: Domain types for the build-farm dispatch engine

pub mod macros;

pub mod archive;
pub mod build;
pub mod clock;
pub mod id;
pub mod queue;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use archive::{
    Archive, ArchivePurpose, ContentId, DistroArchSeries, LibraryFile, Pocket, SeriesStatus,
};
pub use build::{
    Build, BuildId, BuildStatus, JobPayload, JobType, PublicationStatus, RecipeSpec,
    SourcePackageRelease,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use queue::{QueueRecord, QueueRecordId};
pub use status::{SlaveStatus, WorkerStatus};
