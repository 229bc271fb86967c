// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling slot binding a build to a connected worker.

use crate::build::BuildId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a build queue record.
    pub struct QueueRecordId("bqr-");
}

/// Queue record owned by the external scheduler.
///
/// The engine only reads it and ends its lifecycle, either by destroying it
/// or marking it cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    pub id: QueueRecordId,
    pub build_id: BuildId,
    /// Name of the worker the build is assigned to.
    pub builder: String,
}

impl QueueRecord {
    pub fn new(build_id: BuildId, builder: impl Into<String>) -> Self {
        Self { id: QueueRecordId::new(), build_id, builder: builder.into() }
    }
}
