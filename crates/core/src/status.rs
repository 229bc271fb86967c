// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome reports sent back by build workers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The closed set of build outcomes a worker can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "PACKAGEFAIL")]
    PackageFail,
    #[serde(rename = "DEPFAIL")]
    DepFail,
    #[serde(rename = "CHROOTFAIL")]
    ChrootFail,
    #[serde(rename = "BUILDERFAIL")]
    BuilderFail,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(rename = "GIVENBACK")]
    GivenBack,
}

impl WorkerStatus {
    /// Enum qualifier some workers prepend, e.g. `BuildStatus.OK`.
    pub const QUALIFIER: &'static str = "BuildStatus.";

    pub const ALL: [WorkerStatus; 7] = [
        WorkerStatus::Ok,
        WorkerStatus::PackageFail,
        WorkerStatus::DepFail,
        WorkerStatus::ChrootFail,
        WorkerStatus::BuilderFail,
        WorkerStatus::Aborted,
        WorkerStatus::GivenBack,
    ];

    /// Look up a status by its wire name, with or without the qualifier.
    ///
    /// Returns `None` for names outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        let bare = name.strip_prefix(Self::QUALIFIER).unwrap_or(name);
        Self::ALL.into_iter().find(|s| s.name() == bare)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerStatus::Ok => "OK",
            WorkerStatus::PackageFail => "PACKAGEFAIL",
            WorkerStatus::DepFail => "DEPFAIL",
            WorkerStatus::ChrootFail => "CHROOTFAIL",
            WorkerStatus::BuilderFail => "BUILDERFAIL",
            WorkerStatus::Aborted => "ABORTED",
            WorkerStatus::GivenBack => "GIVENBACK",
        }
    }

    /// Statuses whose handlers are allowed to send a notification.
    pub fn allows_notification(&self) -> bool {
        matches!(self, WorkerStatus::Ok | WorkerStatus::PackageFail | WorkerStatus::ChrootFail)
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detail map accompanying a worker's status report.
///
/// Only the keys this engine acts on are typed; everything else the worker
/// sends is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlaveStatus {
    /// Cookie the worker was dispatched with.
    #[serde(default, rename = "build_id", skip_serializing_if = "Option::is_none")]
    pub build_cookie: Option<String>,
    /// Output filename → worker-local content hash, in the order reported.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub filemap: IndexMap<String, String>,
    /// Unsatisfied build dependencies (DEPFAIL only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SlaveStatus {
    pub fn with_cookie(cookie: impl Into<String>) -> Self {
        Self { build_cookie: Some(cookie.into()), ..Self::default() }
    }

    pub fn file(mut self, filename: impl Into<String>, hash: impl Into<String>) -> Self {
        self.filemap.insert(filename.into(), hash.into());
        self
    }

    pub fn dependencies(mut self, deps: impl Into<String>) -> Self {
        self.dependencies = Some(deps.into());
        self
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
