// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destination archives, pockets, and target platforms.

use serde::{Deserialize, Serialize};

/// What kind of repository an archive is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchivePurpose {
    Primary,
    Partner,
    Ppa,
    Copy,
}

crate::labelled_enum! {
    ArchivePurpose {
        Primary => "PRIMARY",
        Partner => "PARTNER",
        Ppa => "PPA",
        Copy => "COPY",
    }
}

/// Suite pocket within a distribution series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pocket {
    Release,
    Security,
    Updates,
    Proposed,
    Backports,
}

impl Pocket {
    /// Suffix appended to the series name to form the suite (`""` for release).
    pub fn suffix(&self) -> &'static str {
        match self {
            Pocket::Release => "",
            Pocket::Security => "-security",
            Pocket::Updates => "-updates",
            Pocket::Proposed => "-proposed",
            Pocket::Backports => "-backports",
        }
    }
}

crate::labelled_enum! {
    Pocket {
        Release => "RELEASE",
        Security => "SECURITY",
        Updates => "UPDATES",
        Proposed => "PROPOSED",
        Backports => "BACKPORTS",
    }
}

/// Lifecycle stage of a distribution series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Experimental,
    Development,
    Frozen,
    Current,
    Supported,
    Obsolete,
}

impl SeriesStatus {
    /// Unstable series still accept uploads to the release pocket.
    pub fn is_unstable(&self) -> bool {
        matches!(self, SeriesStatus::Experimental | SeriesStatus::Development | SeriesStatus::Frozen)
    }
}

/// Destination repository for a build's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub id: u32,
    pub name: String,
    pub owner: String,
    pub purpose: ArchivePurpose,
    pub private: bool,
    /// Password workers use to fetch private source files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildd_secret: Option<String>,
    /// Extra apt source lines the worker should add, e.g. PPA dependencies.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Archive {
    /// Whether builds in this archive may land in `pocket` of a series in `status`.
    ///
    /// Non-primary archives accept every pocket. The primary archive only
    /// takes release/proposed uploads while a series is unstable, and
    /// never takes release uploads once it is stable.
    pub fn can_modify_suite(&self, status: SeriesStatus, pocket: Pocket) -> bool {
        if self.purpose != ArchivePurpose::Primary {
            return true;
        }
        if status.is_unstable() {
            matches!(pocket, Pocket::Release | Pocket::Proposed)
        } else {
            pocket != Pocket::Release
        }
    }
}

crate::define_id! {
    /// Identity the content store hands back for a stored file.
    pub struct ContentId("lfa-");
}

/// A file held by the content store, addressed by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFile {
    pub filename: String,
    pub content_hash: String,
    pub url: String,
}

/// Target platform: one architecture of one distribution series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistroArchSeries {
    pub distribution: String,
    pub series: String,
    pub arch: String,
    pub series_status: SeriesStatus,
    /// Build environment image, if one has been uploaded for this platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroot: Option<LibraryFile>,
}

impl DistroArchSeries {
    pub fn chroot(&self) -> Option<&LibraryFile> {
        self.chroot.as_ref()
    }

    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.distribution, self.series, self.arch)
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
