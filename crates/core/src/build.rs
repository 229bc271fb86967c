// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build record and status state machine.

use crate::archive::{Archive, ContentId, DistroArchSeries, LibraryFile, Pocket};
use crate::queue::QueueRecordId;
use crate::status::SlaveStatus;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a build attempt.
    pub struct BuildId("bld-");
}

/// Durable status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildStatus {
    NeedsBuild,
    Building,
    FullyBuilt,
    FailedToBuild,
    ManualDepWait,
    ChrootWait,
    Superseded,
    FailedToUpload,
    Uploading,
    Cancelling,
    Cancelled,
}

impl BuildStatus {
    /// Statuses that mark the end of a worker's involvement.
    pub fn is_finished(&self) -> bool {
        !matches!(self, BuildStatus::NeedsBuild | BuildStatus::Building | BuildStatus::Cancelling)
    }
}

crate::labelled_enum! {
    BuildStatus {
        NeedsBuild => "NEEDSBUILD",
        Building => "BUILDING",
        FullyBuilt => "FULLYBUILT",
        FailedToBuild => "FAILEDTOBUILD",
        ManualDepWait => "MANUALDEPWAIT",
        ChrootWait => "CHROOTWAIT",
        Superseded => "SUPERSEDED",
        FailedToUpload => "FAILEDTOUPLOAD",
        Uploading => "UPLOADING",
        Cancelling => "CANCELLING",
        Cancelled => "CANCELLED",
    }
}

/// Kind of job a build performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    BinaryPackageBuild,
    RecipeBuild,
}

impl JobType {
    /// Prefix used when minting build cookies.
    pub fn cookie_prefix(&self) -> &'static str {
        match self {
            JobType::BinaryPackageBuild => "PACKAGEBUILD",
            JobType::RecipeBuild => "RECIPEBRANCHBUILD",
        }
    }
}

crate::labelled_enum! {
    JobType {
        BinaryPackageBuild => "binary package build",
        RecipeBuild => "recipe build",
    }
}

/// Publishing state of the source a binary build was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Pending,
    Published,
    Superseded,
    Deleted,
}

impl PublicationStatus {
    pub fn is_current(&self) -> bool {
        matches!(self, PublicationStatus::Pending | PublicationStatus::Published)
    }
}

/// Source package a binary build compiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePackageRelease {
    pub name: String,
    pub version: String,
    pub component: String,
    /// Whether this build also produces architecture-independent packages.
    #[serde(default)]
    pub arch_indep: bool,
    /// Source files (.dsc, tarballs) the worker needs.
    pub files: Vec<LibraryFile>,
    pub publication: PublicationStatus,
}

/// Recipe a source-recipe build assembles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSpec {
    pub name: String,
    pub recipe_text: String,
    pub author_name: String,
    pub author_email: String,
    pub component: String,
}

/// Job-type specific part of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobPayload {
    BinaryPackage(SourcePackageRelease),
    Recipe(RecipeSpec),
}

/// Durable record of one attempt to produce an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub status: BuildStatus,
    /// Correlates a dispatch with its eventual status report.
    pub build_cookie: String,
    pub archive: Archive,
    pub pocket: Pocket,
    pub distro_arch_series: DistroArchSeries,
    pub payload: JobPayload,
    /// Queue record currently binding this build to a worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_record: Option<QueueRecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_finished_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<ContentId>,
}

impl Build {
    /// Cookie minted for a build of the given type: `<PREFIX>-<id suffix>`.
    pub fn mint_cookie(job_type: JobType, id: &BuildId) -> String {
        format!("{}-{}", job_type.cookie_prefix(), id.suffix())
    }

    pub fn job_type(&self) -> JobType {
        match self.payload {
            JobPayload::BinaryPackage(_) => JobType::BinaryPackageBuild,
            JobPayload::Recipe(_) => JobType::RecipeBuild,
        }
    }

    pub fn is_private(&self) -> bool {
        self.archive.private
    }

    /// Series name plus pocket suffix, e.g. `noble-proposed`.
    pub fn suite(&self) -> String {
        format!("{}{}", self.distro_arch_series.series, self.pocket.suffix())
    }

    pub fn title(&self) -> String {
        let das = &self.distro_arch_series;
        match &self.payload {
            JobPayload::BinaryPackage(spr) => format!(
                "{} build of {} {} in {} {} {}",
                das.arch, spr.name, spr.version, das.distribution, das.series, self.pocket
            ),
            JobPayload::Recipe(recipe) => {
                format!("{} recipe build in {} {}", recipe.name, das.distribution, das.series)
            }
        }
    }

    /// Name the archived build log is stored under (before compression).
    ///
    /// Embeds the current status, so call it after the terminal status is set.
    pub fn log_file_name(&self) -> String {
        let das = &self.distro_arch_series;
        let state = self.status.to_string().to_lowercase();
        let name = match &self.payload {
            JobPayload::BinaryPackage(spr) => format!("{}_{}", spr.name, spr.version),
            JobPayload::Recipe(recipe) => recipe.name.clone(),
        };
        format!(
            "buildlog_{}-{}-{}.{}_{}.txt",
            das.distribution, das.series, das.arch, name, state
        )
        .replace('/', "-")
    }

    /// Move to `status`, recording who built it and when it finished.
    ///
    /// The worker's reported dependencies are only kept for
    /// [`BuildStatus::ManualDepWait`]; any other status clears them.
    pub fn update_status(
        &mut self,
        status: BuildStatus,
        builder: Option<&str>,
        slave_status: Option<&SlaveStatus>,
        now_ms: u64,
    ) {
        self.status = status;
        if let Some(builder) = builder {
            self.builder = Some(builder.to_string());
        }
        if status == BuildStatus::Building && self.date_started_ms.is_none() {
            self.date_started_ms = Some(now_ms);
        }
        if status.is_finished() {
            self.date_finished_ms = Some(now_ms);
        }
        self.dependencies = match status {
            BuildStatus::ManualDepWait => slave_status.and_then(|s| s.dependencies.clone()),
            _ => None,
        };
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
