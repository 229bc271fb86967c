// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-type specific request composition.
//!
//! Each [`JobType`] has one [`JobRequestComposer`] that knows how to turn a
//! build into the payload a worker runs, and which legality rules apply to
//! builds of that type.

mod binary;
mod recipe;

pub use binary::BinaryPackageComposer;
pub use recipe::RecipeComposer;

use crate::error::ComposeError;
use async_trait::async_trait;
use bf_adapters::Credentials;
use bf_core::{Build, DistroArchSeries, JobType};
use std::collections::HashMap;
use std::sync::Arc;

/// A file the worker must fetch before it can build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub filename: String,
    pub content_hash: String,
    pub url: String,
    /// Set when the file lives in a private archive.
    pub credentials: Option<Credentials>,
}

/// Everything a worker needs to start a job, minus the chroot.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub builder_type: String,
    pub files: Vec<InputFile>,
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// Per-job-type behaviour used by dispatch and the OK handler.
#[async_trait]
pub trait JobRequestComposer: Send + Sync {
    fn job_type(&self) -> JobType;

    /// Refuse builds that cannot run as configured.
    fn verify_build_request(&self, build: &Build) -> Result<(), ComposeError>;

    async fn compose_build_request(
        &self,
        build: &Build,
        platform: &DistroArchSeries,
    ) -> Result<BuildRequest, ComposeError>;

    /// Check a finished build may land where it claims to.
    fn verify_successful_build(&self, build: &Build) -> Result<(), ComposeError> {
        verify_suite(build)
    }

    /// Whether the build's input was replaced while it ran.
    ///
    /// Handed the most recently committed copy of the build when one exists.
    fn is_superseded(&self, _build: &Build) -> bool {
        false
    }
}

/// Composers keyed by job type.
#[derive(Clone)]
pub struct ComposerRegistry {
    composers: HashMap<JobType, Arc<dyn JobRequestComposer>>,
}

impl ComposerRegistry {
    pub fn empty() -> Self {
        Self { composers: HashMap::new() }
    }

    /// Register `composer` for its job type, replacing any previous one.
    pub fn register(&mut self, composer: impl JobRequestComposer + 'static) {
        self.composers.insert(composer.job_type(), Arc::new(composer));
    }

    pub fn get(&self, job_type: JobType) -> Option<&dyn JobRequestComposer> {
        self.composers.get(&job_type).map(|c| c.as_ref())
    }
}

impl Default for ComposerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(BinaryPackageComposer);
        registry.register(RecipeComposer);
        registry
    }
}

/// Archive/pocket/series compatibility shared by every job type.
pub fn verify_suite(build: &Build) -> Result<(), ComposeError> {
    let das = &build.distro_arch_series;
    if build.archive.can_modify_suite(das.series_status, build.pocket) {
        return Ok(());
    }
    Err(ComposeError::Invalid(format!(
        "{} ({}) cannot build into {} {}",
        build.title(),
        build.id,
        das.distribution,
        build.suite()
    )))
}

/// Credentials a worker presents to fetch files from `build`'s archive.
pub(crate) fn archive_credentials(build: &Build) -> Result<Option<Credentials>, ComposeError> {
    if !build.is_private() {
        return Ok(None);
    }
    let secret = build.archive.buildd_secret.as_ref().ok_or_else(|| {
        ComposeError::Invalid(format!(
            "private archive {}/{} has no buildd secret",
            build.archive.owner, build.archive.name
        ))
    })?;
    Ok(Some(Credentials { username: "buildd".to_string(), password: secret.clone() }))
}

/// Arguments common to every job type.
pub(crate) fn base_args(
    build: &Build,
    platform: &DistroArchSeries,
) -> serde_json::Map<String, serde_json::Value> {
    let mut args = serde_json::Map::new();
    args.insert("arch_tag".into(), platform.arch.clone().into());
    args.insert("archive_private".into(), build.is_private().into());
    args.insert("archive_purpose".into(), build.archive.purpose.to_string().into());
    args.insert("archives".into(), build.archive.dependencies.clone().into());
    args.insert("distribution".into(), platform.distribution.clone().into());
    args.insert("series".into(), platform.series.clone().into());
    args.insert("suite".into(), build.suite().into());
    args
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
