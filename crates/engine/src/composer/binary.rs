// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{archive_credentials, base_args, verify_suite, BuildRequest, InputFile, JobRequestComposer};
use crate::error::ComposeError;
use async_trait::async_trait;
use bf_core::{Build, DistroArchSeries, JobPayload, JobType, SourcePackageRelease};

/// Binary package builds (`binarypackage` on the worker).
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryPackageComposer;

impl BinaryPackageComposer {
    fn source(build: &Build) -> Result<&SourcePackageRelease, ComposeError> {
        match &build.payload {
            JobPayload::BinaryPackage(spr) => Ok(spr),
            JobPayload::Recipe(_) => Err(ComposeError::WrongJobType {
                expected: JobType::BinaryPackageBuild,
                actual: build.job_type(),
            }),
        }
    }
}

#[async_trait]
impl JobRequestComposer for BinaryPackageComposer {
    fn job_type(&self) -> JobType {
        JobType::BinaryPackageBuild
    }

    fn verify_build_request(&self, build: &Build) -> Result<(), ComposeError> {
        Self::source(build)?;
        verify_suite(build)?;
        archive_credentials(build)?;
        Ok(())
    }

    async fn compose_build_request(
        &self,
        build: &Build,
        platform: &DistroArchSeries,
    ) -> Result<BuildRequest, ComposeError> {
        let spr = Self::source(build)?;
        let credentials = archive_credentials(build)?;
        let files = spr
            .files
            .iter()
            .map(|f| InputFile {
                filename: f.filename.clone(),
                content_hash: f.content_hash.clone(),
                url: f.url.clone(),
                credentials: credentials.clone(),
            })
            .collect();

        let mut args = base_args(build, platform);
        args.insert("arch_indep".into(), spr.arch_indep.into());
        args.insert("ogrecomponent".into(), spr.component.clone().into());

        Ok(BuildRequest { builder_type: "binarypackage".to_string(), files, args })
    }

    fn is_superseded(&self, build: &Build) -> bool {
        Self::source(build).is_ok_and(|spr| !spr.publication.is_current())
    }
}

#[cfg(test)]
#[path = "binary_tests.rs"]
mod tests;
