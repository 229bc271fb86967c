// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{base_args, verify_suite, BuildRequest, JobRequestComposer};
use crate::error::ComposeError;
use async_trait::async_trait;
use bf_core::{ArchivePurpose, Build, DistroArchSeries, JobPayload, JobType, RecipeSpec};

/// Source package recipe builds (`sourcepackagerecipe` on the worker).
///
/// The worker fetches branches itself, so no input files are sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeComposer;

impl RecipeComposer {
    fn recipe(build: &Build) -> Result<&RecipeSpec, ComposeError> {
        match &build.payload {
            JobPayload::Recipe(recipe) => Ok(recipe),
            JobPayload::BinaryPackage(_) => Err(ComposeError::WrongJobType {
                expected: JobType::RecipeBuild,
                actual: build.job_type(),
            }),
        }
    }
}

#[async_trait]
impl JobRequestComposer for RecipeComposer {
    fn job_type(&self) -> JobType {
        JobType::RecipeBuild
    }

    fn verify_build_request(&self, build: &Build) -> Result<(), ComposeError> {
        Self::recipe(build)?;
        if build.archive.purpose != ArchivePurpose::Ppa {
            return Err(ComposeError::Invalid(format!(
                "recipe builds can only target a PPA, not {}/{}",
                build.archive.owner, build.archive.name
            )));
        }
        verify_suite(build)
    }

    async fn compose_build_request(
        &self,
        build: &Build,
        platform: &DistroArchSeries,
    ) -> Result<BuildRequest, ComposeError> {
        let recipe = Self::recipe(build)?;
        let mut args = base_args(build, platform);
        args.insert("recipe_text".into(), recipe.recipe_text.clone().into());
        args.insert("author_name".into(), recipe.author_name.clone().into());
        args.insert("author_email".into(), recipe.author_email.clone().into());
        args.insert("ogrecomponent".into(), recipe.component.clone().into());
        args.insert("distroseries_name".into(), platform.series.clone().into());

        Ok(BuildRequest {
            builder_type: "sourcepackagerecipe".to_string(),
            files: Vec::new(),
            args,
        })
    }
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
