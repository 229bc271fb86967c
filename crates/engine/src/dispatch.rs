// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch controller: compose, transfer, start.

use crate::engine::Engine;
use crate::error::DispatchError;
use crate::redact::sanitise_urls;
use bf_adapters::{
    BuildQueue, BuildStarted, BuildStore, ContentStore, NotifyAdapter, StartBuild, WorkerClient,
};
use bf_core::{Build, Clock};
use futures_util::future::try_join_all;
use std::collections::BTreeMap;

impl<L, S, Q, N, C> Engine<L, S, Q, N, C>
where
    L: ContentStore,
    S: BuildStore,
    Q: BuildQueue,
    N: NotifyAdapter,
    C: Clock,
{
    /// Push `build` to `worker` and ask it to start.
    ///
    /// The chroot and every input file are sent concurrently; the build is
    /// only started once all transfers succeed. The outcome arrives later
    /// through [`Engine::handle_status`].
    pub async fn dispatch<W: WorkerClient>(
        &self,
        build: &Build,
        worker: &W,
    ) -> Result<BuildStarted, DispatchError> {
        let job_type = build.job_type();
        let composer = self.composers.get(job_type).ok_or(DispatchError::NoComposer(job_type))?;
        composer
            .verify_build_request(build)
            .map_err(|e| DispatchError::CannotBuild(e.to_string()))?;

        let platform = &build.distro_arch_series;
        let chroot = platform.chroot().ok_or_else(|| {
            DispatchError::CannotBuild(format!(
                "unable to find a chroot for {}",
                platform.display_name()
            ))
        })?;
        let request = composer.compose_build_request(build, platform).await?;

        let transfers = std::iter::once(worker.send_file(&chroot.content_hash, &chroot.url, None))
            .chain(request.files.iter().map(|file| {
                worker.send_file(&file.content_hash, &file.url, file.credentials.as_ref())
            }));
        try_join_all(transfers).await?;

        let filemap: BTreeMap<String, String> = request
            .files
            .iter()
            .map(|file| (file.filename.clone(), file.content_hash.clone()))
            .collect();
        let payload = serde_json::json!({
            "builder_type": &request.builder_type,
            "chroot_hash": &chroot.content_hash,
            "filemap": &filemap,
            "args": &request.args,
        });
        tracing::info!(
            build_id = %build.id,
            cookie = %build.build_cookie,
            builder = worker.name(),
            "dispatching {}: {}",
            build.title(),
            sanitise_urls(&payload.to_string())
        );

        let started = worker
            .start_build(StartBuild {
                cookie: &build.build_cookie,
                builder_type: &request.builder_type,
                chroot_hash: &chroot.content_hash,
                filemap: &filemap,
                args: &request.args,
            })
            .await?;
        tracing::info!(
            build_id = %build.id,
            builder = worker.name(),
            status = %started.status,
            info = %started.info,
            "build started"
        );
        Ok(started)
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
