// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::engine::Engine;
use crate::error::StatusError;
use crate::upload::{resolve_within, UploadDirectory};
use bf_adapters::{BuildQueue, BuildStore, ContentStore, NotifyAdapter, WorkerClient};
use bf_core::{Build, BuildStatus, Clock, QueueRecord, SlaveStatus};
use std::path::{Path, PathBuf};

pub(crate) const COPY_FAILED: &str = "Copy from worker was unsuccessful.";

impl<L, S, Q, N, C> Engine<L, S, Q, N, C>
where
    L: ContentStore,
    S: BuildStore,
    Q: BuildQueue,
    N: NotifyAdapter,
    C: Clock,
{
    /// Collect a successful build's files and stage them for upload.
    ///
    /// Files land in `grabbing/<leaf>` first. The leaf moves to `incoming/`
    /// only after the UPLOADING status is committed, so anything the
    /// uploader finds there already has a durable build behind it.
    pub(super) async fn handle_ok<W: WorkerClient>(
        &self,
        build: &mut Build,
        queue_record: &QueueRecord,
        worker: &W,
        slave_status: &SlaveStatus,
        notify: bool,
    ) -> Result<(), StatusError> {
        let job_type = build.job_type();
        let composer = self.composers.get(job_type).ok_or(StatusError::NoComposer(job_type))?;

        // Publication may have moved on since the caller loaded this build.
        let latest = self.store.load(&build.id).await?;
        if composer.is_superseded(latest.as_ref().unwrap_or(&*build)) {
            tracing::info!(
                build_id = %build.id,
                "source for {} was superseded; not collecting files",
                build.title()
            );
            build.update_status(
                BuildStatus::Superseded,
                Some(&queue_record.builder),
                Some(slave_status),
                self.clock.epoch_ms(),
            );
            self.store.commit(build).await?;
            self.queue.destroy(queue_record).await?;
            self.store.commit(build).await?;
            return Ok(());
        }

        composer
            .verify_successful_build(build)
            .map_err(|e| StatusError::IllegalBuild(e.to_string()))?;

        let leaf = UploadDirectory::leaf_name(&build.build_cookie, self.clock.now());
        let upload = UploadDirectory::new(&self.config.upload_root, leaf);
        let upload_path =
            upload.create(build.archive.id, &build.distro_arch_series.distribution).await?;

        let mut successful_copy = true;
        let mut downloads: Vec<(String, PathBuf)> = Vec::new();
        for (filename, content_hash) in &slave_status.filemap {
            let Some(target) = resolve_within(&upload_path, filename) else {
                tracing::warn!(
                    build_id = %build.id,
                    builder = %queue_record.builder,
                    %filename,
                    "worker sent a filename outside the upload directory"
                );
                successful_copy = false;
                break;
            };
            // One path per file: no aliases, and no file doubling as another's directory.
            if downloads.iter().any(|(_, queued)| overlaps(queued, &target)) {
                tracing::warn!(
                    build_id = %build.id,
                    builder = %queue_record.builder,
                    %filename,
                    "worker sent clashing filenames"
                );
                successful_copy = false;
                break;
            }
            if let Some(parent) = target.parent().filter(|p| *p != upload_path.as_path()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            downloads.push((content_hash.clone(), target));
        }

        tracing::info!(
            build_id = %build.id,
            leaf = upload.leaf(),
            files = downloads.len(),
            "grabbing files from worker"
        );
        worker.get_files(&downloads).await?;

        let status =
            if successful_copy { BuildStatus::Uploading } else { BuildStatus::FailedToUpload };
        build.update_status(
            status,
            Some(&queue_record.builder),
            Some(slave_status),
            self.clock.epoch_ms(),
        );
        self.store.commit(build).await?;
        self.store_log(worker, build).await;

        if successful_copy {
            let dest = upload.publish().await?;
            tracing::info!(build_id = %build.id, path = %dest.display(), "staged upload");
        } else {
            tracing::warn!(build_id = %build.id, leaf = upload.leaf(), "copy from worker failed");
            if notify {
                self.send_notification(build, Some(COPY_FAILED)).await;
            }
            upload.reject().await?;
        }

        self.queue.destroy(queue_record).await?;
        self.store.commit(build).await?;
        Ok(())
    }
}

fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

#[cfg(test)]
#[path = "ok_tests.rs"]
mod tests;
