// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Copies files (chiefly the build log) from a worker into the content store.

use bf_adapters::{ContentStore, ContentStoreError, StoredFile, WorkerClient, WorkerError};
use bf_core::{Build, ContentId};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Reserved worker hash naming the build log.
pub const BUILDLOG_HASH: &str = "buildlog";

/// Errors from archiving a worker file
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("content store error: {0}")]
    Store(#[from] ContentStoreError),
    #[error("compression task failed: {0}")]
    Compress(String),
}

/// Suffix → MIME type, longest suffixes first.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".txt.gz", "application/gzip"),
    (".tar.gz", "application/x-tar"),
    (".buildinfo", "text/plain"),
    (".changes", "text/plain"),
    (".txt", "text/plain"),
    (".log", "text/plain"),
    (".dsc", "text/plain"),
    (".udeb", "application/x-debian-package"),
    (".ddeb", "application/x-debian-package"),
    (".deb", "application/x-debian-package"),
];

pub fn content_type_for(filename: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| filename.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or("application/octet-stream")
}

/// Streams worker files through local scratch space into the content store.
#[derive(Clone, Debug)]
pub struct LogArchiver<L> {
    librarian: L,
    tmp_dir: PathBuf,
}

impl<L: ContentStore> LogArchiver<L> {
    pub fn new(librarian: L, tmp_dir: impl Into<PathBuf>) -> Self {
        Self { librarian, tmp_dir: tmp_dir.into() }
    }

    pub fn librarian(&self) -> &L {
        &self.librarian
    }

    /// Fetch `content_hash` from the worker and store it as `filename`.
    ///
    /// The build log ([`BUILDLOG_HASH`]) is gzipped and stored as
    /// `<filename>.gz`; everything else is stored as-is. Scratch files are
    /// removed on every path out, including errors.
    pub async fn get_file_from_worker<W: WorkerClient>(
        &self,
        worker: &W,
        filename: &str,
        content_hash: &str,
        private: bool,
    ) -> Result<StoredFile, ArchiveError> {
        tokio::fs::create_dir_all(&self.tmp_dir).await?;
        let download = self.scratch_file()?;
        {
            let mut out = tokio::fs::File::from_std(download.reopen()?);
            worker.get_file(content_hash, &mut out).await?;
            out.flush().await?;
        }

        let (scratch, filename) = if content_hash == BUILDLOG_HASH {
            let compressed = self.scratch_file()?;
            let src = download.path().to_path_buf();
            let dst = compressed.path().to_path_buf();
            tokio::task::spawn_blocking(move || gzip(&src, &dst))
                .await
                .map_err(|e| ArchiveError::Compress(e.to_string()))??;
            drop(download);
            (compressed, format!("{filename}.gz"))
        } else {
            (download, filename.to_string())
        };

        let mut file = tokio::fs::File::open(scratch.path()).await?;
        let size = file.metadata().await?.len();
        let content_type = content_type_for(&filename);
        let stored =
            self.librarian.store(&filename, size, &mut file, content_type, private).await?;
        tracing::debug!(
            content_hash,
            %filename,
            size,
            content_type,
            id = %stored.id,
            "stored worker file"
        );
        Ok(stored)
    }

    /// Store the build's log, named for its current status.
    pub async fn archive_log<W: WorkerClient>(
        &self,
        worker: &W,
        build: &Build,
    ) -> Result<ContentId, ArchiveError> {
        let stored = self
            .get_file_from_worker(worker, &build.log_file_name(), BUILDLOG_HASH, build.is_private())
            .await?;
        Ok(stored.id)
    }

    fn scratch_file(&self) -> io::Result<NamedTempFile> {
        tempfile::Builder::new().prefix("worker-file-").tempfile_in(&self.tmp_dir)
    }
}

fn gzip(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = std::fs::File::open(src)?;
    let mut encoder = GzEncoder::new(std::fs::File::create(dst)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()
}

#[cfg(test)]
#[path = "log_archive_tests.rs"]
mod tests;
