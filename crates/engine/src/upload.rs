// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staging directories for build results.
//!
//! A build's files are collected under `grabbing/<leaf>` and the whole leaf
//! is then renamed exactly once, into `incoming/<leaf>` for the uploader or
//! `failed/<leaf>` for inspection. The rename is the only publication point.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};

pub const GRABBING: &str = "grabbing";
pub const INCOMING: &str = "incoming";
pub const FAILED: &str = "failed";

/// One build's staging leaf under an upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDirectory {
    root: PathBuf,
    leaf: String,
}

impl UploadDirectory {
    pub fn new(root: impl Into<PathBuf>, leaf: impl Into<String>) -> Self {
        Self { root: root.into(), leaf: leaf.into() }
    }

    /// `<timestamp>-<cookie>`; cookies are unique per build so leaves never collide.
    pub fn leaf_name(cookie: &str, now: DateTime<Utc>) -> String {
        format!("{}-{}", now.format("%Y%m%d-%H%M%S"), cookie)
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn grabbing(&self) -> PathBuf {
        self.root.join(GRABBING).join(&self.leaf)
    }

    pub fn incoming(&self) -> PathBuf {
        self.root.join(INCOMING).join(&self.leaf)
    }

    pub fn failed(&self) -> PathBuf {
        self.root.join(FAILED).join(&self.leaf)
    }

    /// Create `grabbing/<leaf>/<archive_id>/<distribution>/` and return its
    /// canonical path.
    pub async fn create(&self, archive_id: u32, distribution: &str) -> io::Result<PathBuf> {
        let upload_path = self.grabbing().join(archive_id.to_string()).join(distribution);
        tokio::fs::create_dir_all(&upload_path).await?;
        tokio::fs::canonicalize(&upload_path).await
    }

    /// Hand the leaf to the uploader.
    pub async fn publish(&self) -> io::Result<PathBuf> {
        self.move_to(self.incoming()).await
    }

    /// Park the leaf where the uploader never looks.
    pub async fn reject(&self) -> io::Result<PathBuf> {
        self.move_to(self.failed()).await
    }

    async fn move_to(&self, dest: PathBuf) -> io::Result<PathBuf> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(self.grabbing(), &dest).await?;
        Ok(dest)
    }
}

/// Resolve a worker-supplied `filename` beneath `base`.
///
/// `base` must already be canonical. `.` and `..` are folded lexically, so
/// the result is `None` for absolute names, for names that climb out of
/// `base`, for names that resolve to `base` itself, and for names holding
/// a NUL byte.
pub fn resolve_within(base: &Path, filename: &str) -> Option<PathBuf> {
    if filename.contains('\0') {
        return None;
    }
    let mut resolved = base.to_path_buf();
    for component in Path::new(filename).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (resolved.starts_with(base) && resolved != base).then_some(resolved)
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
