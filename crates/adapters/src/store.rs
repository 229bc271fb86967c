// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transactional persistence for build records.

use async_trait::async_trait;
use bf_core::{Build, BuildId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from build store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("commit rejected: {0}")]
    Rejected(String),
}

/// Durable storage for builds.
///
/// `commit` makes the given state of a build durable before returning;
/// `abort` discards whatever has not been committed.
#[async_trait]
pub trait BuildStore: Clone + Send + Sync + 'static {
    async fn commit(&self, build: &Build) -> Result<(), StoreError>;

    async fn abort(&self, build_id: &BuildId);

    async fn load(&self, build_id: &BuildId) -> Result<Option<Build>, StoreError>;
}

/// Build store keeping one JSON document per build.
///
/// Each commit writes a temp file and renames it over the previous
/// document, so a crash leaves either the old or the new record.
#[derive(Clone, Debug)]
pub struct JsonBuildStore {
    dir: PathBuf,
}

impl JsonBuildStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, build_id: &BuildId) -> PathBuf {
        self.dir.join(format!("{}.json", build_id))
    }
}

#[async_trait]
impl BuildStore for JsonBuildStore {
    async fn commit(&self, build: &Build) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.record_path(&build.id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(build)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!(build_id = %build.id, status = %build.status, "committed build");
        Ok(())
    }

    async fn abort(&self, build_id: &BuildId) {
        // Nothing is staged between commits; drop any torn temp file.
        let tmp = self.record_path(build_id).with_extension("json.tmp");
        if tokio::fs::remove_file(&tmp).await.is_ok() {
            tracing::warn!(%build_id, "discarded partial build record");
        }
    }

    async fn load(&self, build_id: &BuildId) -> Result<Option<Build>, StoreError> {
        match tokio::fs::read(self.record_path(build_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildStore, StoreError};
    use async_trait::async_trait;
    use bf_core::{Build, BuildId, BuildStatus};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    type CommitHook = Arc<dyn Fn(&Build) + Send + Sync>;

    #[derive(Default)]
    struct FakeBuildStoreState {
        commits: Vec<Build>,
        aborts: Vec<BuildId>,
        latest: HashMap<BuildId, Build>,
        fail_commits: bool,
    }

    /// Fake build store for testing
    #[derive(Clone, Default)]
    pub struct FakeBuildStore {
        inner: Arc<Mutex<FakeBuildStoreState>>,
        on_commit: Option<CommitHook>,
    }

    impl FakeBuildStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Run `hook` on every commit, before it is recorded.
        ///
        /// Lets tests observe side effects (e.g. the filesystem) at the
        /// moment a status becomes durable.
        pub fn on_commit(mut self, hook: impl Fn(&Build) + Send + Sync + 'static) -> Self {
            self.on_commit = Some(Arc::new(hook));
            self
        }

        pub fn fail_commits(self) -> Self {
            self.inner.lock().fail_commits = true;
            self
        }

        /// Every committed snapshot, in commit order
        pub fn commits(&self) -> Vec<Build> {
            self.inner.lock().commits.clone()
        }

        /// Statuses of the committed snapshots, in commit order
        pub fn committed_statuses(&self) -> Vec<BuildStatus> {
            self.inner.lock().commits.iter().map(|b| b.status).collect()
        }

        pub fn aborts(&self) -> Vec<BuildId> {
            self.inner.lock().aborts.clone()
        }
    }

    #[async_trait]
    impl BuildStore for FakeBuildStore {
        async fn commit(&self, build: &Build) -> Result<(), StoreError> {
            if let Some(hook) = &self.on_commit {
                hook(build);
            }
            let mut inner = self.inner.lock();
            if inner.fail_commits {
                return Err(StoreError::Rejected("database is read-only".to_string()));
            }
            inner.commits.push(build.clone());
            inner.latest.insert(build.id.clone(), build.clone());
            Ok(())
        }

        async fn abort(&self, build_id: &BuildId) {
            self.inner.lock().aborts.push(build_id.clone());
        }

        async fn load(&self, build_id: &BuildId) -> Result<Option<Build>, StoreError> {
            Ok(self.inner.lock().latest.get(build_id).cloned())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBuildStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
