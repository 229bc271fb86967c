// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content store ("librarian") for build logs and artifacts.

use async_trait::async_trait;
use bf_core::ContentId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const CHUNK_SIZE: usize = 64 * 1024;

/// Errors from content store operations
#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("metadata error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("declared size {expected} but received {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("store rejected upload: {0}")]
    Rejected(String),
}

/// A stored file's identity and where it can be fetched over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: ContentId,
    pub url: String,
}

/// Append-only store for logs and artifacts.
#[async_trait]
pub trait ContentStore: Clone + Send + Sync + 'static {
    /// Store `size` bytes read from `content` under `filename`.
    ///
    /// `private` files are only served to authorised clients.
    async fn store(
        &self,
        filename: &str,
        size: u64,
        content: &mut (dyn AsyncRead + Unpin + Send),
        content_type: &str,
        private: bool,
    ) -> Result<StoredFile, ContentStoreError>;
}

/// Metadata kept alongside each stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMeta {
    pub id: ContentId,
    pub filename: String,
    pub content_type: String,
    pub private: bool,
    pub size: u64,
    pub sha256: String,
}

/// Content store backed by a local directory.
///
/// Blobs are content-addressed as `<root>/blobs/<aa>/<sha256>`; each upload
/// gets its own identity with metadata in `<root>/aliases/<id>.json`.
#[derive(Clone, Debug)]
pub struct FsContentStore {
    root: PathBuf,
    base_url: String,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { root: root.into(), base_url }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob holding content with the given digest.
    pub fn blob_path(&self, sha256: &str) -> PathBuf {
        let prefix = sha256.get(..2).unwrap_or(sha256);
        self.root.join("blobs").join(prefix).join(sha256)
    }

    fn alias_path(&self, id: &ContentId) -> PathBuf {
        self.root.join("aliases").join(format!("{}.json", id))
    }

    /// Look up metadata for a stored file.
    pub async fn metadata(&self, id: &ContentId) -> Result<Option<StoredMeta>, ContentStoreError> {
        match tokio::fs::read(self.alias_path(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy `content` into `staging`, returning its digest and length.
    async fn write_staging(
        staging: &Path,
        content: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<(String, u64), ContentStoreError> {
        let mut out = tokio::fs::File::create(staging).await?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = content.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            out.write_all(&buf[..n]).await?;
            written += n as u64;
        }
        out.flush().await?;
        Ok((format!("{:x}", hasher.finalize()), written))
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn store(
        &self,
        filename: &str,
        size: u64,
        content: &mut (dyn AsyncRead + Unpin + Send),
        content_type: &str,
        private: bool,
    ) -> Result<StoredFile, ContentStoreError> {
        tokio::fs::create_dir_all(self.root.join("aliases")).await?;
        let id = ContentId::new();
        let staging = self.root.join(format!(".upload-{}", id.suffix()));

        let (sha256, written) = match Self::write_staging(&staging, content).await {
            Ok(result) => result,
            Err(e) => {
                let _ = tokio::fs::remove_file(&staging).await;
                return Err(e);
            }
        };
        if written != size {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(ContentStoreError::SizeMismatch { expected: size, actual: written });
        }

        let blob = self.blob_path(&sha256);
        if let Some(parent) = blob.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&staging, &blob).await?;

        let meta = StoredMeta {
            id: id.clone(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            private,
            size,
            sha256,
        };
        tokio::fs::write(self.alias_path(&id), serde_json::to_vec_pretty(&meta)?).await?;

        tracing::debug!(%id, filename, size, private, "stored file");
        let url = format!("{}/{}/{}", self.base_url, id, filename);
        Ok(StoredFile { id, url })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ContentStore, ContentStoreError, StoredFile};
    use async_trait::async_trait;
    use bf_core::ContentId;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::io::{AsyncRead, AsyncReadExt};

    /// Recorded store call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StoreCall {
        pub id: ContentId,
        pub filename: String,
        pub size: u64,
        pub content: Vec<u8>,
        pub content_type: String,
        pub private: bool,
    }

    #[derive(Default)]
    struct FakeContentStoreState {
        calls: Vec<StoreCall>,
        fail: bool,
    }

    /// Fake content store for testing
    #[derive(Clone, Default)]
    pub struct FakeContentStore {
        inner: Arc<Mutex<FakeContentStoreState>>,
    }

    impl FakeContentStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reject every upload.
        pub fn failing() -> Self {
            let store = Self::default();
            store.inner.lock().fail = true;
            store
        }

        /// Get all recorded uploads
        pub fn calls(&self) -> Vec<StoreCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl ContentStore for FakeContentStore {
        async fn store(
            &self,
            filename: &str,
            size: u64,
            content: &mut (dyn AsyncRead + Unpin + Send),
            content_type: &str,
            private: bool,
        ) -> Result<StoredFile, ContentStoreError> {
            if self.inner.lock().fail {
                return Err(ContentStoreError::Rejected("librarian unavailable".to_string()));
            }
            let mut buf = Vec::new();
            content.read_to_end(&mut buf).await?;
            let mut inner = self.inner.lock();
            let id = ContentId::from_string(format!("lfa-{}", inner.calls.len() + 1));
            inner.calls.push(StoreCall {
                id: id.clone(),
                filename: filename.to_string(),
                size,
                content: buf,
                content_type: content_type.to_string(),
                private,
            });
            let url = format!("http://librarian.test/{}/{}", id, filename);
            Ok(StoredFile { id, url })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeContentStore, StoreCall};

#[cfg(test)]
#[path = "librarian_tests.rs"]
mod tests;
