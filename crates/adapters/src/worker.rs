// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection to a remote build worker.
//!
//! The wire transport lives outside this crate; engines talk to a worker
//! only through [`WorkerClient`].

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors from worker operations
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("transfer of {content_hash} failed: {message}")]
    Transfer { content_hash: String, message: String },
    #[error("worker call failed: {0}")]
    Rpc(String),
    #[error("worker has no file with hash {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Basic-auth credentials a worker uses to fetch a private file.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reply to a build start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStarted {
    pub status: String,
    pub info: String,
}

/// Request payload for [`WorkerClient::start_build`].
#[derive(Debug, Clone, PartialEq)]
pub struct StartBuild<'a> {
    pub cookie: &'a str,
    pub builder_type: &'a str,
    pub chroot_hash: &'a str,
    pub filemap: &'a BTreeMap<String, String>,
    pub args: &'a serde_json::Map<String, serde_json::Value>,
}

/// Client for a single connected build worker.
#[async_trait]
pub trait WorkerClient: Clone + Send + Sync + 'static {
    /// Human-readable worker name or URL for logs.
    fn name(&self) -> &str;

    /// Ask the worker to fetch `url` and cache it under `content_hash`.
    ///
    /// Workers skip the download when they already hold the hash.
    async fn send_file(
        &self,
        content_hash: &str,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(), WorkerError>;

    /// Start the build. The outcome arrives later as a status report.
    async fn start_build(&self, request: StartBuild<'_>) -> Result<BuildStarted, WorkerError>;

    /// Stream the worker's file with `content_hash` into `dest`.
    async fn get_file(
        &self,
        content_hash: &str,
        dest: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), WorkerError>;

    /// Download every `(content_hash, path)` pair concurrently.
    ///
    /// Fails as a whole if any single download fails.
    async fn get_files(&self, files: &[(String, PathBuf)]) -> Result<(), WorkerError> {
        let fetches = files.iter().map(|(content_hash, path)| async move {
            let mut file = tokio::fs::File::create(path).await?;
            self.get_file(content_hash, &mut file).await?;
            file.flush().await?;
            Ok::<(), WorkerError>(())
        });
        futures_util::future::try_join_all(fetches).await?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildStarted, Credentials, StartBuild, WorkerClient, WorkerError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::Arc;
    use tokio::io::{AsyncWrite, AsyncWriteExt};
    use tokio::sync::Barrier;

    /// Recorded worker call
    #[derive(Debug, Clone, PartialEq)]
    pub enum WorkerCall {
        SendFile {
            content_hash: String,
            url: String,
            authenticated: bool,
        },
        StartBuild {
            cookie: String,
            builder_type: String,
            chroot_hash: String,
            filemap: BTreeMap<String, String>,
            args: serde_json::Map<String, serde_json::Value>,
        },
        GetFile {
            content_hash: String,
        },
    }

    #[derive(Default)]
    struct FakeWorkerState {
        calls: Vec<WorkerCall>,
        files: HashMap<String, Vec<u8>>,
        failing_sends: HashSet<String>,
        fail_downloads: bool,
        fail_start: bool,
    }

    /// Fake worker for testing
    #[derive(Clone)]
    pub struct FakeWorker {
        name: String,
        inner: Arc<Mutex<FakeWorkerState>>,
        send_barrier: Option<Arc<Barrier>>,
    }

    impl Default for FakeWorker {
        fn default() -> Self {
            Self::new("bob")
        }
    }

    impl FakeWorker {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                inner: Arc::new(Mutex::new(FakeWorkerState::default())),
                send_barrier: None,
            }
        }

        /// Serve `content` for `content_hash`.
        pub fn with_file(self, content_hash: &str, content: impl Into<Vec<u8>>) -> Self {
            self.inner.lock().files.insert(content_hash.to_string(), content.into());
            self
        }

        /// Make `send_file` fail for `content_hash`.
        pub fn fail_send(self, content_hash: &str) -> Self {
            self.inner.lock().failing_sends.insert(content_hash.to_string());
            self
        }

        /// Make every `get_file` fail.
        pub fn fail_downloads(self) -> Self {
            self.inner.lock().fail_downloads = true;
            self
        }

        pub fn fail_start(self) -> Self {
            self.inner.lock().fail_start = true;
            self
        }

        /// Hold every `send_file` until `n` of them are in flight at once.
        ///
        /// A dispatcher that sends files one at a time never gets past the
        /// first send.
        pub fn with_send_barrier(mut self, n: usize) -> Self {
            self.send_barrier = Some(Arc::new(Barrier::new(n)));
            self
        }

        /// Get all recorded calls, in order
        pub fn calls(&self) -> Vec<WorkerCall> {
            self.inner.lock().calls.clone()
        }

        pub fn sent_hashes(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    WorkerCall::SendFile { content_hash, .. } => Some(content_hash),
                    _ => None,
                })
                .collect()
        }

        pub fn fetched_hashes(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    WorkerCall::GetFile { content_hash } => Some(content_hash),
                    _ => None,
                })
                .collect()
        }

        pub fn start_calls(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, WorkerCall::StartBuild { .. })).count()
        }
    }

    #[async_trait]
    impl WorkerClient for FakeWorker {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send_file(
            &self,
            content_hash: &str,
            url: &str,
            credentials: Option<&Credentials>,
        ) -> Result<(), WorkerError> {
            let failing = {
                let mut inner = self.inner.lock();
                inner.calls.push(WorkerCall::SendFile {
                    content_hash: content_hash.to_string(),
                    url: url.to_string(),
                    authenticated: credentials.is_some(),
                });
                inner.failing_sends.contains(content_hash)
            };
            if let Some(barrier) = &self.send_barrier {
                barrier.wait().await;
            }
            if failing {
                return Err(WorkerError::Transfer {
                    content_hash: content_hash.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(())
        }

        async fn start_build(&self, request: StartBuild<'_>) -> Result<BuildStarted, WorkerError> {
            let mut inner = self.inner.lock();
            inner.calls.push(WorkerCall::StartBuild {
                cookie: request.cookie.to_string(),
                builder_type: request.builder_type.to_string(),
                chroot_hash: request.chroot_hash.to_string(),
                filemap: request.filemap.clone(),
                args: request.args.clone(),
            });
            if inner.fail_start {
                return Err(WorkerError::Rpc("builder busy".to_string()));
            }
            Ok(BuildStarted { status: "BuilderStatus.BUILDING".to_string(), info: request.cookie.to_string() })
        }

        async fn get_file(
            &self,
            content_hash: &str,
            dest: &mut (dyn AsyncWrite + Unpin + Send),
        ) -> Result<(), WorkerError> {
            let content = {
                let mut inner = self.inner.lock();
                inner.calls.push(WorkerCall::GetFile { content_hash: content_hash.to_string() });
                if inner.fail_downloads {
                    return Err(WorkerError::Rpc("download interrupted".to_string()));
                }
                inner.files.get(content_hash).cloned()
            };
            let content = content.ok_or_else(|| WorkerError::NotFound(content_hash.to_string()))?;
            dest.write_all(&content).await?;
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorker, WorkerCall};

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
