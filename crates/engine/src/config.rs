// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use crate::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LIBRARIAN_URL: &str = "http://localhost:58000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory (set BF_STATE_DIR or HOME)")]
    NoStateDir,
}

/// Filesystem layout and endpoints the engine works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state_dir: PathBuf,
    /// Staging root; see [`crate::upload::UploadDirectory`].
    pub upload_root: PathBuf,
    pub librarian_dir: PathBuf,
    pub librarian_url: String,
    pub builds_dir: PathBuf,
    pub tmp_dir: PathBuf,
}

impl Config {
    /// Load from the environment, defaulting every path under the state directory.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::for_root(env::state_dir()?);
        Ok(Self {
            upload_root: env::upload_root().unwrap_or(defaults.upload_root),
            librarian_dir: env::librarian_dir().unwrap_or(defaults.librarian_dir),
            librarian_url: env::librarian_url().unwrap_or(defaults.librarian_url),
            builds_dir: env::builds_dir().unwrap_or(defaults.builds_dir),
            tmp_dir: env::tmp_dir().unwrap_or(defaults.tmp_dir),
            state_dir: defaults.state_dir,
        })
    }

    /// Config with every path under `root` and the default librarian URL.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let state_dir = root.into();
        Self {
            upload_root: state_dir.join("uploads"),
            librarian_dir: state_dir.join("librarian"),
            librarian_url: DEFAULT_LIBRARIAN_URL.to_string(),
            builds_dir: state_dir.join("builds"),
            tmp_dir: state_dir.join("tmp"),
            state_dir,
        }
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
