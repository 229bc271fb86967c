// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Resolve state directory: BF_STATE_DIR > XDG_STATE_HOME/buildfarm > ~/.local/state/buildfarm
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = non_empty("BF_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("buildfarm"));
    }
    let home = non_empty("HOME").ok_or(ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/buildfarm"))
}

/// Root holding `grabbing/`, `incoming/` and `failed/`.
pub fn upload_root() -> Option<PathBuf> {
    non_empty("BF_UPLOAD_ROOT").map(PathBuf::from)
}

pub fn librarian_dir() -> Option<PathBuf> {
    non_empty("BF_LIBRARIAN_DIR").map(PathBuf::from)
}

/// Base URL stored files are served from.
pub fn librarian_url() -> Option<String> {
    non_empty("BF_LIBRARIAN_URL")
}

pub fn builds_dir() -> Option<PathBuf> {
    non_empty("BF_BUILDS_DIR").map(PathBuf::from)
}

/// Scratch space for logs on their way to the content store.
pub fn tmp_dir() -> Option<PathBuf> {
    non_empty("BF_TMP_DIR").map(PathBuf::from)
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
