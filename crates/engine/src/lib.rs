// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bf-engine: Build dispatch and result processing

pub mod composer;
pub mod config;
mod dispatch;
mod engine;
pub mod env;
mod error;
pub mod log_archive;
pub mod redact;
mod status;
pub mod upload;

#[cfg(test)]
mod test_helpers;

pub use composer::{
    BinaryPackageComposer, BuildRequest, ComposerRegistry, InputFile, JobRequestComposer,
    RecipeComposer,
};
pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineDeps, FsEngine};
pub use error::{ComposeError, DispatchError, StatusError};
pub use log_archive::{content_type_for, ArchiveError, LogArchiver, BUILDLOG_HASH};
pub use redact::sanitise_urls;
pub use upload::{resolve_within, UploadDirectory};
