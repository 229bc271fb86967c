// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

//! Workspace-level behavioural specs: dispatch, status handling and
//! staging driven end to end against the filesystem adapters.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/dispatch.rs"]
mod dispatch;
#[path = "specs/lifecycle.rs"]
mod lifecycle;
#[path = "specs/staging.rs"]
mod staging;
