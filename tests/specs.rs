// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specifications for the semlock CLI.
//!
//! These tests are black-box: they invoke the CLI binary against a directory
//! store in a temp dir and verify stdout, stderr, exit codes and the lock file.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/config.rs"]
mod cli_config;
#[path = "specs/cli/errors.rs"]
mod cli_errors;

// lock/
#[path = "specs/lock/acquire.rs"]
mod lock_acquire;
#[path = "specs/lock/release.rs"]
mod lock_release;
