// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Document store backends for the lock file

pub mod directory;
pub mod github;
pub mod traced;

pub use directory::DirectoryStore;
pub use github::{GitHubStore, DEFAULT_API_URL};
pub use traced::TracedStore;
