// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! semlock-core: counting semaphore over a versioned document store
//!
//! This crate provides:
//! - The semaphore document model (key -> holder identities)
//! - The `DocumentStore` port with typed conflict results
//! - The lock document manager (fetch-or-initialize, version-checked writes)
//! - Acquire and release protocols with their retry machinery

pub mod acquire;
pub mod config;
pub mod document;
pub mod error;
pub mod holder;
pub mod manager;
pub mod release;
pub mod retry;
pub mod semaphore;
pub mod store;

#[cfg(test)]
mod test_logs;

pub use acquire::{acquire, AcquireOutcome};
pub use config::{SemaphoreConfig, DEFAULT_CAPACITY, DEFAULT_POLL_INTERVAL};
pub use document::{Removal, SemaphoreDocument};
pub use error::LockError;
pub use holder::HolderId;
pub use manager::{LockDocumentManager, Snapshot};
pub use release::{release, ReleaseOutcome};
pub use retry::{retry, Exhausted, RetryPolicy};
pub use semaphore::Semaphore;
pub use store::{
    DocumentLocation, DocumentStore, StoreError, StoredDocument, VersionToken, WriteOutcome,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
