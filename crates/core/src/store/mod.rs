// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned document store port
//!
//! Stores hand out an opaque version token with every read and accept a write only
//! while the caller's token still matches. A stale token is reported as
//! [`WriteOutcome::Conflict`], never as an error.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use thiserror::Error;

/// Opaque content version returned by a read and required by a write
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the shared document lives: a scope (branch, directory) and a path inside it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentLocation {
    pub scope: String,
    pub path: String,
}

impl DocumentLocation {
    pub fn new(scope: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.path, self.scope)
    }
}

/// Raw document content together with the version it was read at
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

/// Result of a version-checked write
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { version: VersionToken },
    /// The expected version no longer matches (or the object already exists on create)
    Conflict,
}

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scope not found: {0}")]
    ScopeNotFound(String),
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error("unexpected HTTP status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed store response: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for a remote store with optimistic concurrency control
#[async_trait]
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Check that the coordination scope has been provisioned
    async fn scope_exists(&self, scope: &str) -> Result<bool, StoreError>;

    /// Read a document. `Ok(None)` means no such object.
    async fn read(&self, location: &DocumentLocation)
        -> Result<Option<StoredDocument>, StoreError>;

    /// Write a document if its current version is `expected`.
    ///
    /// `expected = None` creates the object and conflicts if it already exists.
    async fn write(
        &self,
        location: &DocumentLocation,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteOutcome, StoreError>;
}
