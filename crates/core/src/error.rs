// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the acquire and release protocols

use crate::store::StoreError;
use thiserror::Error;

/// Fatal lock errors.
///
/// Write conflicts and malformed documents never show up here: the protocols
/// absorb them.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("branch '{scope}' does not exist; create it manually before using the lock")]
    ScopeMissing { scope: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to encode lock document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("release failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<LockError>,
    },
    #[error("lock file changed {conflicts} times in a row before our write landed")]
    Contended { conflicts: u32 },
    #[error("invalid semaphore configuration: {0}")]
    InvalidConfig(String),
}

impl LockError {
    /// True if this error, or the failure it wraps, is a missing coordination scope
    pub fn is_scope_missing(&self) -> bool {
        match self {
            LockError::ScopeMissing { .. } => true,
            LockError::RetriesExhausted { source, .. } => source.is_scope_missing(),
            _ => false,
        }
    }

    /// Name of the missing scope, if that is what went wrong
    pub fn missing_scope(&self) -> Option<&str> {
        match self {
            LockError::ScopeMissing { scope } => Some(scope),
            LockError::RetriesExhausted { source, .. } => source.missing_scope(),
            _ => None,
        }
    }
}
