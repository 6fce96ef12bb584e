// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake document store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DocumentLocation, DocumentStore, StoreError, StoredDocument, VersionToken, WriteOutcome};
use crate::document::SemaphoreDocument;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ScopeExists {
        scope: String,
    },
    Read {
        location: DocumentLocation,
    },
    Write {
        location: DocumentLocation,
        content: String,
        expected: Option<VersionToken>,
        message: String,
    },
}

#[derive(Debug, Clone)]
struct FakeObject {
    content: Vec<u8>,
    version: VersionToken,
}

#[derive(Default)]
struct FakeState {
    scopes: HashSet<String>,
    objects: HashMap<DocumentLocation, FakeObject>,
    next_version: u64,
    /// Writes to reject with a conflict regardless of version
    pending_conflicts: u32,
    /// Reads to fail with a transport error
    pending_read_failures: u32,
    /// Third-party writes applied just before our next writes are checked
    pending_races: VecDeque<Vec<u8>>,
}

impl FakeState {
    fn put(&mut self, location: &DocumentLocation, content: Vec<u8>) -> VersionToken {
        self.next_version += 1;
        let version = VersionToken::new(format!("v{}", self.next_version));
        self.objects.insert(
            location.clone(),
            FakeObject {
                content,
                version: version.clone(),
            },
        );
        version
    }
}

/// In-memory versioned store with fault injection
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a scope
    pub fn with_scope(self, scope: &str) -> Self {
        self.lock_state().scopes.insert(scope.to_string());
        self
    }

    /// Overwrite a document as another worker would, bumping its version
    pub fn put_raw(&self, location: &DocumentLocation, content: impl Into<Vec<u8>>) -> VersionToken {
        self.lock_state().put(location, content.into())
    }

    /// Reject the next `count` writes with a conflict
    pub fn conflict_next_writes(&self, count: u32) {
        self.lock_state().pending_conflicts += count;
    }

    /// Fail the next `count` reads with a transport error
    pub fn fail_next_reads(&self, count: u32) {
        self.lock_state().pending_read_failures += count;
    }

    /// Let another worker write `content` right before our next write lands
    pub fn race_next_write(&self, content: impl Into<Vec<u8>>) {
        self.lock_state().pending_races.push_back(content.into());
    }

    pub fn content(&self, location: &DocumentLocation) -> Option<Vec<u8>> {
        self.lock_state()
            .objects
            .get(location)
            .map(|o| o.content.clone())
    }

    /// Stored document, parsed
    pub fn document(&self, location: &DocumentLocation) -> Option<SemaphoreDocument> {
        self.content(location)
            .and_then(|c| SemaphoreDocument::from_slice(&c).ok())
    }

    pub fn version(&self, location: &DocumentLocation) -> Option<VersionToken> {
        self.lock_state()
            .objects
            .get(location)
            .map(|o| o.version.clone())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn read_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Read { .. }))
            .count()
    }

    /// Recorded write calls, in order
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Write { .. }))
            .collect()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn scope_exists(&self, scope: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::ScopeExists {
            scope: scope.to_string(),
        });
        Ok(self.lock_state().scopes.contains(scope))
    }

    async fn read(
        &self,
        location: &DocumentLocation,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.record(StoreCall::Read {
            location: location.clone(),
        });

        let mut state = self.lock_state();
        if state.pending_read_failures > 0 {
            state.pending_read_failures -= 1;
            return Err(StoreError::Transport("injected read failure".to_string()));
        }
        if !state.scopes.contains(&location.scope) {
            return Err(StoreError::ScopeNotFound(location.scope.clone()));
        }

        Ok(state.objects.get(location).map(|o| StoredDocument {
            content: o.content.clone(),
            version: o.version.clone(),
        }))
    }

    async fn write(
        &self,
        location: &DocumentLocation,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteOutcome, StoreError> {
        self.record(StoreCall::Write {
            location: location.clone(),
            content: String::from_utf8_lossy(content).to_string(),
            expected: expected.cloned(),
            message: message.to_string(),
        });

        let mut state = self.lock_state();
        if !state.scopes.contains(&location.scope) {
            return Err(StoreError::ScopeNotFound(location.scope.clone()));
        }

        if let Some(raced) = state.pending_races.pop_front() {
            state.put(location, raced);
        }

        if state.pending_conflicts > 0 {
            state.pending_conflicts -= 1;
            return Ok(WriteOutcome::Conflict);
        }

        let current = state.objects.get(location).map(|o| &o.version);
        if current != expected {
            return Ok(WriteOutcome::Conflict);
        }

        let version = state.put(location, content.to_vec());
        Ok(WriteOutcome::Written { version })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
