// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore document model
//!
//! The entire coordination state of one scope lives in a single JSON object mapping
//! each semaphore key to the identities currently holding a slot under it. A key
//! with no holders is never stored; an absent key means zero held slots.

use crate::holder::HolderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared semaphore document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemaphoreDocument {
    entries: BTreeMap<String, Vec<String>>,
}

/// Result of removing a holder from a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// Holder removed, leaving `remaining` holders under the key
    Removed { remaining: usize },
    /// Nothing is held under the key
    KeyAbsent,
    /// The key is held, but not by this holder
    HolderAbsent,
}

impl SemaphoreDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its wire form.
    ///
    /// Keys mapped to an empty array are dropped on the way in.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_slice(bytes)?;
        doc.entries.retain(|_, holders| !holders.is_empty());
        Ok(doc)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Holders of `key`, in acquisition order
    pub fn holders(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of slots currently held under `key`
    pub fn held_slots(&self, key: &str) -> usize {
        self.holders(key).len()
    }

    pub fn contains(&self, key: &str, holder: &HolderId) -> bool {
        self.holders(key).iter().any(|h| h == holder.as_str())
    }

    /// Record `holder` under `key`. Returns false if it was already there.
    pub fn insert(&mut self, key: &str, holder: &HolderId) -> bool {
        if self.contains(key, holder) {
            return false;
        }
        self.entries
            .entry(key.to_string())
            .or_default()
            .push(holder.0.clone());
        true
    }

    /// Remove `holder` from `key`, deleting the key once its last holder leaves
    pub fn remove(&mut self, key: &str, holder: &HolderId) -> Removal {
        let Some(holders) = self.entries.get_mut(key) else {
            return Removal::KeyAbsent;
        };
        let Some(index) = holders.iter().position(|h| h == holder.as_str()) else {
            return Removal::HolderAbsent;
        };

        holders.remove(index);
        let remaining = holders.len();
        if remaining == 0 {
            self.entries.remove(key);
        }
        Removal::Removed { remaining }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
