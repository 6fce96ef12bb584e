// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holder identities
//!
//! A holder identity names one execution attempt. Two calls made with the same
//! identity are treated as the same holder by both protocols.

use serde::{Deserialize, Serialize};

/// Unique identifier for a semaphore holder
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(pub String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity for one job of one workflow run, formatted `workflow:run_id:job`
    pub fn from_run(workflow: &str, run_id: &str, job: &str) -> Self {
        Self(format!("{}:{}:{}", workflow, run_id, job))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HolderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
