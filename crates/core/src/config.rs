// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore configuration

use crate::error::LockError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Slots per key when none is configured; a plain mutex
pub const DEFAULT_CAPACITY: u32 = 1;

/// How long a blocked acquirer waits before reading the document again
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for one semaphore key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreConfig {
    /// Name of the semaphore key inside the shared document
    pub key: String,
    /// Maximum concurrent holders of the key
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Wait between reads while the key is at capacity
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Retry budget for a release that keeps failing
    #[serde(default)]
    pub release_retry: RetryPolicy,
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl SemaphoreConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            capacity: DEFAULT_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            release_retry: RetryPolicy::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_release_retry(mut self, policy: RetryPolicy) -> Self {
        self.release_retry = policy;
        self
    }

    /// Reject settings under which acquire could never succeed
    pub fn validate(&self) -> Result<(), LockError> {
        if self.key.trim().is_empty() {
            return Err(LockError::InvalidConfig("lock key must not be empty".to_string()));
        }
        if self.capacity == 0 {
            return Err(LockError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
