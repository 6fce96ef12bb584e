// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry with exponential backoff
//!
//! This helper does not look at the failure it retries. Conflict handling lives in
//! the protocols themselves; this only bounds how long an operation may keep failing.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the first retry
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(150);

/// How many times to try and how long to wait in between
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first (zero is treated as one)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for every retry after that
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Backoff before retry number `retry_index`, counting from 0 for the first retry
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let factor = 1u32.checked_shl(retry_index).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// The last failure of an operation that ran out of attempts
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Run `op` until it succeeds or the policy's attempts are used up
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= attempts {
                    tracing::error!(attempt, error = %e, "giving up");
                    return Err(Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }

                let delay = policy.delay_for(attempt - 1);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
