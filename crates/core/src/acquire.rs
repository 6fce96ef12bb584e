// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acquire protocol
//!
//! Read the document, then either find our own entry (done), claim a free slot and
//! write it back, or wait out the poll interval because the key is full. A lost
//! write race goes back to reading: the claim is recomputed from fresh state,
//! never replayed.
//!
//! There is no attempt limit. The caller blocks until a slot frees up or the
//! process is stopped from outside, and waiters are not served in any order.

use crate::config::SemaphoreConfig;
use crate::document::SemaphoreDocument;
use crate::error::LockError;
use crate::holder::HolderId;
use crate::manager::{LockDocumentManager, Snapshot};
use crate::store::DocumentStore;

/// How an acquire call finished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A slot was claimed; `held` slots of the key are now taken
    Acquired { held: usize },
    /// This holder already had a slot, nothing was written
    AlreadyHeld,
}

/// Decision taken on one read of the document
#[derive(Debug)]
enum Check {
    AlreadyHeld,
    Claim(SemaphoreDocument),
    Full { held: usize },
}

fn check(mut document: SemaphoreDocument, key: &str, holder: &HolderId, capacity: u32) -> Check {
    if document.contains(key, holder) {
        return Check::AlreadyHeld;
    }

    let held = document.held_slots(key);
    if held < capacity as usize {
        document.insert(key, holder);
        Check::Claim(document)
    } else {
        Check::Full { held }
    }
}

/// Block until `holder` holds a slot of `config.key`
#[tracing::instrument(skip_all, fields(key = %config.key, holder = %holder))]
pub async fn acquire<S: DocumentStore>(
    manager: &LockDocumentManager<S>,
    config: &SemaphoreConfig,
    holder: &HolderId,
) -> Result<AcquireOutcome, LockError> {
    config.validate()?;
    let capacity = config.capacity;

    loop {
        let Snapshot { document, version } = manager.fetch_or_initialize().await?;

        match check(document, &config.key, holder, capacity) {
            Check::AlreadyHeld => {
                tracing::info!("lock already acquired by this run");
                return Ok(AcquireOutcome::AlreadyHeld);
            }
            Check::Claim(document) => {
                let held = document.held_slots(&config.key);
                let message = format!("Acquire lock by {}", holder);
                if manager.try_write(&document, &version, &message).await? {
                    tracing::info!(held, capacity, "lock acquired");
                    return Ok(AcquireOutcome::Acquired { held });
                }
                tracing::info!("conflict detected, retrying");
            }
            Check::Full { held } => {
                tracing::info!(
                    held,
                    capacity,
                    poll_ms = config.poll_interval.as_millis() as u64,
                    "max concurrency reached, waiting"
                );
                tokio::time::sleep(config.poll_interval).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "acquire_tests.rs"]
mod tests;
