// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Release protocol
//!
//! Read the document, drop our entry (and the key with it once empty), write back.
//! A lost write race re-reads and recomputes the removal. Releasing something that
//! is not held is a warning, not an error.
//!
//! Unlike acquire, release must not hang: the whole cycle runs under the
//! configured [`RetryPolicy`](crate::retry::RetryPolicy), and a release that keeps
//! failing is reported to the caller. Conflicts re-read at once, but one attempt
//! gives up after as many conflicts as the policy has attempts, so steady
//! contention on other keys of the same document still ends in an error.

use crate::config::SemaphoreConfig;
use crate::document::Removal;
use crate::error::LockError;
use crate::holder::HolderId;
use crate::manager::{LockDocumentManager, Snapshot};
use crate::retry::retry;
use crate::store::DocumentStore;

/// How a release call finished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Our entry was removed, `remaining` holders are left under the key
    Released { remaining: usize },
    /// Nothing was held under the key
    KeyAbsent,
    /// The key is held, but not by us
    HolderAbsent,
}

/// Give up the slot `holder` holds under `config.key`
#[tracing::instrument(skip_all, fields(key = %config.key, holder = %holder))]
pub async fn release<S: DocumentStore>(
    manager: &LockDocumentManager<S>,
    config: &SemaphoreConfig,
    holder: &HolderId,
) -> Result<ReleaseOutcome, LockError> {
    let key = config.key.as_str();
    let max_conflicts = config.release_retry.attempts();
    retry(&config.release_retry, move || {
        release_once(manager, key, holder, max_conflicts)
    })
        .await
        .map_err(|exhausted| {
            tracing::error!(
                attempts = exhausted.attempts,
                error = %exhausted.last,
                "error during lock release"
            );
            LockError::RetriesExhausted {
                attempts: exhausted.attempts,
                source: Box::new(exhausted.last),
            }
        })
}

async fn release_once<S: DocumentStore>(
    manager: &LockDocumentManager<S>,
    key: &str,
    holder: &HolderId,
    max_conflicts: u32,
) -> Result<ReleaseOutcome, LockError> {
    let mut conflicts = 0;
    loop {
        let Snapshot {
            mut document,
            version,
        } = manager.fetch_or_initialize().await?;

        match document.remove(key, holder) {
            Removal::KeyAbsent => {
                tracing::warn!("lock key not found during release");
                return Ok(ReleaseOutcome::KeyAbsent);
            }
            Removal::HolderAbsent => {
                tracing::warn!("run id not found in lock entries during release");
                return Ok(ReleaseOutcome::HolderAbsent);
            }
            Removal::Removed { remaining } => {
                let message = format!("Release lock by {}", holder);
                if manager.try_write(&document, &version, &message).await? {
                    tracing::info!(remaining, "lock released");
                    return Ok(ReleaseOutcome::Released { remaining });
                }
                conflicts += 1;
                if conflicts >= max_conflicts {
                    return Err(LockError::Contended { conflicts });
                }
                tracing::info!("conflict detected during release, retrying");
            }
        }
    }
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;
