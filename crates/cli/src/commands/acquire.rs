// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `semlock acquire`: block until this run holds a slot

use super::RunError;
use crate::output::{self, OutputFormat, Report};
use semlock_core::{DocumentStore, HolderId, LockError, Semaphore};
use std::future::Future;

pub async fn handle<S: DocumentStore>(
    semaphore: &Semaphore<S>,
    holder: &HolderId,
    format: OutputFormat,
) -> Result<(), RunError> {
    let key = semaphore.config().key.as_str();
    tracing::info!(
        key,
        %holder,
        capacity = semaphore.config().capacity,
        location = %semaphore.location(),
        "acquiring lock"
    );

    let outcome = until_interrupted(semaphore.acquire(holder), tokio::signal::ctrl_c()).await?;

    output::print(&Report::acquired(key, holder, outcome), format);
    Ok(())
}

/// Run `acquire` unless `interrupt` resolves first. An interrupt source that
/// failed to install never fires.
async fn until_interrupted<T>(
    acquire: impl Future<Output = Result<T, LockError>>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<T, RunError> {
    tokio::select! {
        outcome = acquire => Ok(outcome?),
        Ok(()) = interrupt => {
            tracing::warn!("interrupted before a slot was claimed");
            Err(RunError::Interrupted)
        }
    }
}

#[cfg(test)]
#[path = "acquire_tests.rs"]
mod tests;
