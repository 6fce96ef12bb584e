// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `semlock release`: give up this run's slot

use super::RunError;
use crate::output::{self, OutputFormat, Report};
use semlock_core::{DocumentStore, HolderId, Semaphore};

pub async fn handle<S: DocumentStore>(
    semaphore: &Semaphore<S>,
    holder: &HolderId,
    format: OutputFormat,
) -> Result<(), RunError> {
    let key = semaphore.config().key.as_str();
    tracing::info!(key, %holder, location = %semaphore.location(), "releasing lock");

    let outcome = semaphore.release(holder).await?;

    output::print(&Report::released(key, holder, outcome), format);
    Ok(())
}
