// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock document manager
//!
//! Owns the read-modify-write boundary with the store:
//! - fetches the shared document, creating it on first use
//! - replaces an unparseable document with an empty one instead of failing
//! - performs version-checked writes, reporting a lost race as `false`

use crate::document::SemaphoreDocument;
use crate::error::LockError;
use crate::store::{DocumentLocation, DocumentStore, VersionToken, WriteOutcome};

/// A document as read at one version
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub document: SemaphoreDocument,
    pub version: VersionToken,
}

/// Reads and writes the shared semaphore document at one location
#[derive(Clone)]
pub struct LockDocumentManager<S> {
    store: S,
    location: DocumentLocation,
}

impl<S: DocumentStore> LockDocumentManager<S> {
    pub fn new(store: S, location: DocumentLocation) -> Self {
        Self { store, location }
    }

    pub fn location(&self) -> &DocumentLocation {
        &self.location
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the document, creating an empty one if it does not exist yet.
    ///
    /// Fails fast if the scope was never provisioned; scopes are not created here.
    pub async fn fetch_or_initialize(&self) -> Result<Snapshot, LockError> {
        let scope = &self.location.scope;
        if !self.store.scope_exists(scope).await? {
            tracing::error!(scope = %scope, "branch does not exist, create it manually");
            return Err(LockError::ScopeMissing {
                scope: scope.clone(),
            });
        }

        loop {
            if let Some(stored) = self.store.read(&self.location).await? {
                let document = match SemaphoreDocument::from_slice(&stored.content) {
                    Ok(document) => document,
                    Err(e) => {
                        tracing::warn!(
                            location = %self.location,
                            error = %e,
                            "failed to parse lock file, reinitializing"
                        );
                        SemaphoreDocument::new()
                    }
                };
                return Ok(Snapshot {
                    document,
                    version: stored.version,
                });
            }

            tracing::info!(location = %self.location, "lock file not found, creating it");
            let initial = SemaphoreDocument::new().to_vec_pretty()?;
            let message = format!("Initialize lock file at {}", self.location.path);

            // Losing the create race is fine: someone else made the file, read theirs.
            match self
                .store
                .write(&self.location, &initial, None, &message)
                .await?
            {
                WriteOutcome::Written { .. } => tracing::info!("lock file created"),
                WriteOutcome::Conflict => {
                    tracing::info!("lock file created by another worker, reading it")
                }
            }
        }
    }

    /// Write `document` if the stored version is still `expected`.
    ///
    /// Returns `false` when another writer got there first.
    pub async fn try_write(
        &self,
        document: &SemaphoreDocument,
        expected: &VersionToken,
        description: &str,
    ) -> Result<bool, LockError> {
        let content = document.to_vec_pretty()?;
        match self
            .store
            .write(&self.location, &content, Some(expected), description)
            .await?
        {
            WriteOutcome::Written { version } => {
                tracing::debug!(%version, description, "lock file updated");
                Ok(true)
            }
            WriteOutcome::Conflict => {
                tracing::debug!(%expected, description, "lock file changed since read");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
