// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use async_trait::async_trait;
use semlock_core::{DocumentLocation, DocumentStore, StoreError, StoredDocument, VersionToken, WriteOutcome};
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any DocumentStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TracedStore<S> {
    async fn scope_exists(&self, scope: &str) -> Result<bool, StoreError> {
        let result = self.inner.scope_exists(scope).await;
        match &result {
            Ok(exists) => tracing::debug!(scope, exists, "checked scope"),
            Err(e) => tracing::error!(scope, error = %e, "scope check failed"),
        }
        result
    }

    async fn read(
        &self,
        location: &DocumentLocation,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let span = tracing::debug_span!("store.read", scope = %location.scope, path = %location.path);

        async {
            let start = Instant::now();
            let result = self.inner.read(location).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(doc)) => tracing::debug!(
                    elapsed_ms,
                    version = %doc.version,
                    bytes = doc.content.len(),
                    "read"
                ),
                Ok(None) => tracing::debug!(elapsed_ms, "not found"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "read failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn write(
        &self,
        location: &DocumentLocation,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteOutcome, StoreError> {
        let span = tracing::info_span!(
            "store.write",
            scope = %location.scope,
            path = %location.path,
            expected = %expected.map(VersionToken::as_str).unwrap_or("<create>"),
        );

        async {
            tracing::debug!(commit_message = message, bytes = content.len(), "writing");

            let start = Instant::now();
            let result = self.inner.write(location, content, expected, message).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(WriteOutcome::Written { version }) => {
                    tracing::info!(elapsed_ms, %version, "written")
                }
                // Conflicts are routine under contention
                Ok(WriteOutcome::Conflict) => tracing::info!(elapsed_ms, "version conflict"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "write failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
