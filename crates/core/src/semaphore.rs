// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore handle binding one key's configuration to a document location

use crate::acquire::{acquire, AcquireOutcome};
use crate::config::SemaphoreConfig;
use crate::error::LockError;
use crate::holder::HolderId;
use crate::manager::LockDocumentManager;
use crate::release::{release, ReleaseOutcome};
use crate::store::{DocumentLocation, DocumentStore};

#[derive(Clone)]
pub struct Semaphore<S> {
    manager: LockDocumentManager<S>,
    config: SemaphoreConfig,
}

impl<S: DocumentStore> Semaphore<S> {
    pub fn new(store: S, location: DocumentLocation, config: SemaphoreConfig) -> Self {
        Self {
            manager: LockDocumentManager::new(store, location),
            config,
        }
    }

    pub fn config(&self) -> &SemaphoreConfig {
        &self.config
    }

    pub fn location(&self) -> &DocumentLocation {
        self.manager.location()
    }

    /// Block until `holder` has a slot
    pub async fn acquire(&self, holder: &HolderId) -> Result<AcquireOutcome, LockError> {
        acquire(&self.manager, &self.config, holder).await
    }

    /// Give up `holder`'s slot, if it has one
    pub async fn release(&self, holder: &HolderId) -> Result<ReleaseOutcome, LockError> {
        release(&self.manager, &self.config, holder).await
    }
}
