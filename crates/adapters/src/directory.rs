// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local directory store
//!
//! Scopes are sub-directories of a root directory and must already exist. The
//! version of a document is the SHA-256 of its bytes, and every version check plus
//! write happens under an exclusive lock on a `<file>.lock` sidecar, so processes
//! sharing the directory get a real compare-and-swap.

use async_trait::async_trait;
use fs2::FileExt;
use semlock_core::{DocumentLocation, DocumentStore, StoreError, StoredDocument, VersionToken, WriteOutcome};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Document store over a local directory tree
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_dir(&self, scope: &str) -> Result<PathBuf, StoreError> {
        check_relative(scope)?;
        Ok(self.root.join(scope))
    }

    fn document_path(&self, location: &DocumentLocation) -> Result<PathBuf, StoreError> {
        check_relative(&location.path)?;
        Ok(self.scope_dir(&location.scope)?.join(&location.path))
    }
}

/// Only plain relative paths; no `..`, roots or prefixes
fn check_relative(path: &str) -> Result<(), StoreError> {
    let p = Path::new(path);
    let plain = !path.is_empty() && p.components().all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

/// Equal content means equal version. Identical bytes describe identical state, so a
/// writer holding an old token for the same bytes still computes a valid update.
fn content_version(content: &[u8]) -> VersionToken {
    VersionToken::new(format!("{:x}", Sha256::digest(content)))
}

fn read_document(path: &Path) -> Result<Option<StoredDocument>, StoreError> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(StoredDocument {
            version: content_version(&content),
            content,
        })),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn write_document(
    path: &Path,
    content: &[u8],
    expected: Option<&VersionToken>,
) -> Result<WriteOutcome, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(sidecar(path, ".lock"))?;
    lock.lock_exclusive()?;

    let current = read_document(path)?.map(|d| d.version);
    let outcome = if current.as_ref() == expected {
        replace_atomically(path, content)?;
        WriteOutcome::Written {
            version: content_version(content),
        }
    } else {
        WriteOutcome::Conflict
    };

    FileExt::unlock(&lock)?;
    Ok(outcome)
}

/// Write to a temp file next to `path`, then rename it into place. The temp file
/// is removed if any step fails.
fn replace_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(io::Error::other(e)))?
}

#[async_trait]
impl DocumentStore for DirectoryStore {
    async fn scope_exists(&self, scope: &str) -> Result<bool, StoreError> {
        let dir = self.scope_dir(scope)?;
        blocking(move || Ok(dir.is_dir())).await
    }

    async fn read(
        &self,
        location: &DocumentLocation,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let path = self.document_path(location)?;
        blocking(move || read_document(&path)).await
    }

    async fn write(
        &self,
        location: &DocumentLocation,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteOutcome, StoreError> {
        let scope = self.scope_dir(&location.scope)?;
        let path = self.document_path(location)?;
        let content = content.to_vec();
        let expected = expected.cloned();

        tracing::trace!(path = %path.display(), commit_message = message, "writing document");
        blocking(move || {
            if !scope.is_dir() {
                return Err(StoreError::ScopeNotFound(scope.display().to_string()));
            }
            write_document(&path, &content, expected.as_ref())
        })
        .await
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
