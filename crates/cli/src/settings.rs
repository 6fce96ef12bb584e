// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML settings file
//!
//! ```toml
//! [semaphore]
//! key = "deploy"
//! capacity = 2
//! poll_interval = "5s"
//!
//! [semaphore.release_retry]
//! max_attempts = 5
//! initial_delay = "150ms"
//!
//! [store]
//! backend = "github"
//! repository = "octo-org/deploy-tools"
//! scope = "locks"
//! path = "semaphore.json"
//! ```
//!
//! Every value can be overridden by a flag or environment variable.

use anyhow::Context;
use clap::ValueEnum;
use semlock_core::RetryPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub semaphore: SemaphoreTable,
    pub store: StoreTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SemaphoreTable {
    pub key: Option<String>,
    pub capacity: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
    pub release_retry: Option<RetryPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreTable {
    pub backend: Option<Backend>,
    pub root: Option<PathBuf>,
    pub repository: Option<String>,
    pub api_url: Option<String>,
    pub scope: Option<String>,
    pub path: Option<String>,
}

/// Where the lock file is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A file on a branch of a GitHub repository
    #[default]
    Github,
    /// A file under a local or shared directory
    Directory,
}

impl FileSettings {
    /// Load settings from `path`, or defaults when no file was given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
