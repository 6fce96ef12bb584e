// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations
//!
//! Both commands share one set of arguments. Each value is taken from the first
//! source that has it: flag, environment variable, config file, built-in default.

pub mod acquire;
pub mod release;

use crate::error::SemlockError;
use crate::output::OutputFormat;
use crate::settings::{Backend, FileSettings};
use clap::Args;
use semlock_adapters::{DirectoryStore, GitHubStore, TracedStore};
use semlock_core::{
    DocumentLocation, DocumentStore, HolderId, LockError, Semaphore, SemaphoreConfig,
};
use std::path::PathBuf;
use std::time::Duration;

/// Branch (or directory) holding the lock file when none is given
pub const DEFAULT_SCOPE: &str = "locks";

#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Where the lock file is kept [default: github]
    #[arg(long, value_enum, env = "SEMLOCK_BACKEND")]
    pub backend: Option<Backend>,

    /// Root directory for the directory backend
    #[arg(long, env = "SEMLOCK_ROOT")]
    pub root: Option<PathBuf>,

    /// Repository holding the lock branch, as OWNER/NAME
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long, env = "SEMLOCK_API_URL")]
    pub api_url: Option<String>,

    /// Branch (or sub-directory) holding the lock file [default: locks]
    #[arg(long, env = "SEMLOCK_SCOPE")]
    pub scope: Option<String>,

    /// Path of the lock file within the scope
    #[arg(long, env = "SEMLOCK_PATH")]
    pub path: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SemaphoreArgs {
    /// Semaphore key; runs sharing a key share its capacity
    #[arg(long, env = "SEMLOCK_KEY")]
    pub key: Option<String>,

    /// How many runs may hold the key at once [default: 1]
    #[arg(long, env = "SEMLOCK_CAPACITY")]
    pub capacity: Option<u32>,

    /// Wait between checks while the key is full [default: 10s]
    #[arg(long, env = "SEMLOCK_POLL_INTERVAL", value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Release attempts before giving up [default: 5]
    #[arg(long, env = "SEMLOCK_RELEASE_ATTEMPTS")]
    pub release_attempts: Option<u32>,

    /// Backoff before the first release retry, doubling after [default: 150ms]
    #[arg(long, env = "SEMLOCK_RELEASE_DELAY", value_parser = humantime::parse_duration)]
    pub release_delay: Option<Duration>,

    /// Identity of this run [default: $GITHUB_WORKFLOW:$GITHUB_RUN_ID:$GITHUB_JOB]
    #[arg(long, env = "SEMLOCK_HOLDER")]
    pub holder: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LockArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub semaphore: SemaphoreArgs,
}

/// Backend selection with everything it needs to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    GitHub {
        owner: String,
        repo: String,
        token: String,
        api_url: Option<String>,
    },
    Directory {
        root: PathBuf,
    },
}

/// Fully merged settings for one command
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: SemaphoreConfig,
    pub location: DocumentLocation,
    pub target: StoreTarget,
    pub holder: HolderId,
}

impl LockArgs {
    /// Merge flags and environment over the config file; `env` reads the
    /// GitHub run variables used to derive a holder.
    pub fn resolve(
        self,
        file: FileSettings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Resolved, SemlockError> {
        let StoreArgs {
            backend,
            root,
            repository,
            token,
            api_url,
            scope,
            path,
        } = self.store;
        let SemaphoreArgs {
            key,
            capacity,
            poll_interval,
            release_attempts,
            release_delay,
            holder,
        } = self.semaphore;
        let (sem, store) = (file.semaphore, file.store);

        let key = key
            .or(sem.key)
            .ok_or_else(|| SemlockError::missing_setting("key", "--key <KEY>", "SEMLOCK_KEY"))?;
        let path = path
            .or(store.path)
            .ok_or_else(|| SemlockError::missing_setting("path", "--path <PATH>", "SEMLOCK_PATH"))?;
        let scope = scope
            .or(store.scope)
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

        let mut release_retry = sem.release_retry.unwrap_or_default();
        if let Some(attempts) = release_attempts {
            release_retry.max_attempts = attempts;
        }
        if let Some(delay) = release_delay {
            release_retry.initial_delay = delay;
        }

        let mut config = SemaphoreConfig::new(key).with_release_retry(release_retry);
        if let Some(capacity) = capacity.or(sem.capacity) {
            config = config.with_capacity(capacity);
        }
        if let Some(interval) = poll_interval.or(sem.poll_interval) {
            config = config.with_poll_interval(interval);
        }
        config
            .validate()
            .map_err(|e| SemlockError::lock_failed("configure", &config.key, e))?;

        let target = match backend.or(store.backend).unwrap_or_default() {
            Backend::Github => {
                let repository = repository.or(store.repository).ok_or_else(|| {
                    SemlockError::missing_setting(
                        "repository",
                        "--repository <OWNER/NAME>",
                        "GITHUB_REPOSITORY",
                    )
                })?;
                let (owner, repo) = split_repository(&repository)?;
                let token = token.ok_or_else(|| {
                    SemlockError::missing_setting("token", "--token <TOKEN>", "GITHUB_TOKEN")
                })?;
                StoreTarget::GitHub {
                    owner,
                    repo,
                    token,
                    api_url: api_url.or(store.api_url),
                }
            }
            Backend::Directory => StoreTarget::Directory {
                root: root.or(store.root).ok_or_else(|| {
                    SemlockError::missing_setting("root", "--root <DIR>", "SEMLOCK_ROOT")
                })?,
            },
        };

        let holder = holder
            .map(HolderId::new)
            .or_else(|| holder_from_run(&env))
            .ok_or_else(SemlockError::holder_missing)?;

        Ok(Resolved {
            config,
            location: DocumentLocation::new(scope, path),
            target,
            holder,
        })
    }
}

fn split_repository(value: &str) -> Result<(String, String), SemlockError> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(SemlockError::invalid_repository(value)),
    }
}

/// Holder derived from the GitHub Actions run, if all three parts are set
fn holder_from_run(env: &impl Fn(&str) -> Option<String>) -> Option<HolderId> {
    let part = |name: &str| env(name).filter(|v| !v.is_empty());
    let workflow = part("GITHUB_WORKFLOW")?;
    let run_id = part("GITHUB_RUN_ID")?;
    let job = part("GITHUB_JOB")?;
    Some(HolderId::from_run(&workflow, &run_id, &job))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Acquire,
    Release,
}

/// Open the selected store and run `operation` against it
pub async fn execute(
    operation: Operation,
    resolved: Resolved,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Resolved {
        config,
        location,
        target,
        holder,
    } = resolved;

    match target {
        StoreTarget::GitHub {
            owner,
            repo,
            token,
            api_url,
        } => {
            let mut store = GitHubStore::new(owner, repo, token)?;
            if let Some(url) = api_url {
                store = store.with_api_url(&url)?;
            }
            tracing::debug!(?store, %location, "using github store");
            let semaphore = Semaphore::new(TracedStore::new(store), location, config);
            run(operation, &semaphore, &holder, format)
                .await
                .map_err(|e| explain(e, operation, &semaphore, None))
        }
        StoreTarget::Directory { root } => {
            tracing::debug!(root = %root.display(), %location, "using directory store");
            let store = DirectoryStore::new(&root);
            let semaphore = Semaphore::new(TracedStore::new(store), location, config);
            run(operation, &semaphore, &holder, format)
                .await
                .map_err(|e| explain(e, operation, &semaphore, Some(&root)))
        }
    }
}

async fn run<S: DocumentStore>(
    operation: Operation,
    semaphore: &Semaphore<S>,
    holder: &HolderId,
    format: OutputFormat,
) -> Result<(), RunError> {
    match operation {
        Operation::Acquire => acquire::handle(semaphore, holder, format).await,
        Operation::Release => release::handle(semaphore, holder, format).await,
    }
}

/// Failure of a command, before it is rendered for the user
#[derive(Debug)]
pub enum RunError {
    Lock(LockError),
    Interrupted,
}

impl From<LockError> for RunError {
    fn from(err: LockError) -> Self {
        RunError::Lock(err)
    }
}

fn explain<S: DocumentStore>(
    err: RunError,
    operation: Operation,
    semaphore: &Semaphore<S>,
    root: Option<&std::path::Path>,
) -> anyhow::Error {
    let key = semaphore.config().key.as_str();
    let error = match err {
        RunError::Interrupted => SemlockError::interrupted(key),
        RunError::Lock(err) if err.is_scope_missing() => {
            let location = semaphore.location();
            let error = match root {
                Some(root) => SemlockError::directory_missing(root, location),
                None => SemlockError::branch_missing(location),
            };
            error.caused_by(err)
        }
        RunError::Lock(err) => {
            let verb = match operation {
                Operation::Acquire => "acquire",
                Operation::Release => "release",
            };
            SemlockError::lock_failed(verb, key, err)
        }
    };
    error.into()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
