// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures as the user sees them: what went wrong, what we know about why,
//! and what to try next.

use semlock_core::{DocumentLocation, LockError};
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub struct SemlockError {
    /// One-line summary, also used for the `::error::` workflow command
    pub message: String,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
    cause: Option<LockError>,
}

impl SemlockError {
    fn build(message: String, context: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            message,
            context,
            suggestions,
            cause: None,
        }
    }

    pub fn caused_by(mut self, err: LockError) -> Self {
        self.cause = Some(err);
        self
    }

    /// A required setting came from none of flags, environment or config file.
    pub fn missing_setting(name: &str, flag: &str, env: &str) -> Self {
        Self::build(
            format!("Missing required setting '{}'", name),
            vec![],
            vec![
                format!("Pass {}", flag),
                format!("Or set {}", env),
                format!("Or add '{}' to the file given with --config", name),
            ],
        )
    }

    pub fn holder_missing() -> Self {
        Self::build(
            "Cannot tell which run is holding the lock".to_string(),
            vec![
                "--holder was not given and SEMLOCK_HOLDER is not set".to_string(),
                "GITHUB_WORKFLOW, GITHUB_RUN_ID and GITHUB_JOB are not all set".to_string(),
            ],
            vec![
                "Pass --holder <ID>, unique per run and job".to_string(),
                "Or run inside GitHub Actions, where the run identity is derived".to_string(),
            ],
        )
    }

    pub fn invalid_repository(value: &str) -> Self {
        Self::build(
            format!("Invalid repository '{}'", value),
            vec!["Expected OWNER/NAME, e.g. octo-org/deploy-tools".to_string()],
            vec!["Pass --repository OWNER/NAME or set GITHUB_REPOSITORY".to_string()],
        )
    }

    pub fn branch_missing(location: &DocumentLocation) -> Self {
        Self::build(
            format!("Lock branch '{}' does not exist", location.scope),
            vec!["The lock branch is never created automatically".to_string()],
            vec![
                format!("Create it: git push origin HEAD:refs/heads/{}", location.scope),
                "Or point at an existing branch with --scope".to_string(),
            ],
        )
    }

    pub fn directory_missing(root: &Path, location: &DocumentLocation) -> Self {
        let dir = root.join(&location.scope);
        Self::build(
            format!("Lock directory '{}' does not exist", dir.display()),
            vec!["The scope directory is never created automatically".to_string()],
            vec![
                format!("Create it: mkdir -p {}", dir.display()),
                "Or point at an existing directory with --root and --scope".to_string(),
            ],
        )
    }

    /// Acquire was stopped by the user before a slot was free.
    pub fn interrupted(key: &str) -> Self {
        Self::build(
            format!("Interrupted while waiting for lock '{}'", key),
            vec!["No slot was claimed".to_string()],
            vec![],
        )
    }

    /// Any other protocol failure, with hints for the cases we can name.
    pub fn lock_failed(operation: &str, key: &str, err: LockError) -> Self {
        let mut context = vec![err.to_string()];
        let suggestions = match &err {
            LockError::InvalidConfig(_) => {
                vec!["Use a non-empty --key and a --capacity of at least 1".to_string()]
            }
            LockError::RetriesExhausted { .. } => {
                context.push("The lock file kept changing or the store kept failing".to_string());
                vec![
                    "Retry the release; it is safe to repeat".to_string(),
                    "Raise --release-attempts or --release-delay".to_string(),
                ]
            }
            _ => vec![],
        };
        Self::build(
            format!("Failed to {} lock '{}'", operation, key),
            context,
            suggestions,
        )
        .caused_by(err)
    }
}

impl fmt::Display for SemlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        for line in &self.context {
            writeln!(f, "  = {}", line)?;
        }
        for suggestion in &self.suggestions {
            writeln!(f, "help: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for SemlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as _)
    }
}
