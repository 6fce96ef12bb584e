// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use semlock_core::{AcquireOutcome, HolderId, ReleaseOutcome};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// What a command did to one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub key: String,
    pub holder: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Acquired,
    AlreadyHeld,
    Released,
    KeyAbsent,
    HolderAbsent,
}

impl Report {
    pub fn acquired(key: &str, holder: &HolderId, outcome: AcquireOutcome) -> Self {
        let (outcome, held) = match outcome {
            AcquireOutcome::Acquired { held } => (Outcome::Acquired, Some(held)),
            AcquireOutcome::AlreadyHeld => (Outcome::AlreadyHeld, None),
        };
        Self {
            key: key.to_string(),
            holder: holder.to_string(),
            outcome,
            held,
            remaining: None,
        }
    }

    pub fn released(key: &str, holder: &HolderId, outcome: ReleaseOutcome) -> Self {
        let (outcome, remaining) = match outcome {
            ReleaseOutcome::Released { remaining } => (Outcome::Released, Some(remaining)),
            ReleaseOutcome::KeyAbsent => (Outcome::KeyAbsent, None),
            ReleaseOutcome::HolderAbsent => (Outcome::HolderAbsent, None),
        };
        Self {
            key: key.to_string(),
            holder: holder.to_string(),
            outcome,
            held: None,
            remaining,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Acquired => write!(f, "Lock '{}' acquired by {}", self.key, self.holder)?,
            Outcome::AlreadyHeld => {
                write!(f, "Lock '{}' already held by {}", self.key, self.holder)?
            }
            Outcome::Released => write!(f, "Lock '{}' released by {}", self.key, self.holder)?,
            Outcome::KeyAbsent => write!(f, "Lock '{}' was not held by anyone", self.key)?,
            Outcome::HolderAbsent => {
                write!(f, "Lock '{}' was not held by {}", self.key, self.holder)?
            }
        }
        if let Some(held) = self.held {
            write!(f, " ({} held)", held)?;
        }
        if let Some(remaining) = self.remaining {
            write!(f, " ({} remaining)", remaining)?;
        }
        Ok(())
    }
}
