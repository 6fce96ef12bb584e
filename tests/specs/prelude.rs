// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use predicates::prelude::*;
pub use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

pub const LOCK_FILE: &str = "semaphore.json";

/// Variables that would leak the host's configuration into a spec
const HOST_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITHUB_JOB",
    "GITHUB_REPOSITORY",
    "GITHUB_RUN_ID",
    "GITHUB_TOKEN",
    "GITHUB_WORKFLOW",
    "RUST_LOG",
    "SEMLOCK_API_URL",
    "SEMLOCK_BACKEND",
    "SEMLOCK_CAPACITY",
    "SEMLOCK_CONFIG",
    "SEMLOCK_HOLDER",
    "SEMLOCK_KEY",
    "SEMLOCK_PATH",
    "SEMLOCK_POLL_INTERVAL",
    "SEMLOCK_RELEASE_ATTEMPTS",
    "SEMLOCK_RELEASE_DELAY",
    "SEMLOCK_ROOT",
    "SEMLOCK_SCOPE",
];

/// A temp directory acting as the root of a directory store
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Root with no scope directory at all
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Root with the default `locks` scope provisioned
    pub fn with_locks() -> Self {
        let project = Self::empty();
        std::fs::create_dir(project.path().join("locks")).unwrap();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Seed the lock file in the `locks` scope
    pub fn lock_file(&self, content: &serde_json::Value) {
        self.file(&format!("locks/{LOCK_FILE}"), &content.to_string());
    }

    /// Current lock file in the `locks` scope, parsed
    pub fn lock_document(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.path().join("locks").join(LOCK_FILE)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub fn has_lock_file(&self) -> bool {
        self.path().join("locks").join(LOCK_FILE).exists()
    }

    /// `semlock` against this root, with fast polling and backoff
    pub fn semlock(&self) -> Cli {
        let mut cmd = assert_cmd::Command::cargo_bin("semlock").unwrap();
        for var in HOST_VARS {
            cmd.env_remove(var);
        }
        cmd.env("SEMLOCK_BACKEND", "directory")
            .env("SEMLOCK_ROOT", self.path())
            .env("SEMLOCK_PATH", LOCK_FILE)
            .env("SEMLOCK_POLL_INTERVAL", "50ms")
            .env("SEMLOCK_RELEASE_DELAY", "1ms")
            .current_dir(self.path());
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn env_remove(mut self, key: &str) -> Self {
        self.cmd.env_remove(key);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.cmd.timeout(timeout);
        self
    }

    pub fn passes(mut self) -> Run {
        Run {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> Run {
        Run {
            assert: self.cmd.assert().failure(),
        }
    }

    /// Killed by the timeout rather than exiting on its own
    pub fn times_out(mut self) -> Run {
        Run {
            assert: self.cmd.assert().interrupted(),
        }
    }
}

pub struct Run {
    assert: assert_cmd::assert::Assert,
}

impl Run {
    pub fn stdout_has(self, expected: &str) -> Self {
        Run {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Run {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Run {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).to_string()
    }

    /// Stdout parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
