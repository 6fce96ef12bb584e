// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acquire specs
//!
//! Verify slots are claimed, reused and waited for.

use crate::prelude::*;
use std::time::Duration;

#[test]
fn acquire_creates_lock_file_with_holder() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stdout_has("Lock 'deploy' acquired by run-1 (1 held)");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
}

#[test]
fn acquire_twice_is_idempotent() {
    let temp = Project::with_locks();
    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stdout_has("already held by run-1");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
}

#[test]
fn acquire_fills_capacity() {
    let temp = Project::with_locks();

    for holder in ["run-1", "run-2"] {
        temp.semlock()
            .args(&["acquire", "--key", "deploy", "--capacity", "2", "--holder", holder])
            .passes();
    }

    similar_asserts::assert_eq!(
        temp.lock_document(),
        json!({ "deploy": ["run-1", "run-2"] })
    );
}

#[test]
fn acquire_blocks_while_key_is_full() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "deploy": ["run-1"] }));

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-2"])
        .timeout(Duration::from_millis(700))
        .times_out()
        .stdout_lacks("acquired");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
}

#[test]
fn acquire_leaves_other_keys_alone() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "nightly": ["run-9"] }));

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes();

    similar_asserts::assert_eq!(
        temp.lock_document(),
        json!({ "deploy": ["run-1"], "nightly": ["run-9"] })
    );
}

#[test]
fn acquire_reinitializes_malformed_lock_file() {
    let temp = Project::with_locks();
    temp.file("locks/semaphore.json", "this is not json");

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stderr_has("failed to parse lock file, reinitializing");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
}

#[test]
fn acquire_reports_json() {
    let temp = Project::with_locks();

    let run = temp
        .semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1", "--format", "json"])
        .passes();

    similar_asserts::assert_eq!(
        run.json(),
        json!({ "key": "deploy", "holder": "run-1", "outcome": "acquired", "held": 1 })
    );
}

#[test]
fn acquire_derives_holder_from_github_run() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy"])
        .env("GITHUB_WORKFLOW", "ci")
        .env("GITHUB_RUN_ID", "4242")
        .env("GITHUB_JOB", "deploy")
        .passes()
        .stdout_has("acquired by ci:4242:deploy");

    similar_asserts::assert_eq!(
        temp.lock_document(),
        json!({ "deploy": ["ci:4242:deploy"] })
    );
}
