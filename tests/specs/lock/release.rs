// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Release specs
//!
//! Verify slots are returned and that releasing nothing is harmless.

use crate::prelude::*;

#[test]
fn release_of_last_holder_removes_key() {
    let temp = Project::with_locks();
    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .passes();

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stdout_has("Lock 'deploy' released by run-1 (0 remaining)");

    similar_asserts::assert_eq!(temp.lock_document(), json!({}));
}

#[test]
fn release_keeps_other_holders() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "deploy": ["run-1", "run-2"] }));

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stdout_has("(1 remaining)");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-2"] }));
}

#[test]
fn release_without_acquire_passes() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1"])
        .passes()
        .stdout_has("was not held by anyone")
        .stderr_has("lock key not found during release");

    similar_asserts::assert_eq!(temp.lock_document(), json!({}));
}

#[test]
fn release_by_non_holder_changes_nothing() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "deploy": ["run-1"] }));

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-2"])
        .passes()
        .stdout_has("was not held by run-2")
        .stderr_has("run id not found in lock entries during release");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
}

#[test]
fn released_slot_can_be_acquired_by_next_run() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "deploy": ["run-1"] }));

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1"])
        .passes();
    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-2"])
        .passes()
        .stdout_has("acquired by run-2");

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-2"] }));
}

#[test]
fn release_reports_json() {
    let temp = Project::with_locks();
    temp.lock_file(&json!({ "deploy": ["run-1"] }));

    let run = temp
        .semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1", "--format", "json"])
        .passes();

    similar_asserts::assert_eq!(
        run.json(),
        json!({ "key": "deploy", "holder": "run-1", "outcome": "released", "remaining": 0 })
    );
}
