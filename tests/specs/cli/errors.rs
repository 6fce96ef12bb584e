// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error reporting specs
//!
//! Verify failures exit non-zero with a message and a way forward.

use crate::prelude::*;

#[test]
fn acquire_fails_when_scope_is_missing() {
    let temp = Project::empty();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .fails()
        .stderr_has("does not exist")
        .stderr_has("mkdir -p");

    assert!(!temp.has_lock_file());
}

#[test]
fn release_fails_when_scope_is_missing() {
    let temp = Project::empty();

    temp.semlock()
        .args(&["release", "--key", "deploy", "--holder", "run-1"])
        .fails()
        .stderr_has("does not exist")
        .stderr_has("giving up");
}

#[test]
fn zero_capacity_is_rejected() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1", "--capacity", "0"])
        .fails()
        .stderr_has("capacity must be at least 1");

    assert!(!temp.has_lock_file());
}

#[test]
fn missing_key_names_the_flag() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--holder", "run-1"])
        .fails()
        .stderr_has("Missing required setting 'key'")
        .stderr_has("--key <KEY>");
}

#[test]
fn missing_holder_explains_how_to_name_the_run() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy"])
        .fails()
        .stderr_has("--holder <ID>");
}

#[test]
fn github_backend_requires_repository() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1", "--backend", "github"])
        .fails()
        .stderr_has("GITHUB_REPOSITORY");
}

#[test]
fn failure_inside_github_actions_emits_error_command() {
    let temp = Project::empty();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .env("GITHUB_ACTIONS", "true")
        .fails()
        .stdout_has("::error::Lock directory");
}

#[test]
fn failure_outside_github_actions_has_no_error_command() {
    let temp = Project::empty();

    temp.semlock()
        .args(&["acquire", "--key", "deploy", "--holder", "run-1"])
        .fails()
        .stdout_lacks("::error::");
}

#[test]
fn unknown_subcommand_is_rejected() {
    let temp = Project::with_locks();

    temp.semlock().args(&["steal"]).fails();
}
