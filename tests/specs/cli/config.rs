// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration specs
//!
//! Verify flags, environment and the config file layer in that order.

use crate::prelude::*;

const CONFIG: &str = r#"
[semaphore]
key = "deploy"
capacity = 2

[store]
path = "from-file.json"
"#;

#[test]
fn config_file_supplies_settings() {
    let temp = Project::with_locks();
    temp.file("semlock.toml", CONFIG);

    for holder in ["run-1", "run-2"] {
        temp.semlock()
            .args(&["acquire", "--config", "semlock.toml", "--holder", holder])
            .env_remove("SEMLOCK_PATH")
            .passes();
    }

    let raw = std::fs::read_to_string(temp.path().join("locks/from-file.json")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    similar_asserts::assert_eq!(document, json!({ "deploy": ["run-1", "run-2"] }));
}

#[test]
fn environment_overrides_config_file() {
    let temp = Project::with_locks();
    temp.file("semlock.toml", CONFIG);

    temp.semlock()
        .args(&["acquire", "--config", "semlock.toml", "--holder", "run-1"])
        .passes();

    // SEMLOCK_PATH from the environment wins over the file's path
    similar_asserts::assert_eq!(temp.lock_document(), json!({ "deploy": ["run-1"] }));
    assert!(!temp.path().join("locks/from-file.json").exists());
}

#[test]
fn flag_overrides_environment() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "from-flag", "--holder", "run-1"])
        .env("SEMLOCK_KEY", "from-env")
        .passes();

    similar_asserts::assert_eq!(temp.lock_document(), json!({ "from-flag": ["run-1"] }));
}

#[test]
fn holder_from_environment() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--key", "deploy"])
        .env("SEMLOCK_HOLDER", "custom-runner")
        .passes()
        .stdout_has("acquired by custom-runner");
}

#[test]
fn unreadable_config_file_fails() {
    let temp = Project::with_locks();

    temp.semlock()
        .args(&["acquire", "--config", "missing.toml", "--key", "deploy", "--holder", "run-1"])
        .fails()
        .stderr_has("failed to read config file");
}

#[test]
fn malformed_config_file_fails() {
    let temp = Project::with_locks();
    temp.file("semlock.toml", "[semaphore\nkey = ");

    temp.semlock()
        .args(&["acquire", "--config", "semlock.toml", "--key", "deploy", "--holder", "run-1"])
        .fails()
        .stderr_has("failed to parse config file");
}
