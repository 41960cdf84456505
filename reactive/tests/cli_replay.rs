//! CLI tests for `reactive replay`, `reactive validate` and `reactive init`.
//!
//! Spawns the binary and verifies exit codes and the JSON it prints.

use std::process::Command;

use serde_json::{Value, json};

use reactive::exit_codes;
use reactive::test_support::ScenarioDir;

#[test]
fn replay_prints_tree_and_events() {
    let dir = ScenarioDir::new().expect("dir");
    let scenario = dir
        .write_json(
            "scenario.json",
            &json!({
                "tree": {"key": "root", "children": [{"key": "c"}]},
                "actions": [
                    {"op": "set_state", "path": "root", "partial": {"count": 1}},
                    {"op": "add_child", "path": "root", "child": {"key": "c"}}
                ]
            }),
        )
        .expect("write scenario");

    let output = Command::new(env!("CARGO_BIN_EXE_reactive"))
        .current_dir(dir.path())
        .arg("replay")
        .arg(&scenario)
        .output()
        .expect("reactive replay");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let printed: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(printed["tree"]["state"]["count"], json!(1));
    assert_eq!(printed["tree"]["children"].as_array().map(Vec::len), Some(1));
    let renders = printed["events"]
        .as_array()
        .expect("events")
        .iter()
        .filter(|event| event["hook"] == "render")
        .count();
    assert_eq!(renders, 1);
}

#[test]
fn replay_honors_config_commit_policy() {
    let dir = ScenarioDir::new().expect("dir");
    dir.write("reactive.toml", "[update]\ncommit = \"on-update\"\n")
        .expect("write config");
    let scenario = dir
        .write_json(
            "scenario.json",
            &json!({
                "tree": {"key": "root", "gate": "never"},
                "actions": [{"op": "set_state", "path": "root", "partial": {"count": 1}}]
            }),
        )
        .expect("write scenario");

    let output = Command::new(env!("CARGO_BIN_EXE_reactive"))
        .current_dir(dir.path())
        .arg("replay")
        .arg(&scenario)
        .output()
        .expect("reactive replay");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let printed: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(printed["tree"]["state"], json!({}));
}

#[test]
fn validate_rejects_invalid_scenario() {
    let dir = ScenarioDir::new().expect("dir");
    let scenario = dir
        .write("scenario.json", "{\"tree\": {\"children\": []}}")
        .expect("write scenario");

    let status = Command::new(env!("CARGO_BIN_EXE_reactive"))
        .current_dir(dir.path())
        .arg("validate")
        .arg(&scenario)
        .status()
        .expect("reactive validate");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn init_writes_files_that_validate() {
    let dir = ScenarioDir::new().expect("dir");

    let status = Command::new(env!("CARGO_BIN_EXE_reactive"))
        .current_dir(dir.path())
        .arg("init")
        .status()
        .expect("reactive init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    assert!(dir.path().join("reactive.toml").is_file());

    let output = Command::new(env!("CARGO_BIN_EXE_reactive"))
        .current_dir(dir.path())
        .args(["validate", "scenario.json"])
        .output()
        .expect("reactive validate");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok: 1 nodes, 3 actions"));
}
