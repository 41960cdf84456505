//! Scenario load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_spec_invariants;
use crate::scenario::{Action, Scenario};

/// JSON Schema (Draft 2020-12) every scenario file must satisfy.
pub const SCENARIO_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/scenario/v1.schema.json"
));

/// Load and validate a scenario from disk (schema + invariants).
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read scenario {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse scenario {}", path.display()))?;
    validate_schema(&value)?;
    let scenario: Scenario = serde_json::from_value(value)
        .with_context(|| format!("deserialize scenario {}", path.display()))?;
    validate_scenario_invariants(&scenario)?;
    debug!(
        path = %path.display(),
        nodes = scenario.tree.node_count(),
        actions = scenario.actions.len(),
        "loaded scenario"
    );
    Ok(scenario)
}

/// Write a scenario as pretty-printed JSON with trailing newline.
pub fn write_scenario(path: &Path, scenario: &Scenario) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(scenario)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write scenario {}", path.display()))
}

fn validate_schema(scenario: &Value) -> Result<()> {
    let schema_value: Value =
        serde_json::from_str(SCENARIO_SCHEMA).context("parse embedded scenario schema")?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(scenario) {
        let messages = compiled
            .iter_errors(scenario)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "scenario schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

/// Duplicate or unaddressable keys anywhere a scenario mounts a tree.
fn validate_scenario_invariants(scenario: &Scenario) -> Result<()> {
    let mut errors = validate_spec_invariants(&scenario.tree);
    for (index, action) in scenario.actions.iter().enumerate() {
        if let Action::AddChild { child, .. } = action {
            errors.extend(
                validate_spec_invariants(child)
                    .into_iter()
                    .map(|err| format!("action {}: {}", index, err)),
            );
        }
    }
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("scenario invariants failed: {}", errors.join("; ")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scenario::default_scenario;
    use crate::test_support::ScenarioDir;

    /// Verifies write → load round-trip preserves the scenario.
    #[test]
    fn load_and_write_scenario_round_trip() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir.path().join("scenario.json");

        write_scenario(&path, &default_scenario()).expect("write scenario");

        let scenario = load_scenario(&path).expect("load scenario");
        assert_eq!(scenario, default_scenario());
    }

    #[test]
    fn rejects_unknown_op() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json(
                "bad.json",
                &json!({
                    "tree": {"key": "root"},
                    "actions": [{"op": "explode", "path": "root"}]
                }),
            )
            .expect("write");

        let err = load_scenario(&path).expect_err("should fail");
        assert!(err.to_string().contains("schema validation failed"));
    }

    #[test]
    fn rejects_duplicate_keys_in_added_subtree() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json(
                "dup.json",
                &json!({
                    "tree": {"key": "root"},
                    "actions": [{
                        "op": "add_child",
                        "path": "root",
                        "child": {"key": "c", "children": [{"key": "x"}, {"key": "x"}]}
                    }]
                }),
            )
            .expect("write");

        let err = load_scenario(&path).expect_err("should fail");
        assert!(format!("{:#}", err).contains("action 0: c: duplicate child key 'x'"));
    }

    #[test]
    fn rejects_key_containing_path_separator() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json(
                "slash.json",
                &json!({
                    "tree": {"key": "root", "children": [{"key": "a/b"}]},
                    "actions": [{"op": "set_state", "path": "root/a/b", "partial": {"x": 1}}]
                }),
            )
            .expect("write");

        let err = load_scenario(&path).expect_err("should fail");
        assert!(err.to_string().contains("schema validation failed"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = ScenarioDir::new().expect("dir");
        let err = load_scenario(&dir.path().join("nope.json")).expect_err("should fail");
        assert!(err.to_string().contains("nope.json"));
    }
}
