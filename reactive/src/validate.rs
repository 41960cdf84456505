//! Validation for `reactive validate`: load a scenario and dry-mount it.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::core::invariants::validate_invariants;
use crate::io::config::ReactiveConfig;
use crate::io::scenario_store::load_scenario;
use crate::trace::EventLog;

/// Summary of a valid scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub nodes: usize,
    pub actions: usize,
}

/// Check schema, description invariants and the action limit, then mount the
/// initial tree once to confirm it satisfies the live-tree invariants.
pub fn validate_scenario(path: &Path, config: &ReactiveConfig) -> Result<ValidateOutcome> {
    let scenario = load_scenario(path).with_context(|| "load scenario")?;
    if scenario.actions.len() > config.replay.max_actions {
        bail!(
            "scenario has {} actions, limit is {}",
            scenario.actions.len(),
            config.replay.max_actions
        );
    }

    let root = scenario.tree.mount(config.update, &EventLog::default());
    let errors = validate_invariants(&root);
    if !errors.is_empty() {
        bail!("invariant violations:\n- {}", errors.join("\n- "));
    }

    Ok(ValidateOutcome {
        nodes: scenario.tree.node_count(),
        actions: scenario.actions.len(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::ScenarioDir;

    #[test]
    fn validate_counts_nodes_and_actions() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json(
                "scenario.json",
                &json!({
                    "tree": {"key": "root", "children": [{"key": "a"}, {"key": "b"}]},
                    "actions": [{"op": "render", "path": "root"}]
                }),
            )
            .expect("write");

        let outcome = validate_scenario(&path, &ReactiveConfig::default()).expect("validate");
        assert_eq!(
            outcome,
            ValidateOutcome {
                nodes: 3,
                actions: 1
            }
        );
    }

    #[test]
    fn validate_errors_on_duplicate_keys() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json(
                "scenario.json",
                &json!({"tree": {"key": "root", "children": [{"key": "a"}, {"key": "a"}]}}),
            )
            .expect("write");

        let err = validate_scenario(&path, &ReactiveConfig::default()).expect_err("should fail");
        assert!(format!("{:#}", err).contains("duplicate child key 'a'"));
    }

    #[test]
    fn validate_errors_on_missing_tree() {
        let dir = ScenarioDir::new().expect("dir");
        let path = dir
            .write_json("scenario.json", &json!({"actions": []}))
            .expect("write");

        let err = validate_scenario(&path, &ReactiveConfig::default()).expect_err("should fail");
        assert!(format!("{:#}", err).contains("schema validation failed"));
    }
}
