//! Drive a traced tree through a scenario for `reactive replay`.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::invariants::validate_invariants;
use crate::core::node::SharedNode;
use crate::core::path::{node_path, resolve};
use crate::core::types::{LifecycleEvent, UpdatePolicy};
use crate::io::config::ReactiveConfig;
use crate::io::scenario_store::load_scenario;
use crate::scenario::{Action, Scenario};
use crate::trace::EventLog;
use crate::tree::{Snapshot, snapshot};

/// Final tree plus every hook invocation, in call order. The log ends with the
/// unmount of the whole tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayOutcome {
    pub tree: Snapshot,
    pub events: Vec<LifecycleEvent>,
}

/// Mount `scenario.tree`, apply every action, then release the tree.
pub fn replay(scenario: &Scenario, config: &ReactiveConfig) -> Result<ReplayOutcome> {
    if scenario.actions.len() > config.replay.max_actions {
        bail!(
            "scenario has {} actions, limit is {}",
            scenario.actions.len(),
            config.replay.max_actions
        );
    }

    let log = EventLog::default();
    let root = scenario.tree.mount(config.update, &log);
    for (index, action) in scenario.actions.iter().enumerate() {
        apply_action(&root, action, config.update, &log)
            .with_context(|| format!("action {} ({})", index, action.name()))?;
    }

    let errors = validate_invariants(&root);
    if !errors.is_empty() {
        bail!("invariant violations:\n- {}", errors.join("\n- "));
    }
    let tree = snapshot(&root).ok_or_else(|| anyhow!("root is borrowed"))?;
    drop(root);

    let events = log.take();
    info!(events = events.len(), "replay finished");
    Ok(ReplayOutcome { tree, events })
}

/// Load a scenario file and replay it.
pub fn replay_file(path: &Path, config: &ReactiveConfig) -> Result<ReplayOutcome> {
    let scenario = load_scenario(path).with_context(|| "load scenario for replay")?;
    replay(&scenario, config)
}

fn apply_action(
    root: &SharedNode,
    action: &Action,
    policy: UpdatePolicy,
    log: &EventLog,
) -> Result<()> {
    let target = resolve(root, action.path())
        .ok_or_else(|| anyhow!("no node at path '{}'", action.path()))?;
    debug!(
        op = action.name(),
        path = %node_path(&target).unwrap_or_default(),
        "applying action"
    );

    match action {
        Action::SetState { partial, .. } => target.borrow_mut().set_state(partial.clone()),
        Action::AddChild { child, .. } => {
            let child = child.mount(policy, log);
            if !target.borrow_mut().add_child(child) {
                debug!(path = action.path(), "child not attached");
            }
        }
        Action::RemoveChild { key, .. } => {
            let removed = target.borrow_mut().remove_child_by_key(key);
            debug!(key = %key, removed = removed.len(), "removed children");
        }
        Action::RemoveChildren { .. } => {
            target.borrow_mut().remove_children();
        }
        Action::ForceUpdate { .. } => target.borrow().force_update(),
        Action::Render { .. } => target.borrow().render(),
    }
    Ok(())
}
