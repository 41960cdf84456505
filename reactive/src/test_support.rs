//! Test-only helpers for building nodes, logs and scenario files.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

use crate::core::component::{Component, NodeView};
use crate::core::node::{Node, SharedNode};
use crate::core::types::{State, UpdatePolicy};
use crate::trace::{EventLog, Gate, TraceComponent};

/// Convert a `json!` object literal into a props/state map.
///
/// Panics on non-object values; test inputs are always literals.
pub fn map(value: Value) -> State {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Component that renders nothing and keeps every default hook.
pub struct Inert;

impl Component for Inert {
    fn render(&self, _node: &NodeView<'_>, _force: bool) {}
}

/// Childless [`Inert`] node.
pub fn inert(key: &str) -> SharedNode {
    Node::builder(key).build(Inert)
}

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Childless traced node that accepts every update.
pub fn traced(key: &str, log: &EventLog) -> SharedNode {
    traced_with_policy(key, UpdatePolicy::default(), log)
}

pub fn traced_with_policy(key: &str, policy: UpdatePolicy, log: &EventLog) -> SharedNode {
    Node::builder(key)
        .policy(policy)
        .build(TraceComponent::new(Gate::Always, log.clone()))
}

/// Temporary directory holding scenario and config files for a test.
pub struct ScenarioDir {
    dir: TempDir,
}

impl ScenarioDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Serialize `value` as pretty JSON into `name`.
    pub fn write_json(&self, name: &str, value: &Value) -> Result<PathBuf> {
        let payload = serde_json::to_string_pretty(value).context("serialize json")?;
        self.write(name, &payload)
    }
}
