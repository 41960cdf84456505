//! Shared value and policy types for the component core.
//!
//! Props and state are opaque string-keyed maps of dynamically typed values.
//! The core only relies on key enumeration, lookup, and overwrite-by-key.

use serde::{Deserialize, Serialize};
pub use serde_json::Value;

/// Externally supplied, read-only input of a node.
pub type Props = serde_json::Map<String, Value>;

/// Mutable node state, changed only through the update protocol.
pub type State = serde_json::Map<String, Value>;

/// When the state produced by an update is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Render and `component_did_update` run against the previous state; the
    /// new state is assigned afterwards, even when the gate declined.
    #[default]
    Always,
    /// The new state is assigned only when the gate passes, after
    /// `component_will_update` and before `render`.
    OnUpdate,
}

/// Per-node behavior switches for updates and detachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePolicy {
    pub commit: CommitPolicy,
    /// Clear a removed child's parent back-reference when it still points here.
    pub detach_clears_parent: bool,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            commit: CommitPolicy::Always,
            detach_clears_parent: true,
        }
    }
}

impl UpdatePolicy {
    /// Legacy update and removal semantics: unconditional commit, and removed
    /// children keep their stale parent reference. Cycle rejection and
    /// reparenting on add apply under every policy.
    pub fn legacy() -> Self {
        Self {
            commit: CommitPolicy::Always,
            detach_clears_parent: false,
        }
    }
}

/// One observed lifecycle transition, recorded by tracing components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum LifecycleEvent {
    DidMount {
        key: String,
    },
    ShouldUpdate {
        key: String,
        next_state: State,
        accepted: bool,
    },
    WillUpdate {
        key: String,
        next_state: State,
    },
    Render {
        key: String,
        force: bool,
        state: State,
    },
    DidUpdate {
        key: String,
        prev_state: State,
    },
    WillUnmount {
        key: String,
    },
}

impl LifecycleEvent {
    pub fn key(&self) -> &str {
        match self {
            Self::DidMount { key }
            | Self::ShouldUpdate { key, .. }
            | Self::WillUpdate { key, .. }
            | Self::Render { key, .. }
            | Self::DidUpdate { key, .. }
            | Self::WillUnmount { key } => key,
        }
    }
}
