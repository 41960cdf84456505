//! Scenario files: an initial tree plus a script of node operations.

use serde::{Deserialize, Serialize};

use crate::core::types::State;
use crate::tree::{TreeSpec, default_tree};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub tree: TreeSpec,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One operation, addressed by the key path of the node it applies to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    SetState { path: String, partial: State },
    AddChild { path: String, child: TreeSpec },
    RemoveChild { path: String, key: String },
    RemoveChildren { path: String },
    ForceUpdate { path: String },
    Render { path: String },
}

impl Action {
    pub fn path(&self) -> &str {
        match self {
            Self::SetState { path, .. }
            | Self::AddChild { path, .. }
            | Self::RemoveChild { path, .. }
            | Self::RemoveChildren { path }
            | Self::ForceUpdate { path }
            | Self::Render { path } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetState { .. } => "set_state",
            Self::AddChild { .. } => "add_child",
            Self::RemoveChild { .. } => "remove_child",
            Self::RemoveChildren { .. } => "remove_children",
            Self::ForceUpdate { .. } => "force_update",
            Self::Render { .. } => "render",
        }
    }
}

/// Starter scenario written by `reactive init`.
pub fn default_scenario() -> Scenario {
    let mut counter = State::new();
    counter.insert("count".to_string(), 1.into());
    Scenario {
        tree: default_tree(),
        actions: vec![
            Action::SetState {
                path: "root".to_string(),
                partial: counter,
            },
            Action::AddChild {
                path: "root".to_string(),
                child: TreeSpec::leaf("child"),
            },
            Action::ForceUpdate {
                path: "root/child".to_string(),
            },
        ],
    }
}
