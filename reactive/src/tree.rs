//! Serializable tree descriptions and snapshots of live trees.

use serde::{Deserialize, Serialize};

use crate::core::node::{Node, SharedNode};
use crate::core::types::{Props, State, UpdatePolicy};
use crate::trace::{EventLog, Gate, TraceComponent};

/// Description of a traced tree to mount.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreeSpec {
    pub key: String,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub gate: Gate,
    #[serde(default)]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    pub fn leaf(key: &str) -> Self {
        Self {
            key: key.to_string(),
            props: Props::new(),
            state: State::new(),
            gate: Gate::default(),
            children: Vec::new(),
        }
    }

    /// Mount the described tree, children first, every node traced into `log`.
    pub fn mount(&self, policy: UpdatePolicy, log: &EventLog) -> SharedNode {
        let children: Vec<SharedNode> = self
            .children
            .iter()
            .map(|child| child.mount(policy, log))
            .collect();
        Node::builder(self.key.as_str())
            .props(self.props.clone())
            .state(self.state.clone())
            .children(children)
            .policy(policy)
            .build(TraceComponent::new(self.gate, log.clone()))
    }

    /// Number of nodes in the description, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeSpec::node_count).sum::<usize>()
    }
}

/// Point-in-time copy of a live tree.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub key: String,
    pub props: Props,
    pub state: State,
    pub children: Vec<Snapshot>,
}

/// Copy `node` and its descendants. Nodes that are currently mutably
/// borrowed cannot be read and are left out.
pub fn snapshot(node: &SharedNode) -> Option<Snapshot> {
    let node = node.try_borrow().ok()?;
    Some(Snapshot {
        key: node.key().to_string(),
        props: node.props().clone(),
        state: node.state().clone(),
        children: node.children().iter().filter_map(snapshot).collect(),
    })
}

pub fn default_tree() -> TreeSpec {
    TreeSpec::leaf("root")
}
