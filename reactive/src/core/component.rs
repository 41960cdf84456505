//! Lifecycle capability implemented by concrete node variants.

use crate::core::node::{SharedNode, WeakNode};
use crate::core::types::{Props, State};

/// Read-only view of a node handed to every lifecycle hook.
///
/// During an update the view reflects the node as it is at the moment the hook
/// runs; whether `state()` already holds the next state depends on the node's
/// [`CommitPolicy`](crate::core::types::CommitPolicy).
///
/// `children()` and `parent()` hand out shared handles. The node running the
/// hook is mutably borrowed for the whole update, so borrowing it again through
/// one of those handles (say `children()[0].borrow().parent()`) panics.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    key: &'a str,
    props: &'a Props,
    state: &'a State,
    children: &'a [SharedNode],
    child_keys: &'a [String],
    parent: &'a WeakNode,
}

impl<'a> NodeView<'a> {
    pub(crate) fn new(
        key: &'a str,
        props: &'a Props,
        state: &'a State,
        children: &'a [SharedNode],
        child_keys: &'a [String],
        parent: &'a WeakNode,
    ) -> Self {
        Self {
            key,
            props,
            state,
            children,
            child_keys,
            parent,
        }
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn props(&self) -> &'a Props {
        self.props
    }

    pub fn state(&self) -> &'a State {
        self.state
    }

    pub fn children(&self) -> &'a [SharedNode] {
        self.children
    }

    /// Keys of `children()`, index-aligned.
    pub fn child_keys(&self) -> &'a [String] {
        self.child_keys
    }

    pub fn parent(&self) -> Option<SharedNode> {
        self.parent.upgrade()
    }
}

/// Hooks invoked around a node's state transitions.
///
/// Only [`render`](Component::render) is required. The update hooks are called
/// exclusively from the state-update path, never on construction and never
/// from a forced re-render.
pub trait Component {
    /// Runs once, after construction attached the initial children.
    fn component_did_mount(&mut self, _node: &NodeView<'_>) {}

    /// Gate for an update. Returning `false` skips `component_will_update`,
    /// `render` and `component_did_update` for this update.
    fn should_component_update(
        &self,
        _node: &NodeView<'_>,
        _next_props: &Props,
        _next_state: &State,
    ) -> bool {
        true
    }

    /// Runs immediately before a gated render.
    fn component_will_update(
        &mut self,
        _node: &NodeView<'_>,
        _next_props: &Props,
        _next_state: &State,
    ) {
    }

    /// Runs immediately after a gated render with the pre-update props and state.
    fn component_did_update(
        &mut self,
        _node: &NodeView<'_>,
        _prev_props: &Props,
        _prev_state: &State,
    ) {
    }

    /// Runs when the last owner releases the node. No hook runs afterwards.
    fn component_will_unmount(&mut self, _node: &NodeView<'_>) {}

    /// Produce the node's output. Must not mutate the tree.
    fn render(&self, node: &NodeView<'_>, force: bool);
}
