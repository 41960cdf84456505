//! Keyed component nodes: identity, props, state, and owned children.
//!
//! Ownership runs strictly parent → children through [`SharedNode`]; the
//! parent back-reference is a [`WeakNode`] so trees never form `Rc` cycles.
//! `Rc`/`RefCell` keep nodes `!Send`, so a tree is only ever touched from the
//! thread that built it.
//!
//! All operations are total: absent children, duplicate keys and unknown keys
//! are ignored rather than reported.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::core::component::{Component, NodeView};
use crate::core::merge::shallow_merge;
use crate::core::types::{CommitPolicy, Props, State, UpdatePolicy};

pub type SharedNode = Rc<RefCell<Node>>;
pub type WeakNode = Weak<RefCell<Node>>;

/// Everything a node owns except its component, so hooks can borrow the
/// component mutably while reading the rest.
struct NodeData {
    key: String,
    props: Props,
    state: State,
    children: Vec<SharedNode>,
    /// Keys of `children`, index-aligned. Keys never change after construction,
    /// so lookups never need to borrow a child.
    child_keys: Vec<String>,
    parent: WeakNode,
    this: WeakNode,
    policy: UpdatePolicy,
}

impl NodeData {
    fn view(&self) -> NodeView<'_> {
        NodeView::new(
            &self.key,
            &self.props,
            &self.state,
            &self.children,
            &self.child_keys,
            &self.parent,
        )
    }

    fn is_this(&self, node: &SharedNode) -> bool {
        std::ptr::eq(self.this.as_ptr(), Rc::as_ptr(node))
    }
}

pub struct Node {
    data: NodeData,
    component: Box<dyn Component>,
}

/// Builder for [`Node`]s with optional initial state and policy.
pub struct NodeBuilder {
    key: String,
    props: Props,
    state: State,
    children: Vec<SharedNode>,
    policy: UpdatePolicy,
}

impl NodeBuilder {
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    pub fn child(mut self, child: impl Into<Option<SharedNode>>) -> Self {
        if let Some(child) = child.into() {
            self.children.push(child);
        }
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<SharedNode>>,
    {
        for child in children {
            let child: Option<SharedNode> = child.into();
            self.children.extend(child);
        }
        self
    }

    pub fn policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Mount the node: attach children (first key wins), then run
    /// `component_did_mount`. No update hook runs.
    pub fn build(self, component: impl Component + 'static) -> SharedNode {
        let Self {
            key,
            props,
            state,
            children,
            policy,
        } = self;
        let node = Rc::new_cyclic(|this| {
            RefCell::new(Node {
                data: NodeData {
                    key,
                    props,
                    state,
                    children: Vec::new(),
                    child_keys: Vec::new(),
                    parent: Weak::new(),
                    this: this.clone(),
                    policy,
                },
                component: Box::new(component),
            })
        });
        {
            let mut inner = node.borrow_mut();
            inner.add_children(children);
            let Node { data, component } = &mut *inner;
            component.component_did_mount(&data.view());
            trace!(key = %data.key, children = data.children.len(), "mounted");
        }
        node
    }
}

impl Node {
    pub fn builder(key: impl Into<String>) -> NodeBuilder {
        NodeBuilder {
            key: key.into(),
            props: Props::new(),
            state: State::new(),
            children: Vec::new(),
            policy: UpdatePolicy::default(),
        }
    }

    /// Construct and mount a node with the default policy.
    pub fn new<I, C>(
        key: impl Into<String>,
        props: Props,
        children: I,
        component: impl Component + 'static,
    ) -> SharedNode
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<SharedNode>>,
    {
        Self::builder(key)
            .props(props)
            .children(children)
            .build(component)
    }

    /// Node with an empty key, empty props and no children.
    pub fn empty(component: impl Component + 'static) -> SharedNode {
        Self::builder("").build(component)
    }

    // Children

    /// Append `child` unless it is absent, shares a key with an existing child,
    /// or is this node or one of its ancestors. Returns whether it was attached.
    ///
    /// A child still attached to another live parent is moved out of that
    /// parent's list first.
    pub fn add_child(&mut self, child: impl Into<Option<SharedNode>>) -> bool {
        let Some(child) = child.into() else {
            return false;
        };
        if self.is_self_or_ancestor(&child) {
            warn!(parent = %self.data.key, "ignoring child that would create a cycle");
            return false;
        }
        let Ok(mut child_ref) = child.try_borrow_mut() else {
            warn!(parent = %self.data.key, "ignoring child that is currently borrowed");
            return false;
        };
        if self.data.child_keys.contains(&child_ref.data.key) {
            debug!(
                parent = %self.data.key,
                key = %child_ref.data.key,
                "dropping child with duplicate key"
            );
            return false;
        }

        if let Some(previous) = child_ref.data.parent.upgrade()
            && !self.data.is_this(&previous)
        {
            match previous.try_borrow_mut() {
                Ok(mut previous) => {
                    debug!(
                        key = %child_ref.data.key,
                        from = %previous.data.key,
                        to = %self.data.key,
                        "reparenting child"
                    );
                    previous.forget_child(&child);
                }
                Err(_) => warn!(
                    key = %child_ref.data.key,
                    "previous parent is borrowed; leaving it in place"
                ),
            }
        }

        child_ref.data.parent = self.data.this.clone();
        self.data.child_keys.push(child_ref.data.key.clone());
        drop(child_ref);
        self.data.children.push(child);
        true
    }

    /// Apply [`add_child`](Node::add_child) to every present entry, in order.
    pub fn add_children<I, C>(&mut self, children: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<SharedNode>>,
    {
        for child in children {
            self.add_child(child);
        }
    }

    /// Remove every child whose key equals `child`'s key.
    pub fn remove_child(&mut self, child: &SharedNode) -> Vec<SharedNode> {
        let key = match self
            .data
            .children
            .iter()
            .position(|existing| Rc::ptr_eq(existing, child))
        {
            Some(index) => self.data.child_keys[index].clone(),
            // Our own handle is mutably borrowed right now.
            None if self.data.is_this(child) => self.data.key.clone(),
            None => match child.try_borrow() {
                Ok(child) => child.data.key.clone(),
                Err(_) => return Vec::new(),
            },
        };
        self.remove_child_by_key(&key)
    }

    /// Remove every child with `key`. Returns the removed children.
    pub fn remove_child_by_key(&mut self, key: &str) -> Vec<SharedNode> {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.data.child_keys.len() {
            if self.data.child_keys[index] == key {
                self.data.child_keys.remove(index);
                removed.push(self.data.children.remove(index));
            } else {
                index += 1;
            }
        }
        self.detach(&removed);
        removed
    }

    /// Remove all children. Returns them in their previous order.
    pub fn remove_children(&mut self) -> Vec<SharedNode> {
        self.data.child_keys.clear();
        let removed = std::mem::take(&mut self.data.children);
        self.detach(&removed);
        removed
    }

    pub fn child(&self, key: &str) -> Option<&SharedNode> {
        self.data
            .child_keys
            .iter()
            .position(|existing| existing == key)
            .map(|index| &self.data.children[index])
    }

    // Updating

    /// Shallow-merge `partial` into the state and run the gated update.
    pub fn set_state(&mut self, partial: State) {
        self.apply_update(&partial, |_, _| {});
    }

    /// Like [`set_state`](Node::set_state), then call `callback(prev_state, props)`.
    pub fn set_state_with<F>(&mut self, partial: State, callback: F)
    where
        F: FnOnce(&State, &Props),
    {
        self.apply_update(&partial, callback);
    }

    /// Compute the partial state from `(state, props)` and apply it as
    /// [`set_state`](Node::set_state) would.
    pub fn update_state<U>(&mut self, updater: U)
    where
        U: FnOnce(&State, &Props) -> State,
    {
        self.update_state_with(updater, |_, _| {});
    }

    pub fn update_state_with<U, F>(&mut self, updater: U, callback: F)
    where
        U: FnOnce(&State, &Props) -> State,
        F: FnOnce(&State, &Props),
    {
        let partial = updater(&self.data.state, &self.data.props);
        self.apply_update(&partial, callback);
    }

    /// Render with `force = true`, skipping the gate and the will/did hooks.
    pub fn force_update(&self) {
        self.component.render(&self.data.view(), true);
    }

    /// Render with `force = false`.
    pub fn render(&self) {
        self.component.render(&self.data.view(), false);
    }

    fn apply_update<F>(&mut self, partial: &State, callback: F)
    where
        F: FnOnce(&State, &Props),
    {
        let Node { data, component } = self;
        let prev_state = data.state.clone();
        let next_state = shallow_merge(&prev_state, partial);
        let accepted = component.should_component_update(&data.view(), &data.props, &next_state);
        trace!(key = %data.key, accepted, commit = ?data.policy.commit, "state update");

        match data.policy.commit {
            CommitPolicy::Always => {
                if accepted {
                    component.component_will_update(&data.view(), &data.props, &next_state);
                    component.render(&data.view(), true);
                    component.component_did_update(&data.view(), &data.props, &prev_state);
                }
                data.state = next_state;
            }
            CommitPolicy::OnUpdate => {
                if accepted {
                    component.component_will_update(&data.view(), &data.props, &next_state);
                    data.state = next_state;
                    component.render(&data.view(), true);
                    component.component_did_update(&data.view(), &data.props, &prev_state);
                } else {
                    debug!(key = %data.key, "update declined; state kept");
                }
            }
        }

        callback(&prev_state, &data.props);
    }

    // Accessors

    pub fn key(&self) -> &str {
        &self.data.key
    }

    pub fn props(&self) -> &Props {
        &self.data.props
    }

    pub fn state(&self) -> &State {
        &self.data.state
    }

    pub fn children(&self) -> &[SharedNode] {
        &self.data.children
    }

    pub fn child_keys(&self) -> &[String] {
        &self.data.child_keys
    }

    pub fn parent(&self) -> Option<SharedNode> {
        self.data.parent.upgrade()
    }

    /// Overwrite the parent back-reference. Does not touch any child list.
    pub fn set_parent(&mut self, parent: Option<&SharedNode>) {
        self.data.parent = parent.map(Rc::downgrade).unwrap_or_default();
    }

    /// True if the back-reference points at `node`.
    pub fn is_child_of(&self, node: &SharedNode) -> bool {
        std::ptr::eq(self.data.parent.as_ptr(), Rc::as_ptr(node))
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.data.policy
    }

    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    pub fn view(&self) -> NodeView<'_> {
        self.data.view()
    }

    /// Strong handle to this node, if it is still alive.
    pub fn handle(&self) -> Option<SharedNode> {
        self.data.this.upgrade()
    }

    fn is_self_or_ancestor(&self, candidate: &SharedNode) -> bool {
        if self.data.is_this(candidate) {
            return true;
        }
        let mut current = self.data.this.clone();
        let mut cursor = self.data.parent.upgrade();
        while let Some(node) = cursor {
            let Ok(node_ref) = node.try_borrow() else {
                // A borrowed ancestor is mid-operation further up the stack.
                return Rc::ptr_eq(&node, candidate);
            };
            // A back-reference only counts while that parent still lists us.
            let owns_current = node_ref
                .data
                .children
                .iter()
                .any(|child| std::ptr::eq(current.as_ptr(), Rc::as_ptr(child)));
            if !owns_current {
                return false;
            }
            if Rc::ptr_eq(&node, candidate) {
                return true;
            }
            current = Rc::downgrade(&node);
            cursor = node_ref.data.parent.upgrade();
        }
        false
    }

    /// Drop `child` from the lists by identity, leaving its back-reference alone.
    fn forget_child(&mut self, child: &SharedNode) {
        if let Some(index) = self
            .data
            .children
            .iter()
            .position(|existing| Rc::ptr_eq(existing, child))
        {
            self.data.children.remove(index);
            self.data.child_keys.remove(index);
        }
    }

    fn detach(&self, removed: &[SharedNode]) {
        if !self.data.policy.detach_clears_parent {
            return;
        }
        for child in removed {
            match child.try_borrow_mut() {
                Ok(mut child) => {
                    if Weak::ptr_eq(&child.data.parent, &self.data.this) {
                        child.data.parent = Weak::new();
                    }
                }
                Err(_) => warn!(parent = %self.data.key, "removed child is borrowed; parent kept"),
            }
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let Node { data, component } = self;
        component.component_will_unmount(&data.view());
        trace!(key = %data.key, "unmounted");
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.data.key)
            .field("props", &self.data.props)
            .field("state", &self.data.state)
            .field("children", &self.data.child_keys)
            .field("policy", &self.data.policy)
            .finish()
    }
}
