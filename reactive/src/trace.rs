//! A concrete component that records its lifecycle into a shared log.
//!
//! Used by `reactive replay` to report what happened, and by tests to assert
//! on hook order.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::component::{Component, NodeView};
use crate::core::types::{LifecycleEvent, Props, State};

/// Log shared by every traced node of one tree.
pub type EventLog = Rc<RefCell<Vec<LifecycleEvent>>>;

/// Answer a traced node gives to `should_component_update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Accept every update.
    #[default]
    Always,
    /// Accept only updates whose next state differs from the current state.
    Pure,
    /// Decline every update.
    Never,
}

impl Gate {
    fn accepts(self, current: &State, next: &State) -> bool {
        match self {
            Gate::Always => true,
            Gate::Pure => current != next,
            Gate::Never => false,
        }
    }
}

pub struct TraceComponent {
    gate: Gate,
    log: EventLog,
}

impl TraceComponent {
    pub fn new(gate: Gate, log: EventLog) -> Self {
        Self { gate, log }
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    fn record(&self, event: LifecycleEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl Component for TraceComponent {
    fn component_did_mount(&mut self, node: &NodeView<'_>) {
        self.record(LifecycleEvent::DidMount {
            key: node.key().to_string(),
        });
    }

    fn should_component_update(
        &self,
        node: &NodeView<'_>,
        _next_props: &Props,
        next_state: &State,
    ) -> bool {
        let accepted = self.gate.accepts(node.state(), next_state);
        self.record(LifecycleEvent::ShouldUpdate {
            key: node.key().to_string(),
            next_state: next_state.clone(),
            accepted,
        });
        accepted
    }

    fn component_will_update(
        &mut self,
        node: &NodeView<'_>,
        _next_props: &Props,
        next_state: &State,
    ) {
        self.record(LifecycleEvent::WillUpdate {
            key: node.key().to_string(),
            next_state: next_state.clone(),
        });
    }

    fn component_did_update(
        &mut self,
        node: &NodeView<'_>,
        _prev_props: &Props,
        prev_state: &State,
    ) {
        self.record(LifecycleEvent::DidUpdate {
            key: node.key().to_string(),
            prev_state: prev_state.clone(),
        });
    }

    fn component_will_unmount(&mut self, node: &NodeView<'_>) {
        self.record(LifecycleEvent::WillUnmount {
            key: node.key().to_string(),
        });
    }

    fn render(&self, node: &NodeView<'_>, force: bool) {
        self.record(LifecycleEvent::Render {
            key: node.key().to_string(),
            force,
            state: node.state().clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::node::Node;
    use crate::test_support::{event_log, map};

    #[test]
    fn pure_gate_declines_identical_state() {
        let log = event_log();
        let node = Node::builder("n")
            .state(map(json!({"count": 1})))
            .build(TraceComponent::new(Gate::Pure, log.clone()));
        log.borrow_mut().clear();

        node.borrow_mut().set_state(map(json!({"count": 1})));
        node.borrow_mut().set_state(map(json!({"count": 2})));

        let renders = log
            .borrow()
            .iter()
            .filter(|event| matches!(event, LifecycleEvent::Render { .. }))
            .count();
        assert_eq!(renders, 1);
        assert!(matches!(
            log.borrow()[0],
            LifecycleEvent::ShouldUpdate {
                accepted: false,
                ..
            }
        ));
    }

    #[test]
    fn gate_parses_lowercase() {
        let gate: Gate = serde_json::from_value(json!("never")).expect("parse");
        assert_eq!(gate, Gate::Never);
    }

    #[test]
    fn events_serialize_with_hook_tag() {
        let event = LifecycleEvent::Render {
            key: "root".to_string(),
            force: true,
            state: State::new(),
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(
            value,
            json!({"hook": "render", "key": "root", "force": true, "state": {}})
        );
    }
}
