//! Keyed component trees with a gated state-update lifecycle.
//!
//! A node holds a key, read-only props, a state map, and an ordered set of
//! uniquely keyed children. State changes go through a single synchronous
//! protocol that consults `should_component_update` before running the
//! will-update / render / did-update hooks. The architecture keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (nodes, hooks, merge, invariants).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and scenario files).
//!
//! [`trace`], [`tree`] and [`scenario`] describe traced trees as data;
//! [`replay`] and [`validate`] coordinate them with I/O to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod replay;
pub mod scenario;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod trace;
pub mod tree;
pub mod validate;
