//! The component core: nodes, lifecycle hooks, and the update protocol.
//!
//! Core modules are free of I/O. Every operation is synchronous and total:
//! there is no scheduler, no batching, and nothing that can fail at runtime.

pub mod component;
pub mod invariants;
pub mod merge;
pub mod node;
pub mod path;
pub mod types;
