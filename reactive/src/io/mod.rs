//! I/O helpers for the `reactive` commands.

pub mod config;
pub mod scenario_store;
