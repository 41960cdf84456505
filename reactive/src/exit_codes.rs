//! Stable exit codes for `reactive` CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to an invalid config or scenario, or another error.
pub const INVALID: i32 = 1;
