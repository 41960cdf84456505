//! One-level state merge used by the update protocol.

use crate::core::types::State;

/// Merge `partial` over `current` and return the result.
///
/// Keys present in `partial` replace the value in `current` wholesale (nested
/// maps are not merged recursively); every other key of `current` is kept.
pub fn shallow_merge(current: &State, partial: &State) -> State {
    let mut merged = current.clone();
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
