//! Recursive deep merge with structural sharing
//!
//! Merging a patch into a target overwrites every key the patch names,
//! except where both sides hold maps; there the merge recurses. Keys the
//! patch does not mention are kept as they are, at every depth. Arrays are
//! opaque and always replaced wholesale.
//!
//! The merge never copies more than it has to: any sub-tree the patch does
//! not touch is returned by reference, and a patch that changes nothing
//! returns the target itself.
//!
//! ```
//! use modux_core::{deep_merge, Value};
//! use serde_json::json;
//!
//! let state = Value::from(json!({"a": {"b": 1, "c": 3}, "d": 4}));
//! let next = deep_merge(&state, &Value::from(json!({"a": {"b": 2}})));
//!
//! assert_eq!(next, Value::from(json!({"a": {"b": 2, "c": 3}, "d": 4})));
//! ```

use crate::value::{Map, Value};

/// Merge `patch` into `target`, returning the combined value
///
/// A non-map patch replaces the target outright. A map patch applied to a
/// non-map target behaves as if the target were an empty map, which yields
/// the patch itself.
#[must_use]
pub fn deep_merge(target: &Value, patch: &Value) -> Value {
    let (Value::Map(target_map), Value::Map(patch_map)) = (target, patch) else {
        return patch.clone();
    };

    // Copied lazily on the first key that actually changes.
    let mut merged: Option<Map> = None;

    for (key, incoming) in patch_map.iter() {
        let existing = target_map.get(key);
        let next = match existing {
            Some(current) if current.is_map() && incoming.is_map() => {
                deep_merge(current, incoming)
            },
            _ => incoming.clone(),
        };

        if existing.is_some_and(|current| current.same(&next)) {
            continue;
        }

        merged
            .get_or_insert_with(|| Map::clone(target_map))
            .insert(key.clone(), next);
    }

    merged.map_or_else(|| target.clone(), Value::from_map)
}
