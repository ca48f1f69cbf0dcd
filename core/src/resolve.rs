//! Update resolution for namespaced actions
//!
//! Two independent choices decide what an action does to state:
//!
//! | payload \ path | none                    | `Some(path)`                          |
//! |----------------|-------------------------|---------------------------------------|
//! | `Merge(patch)` | merge into whole state  | merge into sub-tree at path           |
//! | `Replace(f)`   | `f(Some(state))`        | `f(state.get_in(path))` written back  |
//!
//! Missing sub-trees are read as `None` for replace functions and as an
//! empty map for merges. Anything not on the path is shared with the input
//! state by reference.

use crate::action::{Action, Payload};
use crate::error::ReducerError;
use crate::merge::deep_merge;
use crate::path::Path;
use crate::value::Value;

/// Apply a payload to `state`, optionally at `path`
///
/// Without a payload the state is returned unchanged.
///
/// # Errors
///
/// Returns [`ReducerError::PathConflict`] if a write has to descend through
/// a leaf, and passes any error raised by a replace function through
/// untouched.
pub fn resolve(
    state: &Value,
    payload: Option<&Payload>,
    path: Option<&Path>,
) -> Result<Value, ReducerError> {
    let Some(payload) = payload else {
        return Ok(state.clone());
    };

    match (payload, path) {
        (Payload::Merge(patch), None) => Ok(deep_merge(state, patch)),
        (Payload::Merge(patch), Some(path)) => state.update_in(path, |current| {
            Ok(current.map_or_else(|| patch.clone(), |current| deep_merge(current, patch)))
        }),
        (Payload::Replace(replace), None) => replace(Some(state)),
        (Payload::Replace(replace), Some(path)) => {
            let next = replace(state.get_in(path))?;
            state.set_in(path, next)
        },
    }
}

/// Apply an action's payload and path to `state`
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_action(state: &Value, action: &Action) -> Result<Value, ReducerError> {
    resolve(state, action.payload(), action.path())
}
