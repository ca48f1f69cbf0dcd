//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers over a [`Value`] tree:
//! - **`combine_reducers`**: Give each reducer ownership of one key of a map-shaped state
//! - **`scope_reducer`**: Focus a reducer on the sub-tree at a path
//!
//! Both keep structural sharing intact: if no child reducer produced a new
//! value, the parent state is returned by reference.
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use modux_core::composition::{combine_reducers, BoxedReducer};
//! use modux_core::{create_reducer, Action, Handlers, Reducer, Value};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), modux_core::ReducerError> {
//! let profile: BoxedReducer<Action> =
//!     Box::new(create_reducer("PROFILE", json!({"name": ""}), Handlers::new()));
//! let cart: BoxedReducer<Action> =
//!     Box::new(create_reducer("CART", json!({"items": []}), Handlers::new()));
//!
//! let app = combine_reducers(vec![("profile", profile), ("cart", cart)]);
//!
//! let state = app.reduce(None, &Action::init())?;
//! let state = app.reduce(
//!     Some(&state),
//!     &Action::new("PROFILE/COMMIT").merge(json!({"name": "Ada"})),
//! )?;
//!
//! assert_eq!(
//!     state,
//!     Value::from(json!({"profile": {"name": "Ada"}, "cart": {"items": []}}))
//! );
//! # Ok(())
//! # }
//! ```

use crate::error::ReducerError;
use crate::path::Path;
use crate::reducer::Reducer;
use crate::value::{Map, Value};

/// A boxed reducer over [`Value`] state
pub type BoxedReducer<A> =
    Box<dyn Reducer<State = Value, Action = A, Error = ReducerError> + Send + Sync>;

/// Combines reducers that each own one key of a map-shaped state.
///
/// Every reducer sees every action, but only its own slice of state (absent
/// on the first call). Keys of the incoming state that no reducer owns are
/// carried over untouched. A `null` state counts as absent; any other
/// non-map state is rejected with [`ReducerError::PathConflict`] rather than
/// overwritten.
#[must_use]
pub fn combine_reducers<A, K>(slices: Vec<(K, BoxedReducer<A>)>) -> CombinedReducer<A>
where
    K: Into<String>,
{
    CombinedReducer {
        slices: slices
            .into_iter()
            .map(|(key, reducer)| (key.into(), reducer))
            .collect(),
    }
}

/// A combined reducer that runs one reducer per state key.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<A> {
    slices: Vec<(String, BoxedReducer<A>)>,
}

impl<A> CombinedReducer<A> {
    /// The keys owned by the child reducers, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }
}

impl<A> Reducer for CombinedReducer<A> {
    type State = Value;
    type Action = A;
    type Error = ReducerError;

    fn reduce(&self, state: Option<&Value>, action: &A) -> Result<Value, ReducerError> {
        let current = match state {
            None | Some(Value::Null) => None,
            Some(Value::Map(map)) => Some(map),
            Some(_) => {
                return Err(ReducerError::PathConflict {
                    path: Path::root().to_string(),
                    key: self.keys().next().unwrap_or_default().to_string(),
                });
            },
        };

        let mut changed: Option<Map> = None;

        for (key, reducer) in &self.slices {
            let previous = current.and_then(|map| map.get(key));
            let next = reducer.reduce(previous, action)?;

            if previous.is_some_and(|p| p.same(&next)) {
                continue;
            }

            changed
                .get_or_insert_with(|| current.map(|map| Map::clone(map)).unwrap_or_default())
                .insert(key.clone(), next);
        }

        Ok(match (changed, state) {
            (Some(map), _) => Value::from_map(map),
            (None, Some(state)) => state.clone(),
            (None, None) => Value::empty_map(),
        })
    }
}

/// Scopes a reducer to the sub-tree at `path` of a larger state.
///
/// The child reducer receives the current sub-tree (or `None` if it does
/// not exist) and its result is written back at `path`, creating missing
/// containers on the way.
///
/// # Examples
///
/// ```
/// use modux_core::composition::scope_reducer;
/// use modux_core::{create_reducer, Action, Handlers, Path, Reducer, Value};
/// use serde_json::json;
///
/// # fn main() -> Result<(), modux_core::ReducerError> {
/// let scoped = scope_reducer(
///     create_reducer("PREFS", json!({"theme": "light"}), Handlers::new()),
///     Path::parse("user.prefs")?,
/// );
///
/// let state = Value::from(json!({"user": {"name": "Ada"}}));
/// let state = scoped.reduce(Some(&state), &Action::new("PREFS/SET").merge(json!({"theme": "dark"})))?;
///
/// assert_eq!(
///     state,
///     Value::from(json!({"user": {"name": "Ada", "prefs": {"theme": "dark"}}}))
/// );
/// # Ok(())
/// # }
/// ```
pub const fn scope_reducer<R>(reducer: R, path: Path) -> ScopedReducer<R> {
    ScopedReducer { reducer, path }
}

/// A scoped reducer that operates on a sub-tree of state.
///
/// Created by [`scope_reducer`].
#[derive(Debug, Clone)]
pub struct ScopedReducer<R> {
    reducer: R,
    path: Path,
}

impl<R> ScopedReducer<R> {
    /// Where the child reducer's state lives
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }
}

impl<R> Reducer for ScopedReducer<R>
where
    R: Reducer<State = Value, Error = ReducerError>,
{
    type State = Value;
    type Action = R::Action;
    type Error = ReducerError;

    fn reduce(&self, state: Option<&Value>, action: &R::Action) -> Result<Value, ReducerError> {
        let sub_state = state.and_then(|s| s.get_in(&self.path));
        let next = self.reducer.reduce(sub_state, action)?;

        state.unwrap_or(&Value::Null).set_in(&self.path, next)
    }
}
