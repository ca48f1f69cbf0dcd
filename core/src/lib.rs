//! # Modux Core
//!
//! A factory for namespaced reducers over an immutable, structurally shared
//! state tree.
//!
//! ## Core Concepts
//!
//! - **State** ([`Value`]): an immutable JSON-like tree; clones share structure
//! - **Action** ([`Action`]): a type string plus an optional [`Payload`] and [`Path`]
//! - **Reducer** ([`Reducer`]): pure function `(Option<State>, Action) → State`
//! - **Namespace convention**: actions typed `<namespace>/...` are applied
//!   automatically by deep merge or replacement, optionally at a path
//! - **Handlers**: exact action types mapped to custom update functions,
//!   which always take precedence over the namespace convention
//!
//! ## Architecture Principles
//!
//! - Pure functions, no hidden I/O
//! - State is never mutated in place
//! - Untouched sub-trees are shared by reference, so change detection is a
//!   pointer comparison ([`Value::same`])
//! - Errors from user code are handed back unmodified
//!
//! ## Example
//!
//! ```
//! use modux_core::{Action, NamespacedReducer, Value};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), modux_core::ReducerError> {
//! let reducer = NamespacedReducer::builder(
//!     "NAME_SPACE",
//!     json!({"name": "test", "deepKey": {"value": ["test2"], "test": {"t1": "t1"}}}),
//! )
//! .build();
//!
//! let state = reducer.apply(None, &Action::init())?;
//!
//! let next = reducer.apply(
//!     Some(&state),
//!     &Action::new("NAME_SPACE/COMMIT")
//!         .at("deepKey.test")?
//!         .merge(json!({"t2": "t2"})),
//! )?;
//!
//! assert_eq!(
//!     next,
//!     Value::from(json!({
//!         "name": "test",
//!         "deepKey": {"value": ["test2"], "test": {"t1": "t1", "t2": "t2"}},
//!     }))
//! );
//! # Ok(())
//! # }
//! ```

/// Actions, payloads and action types
pub mod action;

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Error types
pub mod error;

/// Deep merge with structural sharing
pub mod merge;

/// Field-access paths and path-based reads and writes
pub mod path;

/// The Reducer trait and the namespaced reducer factory
pub mod reducer;

/// Update resolution for namespaced actions
pub mod resolve;

/// The immutable state tree
pub mod value;

pub use action::{Action, ActionType, INIT, Payload, ReplaceFn};
pub use error::ReducerError;
pub use merge::deep_merge;
pub use path::Path;
pub use reducer::{
    Handler, Handlers, NamespacedReducer, Reducer, ReducerBuilder, create_reducer, handler,
};
pub use resolve::{resolve, resolve_action};
pub use value::{Map, Value};
