//! The reducer trait and the namespaced reducer factory
//!
//! [`create_reducer`] (or [`NamespacedReducer::builder`]) produces a reducer
//! that resolves every action in three steps:
//!
//! 1. an absent state is replaced by the initial state, whatever the action;
//! 2. an action type registered as a custom handler is delegated to it
//!    verbatim, with no merging and no path logic;
//! 3. an action type of the form `<namespace>/...` is applied through the
//!    update resolver (deep merge or replace, optionally at a path).
//!
//! Anything else leaves the state untouched and returns the very same
//! reference, so consumers can skip work with [`Value::same`].

use crate::action::Action;
use crate::error::ReducerError;
use crate::resolve::resolve_action;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The Reducer trait - a pure function from previous state and action to next state
///
/// # Type Parameters
///
/// - `State`: The state this reducer produces
/// - `Action`: The action type this reducer processes
/// - `Error`: What a failed reduction returns
///
/// `state` is `None` when the container has no state yet; reducers answer
/// with their initial state in that case.
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The error returned when an action cannot be applied
    type Error;

    /// Compute the next state
    ///
    /// Must not mutate anything reachable from `state`; returning the input
    /// unchanged signals that the action was not relevant.
    ///
    /// # Errors
    ///
    /// Implementation specific; errors are expected to be returned to the
    /// caller unmodified.
    fn reduce(
        &self,
        state: Option<&Self::State>,
        action: &Self::Action,
    ) -> Result<Self::State, Self::Error>;
}

/// A custom update function registered for one action type
pub type Handler = Arc<dyn Fn(&Value, &Action) -> Result<Value, ReducerError> + Send + Sync>;

/// Handler table keyed by exact action type
pub type Handlers = HashMap<String, Handler>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(update: F) -> Handler
where
    F: Fn(&Value, &Action) -> Result<Value, ReducerError> + Send + Sync + 'static,
{
    Arc::new(update)
}

/// Create a reducer for `namespace` starting from `initial_state`
///
/// # Example
///
/// ```
/// use modux_core::{create_reducer, handler, Action, Handlers, Value};
/// use serde_json::json;
///
/// # fn main() -> Result<(), modux_core::ReducerError> {
/// let mut handlers = Handlers::new();
/// handlers.insert(
///     "CLEAR".to_string(),
///     handler(|_, _| Ok(Value::empty_map())),
/// );
///
/// let reducer = create_reducer("PROFILE", json!({"name": "test"}), handlers);
///
/// let state = reducer.apply(None, &Action::init())?;
/// let state = reducer.apply(
///     Some(&state),
///     &Action::new("PROFILE/COMMIT").merge(json!({"name": "Ada"})),
/// )?;
/// assert_eq!(state, Value::from(json!({"name": "Ada"})));
///
/// let cleared = reducer.apply(Some(&state), &Action::new("CLEAR"))?;
/// assert_eq!(cleared, Value::empty_map());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn create_reducer(
    namespace: impl Into<String>,
    initial_state: impl Into<Value>,
    handlers: Handlers,
) -> NamespacedReducer {
    NamespacedReducer {
        namespace: namespace.into(),
        initial_state: initial_state.into(),
        handlers,
    }
}

/// Reducer applying the namespace convention over a handler table
///
/// Created by [`create_reducer`] or [`NamespacedReducer::builder`]. The
/// namespace, initial state and handlers are fixed for its lifetime.
#[derive(Clone)]
pub struct NamespacedReducer {
    namespace: String,
    initial_state: Value,
    handlers: Handlers,
}

impl NamespacedReducer {
    /// Start building a reducer
    #[must_use]
    pub fn builder(namespace: impl Into<String>, initial_state: impl Into<Value>) -> ReducerBuilder {
        ReducerBuilder {
            namespace: namespace.into(),
            initial_state: initial_state.into(),
            handlers: Handlers::new(),
        }
    }

    /// The namespace prefix (without the trailing `/`)
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The state returned for an absent input state
    #[must_use]
    pub const fn initial_state(&self) -> &Value {
        &self.initial_state
    }

    /// Whether a custom handler is registered for `action_type`
    #[must_use]
    pub fn handles(&self, action_type: &str) -> bool {
        self.handlers.contains_key(action_type)
    }

    /// Compute the next state
    ///
    /// # Errors
    ///
    /// Returns whatever a custom handler or replace function returns, as-is,
    /// and [`ReducerError::PathConflict`] when a namespaced update has to
    /// descend through a leaf.
    pub fn apply(&self, state: Option<&Value>, action: &Action) -> Result<Value, ReducerError> {
        let state = state.unwrap_or(&self.initial_state);
        let action_type = action.action_type();

        if let Some(handler) = self.handlers.get(action_type.as_str()) {
            tracing::trace!(%action_type, "Delegating to custom handler");
            return handler(state, action).inspect_err(|error| {
                tracing::debug!(%action_type, %error, "Custom handler failed");
            });
        }

        if action_type.is_in_namespace(&self.namespace) {
            tracing::trace!(
                %action_type,
                path = action.path().map(ToString::to_string),
                "Resolving namespaced update"
            );
            return resolve_action(state, action).inspect_err(|error| {
                tracing::debug!(%action_type, %error, "Namespaced update failed");
            });
        }

        tracing::trace!(%action_type, "Action not handled, state unchanged");
        Ok(state.clone())
    }
}

impl Reducer for NamespacedReducer {
    type State = Value;
    type Action = Action;
    type Error = ReducerError;

    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value, ReducerError> {
        self.apply(state, action)
    }
}

impl fmt::Debug for NamespacedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handled: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        handled.sort_unstable();
        f.debug_struct("NamespacedReducer")
            .field("namespace", &self.namespace)
            .field("initial_state", &self.initial_state)
            .field("handlers", &handled)
            .finish()
    }
}

/// Builder for [`NamespacedReducer`]
///
/// ```
/// use modux_core::{Action, NamespacedReducer, Value};
/// use serde_json::json;
///
/// let reducer = NamespacedReducer::builder("SESSION", json!({"user": null}))
///     .on("SESSION/LOGOUT", |_, _| Ok(Value::from(json!({"user": null}))))
///     .build();
///
/// assert!(reducer.handles("SESSION/LOGOUT"));
/// assert_eq!(reducer.namespace(), "SESSION");
/// ```
pub struct ReducerBuilder {
    namespace: String,
    initial_state: Value,
    handlers: Handlers,
}

impl ReducerBuilder {
    /// Register a custom handler for an exact action type
    ///
    /// Registering the same type twice keeps the last handler.
    #[must_use]
    pub fn on<F>(mut self, action_type: impl Into<String>, update: F) -> Self
    where
        F: Fn(&Value, &Action) -> Result<Value, ReducerError> + Send + Sync + 'static,
    {
        self.handlers.insert(action_type.into(), handler(update));
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> NamespacedReducer {
        create_reducer(self.namespace, self.initial_state, self.handlers)
    }
}
