//! Actions: the only way to request a state change
//!
//! An [`Action`] carries a type string, an optional [`Payload`] and an
//! optional [`Path`]. The payload says *how* the target is updated:
//!
//! - [`Payload::Merge`] deep-merges a partial tree into the target. It is
//!   also how arbitrary data reaches custom handlers.
//! - [`Payload::Replace`] computes the whole new target from the current
//!   one; nothing is merged.
//!
//! The path says *where*: the whole state when absent, otherwise the
//! sub-tree it addresses.
//!
//! # Example
//!
//! ```
//! use modux_core::{Action, Value};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), modux_core::ReducerError> {
//! let rename = Action::new("PROFILE/COMMIT").merge(json!({"name": "Ada"}));
//!
//! let reset_prefs = Action::new("PROFILE/COMMIT")
//!     .at("settings.prefs")?
//!     .replace(|_| Ok(Value::empty_map()));
//!
//! assert_eq!(rename.action_type().namespace(), Some("PROFILE"));
//! assert!(reset_prefs.path().is_some());
//! # Ok(())
//! # }
//! ```

use crate::error::ReducerError;
use crate::path::Path;
use crate::value::Value;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// Action type dispatched by state containers to obtain the initial state
pub const INIT: &str = "@@INIT";

/// Function computing a replacement for the targeted sub-tree
///
/// Receives the current value at the target, or `None` when a path was
/// given and nothing exists there yet.
pub type ReplaceFn = Arc<dyn Fn(Option<&Value>) -> Result<Value, ReducerError> + Send + Sync>;

/// How an action updates its target
#[derive(Clone)]
pub enum Payload {
    /// Deep-merge this partial tree into the target
    Merge(Value),
    /// Replace the target with the function's result
    Replace(ReplaceFn),
}

impl Payload {
    /// Merge payload from anything convertible into a [`Value`]
    #[must_use]
    pub fn merge(patch: impl Into<Value>) -> Self {
        Self::Merge(patch.into())
    }

    /// Replace payload from a closure
    #[must_use]
    pub fn replace<F>(update: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Value, ReducerError> + Send + Sync + 'static,
    {
        Self::Replace(Arc::new(update))
    }

    /// The carried data, for merge payloads
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Merge(value) => Some(value),
            Self::Replace(_) => None,
        }
    }
}

// Manual Debug implementation since closures don't implement Debug
impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge(value) => f.debug_tuple("Payload::Merge").field(value).finish(),
            Self::Replace(_) => write!(f, "Payload::Replace(<fn>)"),
        }
    }
}

/// Identifier of an action, conventionally `NAMESPACE/NAME`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionType(Arc<str>);

impl ActionType {
    /// Create an action type
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The type as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `/`, if there is one
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(namespace, _)| namespace)
    }

    /// Whether this type is `namespace` followed by a literal `/`
    ///
    /// The comparison is exact and case-sensitive; the namespace is never
    /// interpreted as a pattern.
    #[must_use]
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.0
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActionType {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// A tagged request for a state transition
#[derive(Clone, Debug)]
pub struct Action {
    action_type: ActionType,
    payload: Option<Payload>,
    path: Option<Path>,
}

impl Action {
    /// Create an action with no payload and no path
    #[must_use]
    pub fn new(action_type: impl Into<ActionType>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
            path: None,
        }
    }

    /// The bootstrap action containers send to discover initial state
    #[must_use]
    pub fn init() -> Self {
        Self::new(INIT)
    }

    /// Attach a payload
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a merge payload
    #[must_use]
    pub fn merge(self, patch: impl Into<Value>) -> Self {
        self.with_payload(Payload::merge(patch))
    }

    /// Attach a replace payload
    #[must_use]
    pub fn replace<F>(self, update: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Value, ReducerError> + Send + Sync + 'static,
    {
        self.with_payload(Payload::replace(update))
    }

    /// Target an already parsed path
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }

    /// Target the sub-tree at a dot-separated path
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidPath`] if `path` does not parse.
    pub fn at(self, path: &str) -> Result<Self, ReducerError> {
        Ok(self.with_path(Path::parse(path)?))
    }

    /// The action's type
    #[must_use]
    pub const fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    /// The payload, if any
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The target path, if any
    #[must_use]
    pub const fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Data carried by a merge payload
    ///
    /// Custom handlers use this to read the action's data.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.payload.as_ref().and_then(Payload::as_value)
    }
}

/// Wire shape of an action, e.g. `{"type": "NS/COMMIT", "path": "a.b", "payload": {...}}`
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default, deserialize_with = "present")]
    payload: Option<Value>,
    #[serde(default)]
    path: Option<Path>,
}

/// A present field is a payload even when it is `null`; only an absent one
/// means "no payload".
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAction::deserialize(deserializer)?;
        Ok(Self {
            action_type: raw.action_type.into(),
            payload: raw.payload.map(Payload::Merge),
            path: raw.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_matching_is_exact() {
        let action_type = ActionType::new("NAME_SPACE/COMMIT");
        assert!(action_type.is_in_namespace("NAME_SPACE"));
        assert!(!action_type.is_in_namespace("NAME"));
        assert!(!action_type.is_in_namespace("name_space"));
        assert!(!ActionType::new("NAME_SPACE").is_in_namespace("NAME_SPACE"));
        assert!(!ActionType::new("NAME_SPACEX/COMMIT").is_in_namespace("NAME_SPACE"));
    }

    #[test]
    fn test_namespace_is_not_a_pattern() {
        assert!(ActionType::new("a.b/X").is_in_namespace("a.b"));
        assert!(!ActionType::new("axb/X").is_in_namespace("a.b"));
    }

    #[test]
    fn test_namespace_prefix() {
        assert_eq!(ActionType::new("NS/A/B").namespace(), Some("NS"));
        assert_eq!(ActionType::new(INIT).namespace(), None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let action = Action::new("NS/COMMIT").merge(json!({"a": 1}));
        assert_eq!(action.action_type().as_str(), "NS/COMMIT");
        assert_eq!(action.value(), Some(&Value::from(json!({"a": 1}))));
        assert!(action.path().is_none());

        let action = Action::new("NS/COMMIT").with_path(Path::from_keys(["a"]));
        assert!(action.payload().is_none());
        assert_eq!(action.path().map(Path::len), Some(1));
    }

    #[test]
    fn test_replace_payload_has_no_value() {
        let action = Action::new("NS/COMMIT").replace(|_| Ok(Value::Null));
        assert!(matches!(action.payload(), Some(Payload::Replace(_))));
        assert!(action.value().is_none());
        assert_eq!(
            format!("{:?}", action.payload()),
            "Some(Payload::Replace(<fn>))"
        );
    }

    #[test]
    fn test_at_rejects_bad_path() {
        assert!(matches!(
            Action::new("NS/COMMIT").at("a..b"),
            Err(ReducerError::InvalidPath { .. })
        ));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if deserialization fails
    fn test_deserialize_from_json() {
        let action: Action = serde_json::from_value(json!({
            "type": "NS/COMMIT",
            "path": "deepKey.test",
            "payload": {"t2": "t2"},
        }))
        .expect("action should deserialize");

        assert_eq!(action.action_type().as_str(), "NS/COMMIT");
        assert_eq!(action.path().map(Path::to_string).as_deref(), Some("deepKey.test"));
        assert_eq!(action.value(), Some(&Value::from(json!({"t2": "t2"}))));
    }

    #[test]
    fn test_deserialize_minimal() {
        let action: Result<Action, _> = serde_json::from_str(r#"{"type": "@@INIT"}"#);
        assert!(action.is_ok_and(|a| a.payload().is_none() && a.path().is_none()));

        let missing_type: Result<Action, _> = serde_json::from_str(r#"{"payload": 1}"#);
        assert!(missing_type.is_err());
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if deserialization or reduction fails
    fn test_deserialize_null_payload_is_a_merge() {
        let action: Action = serde_json::from_value(json!({
            "type": "NS/C",
            "path": "a.b",
            "payload": null,
        }))
        .expect("action should deserialize");

        assert!(matches!(action.payload(), Some(Payload::Merge(Value::Null))));

        let state = Value::from(json!({"a": {"b": 1}}));
        let next = crate::resolve::resolve_action(&state, &action).expect("merge should succeed");
        assert_eq!(next, Value::from(json!({"a": {"b": null}})));
    }
}
