//! # Profile Example
//!
//! A user profile store demonstrating namespaced modux reducers.
//!
//! This example showcases:
//! - Loading the initial state from JSON
//! - Namespaced `PROFILE/...` actions applied by deep merge or replacement
//! - Path-targeted updates (`preferences.notifications`)
//! - Custom handlers, including one that takes precedence over the
//!   namespace convention and one that rejects malformed actions
//!
//! ## Example
//!
//! ```
//! use modux_core::Value;
//! use profile_demo::{actions, initial_state, profile_reducer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let reducer = profile_reducer(initial_state()?);
//!
//! let state = reducer.apply(None, &modux_core::Action::init())?;
//! let state = reducer.apply(Some(&state), &actions::rename("Ada"))?;
//!
//! assert_eq!(state.get("name"), Some(&Value::from("Ada")));
//! # Ok(())
//! # }
//! ```

use modux_core::{NamespacedReducer, Path, ReducerError, Value};

/// Namespace of every convention-based profile action
pub const NAMESPACE: &str = "PROFILE";

/// Restores the initial profile
pub const RESET: &str = "PROFILE_RESET";

/// Validated rename; registered inside the namespace so it overrides the
/// generic merge
pub const RENAME: &str = "PROFILE/RENAME";

/// Clears the session, dispatched by the authentication feature
pub const LOGOUT: &str = "SESSION/LOGOUT";

const INITIAL_STATE: &str = include_str!("../initial_state.json");

/// Parse the bundled initial profile
///
/// # Errors
///
/// Returns an error if the bundled JSON is malformed.
pub fn initial_state() -> Result<Value, serde_json::Error> {
    serde_json::from_str(INITIAL_STATE)
}

/// Build the profile reducer
#[must_use]
pub fn profile_reducer(initial: Value) -> NamespacedReducer {
    let reset_to = initial.clone();

    NamespacedReducer::builder(NAMESPACE, initial)
        .on(RESET, move |_, _| Ok(reset_to.clone()))
        .on(RENAME, |state, action| {
            let name = action
                .value()
                .and_then(|payload| payload.get("name"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ReducerError::handler(RENAME, "name must be a non-empty string"))?;

            state.set_in(&Path::from_keys(["name"]), Value::from(name))
        })
        .on(LOGOUT, |state, _| {
            state.set_in(
                &Path::from_keys(["session"]),
                Value::from_iter([("token", Value::Null), ("expiresAt", Value::Null)]),
            )
        })
        .build()
}

/// Constructors for the actions the profile feature understands
pub mod actions {
    use super::{LOGOUT, NAMESPACE, RENAME, RESET};
    use modux_core::{Action, Path, Value};
    use serde_json::json;

    /// Deep-merge a partial profile
    #[must_use]
    pub fn update(patch: serde_json::Value) -> Action {
        Action::new(format!("{NAMESPACE}/UPDATE")).merge(patch)
    }

    /// Deep-merge a partial tree at `path`
    #[must_use]
    pub fn update_at(path: Path, patch: serde_json::Value) -> Action {
        Action::new(format!("{NAMESPACE}/UPDATE"))
            .with_path(path)
            .merge(patch)
    }

    /// Replace the list of preferred languages
    #[must_use]
    pub fn set_languages(languages: &[&str]) -> Action {
        let languages = Value::from_vec(languages.iter().copied().map(Value::from).collect());
        Action::new(format!("{NAMESPACE}/SET_LANGUAGES"))
            .with_path(Path::from_keys(["preferences", "languages"]))
            .replace(move |_| Ok(languages.clone()))
    }

    /// Flip a notification channel on or off
    #[must_use]
    pub fn toggle_notification(channel: &str) -> Action {
        Action::new(format!("{NAMESPACE}/TOGGLE_NOTIFICATION"))
            .with_path(Path::from_keys(["preferences", "notifications", channel]))
            .replace(|current| Ok(Value::from(!current.and_then(Value::as_bool).unwrap_or(false))))
    }

    /// Rename with validation
    #[must_use]
    pub fn rename(name: &str) -> Action {
        Action::new(RENAME).merge(json!({ "name": name }))
    }

    /// Start a session
    #[must_use]
    pub fn login(token: &str, expires_at: &str) -> Action {
        update(json!({"session": {"token": token, "expiresAt": expires_at}}))
    }

    /// End the session
    #[must_use]
    pub fn logout() -> Action {
        Action::new(LOGOUT)
    }

    /// Restore the initial profile
    #[must_use]
    pub fn reset() -> Action {
        Action::new(RESET)
    }
}
