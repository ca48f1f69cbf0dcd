//! Error types for reducers and the update resolver
//!
//! Reducers never catch or wrap errors raised by custom handlers or
//! replace functions: whatever they return is handed back to the caller
//! as-is. The only errors produced by this crate itself come from path
//! parsing and from writes that try to descend through a leaf value.

use thiserror::Error;

/// Errors that can occur while reducing an action
#[derive(Error, Debug)]
pub enum ReducerError {
    /// A path string could not be parsed into keys
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// A write tried to descend through a value that is not a container
    ///
    /// Raised when a path segment addresses a scalar leaf, or an array
    /// with a key that is not an in-range index.
    #[error("Cannot descend into '{key}' at path '{path}': not a container")]
    PathConflict {
        /// The full path being written
        path: String,
        /// The key that could not be followed
        key: String,
    },

    /// A custom handler rejected the action
    #[error("Handler for '{action_type}' failed: {message}")]
    Handler {
        /// The action type whose handler failed
        action_type: String,
        /// Human-readable reason
        message: String,
    },

    /// Any other error raised by a handler or replace function
    #[error(transparent)]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ReducerError {
    /// Convenience constructor for handler rejections
    #[must_use]
    pub fn handler(action_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            action_type: action_type.into(),
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error raised by user code
    #[must_use]
    pub fn custom<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Custom(Box::new(error))
    }
}
