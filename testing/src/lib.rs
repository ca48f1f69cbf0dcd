//! # Modux Testing
//!
//! Testing utilities and helpers for modux reducers.
//!
//! This crate provides:
//! - A fluent Given-When-Then harness for reducers ([`ReducerTest`])
//! - Reference-identity assertions for state trees
//! - Property-based testing strategies for states, patches and paths
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```
//! use modux_core::{Action, NamespacedReducer};
//! use modux_testing::{ReducerTest, assertions};
//! use serde_json::json;
//!
//! let reducer = NamespacedReducer::builder("PROFILE", json!({"name": "anon"})).build();
//!
//! ReducerTest::new(reducer)
//!     .when_action(Action::new("PROFILE/COMMIT").merge(json!({"name": "Ada"})))
//!     .then_state(|state| assertions::assert_json(state, &json!({"name": "Ada"})))
//!     .run();
//! ```


/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Honors `RUST_LOG` and writes through the test harness so output is
    /// captured per test. Safe to call from every test; only the first call
    /// installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| "modux_core=trace".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities
///
/// proptest strategies for state trees, merge patches and paths. Keys are
/// drawn from a small alphabet so generated patches overlap generated
/// states often enough to exercise the recursive merge.
pub mod properties {
    use modux_core::{Path, Value};
    use proptest::prelude::*;

    /// A map key from a small alphabet
    pub fn arb_key() -> impl Strategy<Value = String> {
        "[a-e]"
    }

    /// A scalar leaf
    pub fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (-100i64..100).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ]
    }

    /// Any state tree, up to four levels deep
    pub fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(4, 64, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from_vec),
                prop::collection::btree_map(arb_key(), inner, 0..5).prop_map(Value::from_map),
            ]
        })
    }

    /// A map-shaped state tree
    pub fn arb_map() -> impl Strategy<Value = Value> {
        prop::collection::btree_map(arb_key(), arb_value(), 0..5).prop_map(Value::from_map)
    }

    /// A non-empty path of one to three keys
    pub fn arb_path() -> impl Strategy<Value = Path> {
        prop::collection::vec(arb_key(), 1..4).prop_map(Path::from_keys)
    }

    /// A namespace name
    pub fn arb_namespace() -> impl Strategy<Value = String> {
        "[A-Z][A-Z_]{0,8}"
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use reducer_test::{ReducerTest, assertions};
