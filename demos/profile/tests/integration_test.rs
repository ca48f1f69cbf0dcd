//! Integration tests for the profile reducer
//!
//! These tests run realistic action sequences through the reducer and
//! check both the resulting values and which sub-trees were shared.

use modux_core::{Action, NamespacedReducer, Path, ReducerError, Value};
use modux_testing::{ReducerTest, assertions};
use profile_demo::{actions, initial_state, profile_reducer};
use serde_json::json;

#[allow(clippy::expect_used)] // Panics: Test will fail if the bundled JSON is malformed
fn reducer() -> NamespacedReducer {
    profile_reducer(initial_state().expect("bundled state should parse"))
}

#[allow(clippy::expect_used)] // Panics: Test will fail if any action is rejected
fn run(reducer: &NamespacedReducer, script: &[Action]) -> Value {
    script.iter().fold(
        reducer.apply(None, &Action::init()).expect("init should succeed"),
        |state, action| reducer.apply(Some(&state), action).expect("action should succeed"),
    )
}

#[test]
fn test_profile_session_flow() {
    let reducer = reducer();
    let state = run(
        &reducer,
        &[
            actions::update(json!({"email": "ada@example.com"})),
            actions::login("token-123", "2026-01-01T00:00:00Z"),
            actions::rename("Ada"),
        ],
    );

    assertions::assert_json(
        &state,
        &json!({
            "name": "Ada",
            "email": "ada@example.com",
            "session": {"token": "token-123", "expiresAt": "2026-01-01T00:00:00Z"},
            "preferences": {
                "theme": "light",
                "notifications": {"email": true, "push": false},
                "languages": ["en"]
            }
        }),
    );

    let state = run(&reducer, &[actions::logout()]);
    assert_eq!(
        state.get("session"),
        Some(&Value::from(json!({"token": null, "expiresAt": null})))
    );
}

#[test]
fn test_preference_updates_share_siblings() {
    let reducer = reducer();
    let before = run(&reducer, &[]);

    ReducerTest::new(reducer)
        .given_state(before)
        .when_action(actions::update_at(
            Path::from_keys(["preferences", "notifications"]),
            json!({"push": true}),
        ))
        .then_transition(|previous, next| {
            let null = Value::Null;
            let previous = previous.unwrap_or(&null);
            assertions::assert_shared(previous, next, &Path::from_keys(["session"]));
            assertions::assert_shared(previous, next, &Path::from_keys(["preferences", "languages"]));
            assert_eq!(
                next.get_in(&Path::from_keys(["preferences", "notifications", "push"])),
                Some(&Value::from(true))
            );
        })
        .run();
}

#[test]
fn test_languages_are_replaced_not_merged() {
    let state = run(&reducer(), &[actions::set_languages(&["fr", "de"])]);
    assert_eq!(
        state.get_in(&Path::from_keys(["preferences", "languages"])),
        Some(&Value::from(json!(["fr", "de"])))
    );
}

#[test]
fn test_toggle_twice_restores_value() {
    let state = run(
        &reducer(),
        &[actions::toggle_notification("email"), actions::toggle_notification("email")],
    );
    assert_eq!(
        state.get_in(&Path::from_keys(["preferences", "notifications", "email"])),
        Some(&Value::from(true))
    );
}

#[test]
fn test_rename_overrides_namespace_merge() {
    ReducerTest::new(reducer())
        .when_action(Action::new("PROFILE/RENAME").merge(json!({"name": 42})))
        .then_error(|error| {
            assert!(matches!(error, ReducerError::Handler { action_type, .. } if action_type == "PROFILE/RENAME"));
        })
        .run();
}

#[test]
fn test_foreign_actions_are_ignored() {
    let reducer = reducer();
    let state = run(&reducer, &[]);

    ReducerTest::new(reducer)
        .given_state(state)
        .when_action(Action::new("CART/ADD_ITEM").merge(json!({"sku": "A-1"})))
        .then_unchanged()
        .run();
}

#[test]
fn test_reset_after_changes() {
    let reducer = reducer();
    let state = run(
        &reducer,
        &[actions::rename("Grace"), actions::set_languages(&["es"]), actions::reset()],
    );
    assert!(state.same(reducer.initial_state()));
}

#[test]
#[allow(clippy::expect_used)] // Panics: Test will fail if the worker threads fail
fn test_concurrent_reductions_share_one_reducer() {
    let reducer = reducer();
    let base = run(&reducer, &[]);

    let results: Vec<Value> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let reducer = &reducer;
                let base = &base;
                scope.spawn(move || {
                    reducer
                        .apply(Some(base), &actions::update(json!({"email": format!("user{i}@example.com")})))
                        .expect("update should succeed")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker should not panic"))
            .collect()
    });

    for (i, state) in results.iter().enumerate() {
        assert_eq!(
            state.get("email").and_then(Value::as_str),
            Some(format!("user{i}@example.com").as_str())
        );
        assertions::assert_shared(&base, state, &Path::from_keys(["preferences"]));
    }
    assert_eq!(base.get("email"), Some(&Value::Null));
}
