//! Profile example binary
//!
//! Runs a scripted sequence of profile actions through the reducer and
//! prints each transition. Pass a file of JSON actions (one per line, e.g.
//! `{"type": "PROFILE/UPDATE", "path": "preferences", "payload": {"theme": "dark"}}`)
//! to replay those instead.

use modux_core::{Action, Path, Value};
use profile_demo::{actions, initial_state, profile_reducer};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_demo=debug,modux_core=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Profile Example: Namespaced Reducers ===\n");

    let reducer = profile_reducer(initial_state()?);

    let script = match std::env::args().nth(1) {
        Some(file) => {
            tracing::info!(%file, "Loading actions from file");
            load_actions(&file)?
        },
        None => scripted_actions()?,
    };

    let mut state = reducer.apply(None, &Action::init())?;
    println!("Initial state: {state}");

    for action in script {
        println!("\n>>> Sending: {}", action.action_type());
        match reducer.apply(Some(&state), &action) {
            Ok(next) if next.same(&state) => {
                println!("State unchanged");
            },
            Ok(next) => {
                println!("State: {next}");
                state = next;
            },
            Err(error) => {
                tracing::warn!(%error, action_type = %action.action_type(), "Action rejected");
                println!("Rejected: {error}");
            },
        }
    }

    println!("\n=== Demonstration Complete ===");
    println!("\nKey concepts demonstrated:");
    println!("  • PROFILE/* actions: merged or replaced automatically");
    println!("  • path: targets a sub-tree, siblings are shared by reference");
    println!("  • Custom handlers: PROFILE/RENAME overrides the namespace convention");
    println!("  • Unrelated actions: state returned by reference, nothing rebuilt");

    Ok(())
}

fn scripted_actions() -> anyhow::Result<Vec<Action>> {
    Ok(vec![
        actions::update(json!({"email": "ada@example.com"})),
        actions::login("token-123", "2026-01-01T00:00:00Z"),
        actions::update_at(
            Path::parse("preferences.notifications")?,
            json!({"push": true}),
        ),
        actions::toggle_notification("email"),
        actions::set_languages(&["en", "fr"]),
        actions::rename("Ada Lovelace"),
        actions::rename(""),
        Action::new("CART/ADD_ITEM").merge(json!({"sku": "A-1"})),
        Action::new("PROFILE/UPDATE")
            .at("name.first")?
            .merge(Value::from("broken")),
        actions::logout(),
        actions::reset(),
    ])
}

fn load_actions(file: &str) -> anyhow::Result<Vec<Action>> {
    let text = std::fs::read_to_string(file)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<Action>(line).map_err(anyhow::Error::from))
        .collect()
}
