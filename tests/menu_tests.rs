//! Headless unit tests for the [`GameState`] state machine and the name field.
//!
//! These tests use [`MinimalPlugins`] (no window, no rendering) so they run
//! fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `MainMenu`.
//! 2. A `NextState` request transitions from `MainMenu` → `Playing`.
//! 3. `Playing` state persists across frames with no new transition request.
//! 4. The full loop `Playing → GameOver → Leaderboard → MainMenu` settles.
//! 5. Name entry accepts letters/digits/space/underscore, backspace, and a cap.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use psyche_rover::constants::NAME_MAX_LEN;
use psyche_rover::menu::{edit_name, GameState};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with just the state registered via `init_state`.
///
/// `MinimalPlugins` provides the required scheduling infrastructure.
/// `StatesPlugin` adds the `StateTransition` schedule needed by `init_state`.
/// No window or rendering is created.
fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

fn request(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
}

fn current(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

// ── State machine ─────────────────────────────────────────────────────────────

/// The default variant of `GameState` is `MainMenu`.
#[test]
fn default_state_is_main_menu() {
    let mut app = app_with_default_state();
    app.update(); // run one frame so StateTransition fires
    assert_eq!(current(&app), GameState::MainMenu, "initial state must be MainMenu");
}

/// Requesting `Playing` via `NextState` transitions the state on the next
/// `StateTransition` pass (which Bevy runs before each `Update`).
#[test]
fn transition_main_menu_to_playing() {
    let mut app = app_with_default_state();
    app.update(); // settle into MainMenu

    request(&mut app, GameState::Playing);

    assert_eq!(
        current(&app),
        GameState::Playing,
        "state must be Playing after explicit transition"
    );
}

/// `Playing` state persists across additional frames with no accidental reversion.
#[test]
fn playing_state_persists_across_frames() {
    let mut app = app_with_default_state();
    app.update();
    request(&mut app, GameState::Playing);

    // Run several more frames without another transition request.
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(
        current(&app),
        GameState::Playing,
        "Playing must remain stable without a new transition"
    );
}

/// A finished run walks through name entry and the scores table back to the menu.
#[test]
fn full_loop_returns_to_main_menu() {
    let mut app = app_with_default_state();
    app.update();

    for state in [
        GameState::Playing,
        GameState::GameOver,
        GameState::Leaderboard,
        GameState::MainMenu,
    ] {
        request(&mut app, state.clone());
        assert_eq!(current(&app), state);
    }
}

/// The leaderboard is reachable straight from the menu and back.
#[test]
fn leaderboard_round_trip_from_menu() {
    let mut app = app_with_default_state();
    app.update();
    request(&mut app, GameState::Leaderboard);
    assert_eq!(current(&app), GameState::Leaderboard);
    request(&mut app, GameState::MainMenu);
    assert_eq!(current(&app), GameState::MainMenu);
}

// ── Name entry ────────────────────────────────────────────────────────────────

fn tap(keys: &mut ButtonInput<KeyCode>, key: KeyCode, buffer: &mut String) -> bool {
    keys.clear();
    keys.press(key);
    let changed = edit_name(keys, buffer);
    keys.release(key);
    changed
}

#[test]
fn name_entry_types_and_erases() {
    let mut keys = ButtonInput::<KeyCode>::default();
    let mut buffer = String::new();

    for key in [KeyCode::KeyA, KeyCode::KeyB, KeyCode::Minus, KeyCode::Digit9] {
        assert!(tap(&mut keys, key, &mut buffer));
    }
    assert_eq!(buffer, "AB_9");

    assert!(tap(&mut keys, KeyCode::Backspace, &mut buffer));
    assert_eq!(buffer, "AB_");

    // Keys outside the name alphabet are ignored.
    assert!(!tap(&mut keys, KeyCode::Comma, &mut buffer));
    assert_eq!(buffer, "AB_");
}

#[test]
fn name_entry_stops_at_the_maximum_length() {
    let mut keys = ButtonInput::<KeyCode>::default();
    let mut buffer = String::new();
    for _ in 0..NAME_MAX_LEN + 5 {
        tap(&mut keys, KeyCode::KeyZ, &mut buffer);
    }
    assert_eq!(buffer.chars().count(), NAME_MAX_LEN);
}

#[test]
fn backspace_on_empty_name_is_not_a_change() {
    let mut keys = ButtonInput::<KeyCode>::default();
    let mut buffer = String::new();
    assert!(!tap(&mut keys, KeyCode::Backspace, &mut buffer));
}
