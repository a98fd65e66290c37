//! Menu screens: `GameState` definition and `MainMenuPlugin`.
//!
//! ## States
//!
//! | State         | Description                                       |
//! |---------------|---------------------------------------------------|
//! | `MainMenu`    | Initial state; difficulty + rover selection       |
//! | `Playing`     | A run is live (see [`crate::session`])            |
//! | `GameOver`    | Name entry over the frozen run                    |
//! | `Leaderboard` | Top scores table                                  |
//!
//! ## Systems (registered by `MainMenuPlugin`)
//!
//! | System                            | Schedule                   | Purpose                          |
//! |-----------------------------------|----------------------------|----------------------------------|
//! | `setup_main_menu_when_font_ready` | `Update / in MainMenu`     | Spawn menu UI once font loads    |
//! | `cleanup_main_menu`               | `OnExit(MainMenu)`         | Despawn menu UI entities         |
//! | `menu_button_system`              | `Update / in MainMenu`     | Cycle selections, start, quit    |
//! | `refresh_selection_labels`        | `Update / in MainMenu`     | Rewrite selector labels          |
//! | `setup_game_over`                 | `OnEnter(GameOver)`        | Spawn name-entry overlay         |
//! | `name_input_system`               | `Update / in GameOver`     | Keyboard → name buffer           |
//! | `game_over_button_system`         | `Update / in GameOver`     | Submit / skip                    |
//! | `setup_leaderboard`               | `OnEnter(Leaderboard)`     | Spawn scores table               |
//! | `leaderboard_button_system`       | `Update / in Leaderboard`  | Back to menu                     |

use crate::archetype::{archetype, ArchetypeId};
use crate::config::Difficulty;
use crate::constants::NAME_MAX_LEN;
use crate::graphics::GameFont;
use crate::leaderboard::{current_unix_timestamp, format_date, ScoreBoard};
use crate::session::RoverSession;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

mod common;
mod game_over;
mod leaderboard_screen;
mod main_menu;
mod types;

use common::*;
pub use game_over::edit_name;
use game_over::*;
use leaderboard_screen::*;
use main_menu::*;
pub use types::*;

/// Registers `GameState`, the selection resources, and every menu screen.
///
/// This plugin must be added to the app **before** any plugin that calls
/// `.run_if(in_state(GameState::Playing))`, so the state is always registered
/// first.
pub struct MainMenuPlugin;

impl Plugin for MainMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SelectedDifficulty>()
            .init_resource::<SelectedArchetype>()
            .init_resource::<NameEntry>()
            .init_resource::<LastSubmission>()
            .add_systems(OnExit(GameState::MainMenu), cleanup_main_menu)
            .add_systems(
                Update,
                (
                    setup_main_menu_when_font_ready,
                    menu_button_system,
                    refresh_selection_labels,
                )
                    .chain()
                    .run_if(in_state(GameState::MainMenu)),
            )
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over)
            .add_systems(
                Update,
                (name_input_system, game_over_button_system, name_display_system)
                    .chain()
                    .run_if(in_state(GameState::GameOver)),
            )
            .add_systems(OnEnter(GameState::Leaderboard), setup_leaderboard)
            .add_systems(OnExit(GameState::Leaderboard), cleanup_leaderboard)
            .add_systems(
                Update,
                leaderboard_button_system.run_if(in_state(GameState::Leaderboard)),
            );
    }
}
