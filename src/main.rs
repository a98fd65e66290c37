use bevy::prelude::*;
use bevy::window::WindowResolution;
use psyche_rover::config::{self, GameConfig};
use psyche_rover::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use psyche_rover::graphics::{self, GameFont};
use psyche_rover::leaderboard::ScoreBoard;
use psyche_rover::menu::MainMenuPlugin;
use psyche_rover::session::SessionPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Psyche Rover".into(),
            resolution: WindowResolution::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32),
            resizable: false,
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Insert GameConfig with compiled defaults; load_game_config will
    // overwrite it from assets/rover.toml (if present) in the Startup schedule.
    .insert_resource(GameConfig::default())
    .init_resource::<GameFont>()
    .init_resource::<ScoreBoard>()
    // MainMenuPlugin registers GameState, so it goes before SessionPlugin.
    .add_plugins(MainMenuPlugin)
    .add_plugins(SessionPlugin)
    .add_systems(
        Startup,
        (
            config::load_game_config,
            graphics::setup_camera.after(config::load_game_config),
            graphics::load_game_font,
        ),
    )
    .add_systems(Update, graphics::fallback_to_default_font);

    app.run();
}
