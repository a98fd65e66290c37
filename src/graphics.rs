use bevy::asset::LoadState;
use bevy::prelude::*;

const GAME_FONT_PATH: &str = "fonts/Tektur/Tektur-VariableFont_wdth,wght.ttf";

/// Game font resource: stores the loaded Tektur font handle.
///
/// All UI text in menus and the HUD references `font.0.clone()` instead of
/// using the default Bevy font.  Created by [`load_game_font`] at startup.
#[derive(Resource, Default)]
pub struct GameFont(pub Handle<Font>);

/// Load the custom Tektur font from assets at startup.
///
/// Must run before any UI setup systems that spawn text.
pub fn load_game_font(mut font: ResMut<GameFont>, asset_server: Res<AssetServer>) {
    font.0 = asset_server.load(GAME_FONT_PATH);
    eprintln!("[SETUP] Game font requested");
}

/// Swap in Bevy's built-in font if the Tektur file is missing or corrupt, so
/// menus that wait for the font still appear.
pub fn fallback_to_default_font(mut font: ResMut<GameFont>, asset_server: Res<AssetServer>) {
    if font.0 == Handle::default() {
        return;
    }
    if let LoadState::Failed(err) = asset_server.load_state(font.0.id()) {
        warn!("Game font unavailable ({err}); using the default font");
        font.0 = Handle::default();
    }
}

/// Setup camera for 2D rendering.
///
/// The default orthographic projection maps one world unit to one pixel, so
/// an 800×500 window shows the whole canvas centred on the origin.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}
