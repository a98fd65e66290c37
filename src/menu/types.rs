use crate::archetype::ArchetypeId;
use crate::config::Difficulty;
use crate::leaderboard::ScoreEntry;
use bevy::prelude::*;

/// Top-level application state machine.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen with difficulty and rover selection; shown on startup.
    #[default]
    MainMenu,
    /// A run is live.  Pause is handled inside the session, not as a state.
    Playing,
    /// The death animation finished; name entry overlay is visible.
    GameOver,
    /// Top scores table.
    Leaderboard,
}

/// Difficulty chosen on the main menu for the next run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedDifficulty(pub Difficulty);

/// Rover archetype chosen on the main menu for the next run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedArchetype(pub ArchetypeId);

/// Name-entry buffer for the game-over screen.
#[derive(Resource, Debug, Clone, Default)]
pub struct NameEntry {
    pub buffer: String,
    /// Validation message shown under the field; cleared on every edit.
    pub error: Option<String>,
}

/// Entry submitted by the last run, highlighted on the leaderboard.
#[derive(Resource, Debug, Clone, Default)]
pub struct LastSubmission(pub Option<ScoreEntry>);

/// Root node of the main-menu UI; entire tree is despawned on `OnExit(MainMenu)`.
#[derive(Component)]
pub struct MainMenuRoot;

/// Tags the "Start" button.
#[derive(Component)]
pub struct MenuStartButton;

/// Tags the difficulty cycle button.
#[derive(Component)]
pub struct MenuDifficultyButton;

/// Tags the archetype cycle button.
#[derive(Component)]
pub struct MenuArchetypeButton;

/// Tags the "Leaderboard" button.
#[derive(Component)]
pub struct MenuLeaderboardButton;

/// Tags the "Quit" button.
#[derive(Component)]
pub struct MenuQuitButton;

/// Dynamic label inside the difficulty button.
#[derive(Component)]
pub struct DifficultyLabel;

/// Dynamic label inside the archetype button.
#[derive(Component)]
pub struct ArchetypeLabel;

/// Archetype blurb under the selection buttons.
#[derive(Component)]
pub struct ArchetypeDescription;

/// Root node of the game-over overlay; despawned on `OnExit(GameOver)`.
#[derive(Component)]
pub struct GameOverRoot;

/// Tags the "Submit" button in the game-over overlay.
#[derive(Component)]
pub struct GameOverSubmitButton;

/// Tags the "Skip" button in the game-over overlay.
#[derive(Component)]
pub struct GameOverSkipButton;

/// Dynamic text showing the name-entry buffer.
#[derive(Component)]
pub struct NameValueText;

/// Dynamic text showing the name validation error.
#[derive(Component)]
pub struct NameErrorText;

/// Root node of the leaderboard screen; despawned on `OnExit(Leaderboard)`.
#[derive(Component)]
pub struct LeaderboardRoot;

/// Tags the "Back" button on the leaderboard screen.
#[derive(Component)]
pub struct LeaderboardBackButton;
