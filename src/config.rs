//! Runtime gameplay configuration loaded from `assets/rover.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tunable constants in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/rover.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! shield_duration = 240
//!
//! [hard]
//! obstacle_cadence = 40
//! ```
//!
//! The configuration is read once when a run starts and is immutable for the
//! rest of that run.

use crate::constants::*;
use crate::error::{
    validate_hot_threshold, validate_positive, validate_unit_multiplier, GameError, GameResult,
};
use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Difficulty selected before a run; fixes spawn cadences and zone strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a label, falling back to [`Difficulty::Medium`] with a warning.
    pub fn parse_or_default(label: &str) -> Self {
        label.parse().unwrap_or_else(|err: GameError| {
            warn!("{err}; falling back to {}", Difficulty::default());
            Difficulty::default()
        })
    }

    /// Next difficulty in menu order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty {
                label: s.to_string(),
            }),
        }
    }
}

/// Per-difficulty spawn tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Ticks between obstacle spawns at score 0.
    pub obstacle_cadence: u32,
    /// Score distance between asteroid impacts at the gate score.
    pub asteroid_interval: f32,
    /// Multiplier on the power-up spawn chance.
    pub powerup_rate: f32,
    /// Multiplier on every hazard zone's intensity.
    pub zone_intensity: f32,
}

impl DifficultyParams {
    pub fn easy() -> Self {
        Self {
            obstacle_cadence: 100,
            asteroid_interval: 700.0,
            powerup_rate: 1.0,
            zone_intensity: 0.8,
        }
    }

    pub fn medium() -> Self {
        Self {
            obstacle_cadence: 75,
            asteroid_interval: 500.0,
            powerup_rate: 0.9,
            zone_intensity: 1.0,
        }
    }

    pub fn hard() -> Self {
        Self {
            obstacle_cadence: 50,
            asteroid_interval: 350.0,
            powerup_rate: 0.75,
            zone_intensity: 1.2,
        }
    }

    fn validate(&self) -> GameResult<()> {
        validate_positive("obstacle_cadence", self.obstacle_cadence as f32)?;
        validate_positive("asteroid_interval", self.asteroid_interval)?;
        validate_unit_multiplier("powerup_rate", self.powerup_rate)?;
        validate_positive("zone_intensity", self.zone_intensity)
    }
}

/// A `[easy]`/`[medium]`/`[hard]` table as written in the file.  Keys left out
/// take that difficulty's own defaults, not another table's.
#[derive(Debug, Deserialize)]
struct DifficultyOverrides {
    obstacle_cadence: Option<u32>,
    asteroid_interval: Option<f32>,
    powerup_rate: Option<f32>,
    zone_intensity: Option<f32>,
}

impl DifficultyOverrides {
    fn apply(self, base: DifficultyParams) -> DifficultyParams {
        DifficultyParams {
            obstacle_cadence: self.obstacle_cadence.unwrap_or(base.obstacle_cadence),
            asteroid_interval: self.asteroid_interval.unwrap_or(base.asteroid_interval),
            powerup_rate: self.powerup_rate.unwrap_or(base.powerup_rate),
            zone_intensity: self.zone_intensity.unwrap_or(base.zone_intensity),
        }
    }
}

fn easy_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DifficultyParams, D::Error> {
    Ok(DifficultyOverrides::deserialize(deserializer)?.apply(DifficultyParams::easy()))
}

fn medium_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DifficultyParams, D::Error> {
    Ok(DifficultyOverrides::deserialize(deserializer)?.apply(DifficultyParams::medium()))
}

fn hard_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DifficultyParams, D::Error> {
    Ok(DifficultyOverrides::deserialize(deserializer)?.apply(DifficultyParams::hard()))
}

// ── GameConfig ────────────────────────────────────────────────────────────────

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset in `assets/rover.toml`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Canvas ────────────────────────────────────────────────────────────────
    pub canvas_width: f32,
    pub canvas_height: f32,

    // ── Temperature ───────────────────────────────────────────────────────────
    pub zone_influence: f32,
    pub resistance_factor: f32,
    pub regulation_rate: f32,
    pub regulation_factor: f32,
    pub hot_threshold: f32,

    // ── Timers ────────────────────────────────────────────────────────────────
    pub shield_duration: u32,
    pub death_animation_ticks: u32,

    // ── Spawning ──────────────────────────────────────────────────────────────
    pub zone_cap: usize,
    pub asteroid_max_active: usize,

    // ── Leaderboard ───────────────────────────────────────────────────────────
    pub leaderboard_cap: usize,

    // ── Difficulty table ──────────────────────────────────────────────────────
    #[serde(deserialize_with = "easy_table")]
    pub easy: DifficultyParams,
    #[serde(deserialize_with = "medium_table")]
    pub medium: DifficultyParams,
    #[serde(deserialize_with = "hard_table")]
    pub hard: DifficultyParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            zone_influence: ZONE_INFLUENCE,
            resistance_factor: RESISTANCE_FACTOR,
            regulation_rate: REGULATION_RATE,
            regulation_factor: REGULATION_FACTOR,
            hot_threshold: TEMP_HOT_THRESHOLD,
            shield_duration: SHIELD_DURATION,
            death_animation_ticks: DEATH_ANIMATION_TICKS,
            zone_cap: ZONE_CAP,
            asteroid_max_active: ASTEROID_MAX_ACTIVE,
            leaderboard_cap: LEADERBOARD_CAP,
            easy: DifficultyParams::easy(),
            medium: DifficultyParams::medium(),
            hard: DifficultyParams::hard(),
        }
    }
}

impl GameConfig {
    /// Spawn tuning for the given difficulty.
    #[inline]
    pub fn difficulty(&self, difficulty: Difficulty) -> DifficultyParams {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> GameResult<Self> {
        toml::from_str::<GameConfig>(contents).map_err(|err| GameError::Serialization {
            message: err.to_string(),
        })
    }

    /// Reset any out-of-range value to its compiled default, logging each reset.
    ///
    /// Returns the number of values that were replaced.
    pub fn sanitize(&mut self) -> usize {
        let defaults = GameConfig::default();
        let mut replaced = 0;

        let checks: [(&'static str, GameResult<()>); 6] = [
            ("canvas_width", validate_positive("canvas_width", self.canvas_width)),
            ("canvas_height", validate_positive("canvas_height", self.canvas_height)),
            ("zone_influence", validate_positive("zone_influence", self.zone_influence)),
            (
                "resistance_factor",
                validate_unit_multiplier("resistance_factor", self.resistance_factor),
            ),
            ("regulation_rate", validate_positive("regulation_rate", self.regulation_rate)),
            ("hot_threshold", validate_hot_threshold(self.hot_threshold)),
        ];
        for (field, result) in checks {
            if let Err(err) = result {
                warn!("{err}; using default");
                replaced += 1;
                match field {
                    "canvas_width" => self.canvas_width = defaults.canvas_width,
                    "canvas_height" => self.canvas_height = defaults.canvas_height,
                    "zone_influence" => self.zone_influence = defaults.zone_influence,
                    "resistance_factor" => self.resistance_factor = defaults.resistance_factor,
                    "regulation_rate" => self.regulation_rate = defaults.regulation_rate,
                    _ => self.hot_threshold = defaults.hot_threshold,
                }
            }
        }

        if self.zone_cap == 0 {
            warn!("zone_cap must be at least 1; using default");
            self.zone_cap = defaults.zone_cap;
            replaced += 1;
        }
        if self.leaderboard_cap == 0 {
            warn!("leaderboard_cap must be at least 1; using default");
            self.leaderboard_cap = defaults.leaderboard_cap;
            replaced += 1;
        }

        for (difficulty, params, fallback) in [
            (Difficulty::Easy, &mut self.easy, defaults.easy),
            (Difficulty::Medium, &mut self.medium, defaults.medium),
            (Difficulty::Hard, &mut self.hard, defaults.hard),
        ] {
            if let Err(err) = params.validate() {
                warn!("[{difficulty}] {err}; using default table");
                *params = fallback;
                replaced += 1;
            }
        }

        replaced
    }
}

/// Startup system: attempt to load `assets/rover.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are logged
/// but do not abort the game.  A missing file is not an error.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/rover.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(mut loaded) => {
                loaded.sanitize();
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_table_matches_recommended_values() {
        let config = GameConfig::default();
        let hard = config.difficulty(Difficulty::Hard);
        assert_eq!(hard.obstacle_cadence, 50);
        assert_eq!(hard.asteroid_interval, 350.0);
        assert_eq!(config.difficulty(Difficulty::Easy).zone_intensity, 0.8);
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        assert_eq!(Difficulty::parse_or_default("HARD"), Difficulty::Hard);
        assert_eq!(Difficulty::parse_or_default("nightmare"), Difficulty::Medium);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str("shield_duration = 120\n[hard]\nobstacle_cadence = 40\n")
            .expect("partial config must parse");
        assert_eq!(config.shield_duration, 120);
        assert_eq!(config.hard.obstacle_cadence, 40);
        assert_eq!(config.hard.asteroid_interval, 350.0);
        assert_eq!(config.canvas_width, CANVAS_WIDTH);
    }

    #[test]
    fn partial_difficulty_tables_fill_from_their_own_defaults() {
        let config = GameConfig::from_toml_str(
            "[easy]\nzone_intensity = 0.5\n[hard]\nobstacle_cadence = 40\n",
        )
        .expect("partial tables must parse");

        let hard = DifficultyParams {
            obstacle_cadence: 40,
            ..DifficultyParams::hard()
        };
        assert_eq!(config.hard, hard);
        assert_eq!(config.hard.powerup_rate, 0.75);
        assert_eq!(config.hard.zone_intensity, 1.2);

        assert_eq!(config.easy.zone_intensity, 0.5);
        assert_eq!(config.easy.obstacle_cadence, 100);
        assert_eq!(config.easy.asteroid_interval, 700.0);

        assert_eq!(config.medium, DifficultyParams::medium());
    }

    #[test]
    fn mistyped_difficulty_key_is_a_parse_error() {
        assert!(GameConfig::from_toml_str("[hard]\nobstacle_cadence = \"fast\"\n").is_err());
    }

    #[test]
    fn sanitize_replaces_unsafe_values() {
        let mut config = GameConfig {
            hot_threshold: 20.0,
            zone_cap: 0,
            ..GameConfig::default()
        };
        config.easy.powerup_rate = 4.0;

        assert_eq!(config.sanitize(), 3);
        assert_eq!(config.hot_threshold, TEMP_HOT_THRESHOLD);
        assert_eq!(config.zone_cap, ZONE_CAP);
        assert_eq!(config.easy, DifficultyParams::easy());
    }
}
