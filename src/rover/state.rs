//! Rover state: position, temperature, coolant, upgrades, shield fields and
//! the `normal → crashed` state machine.
//!
//! Systems that mutate this state live in the sibling modules and in the
//! simulation modules:
//! - [`super::control`]: input intent + movement
//! - [`super::shield`]: shield activation, expiry and breaking
//! - [`crate::thermal`]: temperature, coolant and speed band

use super::control::RoverIntent;
use crate::archetype::RoverArchetype;
use crate::constants::{
    MAX_UPGRADE_LEVEL, MIN_UPGRADE_LEVEL, ROVER_HEIGHT, ROVER_START_X, ROVER_WIDTH, TEMP_NEUTRAL,
};
use bevy::math::{Rect, Vec2};

// ── Upgrades ──────────────────────────────────────────────────────────────────

/// One of the three upgrade axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    HeatResistance,
    ColdResistance,
    Regulation,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::HeatResistance,
        UpgradeKind::ColdResistance,
        UpgradeKind::Regulation,
    ];

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::HeatResistance => "HEAT",
            UpgradeKind::ColdResistance => "COLD",
            UpgradeKind::Regulation => "REGULATION",
        }
    }
}

/// Upgrade levels on the three axes.
///
/// Levels range from −1 (a built-in vulnerability some archetypes start with)
/// to [`MAX_UPGRADE_LEVEL`].  Increments are one step at a time and never exceed
/// the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UpgradeLevels {
    pub heat_resistance: i32,
    pub cold_resistance: i32,
    pub temp_regulation: i32,
}

impl UpgradeLevels {
    pub const fn new(heat_resistance: i32, cold_resistance: i32, temp_regulation: i32) -> Self {
        Self {
            heat_resistance,
            cold_resistance,
            temp_regulation,
        }
    }

    #[inline]
    pub fn get(&self, kind: UpgradeKind) -> i32 {
        match kind {
            UpgradeKind::HeatResistance => self.heat_resistance,
            UpgradeKind::ColdResistance => self.cold_resistance,
            UpgradeKind::Regulation => self.temp_regulation,
        }
    }

    fn slot(&mut self, kind: UpgradeKind) -> &mut i32 {
        match kind {
            UpgradeKind::HeatResistance => &mut self.heat_resistance,
            UpgradeKind::ColdResistance => &mut self.cold_resistance,
            UpgradeKind::Regulation => &mut self.temp_regulation,
        }
    }

    #[inline]
    pub fn is_maxed(&self, kind: UpgradeKind) -> bool {
        self.get(kind) >= MAX_UPGRADE_LEVEL
    }

    /// Raise `kind` by one level.  Returns `false` (and changes nothing) when
    /// the axis is already maxed.
    pub fn increment(&mut self, kind: UpgradeKind) -> bool {
        let level = self.slot(kind);
        if *level >= MAX_UPGRADE_LEVEL {
            return false;
        }
        *level += 1;
        true
    }

    /// Clamp every axis into the legal `[-1, 3]` range.
    pub fn clamped(self) -> Self {
        Self {
            heat_resistance: self.heat_resistance.clamp(MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL),
            cold_resistance: self.cold_resistance.clamp(MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL),
            temp_regulation: self.temp_regulation.clamp(MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL),
        }
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

/// Rover lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoverState {
    #[default]
    Normal,
    /// Destroyed; the death animation is playing.
    Crashed,
}

/// What ended the run; chooses the failure particles and the game-over caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Obstacle,
    Asteroid,
    Freeze,
    Meltdown,
}

impl CrashCause {
    pub fn caption(self) -> &'static str {
        match self {
            CrashCause::Obstacle => "Hull breached by debris",
            CrashCause::Asteroid => "Caught in an asteroid impact",
            CrashCause::Freeze => "Systems froze solid",
            CrashCause::Meltdown => "Core meltdown",
        }
    }
}

// ── Rover ─────────────────────────────────────────────────────────────────────

/// The player's rover.  One instance per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Rover {
    /// Top-left corner in canvas coordinates.
    pub pos: Vec2,
    pub size: Vec2,
    pub base_speed: f32,
    /// Multiplier from the current temperature band.
    pub speed_multiplier: f32,
    /// Displacement applied on the last tick (pixels per tick).
    pub velocity: Vec2,
    /// Consumable shield charges.
    pub shields: u32,
    pub has_shield: bool,
    /// Ticks left before an active shield expires.
    pub shield_remaining: u32,
    /// Internal temperature, 0–100.
    pub temperature: f32,
    pub coolant: f32,
    pub max_coolant: f32,
    pub upgrades: UpgradeLevels,
    pub state: RoverState,
    /// Countdown for the current state (death animation while crashed).
    pub state_timer: u32,
    pub crash_cause: Option<CrashCause>,
    /// Held movement directions from input.
    pub intent: RoverIntent,
}

impl Rover {
    /// Build a fresh rover from an archetype, centred vertically on a canvas
    /// of the given height.
    pub fn from_archetype(archetype: &RoverArchetype, canvas_height: f32) -> Self {
        Self {
            pos: Vec2::new(ROVER_START_X, (canvas_height - ROVER_HEIGHT) * 0.5),
            size: Vec2::new(ROVER_WIDTH, ROVER_HEIGHT),
            base_speed: archetype.base_speed,
            speed_multiplier: 1.0,
            velocity: Vec2::ZERO,
            shields: archetype.starting_shields,
            has_shield: false,
            shield_remaining: 0,
            temperature: TEMP_NEUTRAL,
            coolant: archetype.coolant_capacity,
            max_coolant: archetype.coolant_capacity,
            upgrades: archetype.starting_upgrades.clamped(),
            state: RoverState::Normal,
            state_timer: 0,
            crash_cause: None,
            intent: RoverIntent::default(),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Radius used for circular tests (half the width).
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x * 0.5
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.pos, self.pos + self.size)
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        self.state == RoverState::Normal
    }

    /// Base speed scaled by the temperature band, never below `MIN_SPEED`.
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        crate::thermal::effective_speed(self.base_speed, self.speed_multiplier)
    }

    /// Add coolant, never exceeding capacity.
    pub fn refill_coolant(&mut self, amount: f32) {
        self.coolant = (self.coolant + amount).min(self.max_coolant);
    }

    /// Switch to `Crashed` and start the death animation.
    ///
    /// Returns `false` if the rover was already crashed (the first cause wins).
    pub fn crash(&mut self, cause: CrashCause, animation_ticks: u32) -> bool {
        if self.state == RoverState::Crashed {
            return false;
        }
        self.state = RoverState::Crashed;
        self.state_timer = animation_ticks;
        self.crash_cause = Some(cause);
        self.velocity = Vec2::ZERO;
        self.intent = RoverIntent::default();
        self.has_shield = false;
        self.shield_remaining = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{archetype, ArchetypeId};

    #[test]
    fn increment_stops_at_cap() {
        let mut levels = UpgradeLevels::new(2, 0, 0);
        assert!(levels.increment(UpgradeKind::HeatResistance));
        assert!(!levels.increment(UpgradeKind::HeatResistance));
        assert_eq!(levels.heat_resistance, MAX_UPGRADE_LEVEL);
    }

    #[test]
    fn negative_level_rises_one_step() {
        let mut levels = UpgradeLevels::new(0, -1, 0);
        assert!(levels.increment(UpgradeKind::ColdResistance));
        assert_eq!(levels.cold_resistance, 0);
    }

    #[test]
    fn crash_zeroes_velocity_and_keeps_first_cause() {
        let mut rover = Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0);
        rover.velocity = Vec2::new(3.0, -2.0);
        assert!(rover.crash(CrashCause::Freeze, 90));
        assert!(!rover.crash(CrashCause::Obstacle, 90));
        assert_eq!(rover.velocity, Vec2::ZERO);
        assert_eq!(rover.crash_cause, Some(CrashCause::Freeze));
        assert_eq!(rover.state_timer, 90);
    }

    #[test]
    fn refill_never_exceeds_capacity() {
        let mut rover = Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0);
        rover.coolant = 10.0;
        rover.refill_coolant(1000.0);
        assert_eq!(rover.coolant, rover.max_coolant);
    }
}
