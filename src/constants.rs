//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::GameConfig::default`] mirrors the
//! subset that can be overridden at runtime from `assets/rover.toml`.
//!
//! ## Units
//!
//! The simulation is tick-based: every duration is measured in **ticks**
//! (one `update()` call, 60 per second in the desktop host) and every speed in
//! **canvas pixels per tick**.  Canvas coordinates have their origin at the
//! top-left corner with +Y pointing down.

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Width of the play field (canvas pixels).
pub const CANVAS_WIDTH: f32 = 800.0;

/// Height of the play field (canvas pixels).
pub const CANVAS_HEIGHT: f32 = 500.0;

/// Fixed simulation rate used by the desktop host.
pub const TICK_HZ: f64 = 60.0;

// ── Rover ─────────────────────────────────────────────────────────────────────

pub const ROVER_WIDTH: f32 = 48.0;
pub const ROVER_HEIGHT: f32 = 32.0;

/// Horizontal start position of the rover's top-left corner.
pub const ROVER_START_X: f32 = 100.0;

/// Lower bound for the effective speed so a frozen rover can still crawl.
pub const MIN_SPEED: f32 = 0.1;

/// Hard cap for every upgrade axis.
pub const MAX_UPGRADE_LEVEL: i32 = 3;

/// Lowest level an archetype may start with (a built-in vulnerability).
pub const MIN_UPGRADE_LEVEL: i32 = -1;

// ── Temperature ───────────────────────────────────────────────────────────────

pub const TEMP_MIN: f32 = 0.0;
pub const TEMP_MAX: f32 = 100.0;

/// Neutral midpoint natural regulation pulls toward.
pub const TEMP_NEUTRAL: f32 = 50.0;

/// Above this the coolant system engages.
pub const TEMP_HOT_THRESHOLD: f32 = 75.0;

/// Coolant never pulls the temperature further down than `threshold - margin`.
pub const COOLANT_FLOOR_MARGIN: f32 = 5.0;

/// Degrees per tick contributed by a zone of intensity 1.0 at multiplier 1.0.
pub const ZONE_INFLUENCE: f32 = 0.15;

/// Fraction of a zone's effect removed per resistance level.
///
/// Level 3 leaves 25 % of the effect; level −1 amplifies it to 125 %.
pub const RESISTANCE_FACTOR: f32 = 0.25;

/// Base pull toward neutral (degrees per tick) when outside every zone.
pub const REGULATION_RATE: f32 = 0.05;

/// Extra regulation per `temp_regulation` level.
pub const REGULATION_FACTOR: f32 = 0.5;

/// Coolant units consumed per tick while cooling at regulation level 0.
pub const COOLANT_DRAIN: f32 = 0.2;

/// Reduction of coolant drain per regulation level.
pub const COOLANT_DRAIN_REDUCTION: f32 = 0.2;

/// Smallest drain regardless of regulation level.
pub const COOLANT_MIN_DRAIN: f32 = 0.05;

/// Degrees removed per tick while cooling at regulation level 0.
pub const COOLANT_COOLING: f32 = 0.3;

/// Extra cooling per regulation level.
pub const COOLANT_COOLING_BONUS: f32 = 0.3;

/// Band upper bounds (inclusive): frozen, cold, normal, hot.  Anything above
/// the last is overheated.
pub const BAND_FROZEN_MAX: f32 = 20.0;
pub const BAND_COLD_MAX: f32 = 40.0;
pub const BAND_NORMAL_MAX: f32 = 60.0;
pub const BAND_HOT_MAX: f32 = 80.0;

pub const SPEED_MULT_FROZEN: f32 = 0.4;
pub const SPEED_MULT_COLD: f32 = 0.75;
pub const SPEED_MULT_NORMAL: f32 = 1.0;
pub const SPEED_MULT_HOT: f32 = 0.8;
pub const SPEED_MULT_OVERHEATED: f32 = 0.5;

// ── Shield ────────────────────────────────────────────────────────────────────

/// Ticks a shield stays up before expiring on its own (5 s at 60 Hz).
pub const SHIELD_DURATION: u32 = 300;

// ── Crash / game over ─────────────────────────────────────────────────────────

/// Length of the crash debris animation before the run ends.
pub const DEATH_ANIMATION_TICKS: u32 = 90;

// ── Hazard zones ──────────────────────────────────────────────────────────────

pub const ZONE_CAP: usize = 6;

/// Per-tick spawn chance with the field already at `ZONE_CAP - 1` zones.
pub const ZONE_SPAWN_BASE_CHANCE: f32 = 0.005;

/// Additional chance scaled by the fraction of free zone slots.
pub const ZONE_SPAWN_BONUS_CHANCE: f32 = 0.02;

pub const ZONE_MIN_RADIUS: f32 = 60.0;
pub const ZONE_MAX_RADIUS: f32 = 140.0;
pub const ZONE_MIN_INTENSITY: f32 = 0.5;
pub const ZONE_MAX_INTENSITY: f32 = 1.5;

/// Radius growth / shrink per tick.
pub const ZONE_GROWTH_RATE: f32 = 1.0;

/// Opacity change per tick while growing; fading out runs at twice this.
pub const ZONE_FADE_RATE: f32 = 0.02;

/// Opacity a fully grown zone settles at.
pub const ZONE_TARGET_OPACITY: f32 = 0.6;

pub const ZONE_STABLE_MIN_TICKS: u32 = 180;
pub const ZONE_STABLE_MAX_TICKS: u32 = 480;

/// Fixed minimum added on top of the stable phase for the total duration.
pub const ZONE_EXTRA_MIN_TICKS: u32 = 120;

/// Upper bound of the random extra added to the total duration.
pub const ZONE_EXTRA_RANDOM_TICKS: u32 = 240;

// ── Asteroid impacts ──────────────────────────────────────────────────────────

/// Score below which no asteroid impacts spawn.
pub const ASTEROID_SCORE_GATE: u64 = 600;

pub const ASTEROID_MAX_ACTIVE: usize = 4;
pub const ASTEROID_WARNING_TICKS: u32 = 120;
pub const ASTEROID_IMPACT_TICKS: u32 = 10;
pub const ASTEROID_EXPLODING_TICKS: u32 = 40;
pub const ASTEROID_FADING_TICKS: u32 = 30;
pub const ASTEROID_MIN_RADIUS: f32 = 40.0;
pub const ASTEROID_MAX_RADIUS: f32 = 70.0;

/// Explosion radius relative to the target radius.
pub const ASTEROID_EXPLOSION_SCALE: f32 = 1.5;

/// Fraction of the target radius that counts as a direct hit at impact.
pub const ASTEROID_DIRECT_HIT_FRACTION: f32 = 0.3;

/// Interval reduction per point of score.
pub const ASTEROID_INTERVAL_PER_SCORE: f32 = 0.02;

/// The interval never drops below this fraction of the difficulty base.
pub const ASTEROID_INTERVAL_FLOOR_FRACTION: f32 = 0.5;

// ── Obstacles ─────────────────────────────────────────────────────────────────

pub const OBSTACLE_MIN_SIZE: f32 = 28.0;
pub const OBSTACLE_MAX_SIZE: f32 = 56.0;
pub const OBSTACLE_BASE_SPEED: f32 = 3.0;

/// Extra scroll speed per 1000 points.
pub const OBSTACLE_SPEED_PER_1000: f32 = 0.5;
pub const OBSTACLE_MAX_SPEED: f32 = 9.0;

/// Score points per tick of cadence reduction.
pub const OBSTACLE_CADENCE_SCORE_DIVISOR: u64 = 200;
pub const OBSTACLE_MIN_CADENCE: u32 = 20;

// ── Power-ups ─────────────────────────────────────────────────────────────────

/// Per-tick spawn chance before the difficulty rate multiplier.
pub const POWERUP_BASE_CHANCE: f32 = 0.004;
pub const POWERUP_RADIUS: f32 = 12.0;
pub const POWERUP_SPEED: f32 = 2.5;
pub const POWERUP_SPIN: f32 = 0.05;

/// Spawn weight of an upgrade power-up whose axis is already maxed.
pub const POWERUP_MAXED_WEIGHT: f32 = 0.25;
pub const POWERUP_SHIELD_WEIGHT: f32 = 1.5;

// ── Progression ───────────────────────────────────────────────────────────────

/// Score thresholds that grant a one-time milestone reward.  Also the
/// evolution-stage boundaries.
pub const MILESTONES: [u64; 6] = [1000, 2000, 3000, 5000, 7500, 10000];

/// Coolant restored by a partial refill, as a fraction of capacity.
pub const PARTIAL_COOLANT_REFILL: f32 = 0.3;

/// Ticks a milestone banner stays on screen.
pub const CELEBRATION_TICKS: u32 = 150;

/// Ticks a short HUD notice (e.g. "HEAT MAXED") stays on screen.
pub const NOTICE_TICKS: u32 = 60;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Hard cap on live particles; oldest are dropped first.
pub const MAX_PARTICLES: usize = 600;

/// Emit one exhaust puff every N ticks while moving.
pub const EXHAUST_INTERVAL: u64 = 3;

// ── Leaderboard ───────────────────────────────────────────────────────────────

pub const LEADERBOARD_CAP: usize = 15;
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 10;
