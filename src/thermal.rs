//! Temperature & speed model.
//!
//! Each tick the rover's temperature moves by:
//!
//! | Situation                 | Effect                                                        |
//! |---------------------------|---------------------------------------------------------------|
//! | Inside one or more zones  | Σ ±(I × intensityMod × influence) × (1 − level × resistance)  |
//! | Outside every zone        | Pull toward 50 at `rate × (1 + regulation × factor)`, no overshoot |
//! | Above the hot threshold   | Coolant drains and pulls the temperature back, floor `threshold − 5` |
//!
//! The result is clamped to `[0, 100]` and mapped to one of five speed bands.
//! Reaching either end of the scale while `Normal` is terminal; the caller
//! ([`crate::game`]) performs the crash.

use crate::config::GameConfig;
use crate::constants::*;
use crate::rover::{Rover, UpgradeLevels};
use crate::zones::{HazardZone, ZoneKind};
use bevy::color::Srgba;

// ── Speed bands ───────────────────────────────────────────────────────────────

/// Discrete temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    Frozen,
    Cold,
    Normal,
    Hot,
    Overheated,
}

impl TempBand {
    pub fn of(temperature: f32) -> Self {
        if temperature <= BAND_FROZEN_MAX {
            TempBand::Frozen
        } else if temperature <= BAND_COLD_MAX {
            TempBand::Cold
        } else if temperature <= BAND_NORMAL_MAX {
            TempBand::Normal
        } else if temperature <= BAND_HOT_MAX {
            TempBand::Hot
        } else {
            TempBand::Overheated
        }
    }

    #[inline]
    pub fn speed_multiplier(self) -> f32 {
        match self {
            TempBand::Frozen => SPEED_MULT_FROZEN,
            TempBand::Cold => SPEED_MULT_COLD,
            TempBand::Normal => SPEED_MULT_NORMAL,
            TempBand::Hot => SPEED_MULT_HOT,
            TempBand::Overheated => SPEED_MULT_OVERHEATED,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TempBand::Frozen => "FROZEN",
            TempBand::Cold => "COLD",
            TempBand::Normal => "NOMINAL",
            TempBand::Hot => "HOT",
            TempBand::Overheated => "OVERHEATED",
        }
    }
}

/// Base speed times band multiplier, floored at [`MIN_SPEED`].
#[inline]
pub fn effective_speed(base_speed: f32, multiplier: f32) -> f32 {
    (base_speed * multiplier).max(MIN_SPEED)
}

// ── Temperature step ──────────────────────────────────────────────────────────

/// Change contributed by one zone the rover is inside.
pub fn zone_contribution(
    zone: &HazardZone,
    upgrades: &UpgradeLevels,
    intensity_mod: f32,
    config: &GameConfig,
) -> f32 {
    let (sign, level) = match zone.kind {
        ZoneKind::Hot => (1.0, upgrades.heat_resistance),
        ZoneKind::Cold => (-1.0, upgrades.cold_resistance),
    };
    let strength = zone.intensity * intensity_mod * config.zone_influence;
    let resistance = 1.0 - level as f32 * config.resistance_factor;
    sign * strength * resistance.max(0.0)
}

/// Pull toward neutral for a rover outside every zone, never overshooting.
pub fn natural_regulation(temperature: f32, temp_regulation: i32, config: &GameConfig) -> f32 {
    let rate = config.regulation_rate * (1.0 + temp_regulation as f32 * config.regulation_factor);
    let gap = TEMP_NEUTRAL - temperature;
    gap.signum() * rate.max(0.0).min(gap.abs())
}

/// Advance the rover's temperature and coolant by one tick and refresh its
/// speed multiplier.
///
/// Returns `true` when the temperature sits at either end of the scale.
pub fn step_temperature(
    rover: &mut Rover,
    zones: &[HazardZone],
    intensity_mod: f32,
    config: &GameConfig,
) -> bool {
    let center = rover.center();
    let mut delta = 0.0;
    let mut in_zone = false;
    for zone in zones.iter().filter(|z| z.contains(center)) {
        in_zone = true;
        delta += zone_contribution(zone, &rover.upgrades, intensity_mod, config);
    }
    if !in_zone {
        delta = natural_regulation(rover.temperature, rover.upgrades.temp_regulation, config);
    }
    rover.temperature += delta;

    apply_coolant(rover, config);

    rover.temperature = rover.temperature.clamp(TEMP_MIN, TEMP_MAX);
    rover.speed_multiplier = TempBand::of(rover.temperature).speed_multiplier();

    rover.temperature <= TEMP_MIN || rover.temperature >= TEMP_MAX
}

/// Coolant response above the hot threshold.
fn apply_coolant(rover: &mut Rover, config: &GameConfig) {
    if rover.temperature <= config.hot_threshold || rover.coolant <= 0.0 {
        return;
    }
    let regulation = rover.upgrades.temp_regulation as f32;
    let drain = (COOLANT_DRAIN * (1.0 - regulation * COOLANT_DRAIN_REDUCTION)).max(COOLANT_MIN_DRAIN);
    let cooling = (COOLANT_COOLING * (1.0 + regulation * COOLANT_COOLING_BONUS)).max(0.0);
    let floor = config.hot_threshold - COOLANT_FLOOR_MARGIN;

    rover.coolant = (rover.coolant - drain).max(0.0);
    rover.temperature = (rover.temperature - cooling).max(floor);
}

// ── Temperature colour ────────────────────────────────────────────────────────

pub const FROZEN_COLOR: Srgba = Srgba::rgb(0.85, 0.95, 1.0);
pub const COLD_COLOR: Srgba = Srgba::rgb(0.30, 0.60, 1.0);
pub const HOT_COLOR: Srgba = Srgba::rgb(1.0, 0.55, 0.10);
pub const OVERHEATED_COLOR: Srgba = Srgba::rgb(1.0, 0.12, 0.05);

/// Component-wise linear interpolation of two colours.
pub fn lerp_rgb(a: Srgba, b: Srgba, t: f32) -> Srgba {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    Srgba::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

/// Colour for a temperature: frozen → cold → `base` → hot → overheated.
///
/// Each band blends between its two neighbouring anchor colours by the
/// temperature's normalised position inside the band; the normal band is the
/// archetype colour unchanged.
pub fn temperature_color(temperature: f32, base: Srgba) -> Srgba {
    let t = temperature.clamp(TEMP_MIN, TEMP_MAX);
    let within = |lo: f32, hi: f32| (t - lo) / (hi - lo);
    match TempBand::of(t) {
        TempBand::Frozen => lerp_rgb(FROZEN_COLOR, COLD_COLOR, within(TEMP_MIN, BAND_FROZEN_MAX)),
        TempBand::Cold => lerp_rgb(COLD_COLOR, base, within(BAND_FROZEN_MAX, BAND_COLD_MAX)),
        TempBand::Normal => base,
        TempBand::Hot => lerp_rgb(base, HOT_COLOR, within(BAND_NORMAL_MAX, BAND_HOT_MAX)),
        TempBand::Overheated => {
            lerp_rgb(HOT_COLOR, OVERHEATED_COLOR, within(BAND_HOT_MAX, TEMP_MAX))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{archetype, ArchetypeId};
    use crate::zones::ZonePhase;
    use bevy::math::Vec2;

    fn rover() -> Rover {
        Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0)
    }

    fn zone_at(center: Vec2, kind: ZoneKind, intensity: f32) -> HazardZone {
        HazardZone {
            pos: center,
            radius: 100.0,
            max_radius: 100.0,
            kind,
            intensity,
            opacity: ZONE_TARGET_OPACITY,
            phase: ZonePhase::Stable,
            elapsed: 0,
            stable_start: 0,
            stable_duration: u32::MAX,
            total_duration: u32::MAX,
        }
    }

    #[test]
    fn normal_band_is_full_speed_and_others_slower() {
        assert_eq!(TempBand::of(40.1).speed_multiplier(), 1.0);
        assert_eq!(TempBand::of(60.0).speed_multiplier(), 1.0);
        for t in [0.0, 10.0, 20.0, 30.0, 40.0, 61.0, 75.0, 80.0, 95.0, 100.0] {
            assert!(TempBand::of(t).speed_multiplier() <= 1.0);
        }
    }

    #[test]
    fn extreme_bands_are_no_faster_than_their_inner_neighbours() {
        assert!(SPEED_MULT_FROZEN <= SPEED_MULT_COLD);
        assert!(SPEED_MULT_OVERHEATED <= SPEED_MULT_HOT);
    }

    #[test]
    fn effective_speed_has_floor() {
        assert_eq!(effective_speed(0.0, 0.4), MIN_SPEED);
        assert_eq!(effective_speed(5.0, 1.0), 5.0);
    }

    #[test]
    fn resistance_reduces_zone_effect() {
        let config = GameConfig::default();
        let zone = zone_at(Vec2::ZERO, ZoneKind::Hot, 1.0);
        let bare = zone_contribution(&zone, &UpgradeLevels::default(), 1.0, &config);
        let armoured = zone_contribution(&zone, &UpgradeLevels::new(3, 0, 0), 1.0, &config);
        let weak = zone_contribution(&zone, &UpgradeLevels::new(-1, 0, 0), 1.0, &config);
        assert!(bare > 0.0);
        assert!(armoured < bare);
        assert!(weak > bare);
    }

    #[test]
    fn cold_zone_lowers_temperature() {
        let config = GameConfig::default();
        let mut r = rover();
        let zones = [zone_at(r.center(), ZoneKind::Cold, 1.0)];
        step_temperature(&mut r, &zones, 1.0, &config);
        assert!(r.temperature < TEMP_NEUTRAL);
    }

    #[test]
    fn regulation_does_not_overshoot_neutral() {
        let config = GameConfig::default();
        let mut r = rover();
        r.upgrades.temp_regulation = 3;
        r.temperature = 50.01;
        step_temperature(&mut r, &[], 1.0, &config);
        assert_eq!(r.temperature, TEMP_NEUTRAL);
    }

    #[test]
    fn coolant_pulls_back_but_not_below_floor() {
        let config = GameConfig::default();
        let mut r = rover();
        r.upgrades.temp_regulation = 3;
        r.temperature = 70.2;
        r.coolant = 50.0;
        // Inside a strong hot zone to get above the threshold.
        let zones = [zone_at(r.center(), ZoneKind::Hot, 1.5)];
        for _ in 0..200 {
            step_temperature(&mut r, &zones, 1.0, &config);
            assert!(r.temperature >= 0.0 && r.temperature <= 100.0);
        }
        assert!(r.coolant < 50.0);
        assert!(r.temperature >= config.hot_threshold - COOLANT_FLOOR_MARGIN);
    }

    #[test]
    fn coolant_never_drops_temperature_below_floor() {
        let config = GameConfig::default();
        let mut r = rover();
        r.temperature = 75.1;
        r.coolant = 100.0;
        r.upgrades.temp_regulation = 3;
        // Outside any zone: regulation pulls down a little, coolant the rest.
        step_temperature(&mut r, &[], 1.0, &config);
        assert!(r.temperature >= config.hot_threshold - COOLANT_FLOOR_MARGIN - 1e-4);
    }

    #[test]
    fn empty_coolant_does_nothing() {
        let config = GameConfig::default();
        let mut r = rover();
        r.temperature = 90.0;
        r.coolant = 0.0;
        let zones = [zone_at(r.center(), ZoneKind::Hot, 1.0)];
        step_temperature(&mut r, &zones, 1.0, &config);
        assert!(r.temperature > 90.0);
        assert_eq!(r.coolant, 0.0);
    }

    #[test]
    fn reaching_the_top_is_reported_terminal() {
        let config = GameConfig::default();
        let mut r = rover();
        r.temperature = 99.99;
        r.coolant = 0.0;
        let zones = [zone_at(r.center(), ZoneKind::Hot, 1.5)];
        assert!(step_temperature(&mut r, &zones, 1.2, &config));
        assert_eq!(r.temperature, TEMP_MAX);
    }

    #[test]
    fn color_is_base_in_normal_band_and_blends_outside() {
        let base = Srgba::rgb(0.2, 0.8, 0.3);
        assert_eq!(temperature_color(50.0, base), base);
        assert_eq!(temperature_color(0.0, base), FROZEN_COLOR);
        assert_eq!(temperature_color(100.0, base), OVERHEATED_COLOR);
        let warm = temperature_color(70.0, base);
        assert!(warm.red > base.red && warm.red < HOT_COLOR.red);
    }

    #[test]
    fn blend_endpoints_are_exact() {
        assert_eq!(lerp_rgb(HOT_COLOR, OVERHEATED_COLOR, 1.0), OVERHEATED_COLOR);
        assert_eq!(lerp_rgb(HOT_COLOR, OVERHEATED_COLOR, 0.0), HOT_COLOR);
        assert_eq!(lerp_rgb(HOT_COLOR, OVERHEATED_COLOR, 7.0), OVERHEATED_COLOR);
        assert_eq!(lerp_rgb(HOT_COLOR, OVERHEATED_COLOR, -1.0), HOT_COLOR);
    }
}
