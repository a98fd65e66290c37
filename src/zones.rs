//! Hazard-zone lifecycle and spawn policy.
//!
//! ```text
//! growing ──(radius & opacity at target)──▶ stable ──(stable time over)──▶ shrinking
//!    │                                         │                              │
//!    └──────────(total duration over)──────────┴──────────────────────────────┤
//!                                                                   (radius 0)▼
//!                                                 removed ◀──(opacity 0)── fading_out
//! ```
//!
//! Radius and opacity only move in the direction the current phase dictates,
//! so every zone leaves the field within `total_duration + max_radius` ticks
//! plus the fade-out.

use crate::constants::*;
use bevy::math::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Hot,
    Cold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    Growing,
    Stable,
    Shrinking,
    FadingOut,
}

/// A circular area that heats or cools the rover while it is inside.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardZone {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub kind: ZoneKind,
    pub intensity: f32,
    pub opacity: f32,
    pub phase: ZonePhase,
    /// Ticks since spawn.
    pub elapsed: u32,
    /// Tick at which the zone became stable.
    pub stable_start: u32,
    pub stable_duration: u32,
    pub total_duration: u32,
}

impl HazardZone {
    /// A fresh zone with randomised size, kind, strength and durations.
    pub fn random(rng: &mut impl Rng, canvas: Vec2) -> Self {
        let stable_duration = rng.gen_range(ZONE_STABLE_MIN_TICKS..=ZONE_STABLE_MAX_TICKS);
        let total_duration =
            stable_duration + ZONE_EXTRA_MIN_TICKS + rng.gen_range(0..=ZONE_EXTRA_RANDOM_TICKS);
        Self {
            pos: Vec2::new(rng.gen_range(0.0..canvas.x), rng.gen_range(0.0..canvas.y)),
            radius: 0.0,
            max_radius: rng.gen_range(ZONE_MIN_RADIUS..=ZONE_MAX_RADIUS),
            kind: if rng.gen_bool(0.5) {
                ZoneKind::Hot
            } else {
                ZoneKind::Cold
            },
            intensity: rng.gen_range(ZONE_MIN_INTENSITY..=ZONE_MAX_INTENSITY),
            opacity: 0.0,
            phase: ZonePhase::Growing,
            elapsed: 0,
            stable_start: 0,
            stable_duration,
            total_duration,
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.radius > 0.0 && self.pos.distance_squared(point) < self.radius * self.radius
    }

    #[inline]
    fn expired(&self) -> bool {
        self.elapsed > self.total_duration
    }

    /// Advance one tick.  Returns `false` once the zone has fully faded.
    pub fn tick(&mut self) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        match self.phase {
            ZonePhase::Growing => {
                self.radius = (self.radius + ZONE_GROWTH_RATE).min(self.max_radius);
                self.opacity = (self.opacity + ZONE_FADE_RATE).min(ZONE_TARGET_OPACITY);
                if self.expired() {
                    self.phase = ZonePhase::Shrinking;
                } else if self.radius >= self.max_radius && self.opacity >= ZONE_TARGET_OPACITY {
                    self.phase = ZonePhase::Stable;
                    self.stable_start = self.elapsed;
                }
            }
            ZonePhase::Stable => {
                let stable_over =
                    self.elapsed >= self.stable_start.saturating_add(self.stable_duration);
                if stable_over || self.expired() {
                    self.phase = ZonePhase::Shrinking;
                }
            }
            ZonePhase::Shrinking => {
                self.radius = (self.radius - ZONE_GROWTH_RATE).max(0.0);
                if self.radius <= 0.0 || self.expired() {
                    self.phase = ZonePhase::FadingOut;
                }
            }
            ZonePhase::FadingOut => {
                self.opacity = (self.opacity - ZONE_FADE_RATE * 2.0).max(0.0);
            }
        }
        !(self.phase == ZonePhase::FadingOut && self.opacity <= 0.0)
    }
}

/// Advance every zone and drop those that finished fading.
pub fn update_zones(zones: &mut Vec<HazardZone>) {
    zones.retain_mut(HazardZone::tick);
}

/// Per-tick spawn chance: rises as the field empties below `cap`.
pub fn spawn_chance(active: usize, cap: usize) -> f32 {
    if active >= cap || cap == 0 {
        return 0.0;
    }
    let missing = (cap - active) as f32 / cap as f32;
    ZONE_SPAWN_BASE_CHANCE + ZONE_SPAWN_BONUS_CHANCE * missing
}

/// Roll for a new zone.  Returns `true` when one was added.
pub fn maybe_spawn_zone(
    zones: &mut Vec<HazardZone>,
    rng: &mut impl Rng,
    canvas: Vec2,
    cap: usize,
) -> bool {
    let chance = spawn_chance(zones.len(), cap);
    if chance <= 0.0 || !rng.gen_bool(chance as f64) {
        return false;
    }
    zones.push(HazardZone::random(rng, canvas));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn canvas() -> Vec2 {
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    #[test]
    fn every_zone_terminates_within_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut zone = HazardZone::random(&mut rng, canvas());
            let bound = zone.total_duration + zone.max_radius.ceil() as u32 + 64;
            let mut ticks = 0;
            let mut saw_fading = false;
            while zone.tick() {
                ticks += 1;
                saw_fading |= zone.phase == ZonePhase::FadingOut;
                assert!(ticks <= bound, "zone outlived {bound} ticks");
            }
            assert!(saw_fading || zone.phase == ZonePhase::FadingOut);
            assert!(zone.opacity <= 0.0);
        }
    }

    #[test]
    fn phases_follow_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut zone = HazardZone::random(&mut rng, canvas());
        let mut order = vec![zone.phase];
        while zone.tick() {
            if order.last() != Some(&zone.phase) {
                order.push(zone.phase);
            }
        }
        assert_eq!(
            order,
            vec![
                ZonePhase::Growing,
                ZonePhase::Stable,
                ZonePhase::Shrinking,
                ZonePhase::FadingOut
            ]
        );
    }

    #[test]
    fn shrinking_past_total_duration_starts_fading() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut zone = HazardZone::random(&mut rng, canvas());
        zone.phase = ZonePhase::Shrinking;
        zone.radius = 100.0;
        zone.elapsed = 500;
        zone.total_duration = 400;

        assert!(zone.tick());
        assert_eq!(zone.phase, ZonePhase::FadingOut);
        assert!(zone.radius > 0.0, "fading starts from the current radius");
    }

    #[test]
    fn shrinking_within_total_duration_runs_to_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut zone = HazardZone::random(&mut rng, canvas());
        zone.phase = ZonePhase::Shrinking;
        zone.radius = ZONE_GROWTH_RATE * 3.0;
        zone.elapsed = 0;
        zone.total_duration = u32::MAX;

        zone.tick();
        zone.tick();
        assert_eq!(zone.phase, ZonePhase::Shrinking);
        zone.tick();
        assert_eq!(zone.phase, ZonePhase::FadingOut);
        assert_eq!(zone.radius, 0.0);
    }

    #[test]
    fn growing_is_cut_short_by_total_duration() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut zone = HazardZone::random(&mut rng, canvas());
        zone.total_duration = 5;
        for _ in 0..6 {
            zone.tick();
        }
        assert_eq!(zone.phase, ZonePhase::Shrinking);
    }

    #[test]
    fn spawn_chance_grows_as_field_empties() {
        assert_eq!(spawn_chance(ZONE_CAP, ZONE_CAP), 0.0);
        assert!(spawn_chance(0, ZONE_CAP) > spawn_chance(5, ZONE_CAP));
    }

    #[test]
    fn spawning_respects_cap() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut zones = Vec::new();
        for _ in 0..10_000 {
            maybe_spawn_zone(&mut zones, &mut rng, canvas(), ZONE_CAP);
        }
        assert_eq!(zones.len(), ZONE_CAP);
    }

    #[test]
    fn contains_uses_current_radius() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut zone = HazardZone::random(&mut rng, canvas());
        assert!(!zone.contains(zone.pos));
        zone.radius = 10.0;
        assert!(zone.contains(zone.pos + Vec2::new(9.0, 0.0)));
        assert!(!zone.contains(zone.pos + Vec2::new(11.0, 0.0)));
    }
}
