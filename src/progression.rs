//! Progression: milestones, evolution stages, score-driven spawn scaling and
//! power-up weighting.
//!
//! ## Milestones
//!
//! | Score  | Grant                                  | If already maxed |
//! |--------|----------------------------------------|------------------|
//! | 1000   | +1 heat resistance                     | 30 % coolant     |
//! | 2000   | +1 cold resistance                     | 30 % coolant     |
//! | 3000   | +1 regulation                          | bonus shield     |
//! | 5000   | +1 heat, +1 cold                       | full coolant     |
//! | 7500   | +1 regulation, +1 shield               | bonus shield     |
//! | 10000  | +1 on every axis, +1 shield            | full coolant     |
//!
//! Each threshold fires once per run: the session remembers the last
//! milestone it paid out and [`next_milestone`] only returns thresholds above it.

use crate::constants::*;
use crate::obstacles::PowerUpKind;
use crate::rover::{Rover, UpgradeKind, UpgradeLevels};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

// ── Score-driven scaling ──────────────────────────────────────────────────────

/// Cosmetic tier 0..=6: the number of milestone thresholds reached.
pub fn evolution_stage(score: u64) -> u8 {
    MILESTONES.iter().filter(|&&m| score >= m).count() as u8
}

/// Ticks between obstacle spawns: the difficulty base minus one tick per
/// `OBSTACLE_CADENCE_SCORE_DIVISOR` points, never below `OBSTACLE_MIN_CADENCE`.
pub fn obstacle_cadence(base: u32, score: u64) -> u32 {
    let reduction = (score / OBSTACLE_CADENCE_SCORE_DIVISOR).min(u32::MAX as u64) as u32;
    base.saturating_sub(reduction).max(OBSTACLE_MIN_CADENCE)
}

/// Scroll speed of newly spawned obstacles.
pub fn obstacle_speed(score: u64) -> f32 {
    (OBSTACLE_BASE_SPEED + OBSTACLE_SPEED_PER_1000 * score as f32 / 1000.0).min(OBSTACLE_MAX_SPEED)
}

/// Score distance between asteroid impacts, shrinking with score down to half
/// the difficulty base.
pub fn asteroid_interval(base: f32, score: u64) -> f32 {
    (base - score as f32 * ASTEROID_INTERVAL_PER_SCORE).max(base * ASTEROID_INTERVAL_FLOOR_FRACTION)
}

/// Per-tick power-up spawn chance for a difficulty rate multiplier.
#[inline]
pub fn powerup_chance(rate: f32) -> f32 {
    POWERUP_BASE_CHANCE * rate
}

// ── Power-up weighting ────────────────────────────────────────────────────────

/// Spawn weight per kind, in [`PowerUpKind::ALL`] order.
///
/// Upgrades the rover is furthest from maxing are the most likely; maxed
/// axes keep a small weight so their cosmetic pickup still appears.
pub fn powerup_weights(upgrades: &UpgradeLevels) -> [f32; 4] {
    PowerUpKind::ALL.map(|kind| match kind.upgrade() {
        Some(axis) if upgrades.is_maxed(axis) => POWERUP_MAXED_WEIGHT,
        Some(axis) => (MAX_UPGRADE_LEVEL - upgrades.get(axis) + 1) as f32,
        None => POWERUP_SHIELD_WEIGHT,
    })
}

pub fn choose_powerup_kind(rng: &mut impl Rng, upgrades: &UpgradeLevels) -> PowerUpKind {
    match WeightedIndex::new(powerup_weights(upgrades)) {
        Ok(dist) => PowerUpKind::ALL[dist.sample(rng)],
        Err(_) => PowerUpKind::Shield,
    }
}

// ── Milestones ────────────────────────────────────────────────────────────────

/// Compensation paid when the granted upgrade is already maxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    PartialCoolant,
    FullCoolant,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Upgrade(UpgradeKind, Bonus),
    Shield,
}

pub fn milestone_grants(threshold: u64) -> &'static [Grant] {
    use Bonus::*;
    use Grant::*;
    use UpgradeKind::*;
    match threshold {
        1000 => &[Upgrade(HeatResistance, PartialCoolant)],
        2000 => &[Upgrade(ColdResistance, PartialCoolant)],
        3000 => &[Upgrade(Regulation, Bonus::Shield)],
        5000 => &[
            Upgrade(HeatResistance, FullCoolant),
            Upgrade(ColdResistance, FullCoolant),
        ],
        7500 => &[Upgrade(Regulation, Bonus::Shield), Grant::Shield],
        10000 => &[
            Upgrade(HeatResistance, FullCoolant),
            Upgrade(ColdResistance, FullCoolant),
            Upgrade(Regulation, FullCoolant),
            Grant::Shield,
        ],
        _ => &[],
    }
}

/// First milestone above `last_paid` that `score` has reached.
pub fn next_milestone(score: u64, last_paid: u64) -> Option<u64> {
    MILESTONES
        .iter()
        .copied()
        .find(|&m| m > last_paid && score >= m)
}

fn apply_bonus(rover: &mut Rover, bonus: Bonus) -> String {
    match bonus {
        Bonus::PartialCoolant => {
            rover.refill_coolant(rover.max_coolant * PARTIAL_COOLANT_REFILL);
            "COOLANT +30%".to_string()
        }
        Bonus::FullCoolant => {
            rover.refill_coolant(rover.max_coolant);
            "COOLANT FULL".to_string()
        }
        Bonus::Shield => {
            rover.shields += 1;
            "+1 SHIELD".to_string()
        }
    }
}

/// Pay out a milestone's grants.  Returns one HUD line per reward.
pub fn apply_milestone(rover: &mut Rover, threshold: u64) -> Vec<String> {
    milestone_grants(threshold)
        .iter()
        .map(|grant| match *grant {
            Grant::Upgrade(kind, fallback) => {
                if rover.upgrades.increment(kind) {
                    format!("{} +1", kind.label())
                } else {
                    apply_bonus(rover, fallback)
                }
            }
            Grant::Shield => apply_bonus(rover, Bonus::Shield),
        })
        .collect()
}

/// On-screen milestone banner.
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub title: String,
    pub detail: String,
    pub remaining: u32,
}

impl Celebration {
    pub fn new(threshold: u64, rewards: &[String]) -> Self {
        Self {
            title: format!("MILESTONE {threshold}"),
            detail: rewards.join("  "),
            remaining: CELEBRATION_TICKS,
        }
    }

    /// Fraction of display time left, for fading.
    pub fn alpha(&self) -> f32 {
        (self.remaining as f32 / CELEBRATION_TICKS as f32).clamp(0.0, 1.0)
    }
}

/// Short HUD notice such as "HEAT MAXED".
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub remaining: u32,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            remaining: NOTICE_TICKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{archetype, ArchetypeId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn evolution_stage_steps_at_milestones() {
        assert_eq!(evolution_stage(0), 0);
        assert_eq!(evolution_stage(999), 0);
        assert_eq!(evolution_stage(1000), 1);
        assert_eq!(evolution_stage(7499), 4);
        assert_eq!(evolution_stage(10_000), 6);
        assert_eq!(evolution_stage(u64::MAX), 6);
    }

    #[test]
    fn cadence_tightens_and_floors() {
        assert_eq!(obstacle_cadence(75, 0), 75);
        assert_eq!(obstacle_cadence(75, 2000), 65);
        assert_eq!(obstacle_cadence(50, 1_000_000), OBSTACLE_MIN_CADENCE);
    }

    #[test]
    fn asteroid_interval_floors_at_half() {
        assert_eq!(asteroid_interval(500.0, 600), 488.0);
        assert_eq!(asteroid_interval(500.0, 100_000), 250.0);
    }

    #[test]
    fn obstacle_speed_is_capped() {
        assert_eq!(obstacle_speed(0), OBSTACLE_BASE_SPEED);
        assert_eq!(obstacle_speed(u64::MAX / 2), OBSTACLE_MAX_SPEED);
    }

    #[test]
    fn weights_favour_unmaxed_axes() {
        let w = powerup_weights(&UpgradeLevels::new(3, -1, 0));
        assert_eq!(w[0], POWERUP_MAXED_WEIGHT);
        assert_eq!(w[1], 5.0);
        assert_eq!(w[2], 4.0);
        assert_eq!(w[3], POWERUP_SHIELD_WEIGHT);
    }

    #[test]
    fn weighted_choice_covers_every_kind() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(choose_powerup_kind(&mut rng, &UpgradeLevels::default()));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn next_milestone_never_repeats() {
        assert_eq!(next_milestone(999, 0), None);
        assert_eq!(next_milestone(1000, 0), Some(1000));
        assert_eq!(next_milestone(1000, 1000), None);
        assert_eq!(next_milestone(5200, 2000), Some(3000));
    }

    #[test]
    fn maxed_axis_pays_fallback() {
        let mut rover = Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0);
        rover.upgrades = UpgradeLevels::new(3, 0, 0);
        rover.coolant = 0.0;
        let lines = apply_milestone(&mut rover, 1000);
        assert_eq!(rover.upgrades.heat_resistance, 3);
        assert!((rover.coolant - rover.max_coolant * PARTIAL_COOLANT_REFILL).abs() < 1e-4);
        assert_eq!(lines, vec!["COOLANT +30%".to_string()]);
    }

    #[test]
    fn final_milestone_raises_every_axis() {
        let mut rover = Rover::from_archetype(archetype(ArchetypeId::Vulcan), 500.0);
        let shields = rover.shields;
        apply_milestone(&mut rover, 10_000);
        assert_eq!(rover.upgrades, UpgradeLevels::new(3, 0, 1));
        assert_eq!(rover.shields, shields + 1);
    }
}
