//! Asteroid impact hazard.
//!
//! `warning → impact → exploding → fading → removed`, each phase a fixed tick
//! countdown.  [`AsteroidImpact::tick`] reports the two moments the session
//! reacts to: the strike (direct-hit check, crater) and the detonation
//! (explosion burst).  Overlap with the growing explosion is checked by the
//! caller every tick through [`AsteroidImpact::explosion_hits`].

use crate::constants::*;
use bevy::math::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactPhase {
    Warning,
    Impact,
    Exploding,
    Fading,
}

/// What happened to an impact during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactTick {
    Continue,
    /// Warning ran out; the asteroid hit the ground this tick.
    Struck,
    /// Impact flash ended; the explosion starts expanding.
    Detonated,
    /// Fade-out finished; remove the impact.
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidImpact {
    pub pos: Vec2,
    pub target_radius: f32,
    /// Radius of the warning marker or explosion, depending on phase.
    pub radius: f32,
    pub phase: ImpactPhase,
    /// Ticks left in the current phase.
    pub timer: u32,
    /// Set once this impact has hit the rover; an impact damages at most once.
    pub spent: bool,
}

impl AsteroidImpact {
    pub fn new(pos: Vec2, target_radius: f32) -> Self {
        Self {
            pos,
            target_radius,
            radius: 0.0,
            phase: ImpactPhase::Warning,
            timer: ASTEROID_WARNING_TICKS,
            spent: false,
        }
    }

    /// Random strike point, kept clear of the canvas edges.
    pub fn random(rng: &mut impl Rng, canvas: Vec2) -> Self {
        let margin = ASTEROID_MAX_RADIUS;
        let x = rng.gen_range(margin..(canvas.x - margin).max(margin + 1.0));
        let y = rng.gen_range(margin..(canvas.y - margin).max(margin + 1.0));
        let radius = rng.gen_range(ASTEROID_MIN_RADIUS..=ASTEROID_MAX_RADIUS);
        Self::new(Vec2::new(x, y), radius)
    }

    #[inline]
    pub fn explosion_radius(&self) -> f32 {
        self.target_radius * ASTEROID_EXPLOSION_SCALE
    }

    /// Linear progress through the current phase, 0 → 1.
    pub fn progress(&self) -> f32 {
        let total = match self.phase {
            ImpactPhase::Warning => ASTEROID_WARNING_TICKS,
            ImpactPhase::Impact => ASTEROID_IMPACT_TICKS,
            ImpactPhase::Exploding => ASTEROID_EXPLODING_TICKS,
            ImpactPhase::Fading => ASTEROID_FADING_TICKS,
        };
        1.0 - self.timer as f32 / total.max(1) as f32
    }

    /// A point within 30 % of the target radius at the moment of impact.
    #[inline]
    pub fn is_direct_hit(&self, point: Vec2) -> bool {
        let hit = self.target_radius * ASTEROID_DIRECT_HIT_FRACTION;
        self.pos.distance_squared(point) < hit * hit
    }

    /// Circle test against the expanding explosion.
    pub fn explosion_hits(&self, center: Vec2, radius: f32) -> bool {
        if self.spent || self.phase != ImpactPhase::Exploding {
            return false;
        }
        let reach = self.radius + radius;
        self.pos.distance_squared(center) < reach * reach
    }

    pub fn tick(&mut self) -> ImpactTick {
        self.timer = self.timer.saturating_sub(1);
        match self.phase {
            ImpactPhase::Warning => {
                let p = self.progress();
                self.radius = self.target_radius * p * p;
                if self.timer == 0 {
                    self.phase = ImpactPhase::Impact;
                    self.timer = ASTEROID_IMPACT_TICKS;
                    self.radius = self.target_radius;
                    return ImpactTick::Struck;
                }
            }
            ImpactPhase::Impact => {
                if self.timer == 0 {
                    self.phase = ImpactPhase::Exploding;
                    self.timer = ASTEROID_EXPLODING_TICKS;
                    self.radius = 0.0;
                    return ImpactTick::Detonated;
                }
            }
            ImpactPhase::Exploding => {
                let p = self.progress();
                let eased = 1.0 - (1.0 - p) * (1.0 - p);
                self.radius = self.explosion_radius() * eased;
                if self.timer == 0 {
                    self.phase = ImpactPhase::Fading;
                    self.timer = ASTEROID_FADING_TICKS;
                }
            }
            ImpactPhase::Fading => {
                if self.timer == 0 {
                    return ImpactTick::Finished;
                }
            }
        }
        ImpactTick::Continue
    }
}

/// Spawn gate: past the score threshold, a full interval since the last
/// impact, and room for another.
pub fn should_spawn_impact(
    score: u64,
    last_impact_score: u64,
    interval: f32,
    active: usize,
    max_active: usize,
) -> bool {
    score >= ASTEROID_SCORE_GATE
        && score.saturating_sub(last_impact_score) as f32 >= interval
        && active < max_active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(impact: &mut AsteroidImpact, wanted: ImpactTick) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if impact.tick() == wanted {
                return ticks;
            }
            assert!(ticks < 1000, "never reached {wanted:?}");
        }
    }

    #[test]
    fn phases_run_for_their_fixed_durations() {
        let mut impact = AsteroidImpact::new(Vec2::new(200.0, 200.0), 50.0);
        assert_eq!(run_until(&mut impact, ImpactTick::Struck), ASTEROID_WARNING_TICKS);
        assert_eq!(run_until(&mut impact, ImpactTick::Detonated), ASTEROID_IMPACT_TICKS);
        assert_eq!(
            run_until(&mut impact, ImpactTick::Finished),
            ASTEROID_EXPLODING_TICKS + ASTEROID_FADING_TICKS
        );
    }

    #[test]
    fn warning_grows_ease_in() {
        let mut impact = AsteroidImpact::new(Vec2::ZERO, 60.0);
        for _ in 0..ASTEROID_WARNING_TICKS / 2 {
            impact.tick();
        }
        // Halfway through: a quarter of the target radius.
        assert!((impact.radius - 15.0).abs() < 0.5);
    }

    #[test]
    fn explosion_reaches_full_radius() {
        let mut impact = AsteroidImpact::new(Vec2::ZERO, 40.0);
        run_until(&mut impact, ImpactTick::Detonated);
        for _ in 0..ASTEROID_EXPLODING_TICKS {
            impact.tick();
        }
        assert_eq!(impact.phase, ImpactPhase::Fading);
        assert!((impact.radius - 60.0).abs() < 1e-3);
    }

    #[test]
    fn direct_hit_radius() {
        let impact = AsteroidImpact::new(Vec2::ZERO, 50.0);
        assert!(impact.is_direct_hit(Vec2::new(14.0, 0.0)));
        assert!(!impact.is_direct_hit(Vec2::new(16.0, 0.0)));
    }

    #[test]
    fn only_exploding_phase_hits() {
        let mut impact = AsteroidImpact::new(Vec2::ZERO, 50.0);
        impact.radius = 50.0;
        assert!(!impact.explosion_hits(Vec2::ZERO, 10.0));
        impact.phase = ImpactPhase::Exploding;
        assert!(impact.explosion_hits(Vec2::new(55.0, 0.0), 10.0));
        assert!(!impact.explosion_hits(Vec2::new(65.0, 0.0), 10.0));
        impact.spent = true;
        assert!(!impact.explosion_hits(Vec2::ZERO, 10.0));
    }

    #[test]
    fn spawn_gate() {
        assert!(!should_spawn_impact(599, 0, 100.0, 0, 4));
        assert!(should_spawn_impact(600, 0, 500.0, 0, 4));
        assert!(!should_spawn_impact(900, 600, 500.0, 0, 4));
        assert!(!should_spawn_impact(1200, 600, 500.0, 4, 4));
    }
}
