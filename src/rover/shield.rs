//! Shield charges.
//!
//! A shield is a per-tick countdown on the rover itself, so expiry, impact
//! breaks and run resets all happen inside the same tick and nothing can fire
//! after the rover it belonged to is gone.

use super::state::Rover;
use crate::particles::{spawn_shield_break, spawn_shield_ring, Particle};
use rand::Rng;

/// Spend one charge and raise the shield for `duration` ticks.
///
/// No-op (returns `false`, emits nothing) with zero charges, with a shield
/// already up, or when the rover is not `Normal`.
pub fn activate_shield(rover: &mut Rover, duration: u32, particles: &mut Vec<Particle>) -> bool {
    if rover.shields == 0 || rover.has_shield || !rover.is_normal() {
        return false;
    }
    rover.shields -= 1;
    rover.has_shield = true;
    rover.shield_remaining = duration;
    spawn_shield_ring(particles, rover.center(), rover.half_width() + 8.0);
    true
}

/// Drop the shield and clear its countdown.
pub fn break_shield(
    rover: &mut Rover,
    by_impact: bool,
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
) {
    if !rover.has_shield {
        return;
    }
    rover.has_shield = false;
    rover.shield_remaining = 0;
    spawn_shield_break(particles, rng, rover.center(), by_impact);
}

/// Count an active shield down by one tick; it breaks quietly at zero.
pub fn tick_shield(rover: &mut Rover, particles: &mut Vec<Particle>, rng: &mut impl Rng) {
    if !rover.has_shield {
        return;
    }
    rover.shield_remaining = rover.shield_remaining.saturating_sub(1);
    if rover.shield_remaining == 0 {
        break_shield(rover, false, particles, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{archetype, ArchetypeId};
    use crate::rover::CrashCause;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rover() -> Rover {
        Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0)
    }

    #[test]
    fn activation_with_no_charges_changes_nothing() {
        let mut r = rover();
        r.shields = 0;
        let before = r.clone();
        let mut particles = Vec::new();

        assert!(!activate_shield(&mut r, 300, &mut particles));
        assert_eq!(r, before);
        assert!(particles.is_empty());
    }

    #[test]
    fn activation_spends_exactly_one_charge() {
        let mut r = rover();
        r.shields = 2;
        let mut particles = Vec::new();

        assert!(activate_shield(&mut r, 300, &mut particles));
        assert_eq!(r.shields, 1);
        assert!(r.has_shield);
        assert_eq!(r.shield_remaining, 300);
        assert!(!particles.is_empty());

        // Already active: second press is ignored.
        assert!(!activate_shield(&mut r, 300, &mut particles));
        assert_eq!(r.shields, 1);
    }

    #[test]
    fn crashed_rover_cannot_shield() {
        let mut r = rover();
        r.crash(CrashCause::Obstacle, 90);
        assert!(!activate_shield(&mut r, 300, &mut Vec::new()));
        assert_eq!(r.shields, 1);
    }

    #[test]
    fn shield_expires_after_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = rover();
        let mut particles = Vec::new();
        activate_shield(&mut r, 3, &mut particles);
        for _ in 0..2 {
            tick_shield(&mut r, &mut particles, &mut rng);
            assert!(r.has_shield);
        }
        tick_shield(&mut r, &mut particles, &mut rng);
        assert!(!r.has_shield);
        assert_eq!(r.shield_remaining, 0);
    }

    #[test]
    fn break_cancels_countdown() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = rover();
        let mut particles = Vec::new();
        activate_shield(&mut r, 300, &mut particles);
        break_shield(&mut r, true, &mut particles, &mut rng);
        assert!(!r.has_shield);
        assert_eq!(r.shield_remaining, 0);
    }
}
