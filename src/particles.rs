//! Particle effects: engine exhaust, collision sparks, shield rings, milestone
//! bursts, crash debris, freeze / meltdown bursts, and impact craters.
//!
//! ## Design
//!
//! Particles are plain values in a single `Vec<Particle>` owned by the
//! session.  [`update_particles`] integrates them once per tick (gravity, drag,
//! life countdown) and drops expired ones with `retain`.  They never influence
//! gameplay; the renderer fades them by remaining life.
//!
//! Spawn helpers take the particle list and the session RNG, so bursts are
//! reproducible for a given seed.  The list is capped at [`MAX_PARTICLES`];
//! when full, the oldest particles are discarded first.

use crate::constants::MAX_PARTICLES;
use bevy::color::{Alpha, Srgba};
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// How a particle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Circle,
    /// A short line segment along the velocity.
    Spark,
    Square,
}

/// Short-lived visual particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Canvas pixels per tick.
    pub vel: Vec2,
    /// Ticks left; removed at zero.
    pub life: u32,
    pub initial_life: u32,
    pub color: Srgba,
    pub size: f32,
    /// Added to `vel.y` every tick (canvas +Y is down).
    pub gravity: f32,
    /// Fraction of velocity kept each tick (1.0 = no drag).
    pub drag: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Remaining life as a 0–1 fraction; drives the fade-out.
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.initial_life == 0 {
            0.0
        } else {
            self.life as f32 / self.initial_life as f32
        }
    }

    /// Advance one tick.  Returns `false` once the particle has expired.
    fn step(&mut self) -> bool {
        if self.life == 0 {
            return false;
        }
        self.vel.y += self.gravity;
        self.vel *= self.drag;
        self.pos += self.vel;
        self.life -= 1;
        self.life > 0
    }
}

/// Integrate every particle and drop the expired ones.
pub fn update_particles(particles: &mut Vec<Particle>) {
    particles.retain_mut(Particle::step);
}

// ── Emission ──────────────────────────────────────────────────────────────────

/// Parameters shared by a radial burst.
struct Burst {
    count: usize,
    speed: (f32, f32),
    life: (u32, u32),
    size: (f32, f32),
    gravity: f32,
    drag: f32,
    kind: ParticleKind,
}

fn push_capped(particles: &mut Vec<Particle>, particle: Particle) {
    if particles.len() >= MAX_PARTICLES {
        let overflow = particles.len() + 1 - MAX_PARTICLES;
        particles.drain(..overflow);
    }
    particles.push(particle);
}

/// Emit a radial burst whose colour is picked per particle from `palette`.
fn emit_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    origin: Vec2,
    burst: Burst,
    palette: &[Srgba],
) {
    for _ in 0..burst.count {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(burst.speed.0..=burst.speed.1);
        let life = rng.gen_range(burst.life.0..=burst.life.1);
        let color = palette[rng.gen_range(0..palette.len())];
        push_capped(
            particles,
            Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                life,
                initial_life: life,
                color,
                size: rng.gen_range(burst.size.0..=burst.size.1),
                gravity: burst.gravity,
                drag: burst.drag,
                kind: burst.kind,
            },
        );
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// One exhaust puff trailing behind the rover's rear edge.
pub fn spawn_exhaust(particles: &mut Vec<Particle>, rng: &mut impl Rng, rear: Vec2, tint: Srgba) {
    let life = rng.gen_range(14..=24);
    push_capped(
        particles,
        Particle {
            pos: rear + Vec2::new(0.0, rng.gen_range(-3.0..3.0)),
            vel: Vec2::new(rng.gen_range(-2.2..-1.0), rng.gen_range(-0.4..0.4)),
            life,
            initial_life: life,
            color: tint.with_alpha(0.7),
            size: rng.gen_range(2.0..4.0),
            gravity: 0.0,
            drag: 0.96,
            kind: ParticleKind::Circle,
        },
    );
}

/// Orange-grey sparks when something hits the rover or a shield.
pub fn spawn_collision_sparks(particles: &mut Vec<Particle>, rng: &mut impl Rng, at: Vec2) {
    emit_burst(
        particles,
        rng,
        at,
        Burst {
            count: 14,
            speed: (1.5, 4.5),
            life: (15, 30),
            size: (1.5, 3.0),
            gravity: 0.05,
            drag: 0.94,
            kind: ParticleKind::Spark,
        },
        &[
            Srgba::rgb(1.0, 0.7, 0.2),
            Srgba::rgb(1.0, 0.9, 0.5),
            Srgba::rgb(0.7, 0.7, 0.7),
        ],
    );
}

/// Even ring of cyan particles when a shield comes up.
pub fn spawn_shield_ring(particles: &mut Vec<Particle>, center: Vec2, radius: f32) {
    const COUNT: usize = 24;
    for i in 0..COUNT {
        let dir = Vec2::from_angle(TAU * i as f32 / COUNT as f32);
        push_capped(
            particles,
            Particle {
                pos: center + dir * radius,
                vel: dir * 1.2,
                life: 30,
                initial_life: 30,
                color: Srgba::rgb(0.4, 0.9, 1.0),
                size: 2.5,
                gravity: 0.0,
                drag: 0.97,
                kind: ParticleKind::Circle,
            },
        );
    }
}

/// Shield shattering.  An impact break is brighter and faster than a quiet expiry.
pub fn spawn_shield_break(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    center: Vec2,
    by_impact: bool,
) {
    let (count, speed, palette): (usize, (f32, f32), &[Srgba]) = if by_impact {
        (
            28,
            (2.0, 5.0),
            &[Srgba::rgb(0.6, 1.0, 1.0), Srgba::WHITE, Srgba::rgb(0.3, 0.7, 1.0)],
        )
    } else {
        (12, (0.5, 1.5), &[Srgba::rgb(0.4, 0.7, 0.9)])
    };
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count,
            speed,
            life: (20, 40),
            size: (1.5, 3.0),
            gravity: 0.0,
            drag: 0.95,
            kind: ParticleKind::Square,
        },
        palette,
    );
}

/// Celebration fountain for a milestone.
pub fn spawn_milestone_burst(particles: &mut Vec<Particle>, rng: &mut impl Rng, center: Vec2) {
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count: 40,
            speed: (2.0, 6.0),
            life: (40, 70),
            size: (2.0, 4.0),
            gravity: 0.08,
            drag: 0.97,
            kind: ParticleKind::Square,
        },
        &[
            Srgba::rgb(1.0, 0.84, 0.2),
            Srgba::rgb(0.4, 1.0, 0.6),
            Srgba::rgb(0.5, 0.7, 1.0),
            Srgba::rgb(1.0, 0.5, 0.8),
        ],
    );
}

/// Heavy debris thrown off the wreck; falls under gravity for the death animation.
pub fn spawn_crash_debris(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    center: Vec2,
    hull: Srgba,
) {
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count: 30,
            speed: (1.5, 5.5),
            life: (60, 90),
            size: (2.0, 5.0),
            gravity: 0.15,
            drag: 0.99,
            kind: ParticleKind::Square,
        },
        &[hull, Srgba::rgb(0.35, 0.35, 0.38), Srgba::rgb(0.9, 0.5, 0.1)],
    );
}

/// Icy shards for a freeze or flames for a meltdown.
pub fn spawn_failure_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    center: Vec2,
    frozen: bool,
) {
    let palette: &[Srgba] = if frozen {
        &[Srgba::rgb(0.7, 0.9, 1.0), Srgba::WHITE, Srgba::rgb(0.4, 0.7, 1.0)]
    } else {
        &[Srgba::rgb(1.0, 0.3, 0.0), Srgba::rgb(1.0, 0.65, 0.1), Srgba::rgb(1.0, 0.9, 0.3)]
    };
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count: 36,
            speed: (1.0, 4.0),
            life: (40, 80),
            size: (2.0, 4.0),
            gravity: if frozen { 0.06 } else { -0.05 },
            drag: 0.96,
            kind: if frozen {
                ParticleKind::Spark
            } else {
                ParticleKind::Circle
            },
        },
        palette,
    );
}

/// Flash of rock and fire when an asteroid strikes the ground.
pub fn spawn_impact_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    center: Vec2,
    radius: f32,
) {
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count: 24 + (radius / 4.0) as usize,
            speed: (2.0, 6.0),
            life: (20, 45),
            size: (2.0, 4.5),
            gravity: 0.1,
            drag: 0.95,
            kind: ParticleKind::Spark,
        },
        &[
            Srgba::rgb(1.0, 0.6, 0.1),
            Srgba::rgb(0.6, 0.45, 0.3),
            Srgba::rgb(1.0, 0.9, 0.6),
        ],
    );
}

/// Secondary burst as the explosion expands.
pub fn spawn_explosion_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    center: Vec2,
    radius: f32,
) {
    emit_burst(
        particles,
        rng,
        center,
        Burst {
            count: 20,
            speed: (radius / 30.0, radius / 12.0),
            life: (25, 40),
            size: (3.0, 6.0),
            gravity: -0.02,
            drag: 0.93,
            kind: ParticleKind::Circle,
        },
        &[Srgba::rgb(1.0, 0.4, 0.05), Srgba::rgb(0.9, 0.2, 0.05)],
    );
}

/// Scorched rubble left behind by an impact; still and long-lived.
pub fn spawn_crater(particles: &mut Vec<Particle>, rng: &mut impl Rng, center: Vec2, radius: f32) {
    for _ in 0..18 {
        let offset = Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen_range(0.0..radius * 0.5);
        let life = rng.gen_range(150..=240);
        let shade = rng.gen_range(0.18..0.32);
        push_capped(
            particles,
            Particle {
                pos: center + offset,
                vel: Vec2::ZERO,
                life,
                initial_life: life,
                color: Srgba::rgb(shade + 0.06, shade, shade - 0.04),
                size: rng.gen_range(3.0..7.0),
                gravity: 0.0,
                drag: 1.0,
                kind: ParticleKind::Square,
            },
        );
    }
}

/// Small sparkle in the power-up's colour when it is collected.
pub fn spawn_pickup_sparkle(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    at: Vec2,
    color: Srgba,
) {
    emit_burst(
        particles,
        rng,
        at,
        Burst {
            count: 12,
            speed: (1.0, 3.0),
            life: (15, 30),
            size: (1.5, 3.0),
            gravity: 0.0,
            drag: 0.93,
            kind: ParticleKind::Spark,
        },
        &[color, Srgba::WHITE],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn particles_expire_after_their_life() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = Vec::new();
        spawn_collision_sparks(&mut particles, &mut rng, Vec2::ZERO);
        assert!(!particles.is_empty());

        let longest = particles.iter().map(|p| p.life).max().unwrap_or(0);
        for _ in 0..longest {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn gravity_pulls_debris_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particles = Vec::new();
        spawn_crash_debris(&mut particles, &mut rng, Vec2::ZERO, Srgba::WHITE);
        let before: Vec<f32> = particles.iter().map(|p| p.vel.y).collect();
        update_particles(&mut particles);
        for (p, vy) in particles.iter().zip(before) {
            assert!(p.vel.y > vy * p.drag - 1e-4);
        }
    }

    #[test]
    fn list_is_capped() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particles = Vec::new();
        for _ in 0..40 {
            spawn_milestone_burst(&mut particles, &mut rng, Vec2::ZERO);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn impact_shield_break_is_bigger_than_expiry() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut quiet = Vec::new();
        let mut loud = Vec::new();
        spawn_shield_break(&mut quiet, &mut rng, Vec2::ZERO, false);
        spawn_shield_break(&mut loud, &mut rng, Vec2::ZERO, true);
        assert!(loud.len() > quiet.len());
    }
}
