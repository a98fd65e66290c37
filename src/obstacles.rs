//! Scrolling obstacles and power-ups.
//!
//! Both enter at the right edge and move left at a fixed horizontal speed;
//! they are dropped once fully off-screen.  Obstacles collide by AABB overlap,
//! power-ups by circle distance.

use crate::constants::*;
use crate::rover::UpgradeKind;
use bevy::color::Srgba;
use bevy::math::{Rect, Vec2};
use rand::Rng;
use std::f32::consts::TAU;

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Rock,
    Ice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Top-left corner.
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward pixels per tick.
    pub speed: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// New obstacle just past the right edge at a random height.
    pub fn random(rng: &mut impl Rng, canvas: Vec2, speed: f32) -> Self {
        let size = Vec2::new(
            rng.gen_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE),
            rng.gen_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE),
        );
        let max_y = (canvas.y - size.y).max(0.0);
        Self {
            pos: Vec2::new(canvas.x, rng.gen_range(0.0..=max_y)),
            size,
            speed,
            kind: if rng.gen_bool(0.7) {
                ObstacleKind::Rock
            } else {
                ObstacleKind::Ice
            },
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.pos, self.pos + self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Scroll obstacles left and drop those past the left edge.
pub fn update_obstacles(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain_mut(|o| {
        o.pos.x -= o.speed;
        o.pos.x + o.size.x >= 0.0
    });
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Heat,
    Cold,
    Regulation,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Heat,
        PowerUpKind::Cold,
        PowerUpKind::Regulation,
        PowerUpKind::Shield,
    ];

    /// Upgrade axis this pickup raises; `None` for shields.
    pub fn upgrade(self) -> Option<UpgradeKind> {
        match self {
            PowerUpKind::Heat => Some(UpgradeKind::HeatResistance),
            PowerUpKind::Cold => Some(UpgradeKind::ColdResistance),
            PowerUpKind::Regulation => Some(UpgradeKind::Regulation),
            PowerUpKind::Shield => None,
        }
    }

    pub fn color(self) -> Srgba {
        match self {
            PowerUpKind::Heat => Srgba::rgb(1.0, 0.45, 0.15),
            PowerUpKind::Cold => Srgba::rgb(0.35, 0.7, 1.0),
            PowerUpKind::Regulation => Srgba::rgb(0.4, 0.95, 0.5),
            PowerUpKind::Shield => Srgba::rgb(0.6, 0.9, 1.0),
        }
    }

    /// One-letter glyph drawn on the pickup.
    pub fn glyph(self) -> &'static str {
        match self {
            PowerUpKind::Heat => "H",
            PowerUpKind::Cold => "C",
            PowerUpKind::Regulation => "R",
            PowerUpKind::Shield => "S",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Visual spin, radians.
    pub rotation: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            pos,
            radius: POWERUP_RADIUS,
            speed: POWERUP_SPEED,
            rotation: 0.0,
            kind,
        }
    }

    /// New pickup just past the right edge at a random height.
    pub fn entering(rng: &mut impl Rng, canvas: Vec2, kind: PowerUpKind) -> Self {
        let y = rng.gen_range(POWERUP_RADIUS..=(canvas.y - POWERUP_RADIUS).max(POWERUP_RADIUS));
        Self::new(kind, Vec2::new(canvas.x + POWERUP_RADIUS, y))
    }
}

/// Scroll and spin power-ups; drop those past the left edge.
pub fn update_powerups(powerups: &mut Vec<PowerUp>) {
    powerups.retain_mut(|p| {
        p.pos.x -= p.speed;
        p.rotation = (p.rotation + POWERUP_SPIN) % TAU;
        p.pos.x + p.radius >= 0.0
    });
}

// ── Collision tests ───────────────────────────────────────────────────────────

/// Strict axis-aligned overlap; touching edges do not count.
#[inline]
pub fn aabb_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn obstacles_scroll_off_and_are_removed() {
        let mut obstacles = vec![Obstacle {
            pos: Vec2::new(10.0, 100.0),
            size: Vec2::new(30.0, 30.0),
            speed: 5.0,
            kind: ObstacleKind::Rock,
        }];
        for _ in 0..8 {
            update_obstacles(&mut obstacles);
        }
        assert_eq!(obstacles.len(), 1);
        update_obstacles(&mut obstacles);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn random_obstacle_fits_vertically() {
        let mut rng = StdRng::seed_from_u64(11);
        let canvas = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        for _ in 0..200 {
            let o = Obstacle::random(&mut rng, canvas, 3.0);
            assert!(o.pos.y >= 0.0 && o.pos.y + o.size.y <= canvas.y);
            assert_eq!(o.pos.x, canvas.x);
        }
    }

    #[test]
    fn powerups_spin_and_leave() {
        let mut powerups = vec![PowerUp::new(PowerUpKind::Shield, Vec2::new(0.0, 50.0))];
        update_powerups(&mut powerups);
        assert!(powerups[0].rotation > 0.0);
        for _ in 0..10 {
            update_powerups(&mut powerups);
        }
        assert!(powerups.is_empty());
    }

    #[test]
    fn aabb_edges_do_not_touch() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(aabb_overlap(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
        assert!(!aabb_overlap(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn circle_test_uses_sum_of_radii() {
        assert!(circles_touch(Vec2::ZERO, 24.0, Vec2::new(35.0, 0.0), 12.0));
        assert!(!circles_touch(Vec2::ZERO, 24.0, Vec2::new(37.0, 0.0), 12.0));
    }

    #[test]
    fn only_shield_has_no_upgrade_axis() {
        let axes: Vec<_> = PowerUpKind::ALL.iter().filter_map(|k| k.upgrade()).collect();
        assert_eq!(axes.len(), 3);
        assert_eq!(PowerUpKind::Shield.upgrade(), None);
    }
}
