//! Procedural rover sprites.
//!
//! Every archetype owns a pure generator
//! `(color, upgrades, evolution stage) -> SpriteDescriptor`.  A descriptor is a
//! list of filled shapes in sprite-local coordinates (origin top-left, +Y down,
//! `ROVER_WIDTH × ROVER_HEIGHT` box); the renderer blits it at the rover's
//! position.
//!
//! Shared building blocks:
//!
//! | Part            | Driven by              |
//! |-----------------|------------------------|
//! | Hull + wheels   | archetype              |
//! | Radiator fins   | heat resistance level  |
//! | Insulation pads | cold resistance level  |
//! | Antenna + dish  | regulation level       |
//! | Solar wing      | stage ≥ 2              |
//! | Sensor mast     | stage ≥ 4              |
//! | Aura            | stage 6                |

use crate::constants::{ROVER_HEIGHT, ROVER_WIDTH};
use crate::error::{GameError, GameResult};
use crate::rover::UpgradeLevels;
use bevy::color::Srgba;
use bevy::math::Vec2;

/// Primitive shape in sprite-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteShape {
    Rect { min: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, radii: Vec2 },
    Polygon { points: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpritePart {
    pub shape: SpriteShape,
    pub fill: Srgba,
}

/// A renderable, image-like rover appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDescriptor {
    pub size: Vec2,
    pub parts: Vec<SpritePart>,
}

/// Signature every archetype generator implements.
pub type SpriteGenerator = fn(Srgba, UpgradeLevels, u8) -> GameResult<SpriteDescriptor>;

// ── Builder ───────────────────────────────────────────────────────────────────

struct Builder {
    archetype: &'static str,
    parts: Vec<SpritePart>,
}

impl Builder {
    fn new(archetype: &'static str, color: Srgba) -> GameResult<Self> {
        let finite = [color.red, color.green, color.blue, color.alpha]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            return Err(GameError::SpriteGeneration {
                archetype,
                reason: format!("non-finite colour {color:?}"),
            });
        }
        Ok(Self {
            archetype,
            parts: Vec::with_capacity(24),
        })
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Srgba) -> &mut Self {
        self.parts.push(SpritePart {
            shape: SpriteShape::Rect {
                min: Vec2::new(x, y),
                size: Vec2::new(w, h),
            },
            fill,
        });
        self
    }

    fn circle(&mut self, x: f32, y: f32, r: f32, fill: Srgba) -> &mut Self {
        self.parts.push(SpritePart {
            shape: SpriteShape::Circle {
                center: Vec2::new(x, y),
                radius: r,
            },
            fill,
        });
        self
    }

    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, fill: Srgba) -> &mut Self {
        self.parts.push(SpritePart {
            shape: SpriteShape::Ellipse {
                center: Vec2::new(x, y),
                radii: Vec2::new(rx, ry),
            },
            fill,
        });
        self
    }

    fn polygon(&mut self, points: &[(f32, f32)], fill: Srgba) -> &mut Self {
        self.parts.push(SpritePart {
            shape: SpriteShape::Polygon {
                points: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            },
            fill,
        });
        self
    }

    fn finish(self) -> GameResult<SpriteDescriptor> {
        if self.parts.is_empty() {
            return Err(GameError::SpriteGeneration {
                archetype: self.archetype,
                reason: "generator produced no shapes".to_string(),
            });
        }
        Ok(SpriteDescriptor {
            size: Vec2::new(ROVER_WIDTH, ROVER_HEIGHT),
            parts: self.parts,
        })
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn shade(color: Srgba, factor: f32) -> Srgba {
    Srgba::new(
        (color.red * factor).clamp(0.0, 1.0),
        (color.green * factor).clamp(0.0, 1.0),
        (color.blue * factor).clamp(0.0, 1.0),
        color.alpha,
    )
}

const WHEEL: Srgba = Srgba::rgb(0.16, 0.16, 0.18);
const HUB: Srgba = Srgba::rgb(0.55, 0.55, 0.6);
const GLASS: Srgba = Srgba::rgb(0.55, 0.85, 1.0);
const FIN: Srgba = Srgba::rgb(0.95, 0.45, 0.15);
const PAD: Srgba = Srgba::rgb(0.45, 0.7, 1.0);
const ANTENNA: Srgba = Srgba::rgb(0.8, 0.8, 0.85);
const SOLAR: Srgba = Srgba::rgb(0.15, 0.25, 0.55);

// ── Shared parts ──────────────────────────────────────────────────────────────

fn wheels(b: &mut Builder, xs: &[f32], radius: f32) {
    for &x in xs {
        b.circle(x, ROVER_HEIGHT - radius, radius, WHEEL);
        b.circle(x, ROVER_HEIGHT - radius, radius * 0.4, HUB);
    }
}

/// Upgrade- and stage-driven details shared by every archetype.
fn upgrades_and_stage(b: &mut Builder, color: Srgba, upgrades: UpgradeLevels, stage: u8) {
    for i in 0..upgrades.heat_resistance.max(0) {
        b.rect(4.0 + i as f32 * 4.0, 6.0, 2.0, 6.0, FIN);
    }
    for i in 0..upgrades.cold_resistance.max(0) {
        b.rect(30.0 + i as f32 * 5.0, 16.0, 4.0, 4.0, PAD);
    }
    if upgrades.temp_regulation > 0 {
        let height = 4.0 + upgrades.temp_regulation as f32 * 2.0;
        b.rect(38.0, 8.0 - height, 1.5, height, ANTENNA);
        b.ellipse(38.75, 8.0 - height, 3.0, 1.5, ANTENNA);
    }
    if stage >= 2 {
        b.polygon(&[(12.0, 6.0), (26.0, 6.0), (22.0, 1.0), (8.0, 1.0)], SOLAR);
    }
    if stage >= 4 {
        b.rect(26.0, 0.0, 1.5, 7.0, ANTENNA);
        b.circle(26.75, 0.5, 1.5, shade(color, 1.3));
    }
    if stage >= 6 {
        let mut aura = shade(color, 1.2);
        aura.alpha = 0.25;
        b.ellipse(ROVER_WIDTH * 0.5, ROVER_HEIGHT * 0.6, ROVER_WIDTH * 0.55, ROVER_HEIGHT * 0.5, aura);
    }
}

// ── Generators ────────────────────────────────────────────────────────────────

/// Balanced six-wheeler with a boxy hull.
pub fn atlas(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("atlas", color)?;
    b.rect(4.0, 12.0, 40.0, 12.0, color)
        .rect(6.0, 10.0, 36.0, 3.0, shade(color, 0.7))
        .rect(30.0, 6.0, 10.0, 6.0, GLASS);
    wheels(&mut b, &[9.0, 24.0, 39.0], 5.0);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

/// Low wedge built for speed.
pub fn comet(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("comet", color)?;
    b.polygon(
        &[(2.0, 22.0), (46.0, 22.0), (46.0, 17.0), (20.0, 10.0), (2.0, 14.0)],
        color,
    )
    .polygon(&[(28.0, 13.0), (40.0, 16.0), (28.0, 16.0)], GLASS)
    .rect(0.0, 16.0, 3.0, 4.0, shade(color, 0.6));
    wheels(&mut b, &[10.0, 38.0], 5.0);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

/// Heavy armoured tracks.
pub fn guardian(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("guardian", color)?;
    b.rect(2.0, 20.0, 44.0, 10.0, WHEEL)
        .rect(3.0, 9.0, 42.0, 12.0, color)
        .rect(3.0, 9.0, 42.0, 2.0, shade(color, 1.25))
        .rect(32.0, 4.0, 9.0, 6.0, GLASS);
    wheels(&mut b, &[8.0, 18.0, 28.0, 38.0], 4.0);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

/// Rounded cryo-tank body.
pub fn cryoflux(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("cryoflux", color)?;
    b.ellipse(24.0, 17.0, 20.0, 8.0, color)
        .ellipse(16.0, 15.0, 6.0, 4.0, shade(color, 1.3))
        .circle(36.0, 13.0, 4.0, GLASS);
    wheels(&mut b, &[10.0, 24.0, 38.0], 4.5);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

/// Slim, faceted scout.
pub fn phantom(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("phantom", color)?;
    b.polygon(
        &[(4.0, 20.0), (14.0, 10.0), (36.0, 10.0), (46.0, 20.0), (24.0, 24.0)],
        color,
    )
    .polygon(&[(16.0, 12.0), (34.0, 12.0), (30.0, 16.0), (20.0, 16.0)], shade(color, 0.55))
    .circle(33.0, 14.0, 2.0, GLASS);
    wheels(&mut b, &[12.0, 36.0], 4.0);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

/// Furnace hull with exhaust stacks.
pub fn vulcan(color: Srgba, upgrades: UpgradeLevels, stage: u8) -> GameResult<SpriteDescriptor> {
    let mut b = Builder::new("vulcan", color)?;
    b.rect(4.0, 11.0, 40.0, 13.0, color)
        .rect(8.0, 4.0, 4.0, 8.0, shade(color, 0.6))
        .rect(14.0, 6.0, 4.0, 6.0, shade(color, 0.6))
        .rect(34.0, 14.0, 8.0, 5.0, Srgba::rgb(1.0, 0.6, 0.2));
    wheels(&mut b, &[10.0, 24.0, 38.0], 5.0);
    upgrades_and_stage(&mut b, color, upgrades, stage);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATORS: [SpriteGenerator; 6] = [atlas, comet, guardian, cryoflux, phantom, vulcan];

    #[test]
    fn every_generator_produces_shapes() {
        for generate in GENERATORS {
            let sprite = generate(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::default(), 0)
                .expect("plain input must generate");
            assert!(!sprite.parts.is_empty());
            assert_eq!(sprite.size, Vec2::new(ROVER_WIDTH, ROVER_HEIGHT));
        }
    }

    #[test]
    fn stage_and_upgrades_add_detail() {
        let base = atlas(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::default(), 0).unwrap();
        let evolved = atlas(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::new(3, 2, 1), 6).unwrap();
        assert!(evolved.parts.len() > base.parts.len());
    }

    #[test]
    fn negative_levels_draw_nothing_extra() {
        let base = comet(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::default(), 0).unwrap();
        let weak = comet(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::new(-1, -1, -1), 0).unwrap();
        assert_eq!(base.parts.len(), weak.parts.len());
    }

    #[test]
    fn non_finite_colour_is_rejected() {
        let err = vulcan(Srgba::rgb(f32::NAN, 0.0, 0.0), UpgradeLevels::default(), 0).unwrap_err();
        assert!(matches!(err, GameError::SpriteGeneration { archetype: "vulcan", .. }));
    }
}
