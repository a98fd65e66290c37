//! Immediate-mode drawing: the surface contract and the game renderer.
//!
//! ## Layers (back to front)
//!
//! | Layer        | Source                      |
//! |--------------|-----------------------------|
//! | Background   | sky + ground gradients      |
//! | Zones        | radial gradients by opacity |
//! | Impacts      | warning ring / flash / fireball / scorch |
//! | Obstacles    | rock polygons, ice blocks   |
//! | Power-ups    | spinning diamonds + glyph   |
//! | Particles    | circle / spark / square     |
//! | Rover        | archetype sprite, shield    |
//! | HUD          | score, gauges, pips, banners |
//! | Overlays     | paused / game over          |
//!
//! [`Renderer::render`] only reads the session.  Its own state is the sprite
//! cache and a log-once flag for sprite failures.

use crate::archetype::ArchetypeId;
use crate::constants::{MAX_UPGRADE_LEVEL, MIN_UPGRADE_LEVEL, ROVER_HEIGHT, ROVER_WIDTH, TEMP_MAX};
use crate::game::RoverGame;
use crate::impacts::ImpactPhase;
use crate::obstacles::ObstacleKind;
use crate::particles::ParticleKind;
use crate::rover::{RoverState, UpgradeKind, UpgradeLevels};
use crate::sprite::{SpriteDescriptor, SpriteGenerator, SpritePart, SpriteShape};
use crate::thermal::{lerp_rgb, TempBand};
use crate::zones::ZoneKind;
use bevy::color::{Alpha, Srgba};
use bevy::log::error;
use bevy::math::Vec2;
use std::f32::consts::TAU;
use std::sync::Arc;

// ── Paint & style ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Srgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Srgba) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Srgba),
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
    },
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Srgba {
    let t = t.clamp(0.0, 1.0);
    let Some(first) = stops.first() else {
        return Srgba::NONE;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return lerp_rgb(a.color, b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

impl Paint {
    /// Colour of this paint at a canvas point.
    pub fn color_at(&self, point: Vec2) -> Srgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear { start, end, stops } => {
                let axis = *end - *start;
                let len2 = axis.length_squared();
                let t = if len2 > 0.0 {
                    (point - *start).dot(axis) / len2
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                radius,
                stops,
            } => sample_stops(stops, center.distance(point) / radius.max(f32::EPSILON)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<(Srgba, f32)>,
}

impl Style {
    pub fn fill(color: Srgba) -> Self {
        Self {
            fill: Some(Paint::Solid(color)),
            stroke: None,
        }
    }

    pub fn paint(paint: Paint) -> Self {
        Self {
            fill: Some(paint),
            stroke: None,
        }
    }

    pub fn stroke(color: Srgba, width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width)),
        }
    }

    pub fn with_stroke(mut self, color: Srgba, width: f32) -> Self {
        self.stroke = Some((color, width));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Srgba,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(size: f32, color: Srgba) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = TextAlign::Right;
        self
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// A 2D immediate-mode drawing target in canvas coordinates (+Y down).
pub trait RenderSurface {
    fn clear(&mut self, color: Srgba);
    fn draw_rect(&mut self, min: Vec2, size: Vec2, style: &Style);
    fn draw_circle(&mut self, center: Vec2, radius: f32, style: &Style);
    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, style: &Style);
    fn draw_path(&mut self, points: &[Vec2], closed: bool, style: &Style);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
    /// Blit a sprite with its top-left corner at `pos`.
    fn draw_sprite(&mut self, sprite: &Arc<SpriteDescriptor>, pos: Vec2, alpha: f32);

    fn create_linear_gradient(&mut self, start: Vec2, end: Vec2, stops: &[ColorStop]) -> Paint {
        Paint::Linear {
            start,
            end,
            stops: stops.to_vec(),
        }
    }

    fn create_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) -> Paint {
        Paint::Radial {
            center,
            radius,
            stops: stops.to_vec(),
        }
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Srgba),
    Rect { min: Vec2, size: Vec2, style: Style },
    Circle { center: Vec2, radius: f32, style: Style },
    Ellipse { center: Vec2, radii: Vec2, style: Style },
    Path { points: Vec<Vec2>, closed: bool, style: Style },
    Text { text: String, pos: Vec2, style: TextStyle },
    Sprite { sprite: Arc<SpriteDescriptor>, pos: Vec2, alpha: f32 },
}

/// Surface that records commands for later playback by a host backend.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSurface for DisplayList {
    fn clear(&mut self, color: Srgba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_rect(&mut self, min: Vec2, size: Vec2, style: &Style) {
        self.commands.push(DrawCommand::Rect {
            min,
            size,
            style: style.clone(),
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, style: &Style) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: style.clone(),
        });
    }

    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, style: &Style) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            style: style.clone(),
        });
    }

    fn draw_path(&mut self, points: &[Vec2], closed: bool, style: &Style) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            closed,
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style: *style,
        });
    }

    fn draw_sprite(&mut self, sprite: &Arc<SpriteDescriptor>, pos: Vec2, alpha: f32) {
        self.commands.push(DrawCommand::Sprite {
            sprite: Arc::clone(sprite),
            pos,
            alpha,
        });
    }
}

/// Replay a sprite's parts onto a surface as primitive shapes.
pub fn expand_sprite(surface: &mut dyn RenderSurface, sprite: &SpriteDescriptor, pos: Vec2, alpha: f32) {
    for SpritePart { shape, fill } in &sprite.parts {
        let style = Style::fill(fill.with_alpha(fill.alpha * alpha));
        match shape {
            SpriteShape::Rect { min, size } => surface.draw_rect(pos + *min, *size, &style),
            SpriteShape::Circle { center, radius } => {
                surface.draw_circle(pos + *center, *radius, &style)
            }
            SpriteShape::Ellipse { center, radii } => {
                surface.draw_ellipse(pos + *center, *radii, &style)
            }
            SpriteShape::Polygon { points } => {
                let moved: Vec<Vec2> = points.iter().map(|p| pos + *p).collect();
                surface.draw_path(&moved, true, &style);
            }
        }
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SpriteKey {
    archetype: ArchetypeId,
    color: [u8; 3],
    upgrades: UpgradeLevels,
    stage: u8,
}

const BACKGROUND: Srgba = Srgba::rgb(0.04, 0.03, 0.08);
const HUD_TEXT: Srgba = Srgba::rgb(0.9, 0.92, 0.95);
const HUD_DIM: Srgba = Srgba::rgb(0.55, 0.58, 0.65);
const HUD_PANEL: Srgba = Srgba::new(0.0, 0.0, 0.0, 0.45);
const GOLD: Srgba = Srgba::rgb(1.0, 0.84, 0.2);
const SHIELD_COLOR: Srgba = Srgba::rgb(0.5, 0.9, 1.0);

/// Turns a session into draw calls.  Holds only a sprite cache.
#[derive(Debug, Default)]
pub struct Renderer {
    cached: Option<(SpriteKey, Arc<SpriteDescriptor>)>,
    sprite_failure_logged: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, game: &RoverGame, surface: &mut dyn RenderSurface) {
        surface.clear(BACKGROUND);
        draw_background(game, surface);
        draw_zones(game, surface);
        draw_impacts(game, surface);
        draw_obstacles(game, surface);
        draw_powerups(game, surface);
        draw_particles(game, surface);
        self.draw_rover(game, surface);
        draw_hud(game, surface);
        draw_overlays(game, surface);
    }

    /// Current rover sprite, regenerated only when its inputs change.
    fn rover_sprite(&mut self, game: &RoverGame) -> Arc<SpriteDescriptor> {
        let color = game.rover_color();
        let key = SpriteKey {
            archetype: game.archetype,
            color: quantize(color),
            upgrades: game.rover.upgrades,
            stage: game.evolution_stage(),
        };
        self.sprite_for(key, color, game.archetype_info().generator)
    }

    /// A failing generator yields a flat placeholder; the failure is logged
    /// once per renderer.
    fn sprite_for(
        &mut self,
        key: SpriteKey,
        color: Srgba,
        generator: SpriteGenerator,
    ) -> Arc<SpriteDescriptor> {
        if let Some((cached_key, sprite)) = &self.cached {
            if *cached_key == key {
                return Arc::clone(sprite);
            }
        }
        let sprite = match generator(color, key.upgrades, key.stage) {
            Ok(sprite) => Arc::new(sprite),
            Err(err) => {
                if !self.sprite_failure_logged {
                    error!("{err}; drawing placeholder");
                    self.sprite_failure_logged = true;
                }
                Arc::new(placeholder_sprite(color))
            }
        };
        self.cached = Some((key, Arc::clone(&sprite)));
        sprite
    }

    fn draw_rover(&mut self, game: &RoverGame, surface: &mut dyn RenderSurface) {
        let rover = &game.rover;
        let alpha = match rover.state {
            RoverState::Normal => 1.0,
            RoverState::Crashed => {
                let total = game.config.death_animation_ticks.max(1) as f32;
                rover.state_timer as f32 / total * if rover.state_timer % 8 < 4 { 1.0 } else { 0.4 }
            }
        };
        if alpha > 0.0 {
            let sprite = self.rover_sprite(game);
            surface.draw_sprite(&sprite, rover.pos, alpha);
        }

        if rover.has_shield {
            let center = rover.center();
            let radius = rover.half_width() + 8.0;
            let glow = surface.create_radial_gradient(
                center,
                radius,
                &[
                    ColorStop::new(0.0, SHIELD_COLOR.with_alpha(0.0)),
                    ColorStop::new(0.7, SHIELD_COLOR.with_alpha(0.12)),
                    ColorStop::new(1.0, SHIELD_COLOR.with_alpha(0.35)),
                ],
            );
            surface.draw_circle(center, radius, &Style::paint(glow).with_stroke(SHIELD_COLOR, 2.0));

            // Remaining-time ring.
            let fraction = rover.shield_remaining as f32 / game.config.shield_duration.max(1) as f32;
            let arc = arc_points(center, radius + 4.0, -TAU / 4.0, fraction * TAU, 32);
            surface.draw_path(&arc, false, &Style::stroke(SHIELD_COLOR, 2.0));
        }
    }
}

fn quantize(color: Srgba) -> [u8; 3] {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 63.0).round() as u8;
    [q(color.red), q(color.green), q(color.blue)]
}

fn placeholder_sprite(color: Srgba) -> SpriteDescriptor {
    let fill = if [color.red, color.green, color.blue].iter().all(|c| c.is_finite()) {
        color
    } else {
        Srgba::rgb(0.6, 0.6, 0.6)
    };
    SpriteDescriptor {
        size: Vec2::new(ROVER_WIDTH, ROVER_HEIGHT),
        parts: vec![SpritePart {
            shape: SpriteShape::Rect {
                min: Vec2::new(0.0, 8.0),
                size: Vec2::new(ROVER_WIDTH, ROVER_HEIGHT - 8.0),
            },
            fill,
        }],
    }
}

fn arc_points(center: Vec2, radius: f32, start: f32, sweep: f32, segments: usize) -> Vec<Vec2> {
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f32 / segments as f32;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

// ── World layers ──────────────────────────────────────────────────────────────

fn draw_background(game: &RoverGame, surface: &mut dyn RenderSurface) {
    let canvas = game.canvas();
    let sky = surface.create_linear_gradient(
        Vec2::ZERO,
        Vec2::new(0.0, canvas.y),
        &[
            ColorStop::new(0.0, Srgba::rgb(0.05, 0.03, 0.12)),
            ColorStop::new(0.6, Srgba::rgb(0.16, 0.08, 0.12)),
            ColorStop::new(1.0, Srgba::rgb(0.28, 0.16, 0.12)),
        ],
    );
    surface.draw_rect(Vec2::ZERO, canvas, &Style::paint(sky));

    // Ground streaks scroll with the run.
    let offset = (game.frame_count as f32 * 2.0) % 80.0;
    let streak = Style::stroke(Srgba::new(0.5, 0.35, 0.3, 0.25), 1.0);
    let mut x = -offset;
    while x < canvas.x {
        let y = canvas.y - 12.0 - (x * 0.37).sin().abs() * 6.0;
        surface.draw_path(&[Vec2::new(x, y), Vec2::new(x + 30.0, y)], false, &streak);
        x += 80.0;
    }
}

fn draw_zones(game: &RoverGame, surface: &mut dyn RenderSurface) {
    for zone in &game.zones {
        if zone.radius <= 0.0 && zone.opacity <= 0.0 {
            continue;
        }
        let tint = match zone.kind {
            ZoneKind::Hot => Srgba::rgb(1.0, 0.35, 0.1),
            ZoneKind::Cold => Srgba::rgb(0.3, 0.65, 1.0),
        };
        let strength = zone.opacity * (0.5 + zone.intensity / 3.0);
        let paint = surface.create_radial_gradient(
            zone.pos,
            zone.radius.max(1.0),
            &[
                ColorStop::new(0.0, tint.with_alpha(strength * 0.7)),
                ColorStop::new(0.7, tint.with_alpha(strength * 0.35)),
                ColorStop::new(1.0, tint.with_alpha(0.0)),
            ],
        );
        surface.draw_circle(zone.pos, zone.radius.max(1.0), &Style::paint(paint));
    }
}

fn draw_impacts(game: &RoverGame, surface: &mut dyn RenderSurface) {
    for impact in &game.impacts {
        match impact.phase {
            ImpactPhase::Warning => {
                let pulse = 0.5 + 0.5 * (impact.timer as f32 * 0.3).sin();
                let red = Srgba::new(1.0, 0.2, 0.1, 0.4 + 0.4 * pulse);
                surface.draw_circle(impact.pos, impact.target_radius, &Style::stroke(red, 1.5));
                surface.draw_circle(
                    impact.pos,
                    impact.radius,
                    &Style::fill(Srgba::new(1.0, 0.3, 0.1, 0.25)),
                );
                let arm = impact.target_radius * 0.3;
                let cross = Style::stroke(red, 1.0);
                surface.draw_path(
                    &[impact.pos - Vec2::X * arm, impact.pos + Vec2::X * arm],
                    false,
                    &cross,
                );
                surface.draw_path(
                    &[impact.pos - Vec2::Y * arm, impact.pos + Vec2::Y * arm],
                    false,
                    &cross,
                );
            }
            ImpactPhase::Impact => {
                surface.draw_circle(
                    impact.pos,
                    impact.target_radius,
                    &Style::fill(Srgba::new(1.0, 1.0, 0.9, 0.85)),
                );
            }
            ImpactPhase::Exploding => {
                let fire = surface.create_radial_gradient(
                    impact.pos,
                    impact.radius.max(1.0),
                    &[
                        ColorStop::new(0.0, Srgba::new(1.0, 0.95, 0.6, 0.9)),
                        ColorStop::new(0.5, Srgba::new(1.0, 0.5, 0.1, 0.7)),
                        ColorStop::new(1.0, Srgba::new(0.6, 0.1, 0.05, 0.0)),
                    ],
                );
                surface.draw_circle(impact.pos, impact.radius.max(1.0), &Style::paint(fire));
            }
            ImpactPhase::Fading => {
                let alpha = 0.4 * (1.0 - impact.progress());
                surface.draw_circle(
                    impact.pos,
                    impact.explosion_radius() * 0.6,
                    &Style::fill(Srgba::new(0.15, 0.1, 0.08, alpha)),
                );
            }
        }
    }
}

fn draw_obstacles(game: &RoverGame, surface: &mut dyn RenderSurface) {
    for obstacle in &game.obstacles {
        let (min, size) = (obstacle.pos, obstacle.size);
        match obstacle.kind {
            ObstacleKind::Rock => {
                let points = [
                    min + Vec2::new(size.x * 0.2, 0.0),
                    min + Vec2::new(size.x * 0.85, size.y * 0.1),
                    min + Vec2::new(size.x, size.y * 0.6),
                    min + Vec2::new(size.x * 0.7, size.y),
                    min + Vec2::new(size.x * 0.1, size.y * 0.9),
                    min + Vec2::new(0.0, size.y * 0.35),
                ];
                let style = Style::fill(Srgba::rgb(0.45, 0.36, 0.3))
                    .with_stroke(Srgba::rgb(0.3, 0.22, 0.18), 1.5);
                surface.draw_path(&points, true, &style);
            }
            ObstacleKind::Ice => {
                let frost = surface.create_linear_gradient(
                    min,
                    min + size,
                    &[
                        ColorStop::new(0.0, Srgba::rgb(0.85, 0.95, 1.0)),
                        ColorStop::new(1.0, Srgba::rgb(0.45, 0.7, 0.95)),
                    ],
                );
                surface.draw_rect(min, size, &Style::paint(frost).with_stroke(Srgba::WHITE, 1.0));
            }
        }
    }
}

fn draw_powerups(game: &RoverGame, surface: &mut dyn RenderSurface) {
    for p in &game.powerups {
        let color = p.kind.color();
        surface.draw_circle(p.pos, p.radius + 4.0, &Style::fill(color.with_alpha(0.2)));
        let diamond: Vec<Vec2> = (0..4)
            .map(|i| p.pos + Vec2::from_angle(p.rotation + TAU * i as f32 / 4.0) * p.radius)
            .collect();
        surface.draw_path(&diamond, true, &Style::fill(color).with_stroke(Srgba::WHITE, 1.0));
        surface.draw_text(
            p.kind.glyph(),
            p.pos + Vec2::new(0.0, 4.0),
            &TextStyle::new(11.0, Srgba::BLACK).centered(),
        );
    }
}

fn draw_particles(game: &RoverGame, surface: &mut dyn RenderSurface) {
    for p in &game.particles {
        let alpha = p.color.alpha * p.life_fraction();
        let color = p.color.with_alpha(alpha);
        match p.kind {
            ParticleKind::Circle => surface.draw_circle(p.pos, p.size, &Style::fill(color)),
            ParticleKind::Square => {
                let half = Vec2::splat(p.size * 0.5);
                surface.draw_rect(p.pos - half, half * 2.0, &Style::fill(color));
            }
            ParticleKind::Spark => {
                let tail = p.pos - p.vel.normalize_or_zero() * p.size * 2.0;
                surface.draw_path(&[tail, p.pos], false, &Style::stroke(color, p.size * 0.6));
            }
        }
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud(game: &RoverGame, surface: &mut dyn RenderSurface) {
    let canvas = game.canvas();
    let rover = &game.rover;

    surface.draw_rect(Vec2::ZERO, Vec2::new(canvas.x, 34.0), &Style::fill(HUD_PANEL));
    surface.draw_text(
        &format!("SCORE {}", game.score),
        Vec2::new(12.0, 22.0),
        &TextStyle::new(16.0, HUD_TEXT),
    );
    surface.draw_text(
        &format!(
            "{} | {} | STAGE {}",
            game.difficulty.label().to_uppercase(),
            game.archetype_info().name.to_uppercase(),
            game.evolution_stage()
        ),
        Vec2::new(canvas.x * 0.5, 22.0),
        &TextStyle::new(13.0, HUD_DIM).centered(),
    );
    surface.draw_text(
        &format!("SHIELDS {}", rover.shields),
        Vec2::new(canvas.x - 12.0, 22.0),
        &TextStyle::new(14.0, SHIELD_COLOR).right(),
    );

    // Temperature gauge.
    let gauge_min = Vec2::new(12.0, canvas.y - 46.0);
    let gauge_size = Vec2::new(160.0, 10.0);
    let band = TempBand::of(rover.temperature);
    surface.draw_rect(gauge_min, gauge_size, &Style::fill(HUD_PANEL).with_stroke(HUD_DIM, 1.0));
    let fill = gauge_size.x * (rover.temperature / TEMP_MAX).clamp(0.0, 1.0);
    surface.draw_rect(gauge_min, Vec2::new(fill, gauge_size.y), &Style::fill(game.rover_color()));
    surface.draw_text(
        &format!("TEMP {:.0} {}", rover.temperature, band.label()),
        gauge_min + Vec2::new(gauge_size.x + 8.0, 9.0),
        &TextStyle::new(11.0, HUD_TEXT),
    );

    // Coolant bar.
    let coolant_min = gauge_min + Vec2::new(0.0, 16.0);
    surface.draw_rect(coolant_min, gauge_size, &Style::fill(HUD_PANEL).with_stroke(HUD_DIM, 1.0));
    let level = if rover.max_coolant > 0.0 {
        (rover.coolant / rover.max_coolant).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let coolant = surface.create_linear_gradient(
        coolant_min,
        coolant_min + Vec2::new(gauge_size.x, 0.0),
        &[
            ColorStop::new(0.0, Srgba::rgb(0.1, 0.4, 0.9)),
            ColorStop::new(1.0, Srgba::rgb(0.4, 0.9, 1.0)),
        ],
    );
    surface.draw_rect(
        coolant_min,
        Vec2::new(gauge_size.x * level, gauge_size.y),
        &Style::paint(coolant),
    );
    surface.draw_text(
        &format!("COOLANT {:.0}/{:.0}", rover.coolant, rover.max_coolant),
        coolant_min + Vec2::new(gauge_size.x + 8.0, 9.0),
        &TextStyle::new(11.0, HUD_TEXT),
    );

    draw_upgrade_pips(&rover.upgrades, Vec2::new(canvas.x - 120.0, canvas.y - 52.0), surface);

    if let Some(c) = &game.celebration {
        let a = c.alpha();
        surface.draw_text(
            &c.title,
            Vec2::new(canvas.x * 0.5, 80.0),
            &TextStyle::new(26.0, GOLD.with_alpha(a)).centered(),
        );
        surface.draw_text(
            &c.detail,
            Vec2::new(canvas.x * 0.5, 104.0),
            &TextStyle::new(14.0, HUD_TEXT.with_alpha(a)).centered(),
        );
    }
    if let Some(n) = &game.notice {
        surface.draw_text(
            &n.text,
            rover.center() + Vec2::new(0.0, -rover.size.y),
            &TextStyle::new(12.0, GOLD).centered(),
        );
    }
}

fn draw_upgrade_pips(upgrades: &UpgradeLevels, origin: Vec2, surface: &mut dyn RenderSurface) {
    for (row, kind) in UpgradeKind::ALL.iter().enumerate() {
        let y = origin.y + row as f32 * 14.0;
        let label = &kind.label()[..1];
        surface.draw_text(label, Vec2::new(origin.x, y + 8.0), &TextStyle::new(10.0, HUD_DIM));
        let level = upgrades.get(*kind);
        for (i, pip) in (MIN_UPGRADE_LEVEL..=MAX_UPGRADE_LEVEL).enumerate() {
            let min = Vec2::new(origin.x + 14.0 + i as f32 * 18.0, y);
            let color = if pip == -1 && level == -1 {
                Srgba::rgb(0.9, 0.2, 0.2)
            } else if pip > 0 && pip <= level {
                Srgba::rgb(0.4, 0.95, 0.5)
            } else {
                Srgba::new(1.0, 1.0, 1.0, 0.12)
            };
            if pip != 0 {
                surface.draw_rect(min, Vec2::new(14.0, 8.0), &Style::fill(color));
            }
        }
    }
}

fn draw_overlays(game: &RoverGame, surface: &mut dyn RenderSurface) {
    let canvas = game.canvas();
    if game.is_paused {
        surface.draw_rect(Vec2::ZERO, canvas, &Style::fill(Srgba::new(0.0, 0.0, 0.0, 0.5)));
        surface.draw_text(
            "PAUSED",
            canvas * 0.5,
            &TextStyle::new(36.0, HUD_TEXT).centered(),
        );
        surface.draw_text(
            "ESC to resume",
            canvas * 0.5 + Vec2::new(0.0, 30.0),
            &TextStyle::new(14.0, HUD_DIM).centered(),
        );
    }
    if game.is_game_over {
        surface.draw_rect(Vec2::ZERO, canvas, &Style::fill(Srgba::new(0.05, 0.0, 0.0, 0.6)));
        surface.draw_text(
            "MISSION LOST",
            canvas * 0.5 - Vec2::new(0.0, 20.0),
            &TextStyle::new(36.0, Srgba::rgb(1.0, 0.35, 0.25)).centered(),
        );
        let caption = game
            .rover
            .crash_cause
            .map(|c| c.caption())
            .unwrap_or("Signal lost");
        surface.draw_text(
            &format!("{caption} - {} points", game.score),
            canvas * 0.5 + Vec2::new(0.0, 12.0),
            &TextStyle::new(16.0, HUD_TEXT).centered(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, GameConfig};
    use crate::error::{GameError, GameResult};

    fn game() -> RoverGame {
        RoverGame::new(GameConfig::default(), Difficulty::Easy, ArchetypeId::Atlas, 3)
    }

    #[test]
    fn render_does_not_touch_the_session() {
        let mut g = game();
        for _ in 0..30 {
            g.update();
        }
        let (score, temp, particles) = (g.score, g.rover.temperature, g.particles.len());
        let mut list = DisplayList::default();
        Renderer::new().render(&g, &mut list);
        assert_eq!((g.score, g.rover.temperature, g.particles.len()), (score, temp, particles));
        assert!(matches!(list.commands.first(), Some(DrawCommand::Clear(_))));
    }

    #[test]
    fn hud_shows_score_and_pause_overlay() {
        let mut g = game();
        g.score = 1234;
        g.toggle_pause();
        let mut list = DisplayList::default();
        Renderer::new().render(&g, &mut list);
        let texts: Vec<_> = list.texts().collect();
        assert!(texts.contains(&"SCORE 1234"));
        assert!(texts.contains(&"PAUSED"));
    }

    #[test]
    fn sprite_is_cached_until_inputs_change() {
        let mut g = game();
        let mut renderer = Renderer::new();
        let a = renderer.rover_sprite(&g);
        let b = renderer.rover_sprite(&g);
        assert!(Arc::ptr_eq(&a, &b));
        g.score = 1000;
        let c = renderer.rover_sprite(&g);
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn failing_generator_falls_back_to_placeholder() {
        fn broken(_: Srgba, _: UpgradeLevels, _: u8) -> GameResult<SpriteDescriptor> {
            Err(GameError::SpriteGeneration {
                archetype: "broken",
                reason: "test".to_string(),
            })
        }
        let mut renderer = Renderer::new();
        let key = |stage| SpriteKey {
            archetype: ArchetypeId::Atlas,
            color: [0, 0, 0],
            upgrades: UpgradeLevels::default(),
            stage,
        };
        let sprite = renderer.sprite_for(key(0), Srgba::rgb(0.5, 0.5, 0.5), broken);
        assert_eq!(sprite.parts.len(), 1);
        assert!(renderer.sprite_failure_logged);
        let again = renderer.sprite_for(key(1), Srgba::rgb(0.5, 0.5, 0.5), broken);
        assert_eq!(again.parts.len(), 1);
    }

    #[test]
    fn gradients_sample_between_stops() {
        let paint = Paint::Linear {
            start: Vec2::ZERO,
            end: Vec2::new(10.0, 0.0),
            stops: vec![
                ColorStop::new(0.0, Srgba::rgb(0.0, 0.0, 0.0)),
                ColorStop::new(1.0, Srgba::rgb(1.0, 1.0, 1.0)),
            ],
        };
        let mid = paint.color_at(Vec2::new(5.0, 3.0));
        assert!((mid.red - 0.5).abs() < 1e-5);
        assert_eq!(paint.color_at(Vec2::new(20.0, 0.0)).red, 1.0);
    }

    #[test]
    fn expanded_sprite_emits_one_command_per_part() {
        let sprite = crate::sprite::atlas(Srgba::rgb(0.5, 0.5, 0.5), UpgradeLevels::default(), 0)
            .expect("sprite");
        let mut list = DisplayList::default();
        expand_sprite(&mut list, &sprite, Vec2::new(10.0, 10.0), 1.0);
        assert_eq!(list.commands.len(), sprite.parts.len());
    }
}
