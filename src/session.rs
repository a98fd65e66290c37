//! Bevy host for [`RoverGame`].
//!
//! ## Frame flow
//!
//! | Schedule                 | System          | Work                                       |
//! |--------------------------|-----------------|--------------------------------------------|
//! | `OnEnter(Playing)`       | `start_run`     | New session from the menu selections       |
//! | `Update / Playing`       | `forward_input` | Keyboard → [`KeyEvent`]s, abandon on Q     |
//! | `FixedUpdate / Playing`  | `tick_run`      | `RoverGame::update()` at 60 Hz             |
//! | `Update / Playing`       | `detect_game_over` | → `GameState::GameOver`                 |
//! | `Update / Playing+GameOver` | `draw_run`   | Render to a display list, replay it        |
//! | `OnExit(GameOver)`       | `end_run`       | Stop and drop the session                  |
//! | `OnEnter(MainMenu/Leaderboard)` | `hide_hud_text` | Hide pooled HUD text                |
//!
//! The game draws in canvas space (origin top-left, +Y down).  Playback maps
//! that onto the 2D camera, which is centred on the origin with +Y up, and
//! rasterizes fills as horizontal gizmo lines.  Text goes through a pool of
//! `Text2d` entities reused frame to frame.

use crate::archetype::ArchetypeId;
use crate::config::{Difficulty, GameConfig};
use crate::constants::TICK_HZ;
use crate::draw::{expand_sprite, DisplayList, DrawCommand, Paint, Renderer, Style, TextAlign, TextStyle};
use crate::game::RoverGame;
use crate::graphics::GameFont;
use crate::leaderboard::current_unix_timestamp;
use crate::menu::{GameState, SelectedArchetype, SelectedDifficulty};
use crate::rover::{InputAction, KeyEvent};
use bevy::math::Isometry2d;
use bevy::prelude::*;

/// Distance between fill scanlines, in canvas pixels.
const SCANLINE_STEP: f32 = 1.0;
/// Width of one colour sample along a gradient-filled scanline.
const GRADIENT_STEP: f32 = 4.0;
const TEXT_Z: f32 = 10.0;
/// Rough advance width of one glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.56;

/// Keyboard bindings.  Arrows and WASD both steer.
pub const KEY_BINDINGS: [(KeyCode, InputAction); 10] = [
    (KeyCode::ArrowUp, InputAction::MoveUp),
    (KeyCode::KeyW, InputAction::MoveUp),
    (KeyCode::ArrowDown, InputAction::MoveDown),
    (KeyCode::KeyS, InputAction::MoveDown),
    (KeyCode::ArrowLeft, InputAction::MoveLeft),
    (KeyCode::KeyA, InputAction::MoveLeft),
    (KeyCode::ArrowRight, InputAction::MoveRight),
    (KeyCode::KeyD, InputAction::MoveRight),
    (KeyCode::Space, InputAction::ActivateShield),
    (KeyCode::Escape, InputAction::TogglePause),
];

/// This frame's key transitions as logical events.
pub fn key_events(keys: &ButtonInput<KeyCode>) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    for (key, action) in KEY_BINDINGS {
        if keys.just_pressed(key) {
            events.push(KeyEvent::Down(action));
        }
        if keys.just_released(key) {
            events.push(KeyEvent::Up(action));
        }
    }
    events
}

/// The live run plus the renderer state that outlives single frames.
#[derive(Resource, Default)]
pub struct RoverSession {
    pub game: Option<RoverGame>,
    renderer: Renderer,
    display: DisplayList,
}

impl RoverSession {
    /// Replace any previous run with a fresh one.
    pub fn begin(&mut self, config: GameConfig, difficulty: Difficulty, archetype: ArchetypeId, seed: u64) {
        self.game = Some(RoverGame::new(config, difficulty, archetype, seed));
        self.display.reset();
    }

    pub fn end(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.stop();
        }
        self.game = None;
        self.display.reset();
    }

    /// Render the current run into the display list.  `None` without a run.
    pub fn render(&mut self) -> Option<&DisplayList> {
        let game = self.game.as_ref()?;
        game.render(&mut self.renderer, &mut self.display);
        Some(&self.display)
    }
}

/// Pooled HUD text entity; the index is its slot in the frame's text list.
#[derive(Component)]
pub struct HudText(pub usize);

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoverSession>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_systems(OnEnter(GameState::Playing), start_run)
            .add_systems(FixedUpdate, tick_run.run_if(in_state(GameState::Playing)))
            .add_systems(
                Update,
                (forward_input, detect_game_over)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                draw_run.run_if(in_state(GameState::Playing).or(in_state(GameState::GameOver))),
            )
            .add_systems(OnExit(GameState::GameOver), end_run)
            .add_systems(OnEnter(GameState::MainMenu), hide_hud_text)
            .add_systems(OnEnter(GameState::Leaderboard), hide_hud_text);
    }
}

fn start_run(
    mut session: ResMut<RoverSession>,
    config: Res<GameConfig>,
    difficulty: Res<SelectedDifficulty>,
    selected: Res<SelectedArchetype>,
) {
    session.begin(config.clone(), difficulty.0, selected.0, current_unix_timestamp());
}

fn tick_run(mut session: ResMut<RoverSession>) {
    if let Some(game) = session.game.as_mut() {
        game.update();
    }
}

/// Keyboard → session.  While paused, Q abandons the run.
fn forward_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<RoverSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(game) = session.game.as_mut() else {
        return;
    };
    if game.is_paused && keys.just_pressed(KeyCode::KeyQ) {
        info!("Run abandoned at {} points", game.score);
        session.end();
        next_state.set(GameState::MainMenu);
        return;
    }
    for event in key_events(&keys) {
        game.handle_key(event);
    }
}

fn detect_game_over(session: Res<RoverSession>, mut next_state: ResMut<NextState<GameState>>) {
    if session.game.as_ref().is_some_and(|game| game.is_game_over) {
        next_state.set(GameState::GameOver);
    }
}

fn end_run(mut session: ResMut<RoverSession>) {
    session.end();
}

fn hide_hud_text(mut texts: Query<&mut Visibility, With<HudText>>) {
    for mut visibility in texts.iter_mut() {
        *visibility = Visibility::Hidden;
    }
}

#[allow(clippy::type_complexity)]
fn draw_run(
    mut commands: Commands,
    mut session: ResMut<RoverSession>,
    mut gizmos: Gizmos,
    font: Res<GameFont>,
    mut pool: Query<(
        &HudText,
        &mut Text2d,
        &mut TextFont,
        &mut TextColor,
        &mut Transform,
        &mut Visibility,
    )>,
) {
    let Some(canvas) = session.game.as_ref().map(RoverGame::canvas) else {
        return;
    };
    let Some(display) = session.render() else {
        return;
    };

    let mut texts = Vec::new();
    for command in &display.commands {
        play(command, canvas, &mut gizmos, &mut texts);
    }

    let pooled = pool.iter().count();
    for (slot, mut text, mut text_font, mut color, mut transform, mut visibility) in pool.iter_mut() {
        let Some((label, pos, style)) = texts.get(slot.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        if text.0 != *label {
            text.0.clone_from(label);
        }
        text_font.font_size = style.size;
        *color = TextColor(Color::Srgba(style.color));
        *transform = Transform::from_translation(text_center(label, *pos, style, canvas).extend(TEXT_Z));
        *visibility = Visibility::Visible;
    }
    for (index, (label, pos, style)) in texts.iter().enumerate().skip(pooled) {
        commands.spawn((
            Text2d::new(label.clone()),
            TextFont {
                font: font.0.clone(),
                font_size: style.size,
                ..default()
            },
            TextColor(Color::Srgba(style.color)),
            Transform::from_translation(text_center(label, *pos, style, canvas).extend(TEXT_Z)),
            HudText(index),
        ));
    }
}

// ── Playback ──────────────────────────────────────────────────────────────────

/// Canvas space (top-left origin, +Y down) → world space (centred, +Y up).
#[inline]
pub fn to_world(point: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(point.x - canvas.x * 0.5, canvas.y * 0.5 - point.y)
}

/// World-space centre for a text label anchored at a canvas baseline point.
fn text_center(label: &str, pos: Vec2, style: &TextStyle, canvas: Vec2) -> Vec2 {
    let width = label.chars().count() as f32 * style.size * GLYPH_ADVANCE;
    let x = match style.align {
        TextAlign::Left => pos.x + width * 0.5,
        TextAlign::Center => pos.x,
        TextAlign::Right => pos.x - width * 0.5,
    };
    to_world(Vec2::new(x, pos.y - style.size * 0.35), canvas)
}

fn play(
    command: &DrawCommand,
    canvas: Vec2,
    gizmos: &mut Gizmos,
    texts: &mut Vec<(String, Vec2, TextStyle)>,
) {
    match command {
        DrawCommand::Clear(color) => {
            fill_spans(gizmos, &rect_spans(Vec2::ZERO, canvas), &Paint::Solid(*color), canvas);
        }
        DrawCommand::Rect { min, size, style } => {
            if let Some(paint) = &style.fill {
                fill_spans(gizmos, &rect_spans(*min, *size), paint, canvas);
            }
            if let Some((color, _)) = style.stroke {
                let max = *min + *size;
                let corners = [*min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), *min];
                gizmos.linestrip_2d(corners.map(|p| to_world(p, canvas)), Color::Srgba(color));
            }
        }
        DrawCommand::Circle { center, radius, style } => {
            draw_ellipse(gizmos, *center, Vec2::splat(*radius), style, canvas);
        }
        DrawCommand::Ellipse { center, radii, style } => {
            draw_ellipse(gizmos, *center, *radii, style, canvas);
        }
        DrawCommand::Path { points, closed, style } => {
            if *closed {
                if let Some(paint) = &style.fill {
                    fill_spans(gizmos, &polygon_spans(points), paint, canvas);
                }
            }
            if let Some((color, _)) = style.stroke {
                let mut outline: Vec<Vec2> = points.iter().map(|p| to_world(*p, canvas)).collect();
                if *closed {
                    if let Some(first) = outline.first().copied() {
                        outline.push(first);
                    }
                }
                gizmos.linestrip_2d(outline, Color::Srgba(color));
            }
        }
        DrawCommand::Text { text, pos, style } => {
            texts.push((text.clone(), *pos, *style));
        }
        DrawCommand::Sprite { sprite, pos, alpha } => {
            let mut parts = DisplayList::default();
            expand_sprite(&mut parts, sprite, *pos, *alpha);
            for part in &parts.commands {
                play(part, canvas, gizmos, texts);
            }
        }
    }
}

fn draw_ellipse(gizmos: &mut Gizmos, center: Vec2, radii: Vec2, style: &Style, canvas: Vec2) {
    if let Some(paint) = &style.fill {
        fill_spans(gizmos, &ellipse_spans(center, radii), paint, canvas);
    }
    if let Some((color, _)) = style.stroke {
        gizmos.ellipse_2d(
            Isometry2d::from_translation(to_world(center, canvas)),
            radii,
            Color::Srgba(color),
        );
    }
}

/// One horizontal run: `(y, x_start, x_end)` in canvas space.
pub type Span = (f32, f32, f32);

pub fn rect_spans(min: Vec2, size: Vec2) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut y = min.y + SCANLINE_STEP * 0.5;
    while y < min.y + size.y {
        spans.push((y, min.x, min.x + size.x));
        y += SCANLINE_STEP;
    }
    spans
}

pub fn ellipse_spans(center: Vec2, radii: Vec2) -> Vec<Span> {
    let mut spans = Vec::new();
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return spans;
    }
    let mut y = center.y - radii.y + SCANLINE_STEP * 0.5;
    while y < center.y + radii.y {
        let dy = (y - center.y) / radii.y;
        let half = radii.x * (1.0 - dy * dy).max(0.0).sqrt();
        spans.push((y, center.x - half, center.x + half));
        y += SCANLINE_STEP;
    }
    spans
}

/// Even-odd scanline fill of a closed polygon.
pub fn polygon_spans(points: &[Vec2]) -> Vec<Span> {
    let mut spans = Vec::new();
    if points.len() < 3 {
        return spans;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let mut crossings = Vec::new();
    let mut y = min_y.floor() + SCANLINE_STEP * 0.5;
    while y < max_y {
        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= y) != (b.y <= y) {
                crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for pair in crossings.chunks_exact(2) {
            spans.push((y, pair[0], pair[1]));
        }
        y += SCANLINE_STEP;
    }
    spans
}

fn fill_spans(gizmos: &mut Gizmos, spans: &[Span], paint: &Paint, canvas: Vec2) {
    for &(y, x0, x1) in spans {
        if let Paint::Solid(color) = paint {
            gizmos.line_2d(
                to_world(Vec2::new(x0, y), canvas),
                to_world(Vec2::new(x1, y), canvas),
                Color::Srgba(*color),
            );
            continue;
        }
        let mut x = x0;
        while x < x1 {
            let end = (x + GRADIENT_STEP).min(x1);
            let color = paint.color_at(Vec2::new((x + end) * 0.5, y));
            gizmos.line_2d(
                to_world(Vec2::new(x, y), canvas),
                to_world(Vec2::new(end, y), canvas),
                Color::Srgba(color),
            );
            x = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_corners_map_to_world() {
        let canvas = Vec2::new(800.0, 500.0);
        assert_eq!(to_world(Vec2::ZERO, canvas), Vec2::new(-400.0, 250.0));
        assert_eq!(to_world(canvas, canvas), Vec2::new(400.0, -250.0));
    }

    #[test]
    fn arrows_and_wasd_map_to_the_same_action() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::Space);
        let events = key_events(&keys);
        assert!(events.contains(&KeyEvent::Down(InputAction::MoveUp)));
        assert!(events.contains(&KeyEvent::Down(InputAction::ActivateShield)));

        keys.clear();
        keys.release(KeyCode::KeyW);
        assert_eq!(key_events(&keys), vec![KeyEvent::Up(InputAction::MoveUp)]);
    }

    #[test]
    fn square_fills_one_span_per_row() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let spans = polygon_spans(&square);
        assert_eq!(spans.len(), 10);
        assert!(spans.iter().all(|&(_, x0, x1)| x0 == 0.0 && x1 == 10.0));
    }

    #[test]
    fn degenerate_shapes_have_no_spans() {
        assert!(polygon_spans(&[Vec2::ZERO, Vec2::X]).is_empty());
        assert!(ellipse_spans(Vec2::ZERO, Vec2::new(5.0, 0.0)).is_empty());
    }

    #[test]
    fn ellipse_is_widest_through_its_centre() {
        let spans = ellipse_spans(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        let widest = spans
            .iter()
            .map(|&(_, x0, x1)| x1 - x0)
            .fold(0.0_f32, f32::max);
        assert!(widest > 39.0 && widest <= 40.0);
    }

    #[test]
    fn session_renders_only_with_a_run() {
        let mut session = RoverSession::default();
        assert!(session.render().is_none());

        session.begin(GameConfig::default(), Difficulty::Easy, ArchetypeId::Comet, 3);
        let display = session.render().expect("a live run renders");
        assert!(display.texts().any(|t| t.starts_with("SCORE")));

        session.end();
        assert!(session.game.is_none());
    }
}
