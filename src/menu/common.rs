use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

pub(super) fn start_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
pub(super) fn start_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(super) fn start_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
pub(super) fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
pub(super) fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
pub(super) fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
pub(super) fn title_color() -> Color {
    Color::srgb(0.98, 0.62, 0.30)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.28, 0.28, 0.35)
}
pub(super) fn select_bg() -> Color {
    Color::srgb(0.06, 0.09, 0.18)
}
pub(super) fn select_border() -> Color {
    Color::srgb(0.22, 0.38, 0.72)
}
pub(super) fn select_text() -> Color {
    Color::srgb(0.80, 0.95, 1.0)
}
pub(super) fn back_bg() -> Color {
    Color::srgb(0.12, 0.12, 0.18)
}
pub(super) fn back_border() -> Color {
    Color::srgb(0.30, 0.30, 0.46)
}
pub(super) fn back_text() -> Color {
    Color::srgb(0.55, 0.55, 0.70)
}
pub(super) fn error_text() -> Color {
    Color::srgb(1.0, 0.45, 0.40)
}
pub(super) fn highlight_text() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}

/// Fixed-height vertical gap inside a column layout.
pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Standard 220×50 bordered menu button with a single centred label.
///
/// `extra` is the marker component (plus anything else) attached to the button.
pub(super) fn spawn_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &Handle<Font>,
    label: &str,
    colors: (Color, Color, Color),
    extra: impl Bundle,
) {
    let (bg, border, text) = colors;
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            extra,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font: font.clone(),
                    font_size: 18.0,
                    ..default()
                },
                TextColor(text),
            ));
        });
}

/// Hover feedback: white label on hover, `idle` colour otherwise.
pub(super) fn tint_children(
    interaction: &Interaction,
    children: &Children,
    btn_text: &mut Query<&mut TextColor>,
    idle: Color,
) {
    let color = match interaction {
        Interaction::Hovered | Interaction::Pressed => Color::WHITE,
        Interaction::None => idle,
    };
    for child in children.iter() {
        if let Ok(mut text_color) = btn_text.get_mut(child) {
            *text_color = TextColor(color);
        }
    }
}
