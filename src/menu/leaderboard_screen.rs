use super::*;

const COLUMN_WIDTHS: [f32; 6] = [40.0, 150.0, 90.0, 80.0, 100.0, 110.0];

/// Spawn the top-scores table.
///
/// Rows come straight from [`ScoreBoard::entries`], already sorted; an
/// unreadable store shows the empty-board message.  The entry submitted by
/// the last run (if any) is highlighted.
pub(super) fn setup_leaderboard(
    mut commands: Commands,
    font: Res<GameFont>,
    board: Res<ScoreBoard>,
    last: Res<LastSubmission>,
) {
    let entries = board.entries();
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            ZIndex(200),
            LeaderboardRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("LEADERBOARD"),
                TextFont {
                    font: font.0.clone(),
                    font_size: 40.0,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spacer(root, 16.0);

            spawn_row(
                root,
                &font.0,
                ["#", "NAME", "SCORE", "LEVEL", "ROVER", "DATE"].map(String::from),
                hint_color(),
            );

            if entries.is_empty() {
                spacer(root, 20.0);
                root.spawn((
                    Text::new("No scores yet"),
                    TextFont {
                        font: font.0.clone(),
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(subtitle_color()),
                ));
            }

            for (rank, entry) in entries.iter().enumerate() {
                let color = if last.0.as_ref() == Some(entry) {
                    highlight_text()
                } else {
                    select_text()
                };
                spawn_row(
                    root,
                    &font.0,
                    [
                        format!("{}", rank + 1),
                        entry.name.clone(),
                        entry.score.to_string(),
                        entry.difficulty.label().to_uppercase(),
                        entry.archetype.to_uppercase(),
                        format_date(entry.date),
                    ],
                    color,
                );
            }

            spacer(root, 24.0);

            spawn_button(
                root,
                &font.0,
                "BACK",
                (back_bg(), back_border(), back_text()),
                LeaderboardBackButton,
            );
        });
}

fn spawn_row(parent: &mut ChildSpawnerCommands<'_>, font: &Handle<Font>, cells: [String; 6], color: Color) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            height: Val::Px(20.0),
            ..default()
        })
        .with_children(|row| {
            for (cell, width) in cells.into_iter().zip(COLUMN_WIDTHS) {
                row.spawn((
                    Node {
                        width: Val::Px(width),
                        ..default()
                    },
                    Text::new(cell),
                    TextFont {
                        font: font.clone(),
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(color),
                ));
            }
        });
}

/// Recursively despawn the leaderboard screen.
pub(super) fn cleanup_leaderboard(mut commands: Commands, query: Query<Entity, With<LeaderboardRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Back button, Enter or Escape → [`GameState::MainMenu`].
#[allow(clippy::type_complexity)]
pub(super) fn leaderboard_button_system(
    back_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<LeaderboardBackButton>)>,
    mut btn_text: Query<&mut TextColor>,
    mut next_state: ResMut<NextState<GameState>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    let wants_back = keys.any_just_pressed([KeyCode::Enter, KeyCode::Escape])
        || back_query.iter().any(|(i, _)| *i == Interaction::Pressed);
    if wants_back {
        next_state.set(GameState::MainMenu);
        return;
    }

    for (interaction, children) in back_query.iter() {
        tint_children(interaction, children, &mut btn_text, back_text());
    }
}
