use super::*;

/// Spawn the full-screen main-menu overlay.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │              PSYCHE ROVER                   │
/// │    Keep the rover alive on a metal world    │
/// │                                             │
/// │        [ DIFFICULTY: MEDIUM ]               │
/// │        [ ROVER: ATLAS ]                     │
/// │      Balanced all-rounder …                 │
/// │                                             │
/// │            [ START ]                        │
/// │          [ LEADERBOARD ]                    │
/// │             [ QUIT ]                        │
/// └─────────────────────────────────────────────┘
/// ```
fn setup_main_menu(
    mut commands: Commands,
    font: Res<GameFont>,
    difficulty: Res<SelectedDifficulty>,
    selected: Res<SelectedArchetype>,
) {
    let rover = archetype(selected.0);
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
            MainMenuRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("PSYCHE ROVER"),
                TextFont {
                    font: font.0.clone(),
                    font_size: 52.0,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spacer(root, 6.0);

            root.spawn((
                Text::new("Keep the rover alive on a metal world"),
                TextFont {
                    font: font.0.clone(),
                    font_size: 16.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));

            spacer(root, 30.0);

            spawn_selector(
                root,
                &font.0,
                difficulty_text(difficulty.0),
                (MenuDifficultyButton, DifficultyLabel),
            );

            spacer(root, 10.0);

            spawn_selector(
                root,
                &font.0,
                archetype_text(selected.0),
                (MenuArchetypeButton, ArchetypeLabel),
            );

            spacer(root, 8.0);

            root.spawn((
                Text::new(rover.description),
                TextFont {
                    font: font.0.clone(),
                    font_size: 13.0,
                    ..default()
                },
                TextColor(subtitle_color()),
                ArchetypeDescription,
            ));

            spacer(root, 26.0);

            spawn_button(
                root,
                &font.0,
                "START",
                (start_bg(), start_border(), start_text()),
                MenuStartButton,
            );

            spacer(root, 12.0);

            spawn_button(
                root,
                &font.0,
                "LEADERBOARD",
                (back_bg(), back_border(), back_text()),
                MenuLeaderboardButton,
            );

            spacer(root, 12.0);

            spawn_button(
                root,
                &font.0,
                "QUIT",
                (quit_bg(), quit_border(), quit_text()),
                MenuQuitButton,
            );

            spacer(root, 36.0);

            root.spawn((
                Text::new("Arrows/WASD move  ·  Space shield  ·  Esc pause  ·  Q quits while paused"),
                TextFont {
                    font: font.0.clone(),
                    font_size: 12.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

/// Wide cycle button whose label child carries `markers.1` so it can be
/// rewritten when the selection changes.
fn spawn_selector<B: Component, L: Component>(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &Handle<Font>,
    label: String,
    markers: (B, L),
) {
    let (button, text_marker) = markers;
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(300.0),
                height: Val::Px(44.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(select_bg()),
            BorderColor::all(select_border()),
            button,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font: font.clone(),
                    font_size: 17.0,
                    ..default()
                },
                TextColor(select_text()),
                text_marker,
            ));
        });
}

fn difficulty_text(difficulty: Difficulty) -> String {
    format!("DIFFICULTY: {}", difficulty.label().to_uppercase())
}

fn archetype_text(id: ArchetypeId) -> String {
    format!("ROVER: {}", archetype(id).name.to_uppercase())
}

/// Spawn the main menu once the game font asset is loaded.
///
/// This prevents first-frame fallback text when entering `MainMenu` before
/// the font handle has finished loading.
pub(super) fn setup_main_menu_when_font_ready(
    commands: Commands,
    font: Res<GameFont>,
    difficulty: Res<SelectedDifficulty>,
    selected: Res<SelectedArchetype>,
    loaded_fonts: Res<Assets<Font>>,
    existing_menu: Query<Entity, With<MainMenuRoot>>,
) {
    if !existing_menu.is_empty() {
        return;
    }

    if !loaded_fonts.contains(font.0.id()) {
        return;
    }

    setup_main_menu(commands, font, difficulty, selected);
}

/// Recursively despawn all main-menu entities.
pub(super) fn cleanup_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Handle the selection and navigation buttons.
///
/// - **Difficulty / Rover** → cycle the selection in place.
/// - **Start** → transitions to [`GameState::Playing`].
/// - **Leaderboard** → transitions to [`GameState::Leaderboard`].
/// - **Quit** → sends [`AppExit`] to gracefully shut down.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub(super) fn menu_button_system(
    difficulty_query: Query<
        (&Interaction, &Children),
        (Changed<Interaction>, With<MenuDifficultyButton>),
    >,
    archetype_query: Query<
        (&Interaction, &Children),
        (Changed<Interaction>, With<MenuArchetypeButton>),
    >,
    start_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuStartButton>)>,
    board_query: Query<
        (&Interaction, &Children),
        (Changed<Interaction>, With<MenuLeaderboardButton>),
    >,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuQuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    mut difficulty: ResMut<SelectedDifficulty>,
    mut selected: ResMut<SelectedArchetype>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    for (interaction, children) in difficulty_query.iter() {
        if *interaction == Interaction::Pressed {
            difficulty.0 = difficulty.0.cycle();
        }
        tint_children(interaction, children, &mut btn_text, select_text());
    }

    for (interaction, children) in archetype_query.iter() {
        if *interaction == Interaction::Pressed {
            selected.0 = selected.0.cycle();
        }
        tint_children(interaction, children, &mut btn_text, select_text());
    }

    let wants_start = keys.just_pressed(KeyCode::Enter)
        || start_query.iter().any(|(i, _)| *i == Interaction::Pressed);
    if wants_start {
        info!("Starting run: {} / {}", difficulty.0, selected.0);
        next_state.set(GameState::Playing);
        return;
    }

    for (interaction, children) in start_query.iter() {
        tint_children(interaction, children, &mut btn_text, start_text());
    }

    for (interaction, children) in board_query.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(GameState::Leaderboard);
        }
        tint_children(interaction, children, &mut btn_text, back_text());
    }

    for (interaction, children) in quit_query.iter() {
        if *interaction == Interaction::Pressed {
            exit.write(bevy::app::AppExit::Success);
        }
        tint_children(interaction, children, &mut btn_text, quit_text());
    }
}

/// Rewrite the selector labels and blurb after a selection changes.
#[allow(clippy::type_complexity)]
pub(super) fn refresh_selection_labels(
    difficulty: Res<SelectedDifficulty>,
    selected: Res<SelectedArchetype>,
    mut labels: ParamSet<(
        Query<&mut Text, With<DifficultyLabel>>,
        Query<&mut Text, With<ArchetypeLabel>>,
        Query<&mut Text, With<ArchetypeDescription>>,
    )>,
) {
    if !difficulty.is_changed() && !selected.is_changed() {
        return;
    }
    for mut text in labels.p0().iter_mut() {
        **text = difficulty_text(difficulty.0);
    }
    for mut text in labels.p1().iter_mut() {
        **text = archetype_text(selected.0);
    }
    for mut text in labels.p2().iter_mut() {
        **text = archetype(selected.0).description.to_string();
    }
}
