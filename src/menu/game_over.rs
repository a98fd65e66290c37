use super::*;

/// Keys accepted by the name field and the character each one types.
const NAME_KEYS: [(KeyCode, char); 38] = [
    (KeyCode::KeyA, 'A'),
    (KeyCode::KeyB, 'B'),
    (KeyCode::KeyC, 'C'),
    (KeyCode::KeyD, 'D'),
    (KeyCode::KeyE, 'E'),
    (KeyCode::KeyF, 'F'),
    (KeyCode::KeyG, 'G'),
    (KeyCode::KeyH, 'H'),
    (KeyCode::KeyI, 'I'),
    (KeyCode::KeyJ, 'J'),
    (KeyCode::KeyK, 'K'),
    (KeyCode::KeyL, 'L'),
    (KeyCode::KeyM, 'M'),
    (KeyCode::KeyN, 'N'),
    (KeyCode::KeyO, 'O'),
    (KeyCode::KeyP, 'P'),
    (KeyCode::KeyQ, 'Q'),
    (KeyCode::KeyR, 'R'),
    (KeyCode::KeyS, 'S'),
    (KeyCode::KeyT, 'T'),
    (KeyCode::KeyU, 'U'),
    (KeyCode::KeyV, 'V'),
    (KeyCode::KeyW, 'W'),
    (KeyCode::KeyX, 'X'),
    (KeyCode::KeyY, 'Y'),
    (KeyCode::KeyZ, 'Z'),
    (KeyCode::Digit0, '0'),
    (KeyCode::Digit1, '1'),
    (KeyCode::Digit2, '2'),
    (KeyCode::Digit3, '3'),
    (KeyCode::Digit4, '4'),
    (KeyCode::Digit5, '5'),
    (KeyCode::Digit6, '6'),
    (KeyCode::Digit7, '7'),
    (KeyCode::Digit8, '8'),
    (KeyCode::Digit9, '9'),
    (KeyCode::Space, ' '),
    (KeyCode::Minus, '_'),
];

/// Spawn the game-over overlay centred over the frozen run.
///
/// Shows the cause of failure and final score, a name field, and
/// "SUBMIT" / "SKIP" buttons.  Both lead to the leaderboard.
pub(super) fn setup_game_over(
    mut commands: Commands,
    session: Res<RoverSession>,
    font: Res<GameFont>,
    mut entry: ResMut<NameEntry>,
) {
    *entry = NameEntry::default();
    let (score, caption) = session
        .game
        .as_ref()
        .map(|game| {
            let caption = game
                .rover
                .crash_cause
                .map(|cause| cause.caption())
                .unwrap_or("MISSION LOST");
            (game.score, caption)
        })
        .unwrap_or((0, "MISSION LOST"));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.72)),
            ZIndex(300),
            GameOverRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(32.0)),
                        row_gap: Val::Px(12.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(340.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.06, 0.02, 0.02)),
                    BorderColor::all(Color::srgb(0.55, 0.10, 0.10)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("GAME OVER"),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 42.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.22, 0.22)),
                    ));

                    card.spawn((
                        Text::new(caption),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(subtitle_color()),
                    ));

                    card.spawn((
                        Text::new(format!("Score: {score}")),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(highlight_text()),
                    ));

                    spacer(card, 4.0);

                    card.spawn((
                        Text::new("ENTER NAME"),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(hint_color()),
                    ));

                    card.spawn((
                        Node {
                            width: Val::Px(260.0),
                            height: Val::Px(40.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BackgroundColor(select_bg()),
                        BorderColor::all(select_border()),
                    ))
                    .with_children(|field| {
                        field.spawn((
                            Text::new("_"),
                            TextFont {
                                font: font.0.clone(),
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(select_text()),
                            NameValueText,
                        ));
                    });

                    card.spawn((
                        Text::new(""),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(error_text()),
                        NameErrorText,
                    ));

                    spawn_button(
                        card,
                        &font.0,
                        "SUBMIT",
                        (start_bg(), start_border(), start_text()),
                        GameOverSubmitButton,
                    );

                    spawn_button(
                        card,
                        &font.0,
                        "SKIP",
                        (back_bg(), back_border(), back_text()),
                        GameOverSkipButton,
                    );

                    spacer(card, 4.0);

                    card.spawn((
                        Text::new("3-10 letters, digits, space or _  ·  Enter to submit"),
                        TextFont {
                            font: font.0.clone(),
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(hint_color()),
                    ));
                });
        });
}

/// Recursively despawn all game-over overlay entities.
pub(super) fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Apply this frame's key presses to a name buffer.
///
/// Returns `true` when the buffer changed.  Input past the maximum name
/// length is dropped so validation only ever has to reject short names or
/// stray characters.
pub fn edit_name(keys: &ButtonInput<KeyCode>, buffer: &mut String) -> bool {
    let before = buffer.clone();
    if keys.just_pressed(KeyCode::Backspace) {
        buffer.pop();
    }
    for (key, ch) in NAME_KEYS {
        if keys.just_pressed(key) && buffer.chars().count() < NAME_MAX_LEN {
            buffer.push(ch);
        }
    }
    *buffer != before
}

pub(super) fn name_input_system(keys: Res<ButtonInput<KeyCode>>, mut entry: ResMut<NameEntry>) {
    if edit_name(&keys, &mut entry.buffer) {
        entry.error = None;
    }
}

pub(super) fn name_display_system(
    entry: Res<NameEntry>,
    mut value: Query<&mut Text, (With<NameValueText>, Without<NameErrorText>)>,
    mut error: Query<&mut Text, (With<NameErrorText>, Without<NameValueText>)>,
) {
    if !entry.is_changed() {
        return;
    }
    for mut text in value.iter_mut() {
        **text = format!("{}_", entry.buffer);
    }
    for mut text in error.iter_mut() {
        **text = entry.error.clone().unwrap_or_default();
    }
}

/// Handle Submit / Skip in the game-over overlay.
///
/// An invalid name keeps the overlay open with the reason shown inline.  A
/// valid name is written through [`ScoreBoard`]; storage failures are logged
/// by the leaderboard and never block the transition.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub(super) fn game_over_button_system(
    submit_query: Query<
        (&Interaction, &Children),
        (Changed<Interaction>, With<GameOverSubmitButton>),
    >,
    skip_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<GameOverSkipButton>)>,
    mut btn_text: Query<&mut TextColor>,
    mut next_state: ResMut<NextState<GameState>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut entry: ResMut<NameEntry>,
    mut session: ResMut<RoverSession>,
    mut board: ResMut<ScoreBoard>,
    mut last: ResMut<LastSubmission>,
) {
    let wants_submit = keys.just_pressed(KeyCode::Enter)
        || submit_query.iter().any(|(i, _)| *i == Interaction::Pressed);

    if wants_submit {
        let Some(game) = session.game.as_mut() else {
            next_state.set(GameState::Leaderboard);
            return;
        };
        match game.submit_score(&entry.buffer, board.store.as_mut(), current_unix_timestamp()) {
            Ok(entries) => {
                let name = entry.buffer.trim();
                last.0 = entries
                    .into_iter()
                    .find(|e| e.name == name && e.score == game.score);
                next_state.set(GameState::Leaderboard);
            }
            Err(err) => {
                debug!("Rejected leaderboard name: {err}");
                entry.error = Some(err.to_string());
            }
        }
        return;
    }

    for (interaction, children) in submit_query.iter() {
        tint_children(interaction, children, &mut btn_text, start_text());
    }

    for (interaction, children) in skip_query.iter() {
        if *interaction == Interaction::Pressed {
            last.0 = None;
            next_state.set(GameState::Leaderboard);
        }
        tint_children(interaction, children, &mut btn_text, back_text());
    }
}
