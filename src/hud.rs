//! screen‑space overlay: stamina, lives, hotbar & timed messages
use bevy::prelude::*;

use crate::components::*;
use crate::constants::*;
use crate::player::Player;

const SLOT_COUNT: usize = 3 + MAX_BLOCK_SLOTS;
const SLOT_SIZE: f32 = 45.0;
const BAR_HEIGHT: f32 = 60.0;
const SLOT_BORDER: Color = Color::BLACK;
const SLOT_SELECTED: Color = Color::srgb(0.78, 0.78, 0.78);

/* ===========================================================
   timed messages
   =========================================================== */

/// transient banner; expires on its own, never pauses the game
#[derive(Resource)]
pub struct Notification {
    pub message: String,
    timer: Timer,
}

impl Default for Notification {
    fn default() -> Self {
        let mut timer = Timer::from_seconds(NOTIFY_SECS, TimerMode::Once);
        timer.tick(timer.duration());
        Self { message: String::new(), timer }
    }
}

impl Notification {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.timer.reset();
    }

    pub fn is_active(&self) -> bool {
        !self.timer.finished()
    }

    pub fn tick(&mut self, delta: std::time::Duration) {
        self.timer.tick(delta);
    }
}

/// present once lives hit zero; the app exits when it runs out
#[derive(Resource)]
pub struct GameOver {
    timer: Timer,
}

impl Default for GameOver {
    fn default() -> Self {
        Self { timer: Timer::from_seconds(GAME_OVER_SECS, TimerMode::Once) }
    }
}

/* ===========================================================
   startup
   =========================================================== */

pub fn spawn_hud_system(mut commands: Commands) {
    /* stamina bar */
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(35.0),
                width: Val::Px(200.0),
                height: Val::Px(10.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgb_u8(60, 60, 60)),
            BorderColor(Color::BLACK),
        ))
        .with_children(|bar| {
            bar.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::WHITE),
                StaminaFill,
            ));
        });

    /* hearts, right to left from x = 75 */
    for i in 0..MAX_LIVES {
        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(75.0 - i as f32 * 16.0),
                top: Val::Px(10.0),
                width: Val::Px(15.0),
                height: Val::Px(15.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.85, 0.1, 0.15)),
            LifeIcon(i),
        ));
    }

    /* hotbar */
    let bar_width = SLOT_SIZE * SLOT_COUNT as f32;
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px((VIEWPORT_WIDTH - bar_width) * 0.5),
                bottom: Val::Px(20.0),
                width: Val::Px(bar_width),
                height: Val::Px(BAR_HEIGHT),
                flex_direction: FlexDirection::Row,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        ))
        .with_children(|bar| {
            for i in 0..SLOT_COUNT {
                bar.spawn((
                    Node {
                        width: Val::Px(SLOT_SIZE),
                        height: Val::Percent(100.0),
                        border: UiRect::all(Val::Px(2.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BorderColor(SLOT_BORDER),
                    HotbarSlot(i),
                ))
                .with_children(|slot| {
                    slot.spawn((
                        Node {
                            width: Val::Px(20.0),
                            height: Val::Px(20.0),
                            ..default()
                        },
                        BackgroundColor(Color::NONE),
                        SlotIcon(i),
                    ));
                    slot.spawn((
                        Text::new(""),
                        TextFont { font_size: 16.0, ..default() },
                        TextColor(Color::WHITE),
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(2.0),
                            top: Val::Px(2.0),
                            ..default()
                        },
                        SlotCount(i),
                    ));
                });
            }
        });

    /* banners */
    commands.spawn((
        Text::new(""),
        TextFont { font_size: 20.0, ..default() },
        TextColor(Color::srgb(1.0, 0.0, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(VIEWPORT_WIDTH * 0.5 - 60.0),
            top: Val::Px(440.0),
            ..default()
        },
        Visibility::Hidden,
        NotificationText,
    ));
    commands.spawn((
        Text::new("Game Over"),
        TextFont { font_size: 50.0, ..default() },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(VIEWPORT_WIDTH * 0.5 - 110.0),
            top: Val::Px(VIEWPORT_HEIGHT * 0.5 - 30.0),
            ..default()
        },
        Visibility::Hidden,
        GameOverText,
    ));
}

/* ===========================================================
   per‑frame
   =========================================================== */

pub fn stamina_bar_system(
    player_q: Query<&Player>,
    mut fill_q: Query<&mut Node, With<StaminaFill>>,
) {
    let Ok(player) = player_q.get_single() else { return };
    for mut node in &mut fill_q {
        node.width = Val::Percent(player.stamina / MAX_STAMINA * 100.0);
    }
}

pub fn lives_system(player_q: Query<&Player>, mut q: Query<(&LifeIcon, &mut Visibility)>) {
    let Ok(player) = player_q.get_single() else { return };
    for (icon, mut vis) in &mut q {
        *vis = if icon.0 < player.lives { Visibility::Inherited } else { Visibility::Hidden };
    }
}

pub fn hotbar_system(
    player_q: Query<&Player>,
    mut slot_q: Query<(&HotbarSlot, &mut BorderColor)>,
    mut icon_q: Query<(&SlotIcon, &mut BackgroundColor)>,
    mut count_q: Query<(&SlotCount, &mut Text)>,
) {
    let Ok(player) = player_q.get_single() else { return };
    let inv = &player.inventory;
    let tools = inv.tools().len();
    let selected = inv.hotbar_index();

    for (slot, mut border) in &mut slot_q {
        border.0 = if slot.0 == selected { SLOT_SELECTED } else { SLOT_BORDER };
    }
    for (icon, mut bg) in &mut icon_q {
        bg.0 = if let Some(tool) = inv.tools().get(icon.0) {
            tool.color()
        } else if let Some((kind, _)) = inv.blocks().get(icon.0 - tools) {
            let rgb = kind.base_rgb();
            Color::srgb(rgb.x, rgb.y, rgb.z)
        } else {
            Color::NONE
        };
    }
    for (count, mut text) in &mut count_q {
        let n = count.0.checked_sub(tools).and_then(|i| inv.blocks().get(i));
        text.0 = n.map(|(_, n)| n.to_string()).unwrap_or_default();
    }
}

pub fn notification_system(
    time: Res<Time>,
    mut notification: ResMut<Notification>,
    mut q: Query<(&mut Text, &mut Visibility), With<NotificationText>>,
) {
    notification.tick(time.delta());
    let Ok((mut text, mut vis)) = q.get_single_mut() else { return };
    if notification.is_active() {
        if text.0 != notification.message {
            text.0 = notification.message.clone();
        }
        *vis = Visibility::Inherited;
    } else {
        *vis = Visibility::Hidden;
    }
}

/// show the banner, then leave once it expires
pub fn game_over_system(
    time: Res<Time>,
    mut game_over: ResMut<GameOver>,
    mut text_q: Query<&mut Visibility, With<GameOverText>>,
    mut exit: EventWriter<AppExit>,
) {
    for mut vis in &mut text_q {
        *vis = Visibility::Inherited;
    }
    if game_over.timer.tick(time.delta()).just_finished() {
        info!("exiting after game over");
        exit.send(AppExit::Success);
    }
}

/// window close is handled by Bevy; Escape quits too
pub fn quit_system(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}
