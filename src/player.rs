//! player movement, collision, damage & the systems that drive them

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::block::{BlockType, HeldItem, Tile};
use crate::camera::GameCamera;
use crate::components::HeldItemSprite;
use crate::constants::*;
use crate::hud::{GameOver, Notification};
use crate::inventory::Inventory;
use crate::terrain::Terrain;

/// keys held during one tick
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    /// 1‑based hotbar slot
    pub slot: Option<usize>,
}

impl PlayerInput {
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        const DIGITS: [KeyCode; 9] = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        Self {
            left: keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
            right: keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
            jump: keys.any_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]),
            sprint: keys.pressed(KeyCode::ShiftLeft),
            slot: DIGITS.iter().position(|k| keys.pressed(*k)).map(|i| i + 1),
        }
    }
}

/// what happened to the player during one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub damage: u32,
    pub landed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Component, Clone, Debug)]
pub struct Player {
    /// top‑left corner, world pixels, y‑down
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub stamina: f32,
    pub inventory: Inventory,
    pub is_falling: bool,
    /// tiles fallen since leaving the ground
    pub fall_distance: f32,
    pub lives: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            velocity: Vec2::ZERO,
            stamina: MAX_STAMINA,
            inventory: Inventory::default(),
            is_falling: false,
            fall_distance: 0.0,
            lives: MAX_LIVES,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.pos, self.pos + self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// grid cell under the player's centre
    pub fn grid_pos(&self) -> IVec2 {
        (self.center() / TILE_SIZE).floor().as_ivec2()
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// probe one pixel below for any tile
    pub fn is_on_ground(&self, terrain: &Terrain) -> bool {
        let mut probe = self.rect();
        probe.min.y += 1.0;
        probe.max.y += 1.0;
        terrain.any_overlap(probe)
    }

    pub fn take_damage(&mut self, report: &mut TickReport) {
        self.lives = self.lives.saturating_sub(1);
        report.damage += 1;
    }

    /* ---------- tick ---------- */

    pub fn update(&mut self, input: &PlayerInput, terrain: &mut Terrain) -> TickReport {
        let mut report = TickReport::default();

        /* ---- horizontal intent & stamina ---- */
        // left wins when both are held
        let dir = if input.left {
            -1.0
        } else if input.right {
            1.0
        } else {
            0.0
        };
        let sprinting =
            input.sprint && dir != 0.0 && self.stamina > MAX_STAMINA * SPRINT_MIN_RATIO;
        if sprinting {
            self.stamina -= STAMINA_DRAIN;
        } else {
            self.stamina += STAMINA_REGEN;
        }
        self.stamina = self.stamina.clamp(0.0, MAX_STAMINA);
        self.velocity.x = dir * if sprinting { SPRINT_SPEED } else { WALK_SPEED };

        /* ---- jump & gravity ---- */
        if input.jump && self.is_on_ground(terrain) {
            self.velocity.y = -JUMP_SPEED;
        }
        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);

        /* ---- axis‑separated integration ---- */
        self.pos.x += self.velocity.x;
        self.resolve(Axis::X, terrain, &mut report);
        self.pos.y += self.velocity.y;
        self.resolve(Axis::Y, terrain, &mut report);

        if let Some(slot) = input.slot {
            self.inventory.select_slot(slot);
        }

        /* ---- falling state ---- */
        if self.is_on_ground(terrain) {
            self.is_falling = false;
            self.fall_distance = 0.0;
        } else if !self.is_falling {
            self.is_falling = true;
            self.fall_distance = 0.0;
        } else if self.velocity.y > 0.0 {
            self.fall_distance += self.velocity.y / TILE_SIZE;
        }

        report
    }

    /// push out of every solid tile the box overlaps along `axis`
    fn resolve(&mut self, axis: Axis, terrain: &mut Terrain, report: &mut TickReport) {
        for tile in terrain.overlapping(self.rect()) {
            if tile.kind.is_solid() {
                // first contact at the spawn row never counts as a fall
                if self.pos.y == 0.0 {
                    self.is_falling = false;
                    self.fall_distance = 0.0;
                }
                match axis {
                    Axis::X => self.push_out_x(&tile),
                    Axis::Y => self.push_out_y(&tile, report),
                }
            }

            if tile.kind == BlockType::Bomb {
                self.take_damage(report);
                terrain.remove(tile.pos);
            }
        }
    }

    fn push_out_x(&mut self, tile: &Tile) {
        let r = tile.rect();
        if self.velocity.x > 0.0 {
            self.pos.x = r.min.x - self.size.x;
        } else if self.velocity.x < 0.0 {
            self.pos.x = r.max.x;
        }
        self.velocity.x = 0.0;
    }

    fn push_out_y(&mut self, tile: &Tile, report: &mut TickReport) {
        let r = tile.rect();
        if self.velocity.y > 0.0 {
            if self.is_falling {
                // stepped terrain: the raw gap can exceed the tracked fall
                let gap = (self.bottom() - r.min.y).abs() / TILE_SIZE;
                if self.fall_distance.max(gap) > FALL_DAMAGE_THRESHOLD {
                    self.take_damage(report);
                }
                self.fall_distance = 0.0;
            }
            self.pos.y = r.min.y - self.size.y;
            self.velocity.y = 0.0;
            self.is_falling = false;
            report.landed = true;
        } else if self.velocity.y < 0.0 {
            self.pos.y = r.max.y;
            self.velocity.y = 0.0;
        }
    }
}

/* ===========================================================
   systems
   =========================================================== */

/// fixed‑rate movement tick
pub fn player_update_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<&mut Player>,
    mut terrain: ResMut<Terrain>,
    mut notification: ResMut<Notification>,
) {
    let Ok(mut player) = q.get_single_mut() else { return };
    let input = PlayerInput::from_keys(&keys);
    let report = player.update(&input, &mut terrain);

    if report.damage == 0 {
        return;
    }
    info!("took {} damage, {} lives left", report.damage, player.lives);
    if player.is_alive() {
        notification.show("One Life Lost");
    } else {
        info!("game over");
        commands.insert_resource(GameOver::default());
    }
}

/// LMB mines with the selection, RMB mines bare‑handed then places
pub fn block_click_system(
    mouse: Res<ButtonInput<MouseButton>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    camera: Res<GameCamera>,
    mut terrain: ResMut<Terrain>,
    mut q: Query<&mut Player>,
) {
    let Ok(window) = window_q.get_single() else { return };
    let Some(cursor) = window.cursor_position() else { return };
    let Ok(mut player) = q.get_single_mut() else { return };

    for button in [MouseButton::Left, MouseButton::Right] {
        if !mouse.just_pressed(button) {
            continue;
        }
        let held = player.inventory.held();
        if button == MouseButton::Right && matches!(held, HeldItem::Tool(_)) {
            continue;
        }
        let (broke, placed) = terrain.handle_click(&mut player, &camera, cursor, held, button);
        debug!("{button:?} click at {cursor}: {broke:?} {placed:?}");
    }
}

/// mirror the player into Bevy space & paint the held item
pub fn sync_player_sprite_system(
    mut q: Query<(&Player, &mut Transform)>,
    mut held_q: Query<&mut Sprite, With<HeldItemSprite>>,
) {
    let Ok((player, mut tf)) = q.get_single_mut() else { return };
    let center = player.center();
    tf.translation.x = center.x;
    tf.translation.y = -center.y;

    if let Ok(mut sprite) = held_q.get_single_mut() {
        sprite.color = match player.inventory.held() {
            HeldItem::Tool(tool) => tool.color(),
            HeldItem::Block(kind) => {
                let rgb = kind.base_rgb();
                Color::srgb(rgb.x, rgb.y, rgb.z)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Selection;

    /// ground row at grid y = 1 from x = -8..8, player standing at (0, 0)
    fn flat() -> (Terrain, Player) {
        let mut terrain = Terrain::empty(16, 16);
        for x in -8..8 {
            terrain.insert(Tile::new(IVec2::new(x, 1), BlockType::Grass));
        }
        (terrain, Player::new(Vec2::ZERO))
    }

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    #[test]
    fn standing_still_stays_grounded() {
        let (mut terrain, mut player) = flat();
        assert!(player.is_on_ground(&terrain));
        for _ in 0..10 {
            player.update(&idle(), &mut terrain);
        }
        assert_eq!(player.pos, Vec2::ZERO);
        assert!(!player.is_falling);
    }

    #[test]
    fn jump_arc_lands_without_damage() {
        let (mut terrain, mut player) = flat();
        let jump = PlayerInput { jump: true, ..default() };
        player.update(&jump, &mut terrain);
        assert!(player.velocity.y < 0.0);
        assert!(player.is_falling);

        let mut apex = 0.0_f32;
        for _ in 0..60 {
            player.update(&idle(), &mut terrain);
            apex = apex.min(player.pos.y);
        }
        assert!(apex < -64.0, "jump should clear two tiles, apex {apex}");
        assert!(!player.is_falling);
        assert_eq!(player.fall_distance, 0.0);
        assert_eq!(player.lives, MAX_LIVES);
        assert_eq!(player.pos.y, 0.0);
    }

    #[test]
    fn no_jump_while_airborne() {
        let mut terrain = Terrain::empty(4, 4);
        let mut player = Player::new(Vec2::new(0.0, -200.0));
        player.update(&PlayerInput { jump: true, ..default() }, &mut terrain);
        assert_eq!(player.velocity.y, GRAVITY);
    }

    #[test]
    fn gravity_caps_at_terminal_velocity() {
        let mut terrain = Terrain::empty(4, 4);
        let mut player = Player::new(Vec2::new(0.0, -2000.0));
        for _ in 0..50 {
            player.update(&idle(), &mut terrain);
        }
        assert_eq!(player.velocity.y, TERMINAL_VELOCITY);
        assert!(player.fall_distance > 0.0);
    }

    fn drop_onto_ground(fall_distance: f32) -> (Player, TickReport) {
        let (mut terrain, mut player) = flat();
        player.pos.y = -1.0;
        player.velocity.y = 3.0;
        player.is_falling = true;
        player.fall_distance = fall_distance;
        let report = player.update(&idle(), &mut terrain);
        (player, report)
    }

    #[test]
    fn fall_at_threshold_is_safe() {
        let (player, report) = drop_onto_ground(FALL_DAMAGE_THRESHOLD);
        assert!(report.landed);
        assert_eq!(report.damage, 0);
        assert_eq!(player.lives, MAX_LIVES);
        assert_eq!(player.pos.y, 0.0);
        assert!(!player.is_falling);
    }

    #[test]
    fn fall_past_threshold_costs_one_life() {
        let (player, report) = drop_onto_ground(FALL_DAMAGE_THRESHOLD + 0.01);
        assert_eq!(report.damage, 1);
        assert_eq!(player.lives, MAX_LIVES - 1);
        assert_eq!(player.fall_distance, 0.0);
    }

    /// long fall ending in a solid tile at `row`, one tick from contact
    fn long_fall_into_row(row: i32, start_y: f32) -> (Player, TickReport) {
        let mut terrain = Terrain::empty(4, 4);
        terrain.insert(Tile::new(IVec2::new(0, row), BlockType::Grass));
        let mut player = Player::new(Vec2::new(0.0, start_y));
        player.velocity.y = 2.5;
        player.is_falling = true;
        player.fall_distance = 20.0;
        let report = player.update(&idle(), &mut terrain);
        (player, report)
    }

    #[test]
    fn contact_at_origin_row_skips_fall_damage() {
        // gravity brings vy to 3.0, so the top edge lands exactly on y = 0
        let (player, report) = long_fall_into_row(0, -3.0);
        assert_eq!(report.damage, 0);
        assert_eq!(player.lives, MAX_LIVES);
        assert_eq!(player.pos.y, -32.0);
        assert!(!player.is_falling);
        assert_eq!(player.fall_distance, 0.0);
    }

    #[test]
    fn same_fall_below_origin_row_hurts() {
        let (player, report) = long_fall_into_row(1, -1.0);
        assert_eq!(report.damage, 1);
        assert_eq!(player.lives, MAX_LIVES - 1);
        assert_eq!(player.pos.y, 0.0);
    }

    #[test]
    fn long_drop_hurts_once() {
        let (mut terrain, _) = flat();
        let mut player = Player::new(Vec2::new(0.0, -32.0 * 12.0));
        let mut damage = 0;
        for _ in 0..120 {
            damage += player.update(&idle(), &mut terrain).damage;
        }
        assert_eq!(damage, 1);
        assert_eq!(player.lives, MAX_LIVES - 1);
        assert_eq!(player.pos.y, 0.0);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let (mut terrain, mut player) = flat();
        terrain.insert(Tile::new(IVec2::new(1, 0), BlockType::Cobblestone));
        let right = PlayerInput { right: true, ..default() };
        player.update(&right, &mut terrain);
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.velocity.x, 0.0);

        let left = PlayerInput { left: true, ..default() };
        player.update(&left, &mut terrain);
        assert_eq!(player.pos.x, -WALK_SPEED);
    }

    #[test]
    fn ceiling_stops_jump() {
        let (mut terrain, mut player) = flat();
        terrain.insert(Tile::new(IVec2::new(0, -2), BlockType::Dirt));
        player.update(&PlayerInput { jump: true, ..default() }, &mut terrain);
        player.update(&idle(), &mut terrain);
        player.update(&idle(), &mut terrain);
        player.update(&idle(), &mut terrain);
        assert_eq!(player.pos.y, -32.0);
        assert!(player.velocity.y >= 0.0);
    }

    #[test]
    fn flowers_do_not_block() {
        let (mut terrain, mut player) = flat();
        terrain.insert(Tile::new(IVec2::new(1, 0), BlockType::Flower2));
        player.update(&PlayerInput { right: true, ..default() }, &mut terrain);
        assert_eq!(player.pos.x, WALK_SPEED);
        assert!(terrain.tile_at(IVec2::new(1, 0)).is_some());
    }

    #[test]
    fn bomb_contact_hurts_and_detonates() {
        let (mut terrain, mut player) = flat();
        terrain.insert(Tile::new(IVec2::new(1, 0), BlockType::Bomb));
        let report = player.update(&PlayerInput { right: true, ..default() }, &mut terrain);
        assert_eq!(report.damage, 1);
        assert_eq!(player.lives, MAX_LIVES - 1);
        assert!(terrain.tile_at(IVec2::new(1, 0)).is_none());
        assert_eq!(player.pos.x, WALK_SPEED);
    }

    #[test]
    fn sprint_drains_then_walk_regens() {
        let (mut terrain, mut player) = flat();
        let sprint = PlayerInput { right: true, sprint: true, ..default() };
        player.update(&sprint, &mut terrain);
        assert_eq!(player.velocity.x, SPRINT_SPEED);
        assert_eq!(player.stamina, MAX_STAMINA - STAMINA_DRAIN);

        player.stamina = MAX_STAMINA * SPRINT_MIN_RATIO;
        player.update(&sprint, &mut terrain);
        assert_eq!(player.velocity.x, WALK_SPEED);
        assert_eq!(player.stamina, MAX_STAMINA * SPRINT_MIN_RATIO + STAMINA_REGEN);

        player.stamina = MAX_STAMINA;
        player.update(&idle(), &mut terrain);
        assert_eq!(player.stamina, MAX_STAMINA);
    }

    #[test]
    fn sprint_without_direction_does_not_drain() {
        let (mut terrain, mut player) = flat();
        player.stamina = 50.0;
        player.update(&PlayerInput { sprint: true, ..default() }, &mut terrain);
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.stamina, 50.0 + STAMINA_REGEN);
    }

    #[test]
    fn left_wins_over_right() {
        let (mut terrain, mut player) = flat();
        player.update(&PlayerInput { left: true, right: true, ..default() }, &mut terrain);
        assert_eq!(player.velocity.x, -WALK_SPEED);
        assert_eq!(player.pos.x, -WALK_SPEED);
    }

    #[test]
    fn hotkeys_switch_selection() {
        let (mut terrain, mut player) = flat();
        player.inventory.add_block(BlockType::Wood, 2);
        player.update(&PlayerInput { slot: Some(4), ..default() }, &mut terrain);
        assert_eq!(player.inventory.selection(), Selection::Block(BlockType::Wood));
        player.update(&PlayerInput { slot: Some(7), ..default() }, &mut terrain);
        assert_eq!(player.inventory.selection(), Selection::Tool(0));
    }

    #[test]
    fn grid_pos_uses_centre() {
        let player = Player::new(Vec2::new(-40.0, 20.0));
        assert_eq!(player.grid_pos(), IVec2::new(-1, 1));
    }

    #[test]
    fn losing_last_life_starts_game_over() {
        let mut app = App::new();
        let (mut terrain, mut player) = flat();
        terrain.insert(Tile::new(IVec2::new(0, 0), BlockType::Bomb));
        player.lives = 1;
        app.insert_resource(terrain);
        app.insert_resource(Notification::default());
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.world_mut().spawn(player);
        app.add_systems(Update, player_update_system);

        app.update();

        assert!(app.world().get_resource::<GameOver>().is_some());
        assert!(!app.world().resource::<Notification>().is_active());
    }
}
