//! run‑time tile rendering: window streaming, pooling & redraws
//!
//! Only cells inside the square render window around the player own a
//! sprite. Sprites leaving the window are hidden and pooled; cells the
//! world reports as changed are re‑tinted, hidden or spawned.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use std::collections::HashMap;

use crate::block::Tile;
use crate::components::TileSprite;
use crate::constants::*;
use crate::player::Player;
use crate::terrain::Terrain;

/// grid window that currently owns sprites (inclusive)
#[derive(Resource, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActiveRect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl ActiveRect {
    pub fn around(center: IVec2, radius: i32) -> Self {
        Self {
            min_x: center.x - radius,
            max_x: center.x + radius,
            min_y: center.y - radius,
            max_y: center.y + radius,
        }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new((self.min_x + self.max_x) / 2, (self.min_y + self.max_y) / 2)
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

#[derive(Resource, Default)]
pub struct LastRect(pub Option<ActiveRect>);

/// grid cell → sprite, plus the pool of hidden sprites
#[derive(Resource)]
pub struct TileSprites {
    pub entities: HashMap<IVec2, Entity>,
    pub free: Vec<Entity>,
    pub color_noise: Perlin,
}

impl TileSprites {
    pub fn new(seed: u32) -> Self {
        Self {
            entities: HashMap::new(),
            free: Vec::new(),
            color_noise: Perlin::new(seed),
        }
    }

    /// block colour with quantised per‑cell variation
    pub fn color(&self, tile: &Tile) -> Color {
        let raw = self.color_noise.get([
            tile.pos.x as f64 * COLOR_NOISE_SCALE,
            tile.pos.y as f64 * COLOR_NOISE_SCALE,
        ]) as f32;

        /* bucket‑based colour banding (for pixel‑arty look) */
        let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
            .floor()
            .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
        let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
        let factor = 1.0 + norm * COLOR_VARIATION_STRENGTH;

        let rgb = tile.kind.base_rgb() * factor;
        Color::srgb(rgb.x.clamp(0.0, 1.0), rgb.y.clamp(0.0, 1.0), rgb.z.clamp(0.0, 1.0))
    }

    fn recycle(&mut self, commands: &mut Commands, pos: IVec2) {
        if let Some(e) = self.entities.remove(&pos) {
            commands.entity(e).insert(Visibility::Hidden);
            self.free.push(e);
        }
    }
}

/// Bevy translation of a tile's centre
#[inline]
fn tile_translation(pos: IVec2) -> Vec3 {
    let c = pos.as_vec2() * TILE_SIZE + Vec2::splat(TILE_SIZE * 0.5);
    Vec3::new(c.x, -c.y, 0.0)
}

fn tile_bundle(sprites: &TileSprites, tile: &Tile) -> (Visibility, Sprite, Transform, TileSprite) {
    (
        Visibility::Visible,
        Sprite::from_color(sprites.color(tile), Vec2::splat(TILE_SIZE)),
        Transform::from_translation(tile_translation(tile.pos)),
        TileSprite,
    )
}

/// give `tile` a sprite (pooled if possible), or re‑tint the one it has
fn show_tile(commands: &mut Commands, sprites: &mut TileSprites, tile: &Tile) {
    let bundle = tile_bundle(sprites, tile);
    if let Some(&e) = sprites.entities.get(&tile.pos) {
        commands.entity(e).insert(bundle);
        return;
    }
    let e = match sprites.free.pop() {
        Some(e) => {
            commands.entity(e).insert(bundle);
            e
        }
        None => commands.spawn(bundle).id(),
    };
    sprites.entities.insert(tile.pos, e);
}

#[inline]
fn ensure_sprite(commands: &mut Commands, sprites: &mut TileSprites, terrain: &Terrain, pos: IVec2) {
    if sprites.entities.contains_key(&pos) {
        return;
    }
    if let Some(tile) = terrain.tile_at(pos) {
        show_tile(commands, sprites, tile);
    }
}

/* ===========================================================
   update_active_rect_system
   =========================================================== */
pub fn update_active_rect_system(
    player_q: Query<&Player>,
    terrain: Res<Terrain>,
    rect_res: Option<ResMut<ActiveRect>>,
    mut commands: Commands,
) {
    let Ok(player) = player_q.get_single() else { return };
    let new = ActiveRect::around(player.grid_pos(), terrain.render_distance);

    match rect_res {
        Some(mut r) if *r != new => *r = new,
        None => commands.insert_resource(new),
        _ => {}
    }
}

/* ===========================================================
   stream_tiles_system – stripe differencing + pooling
   =========================================================== */
pub fn stream_tiles_system(
    mut commands: Commands,
    terrain: Res<Terrain>,
    mut sprites: ResMut<TileSprites>,
    rect: Res<ActiveRect>,
    mut last_rect: ResMut<LastRect>,
) {
    let new = *rect;
    if last_rect.0 == Some(new) {
        return;
    }

    /* initial fill ------------------------------------------------------- */
    let Some(prev) = last_rect.0 else {
        for tile in terrain.tiles_near(new.center()) {
            show_tile(&mut commands, &mut sprites, tile);
        }
        last_rect.0 = Some(new);
        return;
    };

    /* cells leaving view (re‑pool) --------------------------------------- */
    for y in prev.min_y..=prev.max_y {
        for x in prev.min_x..=prev.max_x {
            let p = IVec2::new(x, y);
            if !new.contains(p) {
                sprites.recycle(&mut commands, p);
            }
        }
    }

    /* cells entering view ------------------------------------------------- */
    for y in new.min_y..=new.max_y {
        for x in new.min_x..=new.max_x {
            let p = IVec2::new(x, y);
            if !prev.contains(p) {
                ensure_sprite(&mut commands, &mut sprites, &terrain, p);
            }
        }
    }

    last_rect.0 = Some(new);
}

/* ===========================================================
   redraw_changed_tiles_system
   =========================================================== */
pub fn redraw_changed_tiles_system(
    mut commands: Commands,
    mut terrain: ResMut<Terrain>,
    mut sprites: ResMut<TileSprites>,
    rect: Res<ActiveRect>,
) {
    // drain the entire queue once
    let changed: Vec<IVec2> = terrain.changed_tiles.drain(..).collect();
    for pos in changed {
        match terrain.tile_at(pos) {
            Some(tile) if rect.contains(pos) => show_tile(&mut commands, &mut sprites, tile),
            _ => sprites.recycle(&mut commands, pos),
        }
    }
}
