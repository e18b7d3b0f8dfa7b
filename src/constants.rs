use bevy::prelude::*;

/// -------- tiles & world size --------
pub const TILE_SIZE: f32       = 32.0;
pub const WORLD_WIDTH: usize   = 200;
pub const WORLD_HEIGHT: usize  = 200;
pub const RENDER_DISTANCE: i32 = 25;

/// -------- window --------
pub const VIEWPORT_WIDTH: f32  = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// -------- terrain generation --------
pub const TREE_CHANCE: f64        = 0.15;
pub const FLOWER_CHANCE: f64      = 0.08;
pub const BOMB_CHANCE: f64        = 0.15;
pub const SHALLOW_STONE_CHANCE: f64 = 0.8;
pub const GEM_CHANCE: f64         = 0.05;
pub const COBBLE_CHANCE: f64      = 0.40; // cumulative
pub const GRANITE_CHANCE: f64     = 0.70; // cumulative
/// keeps trunk (3) + canopy (2) above the surface inside the grid
pub const CLIFF_FLOOR: i32        = 5;
/// rows kept below the surface for the dirt/stone bands
pub const CLIFF_CEILING_MARGIN: i32 = 9;

/// -------- interaction reach (tiles) --------
pub const REACH_X: i32 = 2;
pub const REACH_Y: i32 = 3;

/// -------- player phys (per 60 Hz tick, pixels) --------
pub const PLAYER_SIZE: f32      = 32.0;
pub const GRAVITY: f32          = 0.5;
pub const TERMINAL_VELOCITY: f32 = 10.0;
pub const JUMP_SPEED: f32       = 10.0;
pub const WALK_SPEED: f32       = 3.0;
pub const SPRINT_SPEED: f32     = 10.0;
pub const TICK_HZ: f64          = 60.0;

/// -------- stamina --------
pub const MAX_STAMINA: f32      = 100.0;
pub const STAMINA_DRAIN: f32    = 1.0;
pub const STAMINA_REGEN: f32    = 0.5;
/// sprinting needs more than this share of MAX_STAMINA
pub const SPRINT_MIN_RATIO: f32 = 0.3;

/// -------- health --------
pub const MAX_LIVES: u32             = 5;
pub const FALL_DAMAGE_THRESHOLD: f32 = 7.0;
pub const NOTIFY_SECS: f32           = 1.0;
pub const GAME_OVER_SECS: f32        = 1.0;

/// -------- inventory --------
pub const MAX_BLOCK_SLOTS: usize = 7;

/// -------- sky --------
pub const DAY_LENGTH_SECS: f32 = 60.0;
pub const DAY_RGB: [u8; 3]     = [135, 206, 235];
pub const NIGHT_RGB: [u8; 3]   = [25, 25, 112];
pub const CLOUD_COUNT: usize   = 5;
pub const CLOUD_COLOR: Color   = Color::srgba(1.0, 1.0, 1.0, 0.85);

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64   = 0.05;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;

/// seed override for reproducible worlds
pub const SEED_ENV_VAR: &str = "BLOCK_MINE_SEED";
