//! world‑generation: cliff random walk, ores, trees & the startup system
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::BlockType;
use crate::components::HeldItemSprite;
use crate::constants::*;
use crate::player::Player;
use crate::terrain::Terrain;

/// seed the generator draws from
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldSeed(pub u64);

impl WorldSeed {
    /// `BLOCK_MINE_SEED` if it parses, otherwise a fresh random seed
    pub fn from_env() -> Self {
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            match Self::parse(&raw) {
                Some(seed) => return seed,
                None => warn!("ignoring {SEED_ENV_VAR}={raw:?}: not a u64"),
            }
        }
        WorldSeed(rand::thread_rng().gen())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(WorldSeed)
    }

    /// 32‑bit seed for the tint noise, folding in the high half
    pub fn noise_seed(self) -> u32 {
        (self.0 ^ (self.0 >> 32)) as u32
    }
}

/// rows of block labels, `grid[y][x]`, row 0 = top
pub type Layout = Vec<Vec<BlockType>>;

/// canopy offsets around the top trunk cell
const CANOPY: [(i32, i32); 5] = [(0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0)];

/* ---------- generator ---------- */

/// full `height × width` grid of block labels
pub fn generate_layout<R: Rng>(width: usize, height: usize, rng: &mut R) -> Layout {
    let mut grid = vec![vec![BlockType::Air; width]; height];
    let h = height as i32;
    let floor = CLIFF_FLOOR.min(h - 1);
    let ceiling = (h - CLIFF_CEILING_MARGIN).max(floor);
    let mut cliff = (h / 2).clamp(floor, ceiling);

    for x in 0..width {
        if x > 0 {
            let step: i32 = rng.gen_range(-1..=1);
            // reflect at the band edges
            cliff = if (floor..=ceiling).contains(&(cliff + step)) {
                cliff + step
            } else {
                (cliff - step).clamp(floor, ceiling)
            };
        }

        for y in 0..h {
            let above = if y > 0 { grid[y as usize - 1][x] } else { BlockType::Air };

            let block = if above == BlockType::Wood && y < cliff {
                BlockType::Wood
            } else if y == cliff - 3 {
                if rng.gen_bool(TREE_CHANCE) { BlockType::Wood } else { BlockType::Air }
            } else if y < cliff {
                BlockType::Air
            } else if y == cliff {
                if y > 0 && above != BlockType::Wood {
                    if rng.gen_bool(FLOWER_CHANCE) {
                        grid[y as usize - 1][x] = if rng.gen_bool(0.5) {
                            BlockType::Flower1
                        } else {
                            BlockType::Flower2
                        };
                    } else if rng.gen_bool(BOMB_CHANCE) {
                        grid[y as usize - 1][x] = BlockType::Bomb;
                    }
                }
                BlockType::Grass
            } else if y <= cliff + 3 {
                BlockType::Dirt
            } else if y < cliff + 8 {
                if rng.gen_bool(SHALLOW_STONE_CHANCE) { BlockType::Cobblestone } else { BlockType::Dirt }
            } else {
                ore(rng.gen::<f64>())
            };

            grid[y as usize][x] = block;
        }
    }

    grow_canopies(&mut grid);
    grid
}

/// deep‑rock roll
fn ore(roll: f64) -> BlockType {
    if roll <= GEM_CHANCE {
        BlockType::Gem
    } else if roll <= COBBLE_CHANCE {
        BlockType::Cobblestone
    } else if roll <= GRANITE_CHANCE {
        BlockType::Granite
    } else {
        BlockType::Andesite
    }
}

/// leaves around the first trunk cell of every column
fn grow_canopies(grid: &mut Layout) {
    let height = grid.len() as i32;
    let width = grid.first().map_or(0, Vec::len) as i32;

    for x in 0..width {
        let Some(y) = (0..height).find(|&y| grid[y as usize][x as usize] == BlockType::Wood) else {
            continue;
        };

        if y >= 2 && grid[y as usize - 2][x as usize] == BlockType::Air {
            grid[y as usize - 2][x as usize] = BlockType::Leaves;
        }
        for (dx, dy) in CANOPY {
            let (nx, ny) = (x + dx, y + dy);
            if (0..width).contains(&nx) && (0..height).contains(&ny) {
                let cell = &mut grid[ny as usize][nx as usize];
                if *cell == BlockType::Air {
                    *cell = BlockType::Leaves;
                }
            }
        }
    }
}

/* ---------- startup ---------- */

/// generate terrain, spawn the player & add the Terrain resource
pub fn generate_world_and_player(mut commands: Commands, seed: Res<WorldSeed>) {
    let mut rng = StdRng::seed_from_u64(seed.0);
    let layout = generate_layout(WORLD_WIDTH, WORLD_HEIGHT, &mut rng);
    let mut terrain = Terrain::from_layout(&layout, &mut rng);

    /* -------- player spawn (grid column 0, on ground) -------- */
    let spawn = terrain.spawn_point(0, Vec2::splat(PLAYER_SIZE));
    info!(
        "generated {}x{} world from seed {} ({} tiles), spawn at {spawn}",
        terrain.width,
        terrain.height,
        seed.0,
        terrain.len()
    );
    terrain.update_day_night(0.0);

    let player = Player::new(spawn);
    let center = player.center();
    commands
        .spawn((
            Sprite::from_color(Color::srgb(0.95, 0.75, 0.55), Vec2::splat(PLAYER_SIZE)),
            Transform::from_xyz(center.x, -center.y, 10.0),
            player,
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(Color::WHITE, Vec2::splat(20.0)),
                Transform::from_xyz(18.0, 4.0, 1.0),
                HeldItemSprite,
            ));
        });

    commands.insert_resource(terrain);
}
