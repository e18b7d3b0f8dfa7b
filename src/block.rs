//! tile model: block kinds, tools and the positioned `Tile`
use bevy::prelude::*;

use crate::constants::TILE_SIZE;

/// -------- block kinds --------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    Air,
    Dirt,
    Grass,
    Cobblestone,
    Wood,
    Leaves,
    Flower1,
    Flower2,
    Bomb,
    Gem,
    Granite,
    Andesite,
}

impl BlockType {
    /// flowers and bombs never stop the player
    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            BlockType::Air | BlockType::Flower1 | BlockType::Flower2 | BlockType::Bomb
        )
    }

    /// removable with anything, but never credited to the inventory
    pub fn always_destructible(self) -> bool {
        matches!(self, BlockType::Leaves | BlockType::Bomb)
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Air         => "air",
            BlockType::Dirt        => "dirt",
            BlockType::Grass       => "grass",
            BlockType::Cobblestone => "cobblestone",
            BlockType::Wood        => "wood",
            BlockType::Leaves      => "leaves",
            BlockType::Flower1     => "flower1",
            BlockType::Flower2     => "flower2",
            BlockType::Bomb        => "bomb",
            BlockType::Gem         => "gem",
            BlockType::Granite     => "granite",
            BlockType::Andesite    => "andesite",
        }
    }

    /// untinted base colour, stands in for the block texture
    pub fn base_rgb(self) -> Vec3 {
        match self {
            BlockType::Air         => Vec3::ZERO,
            BlockType::Dirt        => Vec3::new(0.55, 0.27, 0.07),
            BlockType::Grass       => Vec3::new(0.13, 0.70, 0.08),
            BlockType::Cobblestone => Vec3::new(0.50, 0.50, 0.50),
            BlockType::Wood        => Vec3::new(0.45, 0.30, 0.15),
            BlockType::Leaves      => Vec3::new(0.10, 0.45, 0.10),
            BlockType::Flower1     => Vec3::new(0.95, 0.85, 0.10),
            BlockType::Flower2     => Vec3::new(0.85, 0.20, 0.45),
            BlockType::Bomb        => Vec3::new(0.80, 0.10, 0.10),
            BlockType::Gem         => Vec3::new(0.35, 0.85, 0.90),
            BlockType::Granite     => Vec3::new(0.60, 0.40, 0.35),
            BlockType::Andesite    => Vec3::new(0.65, 0.65, 0.62),
        }
    }
}

/// -------- tools --------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    Axe,
    Pickaxe,
    Shovel,
}

impl Tool {
    /// hotbar order
    pub const ALL: [Tool; 3] = [Tool::Axe, Tool::Pickaxe, Tool::Shovel];

    /// tool/material match table
    pub fn breaks(self, block: BlockType) -> bool {
        use BlockType::*;
        match self {
            Tool::Pickaxe => matches!(block, Cobblestone | Andesite | Granite | Gem | Flower1 | Flower2),
            Tool::Axe     => matches!(block, Wood | Leaves | Flower1 | Flower2),
            Tool::Shovel  => matches!(block, Grass | Dirt | Flower1 | Flower2),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Axe     => "axe",
            Tool::Pickaxe => "pickaxe",
            Tool::Shovel  => "shovel",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Tool::Axe     => Color::srgb(0.70, 0.45, 0.20),
            Tool::Pickaxe => Color::srgb(0.60, 0.60, 0.70),
            Tool::Shovel  => Color::srgb(0.55, 0.50, 0.40),
        }
    }
}

/// what the player is holding when a click arrives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldItem {
    Tool(Tool),
    Block(BlockType),
}

impl HeldItem {
    pub fn tool(self) -> Option<Tool> {
        match self {
            HeldItem::Tool(t) => Some(t),
            HeldItem::Block(_) => None,
        }
    }
}

/// -------- tile --------
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub pos: IVec2,
    pub kind: BlockType,
}

impl Tile {
    pub fn new(pos: IVec2, kind: BlockType) -> Self {
        Self { pos, kind }
    }

    /// pixel rect, y‑down
    pub fn rect(&self) -> Rect {
        let min = self.pos.as_vec2() * TILE_SIZE;
        Rect::from_corners(min, min + Vec2::splat(TILE_SIZE))
    }

    pub fn top(&self) -> f32 {
        self.pos.y as f32 * TILE_SIZE
    }
}

/// strict AABB overlap, touching edges do not count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// pixel → grid cell (floor division)
#[inline]
pub fn pixel_to_grid(p: Vec2) -> IVec2 {
    (p / TILE_SIZE).floor().as_ivec2()
}
