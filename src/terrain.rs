//! the tile world: sparse store, spatial queries & block interaction
use bevy::prelude::*;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

use crate::block::{overlaps, pixel_to_grid, BlockType, HeldItem, Tile, Tool};
use crate::camera::GameCamera;
use crate::constants::*;
use crate::player::Player;
use crate::sky::{generate_clouds, sky_color, Cloud};
use crate::world_gen::Layout;

/// result of a mining attempt
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakOutcome {
    OutOfReach,
    Empty,
    WrongTool(BlockType),
    /// tool matched; `credited` is false when the block slots were full
    Mined { block: BlockType, credited: bool },
    /// leaves / bomb, removed without credit
    Cleared(BlockType),
}

impl BreakOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, BreakOutcome::Mined { .. } | BreakOutcome::Cleared(_))
    }
}

/// result of a placement attempt
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    OutOfReach,
    Occupied,
    NotInInventory(BlockType),
    Placed(BlockType),
}

impl PlaceOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, PlaceOutcome::Placed(_))
    }
}

/// -------- resource --------
#[derive(Resource)]
pub struct Terrain {
    pub tile_size: f32,
    pub width: usize,
    pub height: usize,
    pub render_distance: i32,
    tiles: HashMap<IVec2, Tile>,
    /// cells inserted or removed since the renderer last looked
    pub changed_tiles: VecDeque<IVec2>,
    pub clouds: Vec<Cloud>,
    pub sky_color: Color,
}

impl Terrain {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            tile_size: TILE_SIZE,
            width,
            height,
            render_distance: RENDER_DISTANCE,
            tiles: HashMap::new(),
            changed_tiles: VecDeque::new(),
            clouds: Vec::new(),
            sky_color: sky_color(0.0),
        }
    }

    /// materialise every non‑air label, centred on grid (0, 0)
    pub fn from_layout<R: Rng>(layout: &Layout, rng: &mut R) -> Self {
        let height = layout.len();
        let width = layout.first().map_or(0, Vec::len);
        let mut terrain = Self::empty(width, height);
        let (half_w, half_h) = ((width / 2) as i32, (height / 2) as i32);

        for (y, row) in layout.iter().enumerate() {
            for (x, &kind) in row.iter().enumerate() {
                let pos = IVec2::new(x as i32 - half_w, y as i32 - half_h);
                terrain.insert(Tile::new(pos, kind));
            }
        }
        // generation is not a change the renderer needs to replay
        terrain.changed_tiles.clear();
        terrain.clouds = generate_clouds(rng);
        terrain
    }

    /* ---------- store ---------- */

    #[inline]
    pub fn tile_at(&self, pos: IVec2) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// keyed by the tile's own position; air is never stored
    pub fn insert(&mut self, tile: Tile) -> bool {
        if tile.kind == BlockType::Air {
            return false;
        }
        self.tiles.insert(tile.pos, tile);
        self.changed_tiles.push_back(tile.pos);
        true
    }

    pub fn remove(&mut self, pos: IVec2) -> Option<Tile> {
        let tile = self.tiles.remove(&pos)?;
        self.changed_tiles.push_back(pos);
        Some(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /* ---------- spatial queries ---------- */

    /// tiles whose cell strictly overlaps `rect` (pixels, y‑down)
    pub fn overlapping(&self, rect: Rect) -> Vec<Tile> {
        let lo = pixel_to_grid(rect.min);
        let hi = pixel_to_grid(rect.max);
        let mut hits = Vec::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if let Some(tile) = self.tiles.get(&IVec2::new(x, y)) {
                    if overlaps(&rect, &tile.rect()) {
                        hits.push(*tile);
                    }
                }
            }
        }
        hits
    }

    pub fn any_overlap(&self, rect: Rect) -> bool {
        !self.overlapping(rect).is_empty()
    }

    /// tiles inside the square render window around `center`
    pub fn tiles_near(&self, center: IVec2) -> impl Iterator<Item = &Tile> + '_ {
        let r = self.render_distance;
        (center.y - r..=center.y + r).flat_map(move |y| {
            (center.x - r..=center.x + r).filter_map(move |x| self.tiles.get(&IVec2::new(x, y)))
        })
    }

    /// top‑left pixel that stands a body of `size` on the highest tile
    /// of column `grid_x` (or at the origin row if the column is empty)
    pub fn spawn_point(&self, grid_x: i32, size: Vec2) -> Vec2 {
        let left = grid_x as f32 * self.tile_size + (self.tile_size - size.x) * 0.5;
        let top = self
            .tiles
            .values()
            .filter(|t| t.pos.x == grid_x && t.kind.is_solid())
            .map(Tile::top)
            .reduce(f32::min);
        match top {
            Some(top) => Vec2::new(left, top - size.y),
            None => Vec2::new(left, 0.0),
        }
    }

    /* ---------- sky ---------- */

    pub fn update_day_night(&mut self, elapsed_secs: f32) {
        self.sky_color = sky_color(elapsed_secs);
    }

    /* ---------- interaction ---------- */

    fn target_cell(&self, camera: &GameCamera, screen: Vec2) -> IVec2 {
        (camera.screen_to_world(screen) / self.tile_size).floor().as_ivec2()
    }

    fn in_reach(player: &Player, cell: IVec2) -> bool {
        let d = (player.grid_pos() - cell).abs();
        d.x <= REACH_X && d.y <= REACH_Y
    }

    /// mine the cell under `screen` with `tool` (`None` = bare hands)
    pub fn break_block(
        &mut self,
        camera: &GameCamera,
        player: &mut Player,
        screen: Vec2,
        tool: Option<Tool>,
    ) -> BreakOutcome {
        let cell = self.target_cell(camera, screen);
        if !Self::in_reach(player, cell) {
            return BreakOutcome::OutOfReach;
        }
        let Some(tile) = self.tiles.get(&cell).copied() else {
            return BreakOutcome::Empty;
        };

        let matched = tool.is_some_and(|t| t.breaks(tile.kind));
        let outcome = if tile.kind.always_destructible() {
            BreakOutcome::Cleared(tile.kind)
        } else if matched {
            let credited = player.inventory.add_block(tile.kind, 1);
            BreakOutcome::Mined { block: tile.kind, credited }
        } else {
            return BreakOutcome::WrongTool(tile.kind);
        };

        self.remove(cell);
        debug!(
            "broke {} at {cell} with {}: {outcome:?}",
            tile.kind.name(),
            tool.map_or("bare hands", Tool::name)
        );
        outcome
    }

    /// put one `block` from the player's inventory into the empty cell
    /// under `screen`
    pub fn place_block(
        &mut self,
        camera: &GameCamera,
        player: &mut Player,
        screen: Vec2,
        block: BlockType,
    ) -> PlaceOutcome {
        let cell = self.target_cell(camera, screen);
        if !Self::in_reach(player, cell) {
            return PlaceOutcome::OutOfReach;
        }
        if self.tiles.contains_key(&cell) {
            return PlaceOutcome::Occupied;
        }
        if !player.inventory.has_block(block) {
            return PlaceOutcome::NotInInventory(block);
        }

        player.inventory.remove_block(block, 1);
        self.insert(Tile::new(cell, block));
        debug!("placed {} at {cell}", block.name());
        PlaceOutcome::Placed(block)
    }

    /// break first; a secondary click then also places the selected block
    pub fn handle_click(
        &mut self,
        player: &mut Player,
        camera: &GameCamera,
        screen: Vec2,
        held: HeldItem,
        button: MouseButton,
    ) -> (BreakOutcome, Option<PlaceOutcome>) {
        let broke = self.break_block(camera, player, screen, held.tool());
        let placed = match (button, player.inventory.selected_block()) {
            (MouseButton::Right, Some(block)) => Some(self.place_block(camera, player, screen, block)),
            _ => None,
        };
        (broke, placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_gen::generate_layout;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// player centred on grid (0, 0), camera offset zero so screen == world
    fn setup() -> (Terrain, Player, GameCamera) {
        let terrain = Terrain::empty(16, 16);
        let player = Player::new(Vec2::ZERO);
        let camera = GameCamera::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        (terrain, player, camera)
    }

    fn screen_of(cell: IVec2) -> Vec2 {
        cell.as_vec2() * TILE_SIZE + Vec2::splat(TILE_SIZE * 0.5)
    }

    #[test]
    fn generated_keys_match_positions_and_skip_air() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = generate_layout(WORLD_WIDTH, WORLD_HEIGHT, &mut rng);
        let terrain = Terrain::from_layout(&layout, &mut rng);

        let solid = layout.iter().flatten().filter(|&&k| k != BlockType::Air).count();
        assert_eq!(terrain.len(), solid);
        for (key, tile) in &terrain.tiles {
            assert_eq!(*key, tile.pos);
            assert_ne!(tile.kind, BlockType::Air);
        }
        assert!(terrain.changed_tiles.is_empty());
        assert_eq!(terrain.clouds.len(), CLOUD_COUNT);
    }

    #[test]
    fn layout_is_centred_on_origin() {
        let layout = vec![
            vec![BlockType::Air, BlockType::Air],
            vec![BlockType::Grass, BlockType::Dirt],
        ];
        let terrain = Terrain::from_layout(&layout, &mut StdRng::seed_from_u64(0));
        assert_eq!(terrain.tile_at(IVec2::new(-1, 0)).map(|t| t.kind), Some(BlockType::Grass));
        assert_eq!(terrain.tile_at(IVec2::new(0, 0)).map(|t| t.kind), Some(BlockType::Dirt));
        assert!(terrain.tile_at(IVec2::new(0, -1)).is_none());
    }

    #[test]
    fn air_is_never_stored() {
        let mut terrain = Terrain::empty(4, 4);
        assert!(!terrain.insert(Tile::new(IVec2::ZERO, BlockType::Air)));
        assert!(terrain.is_empty());
    }

    #[test]
    fn overlap_query_is_strict() {
        let mut terrain = Terrain::empty(4, 4);
        terrain.insert(Tile::new(IVec2::new(0, 1), BlockType::Dirt));
        let standing = Rect::from_corners(Vec2::ZERO, Vec2::splat(32.0));
        assert!(!terrain.any_overlap(standing));
        let probe = Rect::from_corners(Vec2::new(0.0, 1.0), Vec2::new(32.0, 33.0));
        assert_eq!(terrain.overlapping(probe).len(), 1);
    }

    #[test]
    fn render_window_culls_far_tiles() {
        let mut terrain = Terrain::empty(4, 4);
        terrain.insert(Tile::new(IVec2::new(25, -25), BlockType::Dirt));
        terrain.insert(Tile::new(IVec2::new(26, 0), BlockType::Dirt));
        let near: Vec<_> = terrain.tiles_near(IVec2::ZERO).collect();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].pos, IVec2::new(25, -25));
    }

    #[test]
    fn spawn_point_stands_on_top_tile() {
        let mut terrain = Terrain::empty(4, 4);
        terrain.insert(Tile::new(IVec2::new(0, 3), BlockType::Grass));
        terrain.insert(Tile::new(IVec2::new(0, 4), BlockType::Dirt));
        terrain.insert(Tile::new(IVec2::new(0, 2), BlockType::Flower1));
        let spawn = terrain.spawn_point(0, Vec2::splat(32.0));
        assert_eq!(spawn, Vec2::new(0.0, 64.0));
    }

    #[test]
    fn clicks_beyond_reach_are_ignored() {
        let (mut terrain, mut player, camera) = setup();
        let far = IVec2::new(3, 0);
        terrain.insert(Tile::new(far, BlockType::Dirt));
        player.inventory.add_block(BlockType::Dirt, 5);

        let out = terrain.break_block(&camera, &mut player, screen_of(far), Some(Tool::Shovel));
        assert_eq!(out, BreakOutcome::OutOfReach);
        assert!(terrain.tile_at(far).is_some());

        terrain.remove(far);
        let out = terrain.place_block(&camera, &mut player, screen_of(far), BlockType::Dirt);
        assert_eq!(out, PlaceOutcome::OutOfReach);
        assert!(terrain.tile_at(far).is_none());
        assert_eq!(player.inventory.count(BlockType::Dirt), 5);
    }

    #[test]
    fn vertical_reach_is_three() {
        let (mut terrain, mut player, camera) = setup();
        terrain.insert(Tile::new(IVec2::new(2, 3), BlockType::Dirt));
        terrain.insert(Tile::new(IVec2::new(0, -4), BlockType::Dirt));
        assert!(terrain
            .break_block(&camera, &mut player, screen_of(IVec2::new(2, 3)), Some(Tool::Shovel))
            .succeeded());
        assert_eq!(
            terrain.break_block(&camera, &mut player, screen_of(IVec2::new(0, -4)), Some(Tool::Shovel)),
            BreakOutcome::OutOfReach
        );
    }

    #[test]
    fn wood_needs_an_axe() {
        let (mut terrain, mut player, camera) = setup();
        let cell = IVec2::new(1, 0);
        terrain.insert(Tile::new(cell, BlockType::Wood));

        let out = terrain.break_block(&camera, &mut player, screen_of(cell), Some(Tool::Pickaxe));
        assert_eq!(out, BreakOutcome::WrongTool(BlockType::Wood));
        assert!(terrain.tile_at(cell).is_some());
        assert_eq!(player.inventory.count(BlockType::Wood), 0);

        let out = terrain.break_block(&camera, &mut player, screen_of(cell), Some(Tool::Axe));
        assert_eq!(out, BreakOutcome::Mined { block: BlockType::Wood, credited: true });
        assert!(terrain.tile_at(cell).is_none());
        assert_eq!(player.inventory.count(BlockType::Wood), 1);
        assert_eq!(terrain.changed_tiles.back(), Some(&cell));
    }

    #[test]
    fn leaves_and_bombs_go_with_anything_uncredited() {
        let (mut terrain, mut player, camera) = setup();
        for (i, kind) in [BlockType::Leaves, BlockType::Bomb].into_iter().enumerate() {
            for tool in [None, Some(Tool::Axe), Some(Tool::Pickaxe), Some(Tool::Shovel)] {
                let cell = IVec2::new(i as i32, 1);
                terrain.insert(Tile::new(cell, kind));
                let out = terrain.break_block(&camera, &mut player, screen_of(cell), tool);
                assert_eq!(out, BreakOutcome::Cleared(kind));
                assert!(terrain.tile_at(cell).is_none());
            }
        }
        assert!(player.inventory.blocks().is_empty());
    }

    #[test]
    fn bare_hands_break_nothing_else() {
        let (mut terrain, mut player, camera) = setup();
        terrain.insert(Tile::new(IVec2::new(0, 1), BlockType::Flower1));
        let out = terrain.break_block(&camera, &mut player, screen_of(IVec2::new(0, 1)), None);
        assert_eq!(out, BreakOutcome::WrongTool(BlockType::Flower1));
        assert_eq!(
            terrain.break_block(&camera, &mut player, screen_of(IVec2::new(1, 1)), None),
            BreakOutcome::Empty
        );
    }

    #[test]
    fn mining_with_full_slots_still_removes() {
        let (mut terrain, mut player, camera) = setup();
        use BlockType::*;
        for kind in [Dirt, Grass, Cobblestone, Wood, Flower1, Flower2, Granite] {
            player.inventory.add_block(kind, 1);
        }
        let cell = IVec2::new(0, 1);
        terrain.insert(Tile::new(cell, Gem));
        let out = terrain.break_block(&camera, &mut player, screen_of(cell), Some(Tool::Pickaxe));
        assert_eq!(out, BreakOutcome::Mined { block: Gem, credited: false });
        assert!(terrain.tile_at(cell).is_none());
        assert_eq!(player.inventory.count(Gem), 0);
    }

    #[test]
    fn place_needs_empty_cell_and_stock() {
        let (mut terrain, mut player, camera) = setup();
        let cell = IVec2::new(1, 1);

        let out = terrain.place_block(&camera, &mut player, screen_of(cell), BlockType::Dirt);
        assert_eq!(out, PlaceOutcome::NotInInventory(BlockType::Dirt));

        player.inventory.add_block(BlockType::Dirt, 2);
        terrain.insert(Tile::new(cell, BlockType::Granite));
        let out = terrain.place_block(&camera, &mut player, screen_of(cell), BlockType::Dirt);
        assert_eq!(out, PlaceOutcome::Occupied);
        assert_eq!(terrain.tile_at(cell).map(|t| t.kind), Some(BlockType::Granite));
        assert_eq!(player.inventory.count(BlockType::Dirt), 2);

        terrain.remove(cell);
        let out = terrain.place_block(&camera, &mut player, screen_of(cell), BlockType::Dirt);
        assert_eq!(out, PlaceOutcome::Placed(BlockType::Dirt));
        assert_eq!(terrain.tile_at(cell).map(|t| t.pos), Some(cell));
        assert_eq!(player.inventory.count(BlockType::Dirt), 1);
    }

    #[test]
    fn camera_offset_shifts_target_cell() {
        let (mut terrain, mut player, mut camera) = setup();
        camera.offset = Vec2::new(-64.0, 32.0);
        let cell = IVec2::new(-1, 2);
        terrain.insert(Tile::new(cell, BlockType::Dirt));
        let screen = screen_of(cell) - camera.offset;
        assert!(terrain
            .break_block(&camera, &mut player, screen, Some(Tool::Shovel))
            .succeeded());
    }

    #[test]
    fn secondary_click_breaks_then_places() {
        let (mut terrain, mut player, camera) = setup();
        let cell = IVec2::new(1, 0);
        terrain.insert(Tile::new(cell, BlockType::Leaves));
        player.inventory.add_block(BlockType::Cobblestone, 1);
        player.inventory.select_slot(4);
        let held = player.inventory.held();
        assert_eq!(held, HeldItem::Block(BlockType::Cobblestone));

        let (broke, placed) =
            terrain.handle_click(&mut player, &camera, screen_of(cell), held, MouseButton::Right);
        assert_eq!(broke, BreakOutcome::Cleared(BlockType::Leaves));
        assert_eq!(placed, Some(PlaceOutcome::Placed(BlockType::Cobblestone)));
        assert_eq!(terrain.tile_at(cell).map(|t| t.kind), Some(BlockType::Cobblestone));
        assert!(player.inventory.is_tool_selected());
    }

    #[test]
    fn primary_click_never_places() {
        let (mut terrain, mut player, camera) = setup();
        player.inventory.add_block(BlockType::Dirt, 1);
        player.inventory.select_slot(4);
        let held = player.inventory.held();
        let (broke, placed) = terrain.handle_click(
            &mut player,
            &camera,
            screen_of(IVec2::new(1, 0)),
            held,
            MouseButton::Left,
        );
        assert_eq!(broke, BreakOutcome::Empty);
        assert_eq!(placed, None);
        assert!(terrain.is_empty());
    }
}
