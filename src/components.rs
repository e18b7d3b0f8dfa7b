use bevy::prelude::*;

/* ===========================================================
   player
   =========================================================== */
/// sprite showing the held tool / block, child of the player
#[derive(Component)]
pub struct HeldItemSprite;

/* ===========================================================
   terrain helper components
   =========================================================== */
#[derive(Component)]
pub struct TileSprite;

/// index into `Terrain::clouds`
#[derive(Component)]
pub struct CloudNode(pub usize);

/* ===========================================================
   hud
   =========================================================== */
#[derive(Component)]
pub struct StaminaFill;

/// n‑th heart, shown while lives > n
#[derive(Component)]
pub struct LifeIcon(pub u32);

/// hotbar slot frame; tools first, then blocks
#[derive(Component)]
pub struct HotbarSlot(pub usize);

#[derive(Component)]
pub struct SlotIcon(pub usize);

#[derive(Component)]
pub struct SlotCount(pub usize);

#[derive(Component)]
pub struct NotificationText;

#[derive(Component)]
pub struct GameOverText;
