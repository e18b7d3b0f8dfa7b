//! Block Mine – a side‑view tile sandbox
//!
//! Walk a generated world, mine blocks with the right tool, place them back
//! and survive long drops on five lives. Works with **Bevy 0.15**.

mod block;
mod camera;
mod components;
mod constants;
mod hud;
mod inventory;
mod player;
mod sky;
mod terrain;
mod tile_stream;
mod world_gen;

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::window::WindowMode;

use camera::{camera_follow_system, camera_update_system, GameCamera};
use constants::*;
use hud::{
    game_over_system, hotbar_system, lives_system, notification_system, quit_system,
    spawn_hud_system, stamina_bar_system, GameOver, Notification,
};
use player::{block_click_system, player_update_system, sync_player_sprite_system};
use sky::{day_night_system, pin_clouds_system, spawn_clouds_system};
use tile_stream::{
    redraw_changed_tiles_system, stream_tiles_system, update_active_rect_system, LastRect,
    TileSprites,
};
use world_gen::{generate_world_and_player, WorldSeed};

/* ------------------------------------------------------------------------ */
/* camera                                                                   */
/* ------------------------------------------------------------------------ */
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/* ------------------------------------------------------------------------ */
/* seed & render state                                                      */
/* ------------------------------------------------------------------------ */
fn pick_seed_system(mut commands: Commands, seed: Option<Res<WorldSeed>>) {
    let seed = seed.map_or_else(WorldSeed::from_env, |s| *s);
    debug!("replay this world with {SEED_ENV_VAR}={}", seed.0);
    commands.insert_resource(TileSprites::new(seed.noise_seed()));
    commands.insert_resource(seed);
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() {
    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(sky::sky_color(0.0)))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Block Mine".into(),
                resolution: (VIEWPORT_WIDTH, VIEWPORT_HEIGHT).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))

        /* game resources -------------------------------------------------- */
        .init_resource::<GameCamera>()
        .init_resource::<Notification>()
        .init_resource::<LastRect>()

        /* startup systems ------------------------------------------------- */
        .add_systems(PreStartup, pick_seed_system)
        .add_systems(
            Startup,
            (
                generate_world_and_player,
                (camera_update_system, spawn_clouds_system, update_active_rect_system),
            )
                .chain(),
        )
        .add_systems(Startup, (setup_camera, spawn_hud_system))

        /* fixed‑rate simulation ------------------------------------------ */
        .add_systems(
            FixedUpdate,
            (
                player_update_system,  // input, physics, damage
                camera_update_system,  // offset from player centre
            )
                .chain()
                .run_if(not(resource_exists::<GameOver>)),
        )

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                block_click_system.run_if(not(resource_exists::<GameOver>)), // mine / place

                /* world --------------------------------------------------- */
                day_night_system,
                (
                    update_active_rect_system,   // window around player
                    stream_tiles_system,         // stripe‑diff sprite stream
                    redraw_changed_tiles_system, // mined / placed cells
                )
                    .chain(),

                /* hud ----------------------------------------------------- */
                stamina_bar_system,
                lives_system,
                hotbar_system,
                notification_system,
                game_over_system.run_if(resource_exists::<GameOver>),
                quit_system,
            ),
        )

        /* render sync ----------------------------------------------------- */
        .add_systems(
            PostUpdate,
            (
                camera_follow_system,
                pin_clouds_system,
                sync_player_sprite_system,
            )
                .before(TransformSystem::TransformPropagate),
        )
        .run();
}
