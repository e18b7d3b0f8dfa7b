//! day/night clear colour & screen‑space clouds
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::camera::GameCamera;
use crate::components::CloudNode;
use crate::constants::*;
use crate::terrain::Terrain;

/// decoration rectangle in screen pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub fn generate_clouds<R: Rng>(rng: &mut R) -> Vec<Cloud> {
    (0..CLOUD_COUNT)
        .map(|_| Cloud {
            x: rng.gen_range(0..=VIEWPORT_WIDTH as u32) as f32,
            y: rng.gen_range(0..=100) as f32,
            width: rng.gen_range(100..=200) as f32,
            height: rng.gen_range(40..=70) as f32,
        })
        .collect()
}

/// 0 at noon, 1 at midnight, sine‑eased over one day
pub fn night_blend(elapsed_secs: f32) -> f32 {
    let progress = elapsed_secs.rem_euclid(DAY_LENGTH_SECS) / DAY_LENGTH_SECS;
    ((TAU * progress - FRAC_PI_2).sin() + 1.0) * 0.5
}

pub fn sky_color(elapsed_secs: f32) -> Color {
    let t = night_blend(elapsed_secs);
    let mix = |day: u8, night: u8| (day as f32 * (1.0 - t) + night as f32 * t) as u8;
    Color::srgb_u8(
        mix(DAY_RGB[0], NIGHT_RGB[0]),
        mix(DAY_RGB[1], NIGHT_RGB[1]),
        mix(DAY_RGB[2], NIGHT_RGB[2]),
    )
}

/* ---------- systems ---------- */

pub fn spawn_clouds_system(mut commands: Commands, terrain: Res<Terrain>) {
    for (index, cloud) in terrain.clouds.iter().enumerate() {
        commands.spawn((
            Sprite::from_color(CLOUD_COLOR, Vec2::new(cloud.width, cloud.height)),
            Transform::from_xyz(0.0, 0.0, -5.0),
            CloudNode(index),
        ));
    }
}

/// clouds hold their screen position, drawn behind the tiles
pub fn pin_clouds_system(
    camera: Res<GameCamera>,
    terrain: Res<Terrain>,
    mut q: Query<(&mut Transform, &CloudNode)>,
) {
    for (mut tf, node) in &mut q {
        let Some(cloud) = terrain.clouds.get(node.0) else { continue };
        let screen = Vec2::new(cloud.x + cloud.width * 0.5, cloud.y + cloud.height * 0.5);
        let world = camera.screen_to_world(screen);
        tf.translation.x = world.x;
        tf.translation.y = -world.y;
    }
}

pub fn day_night_system(
    time: Res<Time>,
    mut terrain: ResMut<Terrain>,
    mut clear: ResMut<ClearColor>,
) {
    terrain.update_day_night(time.elapsed_secs());
    clear.0 = terrain.sky_color;
}
