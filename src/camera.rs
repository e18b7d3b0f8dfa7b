use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::*;
use crate::player::Player;

/// screen ↔ world mapping, recomputed from the player every tick
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GameCamera {
    pub width: f32,
    pub height: f32,
    /// world pixel under the screen's top‑left corner
    pub offset: Vec2,
}

impl GameCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, offset: Vec2::ZERO }
    }

    /// centre on the player; no easing, no world clamping
    pub fn update(&mut self, player: &Player) {
        self.offset = player.center() - Vec2::new(self.width, self.height) * 0.5;
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }
}

impl Default for GameCamera {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

/// runs right after the player tick
pub fn camera_update_system(
    mut camera: ResMut<GameCamera>,
    player_q: Query<&Player>,
    window_q: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(player) = player_q.get_single() else { return };
    if let Ok(window) = window_q.get_single() {
        camera.width = window.width();
        camera.height = window.height();
    }
    camera.update(player);
}

/// move the Bevy camera to the centre of the `GameCamera` view
///
/// NOTE: runs in **PostUpdate**; world y is flipped into Bevy's y‑up space.
pub fn camera_follow_system(
    camera: Res<GameCamera>,
    mut cam_q: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let center = camera.screen_to_world(Vec2::new(camera.width, camera.height) * 0.5);
    cam_tf.translation.x = snap(center.x);
    cam_tf.translation.y = snap(-center.y);
}
