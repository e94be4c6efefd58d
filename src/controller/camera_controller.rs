use glam::Vec3;

use crate::config::CameraConfig;
use crate::model::Camera;

/// Keeps the camera trailing the player at a fixed height
pub struct CameraController {
    pub follow_distance: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self { follow_distance: config.follow_distance }
    }

    /// Apply the configured starting pose
    pub fn reset(&self, camera: &mut Camera, config: &CameraConfig) {
        camera.position = config.position;
        camera.target = config.target;
        camera.fov_y = config.fov_y_degrees.to_radians();
        camera.z_near = config.z_near;
        camera.z_far = config.z_far;
    }

    /// Sit behind the player (+Z) and look at it; height is left as is
    pub fn follow(&self, camera: &mut Camera, player_pos: Vec3) {
        camera.position.x = player_pos.x;
        camera.position.z = player_pos.z + self.follow_distance;
        camera.target = player_pos;
    }
}
