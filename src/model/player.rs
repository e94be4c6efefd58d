use glam::Vec3;

use crate::model::angle;

/// Player state advanced once per tick by the physics system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    /// Base of the capsule (center of its lower cap) before jump height
    pub position: Vec3,
    /// Last heading requested by the player, in degrees
    pub last_direction: f32,
    /// Smoothed facing, always in (-180, 180]
    pub rotation_current: f32,
    /// Remaining upward impulse
    pub jump: f32,
    /// Height above `position`, never negative
    pub added_height: f32,
}

impl PlayerState {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            last_direction: 180.0,
            rotation_current: 180.0,
            jump: 0.0,
            added_height: 0.0,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.added_height == 0.0
    }

    /// Lower and upper cap centers of the capsule, including jump height
    pub fn capsule_endpoints(&self, capsule_height: f32) -> (Vec3, Vec3) {
        let bottom = self.position + Vec3::Y * self.added_height;
        (bottom, bottom + Vec3::Y * capsule_height)
    }

    /// Where the facing marker sits: `distance` ahead of the capsule center
    pub fn facing_marker(&self, capsule_height: f32, distance: f32) -> Vec3 {
        let (bottom, top) = self.capsule_endpoints(capsule_height);
        let center = (bottom + top) * 0.5;
        // Heading 0 faces -Z; turning is clockwise seen from above
        let ahead = center + Vec3::new(0.0, 0.0, -distance);
        angle::turn_to_angle(ahead, center, self.rotation_current.round() as i32)
    }
}

/// Unit vector on the ground plane for a heading in degrees.
/// 0 is -Z, 90 is +X, 180 is +Z, 270 is -X.
pub fn heading_to_direction(heading: f32) -> Vec3 {
    let radians = (heading - 90.0).to_radians();
    Vec3::new(radians.cos(), 0.0, radians.sin())
}
