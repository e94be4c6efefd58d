use crate::config::PlayerConfig;
use crate::controller::input::FrameInput;
use crate::model::angle::{self, AngleSmoother};
use crate::model::player::{heading_to_direction, PlayerState};

/// Handles player kinematics (planar movement, jump and gravity, facing)
pub struct PhysicsSystem {
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub jump_rate: f32,
    pub gravity: f32,
    pub smooth_turn: bool,
    pub smoother: AngleSmoother,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default())
    }
}

impl PhysicsSystem {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            jump_impulse: config.jump_impulse,
            jump_rate: config.jump_rate,
            gravity: config.gravity,
            smooth_turn: config.smooth_turn,
            smoother: AngleSmoother::new(config.turn_speed),
        }
    }

    /// Advance the player by `ms` milliseconds
    pub fn update(&self, state: PlayerState, input: FrameInput, ms: f32) -> PlayerState {
        let mut next = state;

        if input.jump_pressed && state.is_grounded() {
            next.jump = self.jump_impulse;
            tracing::debug!(impulse = next.jump, "jump");
        }

        // Vertical: impulse pushes up and decays, gravity pulls down
        let add_height = self.jump_rate * next.jump * ms;
        let reduce_height = self.jump_rate * self.gravity * ms;
        if next.jump > 0.0 {
            next.jump = (next.jump - self.jump_rate * ms).max(0.0);
        }
        next.added_height = (next.added_height + add_height - reduce_height).max(0.0);

        // Planar movement
        if let Some(heading) = input.heading {
            next.last_direction = heading;
            next.position += heading_to_direction(heading) * (self.move_speed * ms);
        }

        next.rotation_current = if self.smooth_turn {
            self.smoother.step(next.rotation_current, next.last_direction, ms)
        } else {
            angle::normalize(next.last_direction)
        };

        next
    }
}
