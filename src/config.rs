//! Demo configuration
//!
//! Defaults reproduce the stock demo. A JSON file named by
//! `CAPSULE_CAM_CONFIG` can override any subset of fields.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_ENV_VAR: &str = "CAPSULE_CAM_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "capsule-cam - 3d camera mode".to_string(),
            target_fps: 60,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position; its height is kept while following
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// How far behind (+Z) the player the camera stays
    pub follow_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 25.0, 5.0),
            target: Vec3::ZERO,
            fov_y_degrees: 45.0,
            z_near: 0.01,
            z_far: 1000.0,
            follow_distance: 15.0,
        }
    }
}

/// Player movement tuning. Rates are per millisecond.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec3,
    /// Ground speed in units per millisecond
    pub move_speed: f32,
    /// Impulse given when a jump starts
    pub jump_impulse: f32,
    /// Scales impulse, gravity and impulse decay per millisecond
    pub jump_rate: f32,
    pub gravity: f32,
    pub capsule_radius: f32,
    /// Distance between the two cap centers
    pub capsule_height: f32,
    /// Degrees per millisecond for the facing marker
    pub turn_speed: f32,
    pub smooth_turn: bool,
    /// Frames longer than this are clamped before integration
    pub max_frame_ms: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 2.0, 0.0),
            move_speed: 0.01,
            jump_impulse: 3.0,
            jump_rate: 0.01,
            gravity: 1.0,
            capsule_radius: 2.0,
            capsule_height: 1.5,
            turn_speed: crate::model::angle::DEFAULT_TURN_SPEED,
            smooth_turn: true,
            max_frame_ms: 250.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub slices: u32,
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { slices: 300, spacing: 2.0 }
    }
}

impl DemoConfig {
    /// Load from the file named by `CAPSULE_CAM_CONFIG`, or use defaults
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let config = Self::from_file(Path::new(&path))?;
                tracing::info!(path = %Path::new(&path).display(), "loaded config");
                Ok(config)
            }
            None => {
                tracing::debug!("no {CONFIG_ENV_VAR} set, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.window.width > 0 && self.window.height > 0, "window size must be non-zero");
        anyhow::ensure!(self.window.target_fps > 0, "target_fps must be positive");
        anyhow::ensure!(self.player.max_frame_ms > 0.0, "max_frame_ms must be positive");
        anyhow::ensure!(self.grid.spacing > 0.0, "grid spacing must be positive");
        anyhow::ensure!(
            self.camera.fov_y_degrees > 0.0 && self.camera.fov_y_degrees < 180.0,
            "fov_y_degrees must be in (0, 180)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_demo() {
        let c = DemoConfig::default();
        assert_eq!((c.window.width, c.window.height), (1280, 720));
        assert_eq!(c.window.target_fps, 60);
        assert_eq!(c.camera.position, Vec3::new(0.0, 25.0, 5.0));
        assert_eq!(c.camera.follow_distance, 15.0);
        assert_eq!(c.player.spawn, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(c.player.turn_speed, 0.5);
        assert_eq!(c.grid.slices, 300);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c = DemoConfig::from_json(r#"{ "player": { "move_speed": 0.02 }, "grid": { "slices": 10 } }"#)
            .unwrap();
        assert_eq!(c.player.move_speed, 0.02);
        assert_eq!(c.player.jump_impulse, 3.0);
        assert_eq!(c.grid.slices, 10);
        assert_eq!(c.grid.spacing, 2.0);
        assert_eq!(c.window.width, 1280);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(DemoConfig::from_json(r#"{ "window": { "target_fps": 0 } }"#).is_err());
        assert!(DemoConfig::from_json(r#"{ "camera": { "fov_y_degrees": 200.0 } }"#).is_err());
        assert!(DemoConfig::from_json("not json").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = DemoConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
