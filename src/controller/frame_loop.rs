use std::time::Instant;

use glam::{Mat4, Vec3};

use crate::config::DemoConfig;
use crate::controller::{CameraController, InputProcessor, InputState, PhysicsSystem};
use crate::model::{Camera, PlayerState};

/// Distance from the capsule center to the facing marker
const MARKER_DISTANCE: f32 = 2.6;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad1: f32,
    pub _pad2: f32,
    pub _pad3: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        let sun = Vec3::new(0.4, 1.0, 0.6).normalize();
        Self {
            sun_dir: sun.to_array(),
            sun_intensity: 0.6,
            ambient: 0.5,
            _pad1: 0.0,
            _pad2: 0.0,
            _pad3: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from_translation(offset: Vec3) -> Self {
        Self { transform: Mat4::from_translation(offset).to_cols_array_2d() }
    }
}

/// Frame timing in milliseconds plus a once-per-second FPS average
pub struct FrameClock {
    last: Instant,
    max_frame_ms: f32,
    pub fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameClock {
    pub fn new(start: Instant, max_frame_ms: f32) -> Self {
        Self {
            last: start,
            max_frame_ms,
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Milliseconds since the previous call, clamped to `max_frame_ms`
    pub fn advance(&mut self, now: Instant) -> f32 {
        let raw_ms = now.saturating_duration_since(self.last).as_secs_f32() * 1000.0;
        self.last = now;

        self.frame_count += 1;
        self.fps_timer += raw_ms / 1000.0;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        if raw_ms > self.max_frame_ms {
            tracing::debug!(raw_ms, clamped = self.max_frame_ms, "long frame");
        }
        raw_ms.min(self.max_frame_ms)
    }
}

/// Per-object transforms for one frame
pub struct FrameUniforms {
    pub camera: CameraUniform,
    pub capsule: TransformUniform,
    pub marker: TransformUniform,
}

/// Main game loop state and update logic
pub struct FrameLoopContext {
    pub camera: Camera,
    pub player: PlayerState,
    pub input_state: InputState,
    pub input_processor: InputProcessor,
    pub camera_controller: CameraController,
    pub physics_system: PhysicsSystem,
    pub clock: FrameClock,
    pub capsule_height: f32,
    /// Milliseconds integrated on the last tick
    pub last_frame_ms: f32,
}

impl FrameLoopContext {
    pub fn new(config: &DemoConfig, width: u32, height: u32, start: Instant) -> Self {
        let camera_controller = CameraController::from_config(&config.camera);
        let mut camera = Camera::new(width, height);
        camera_controller.reset(&mut camera, &config.camera);

        Self {
            camera,
            player: PlayerState::new(config.player.spawn),
            input_state: InputState::new(),
            input_processor: InputProcessor::default(),
            camera_controller,
            physics_system: PhysicsSystem::from_config(&config.player),
            clock: FrameClock::new(start, config.player.max_frame_ms),
            capsule_height: config.player.capsule_height,
            last_frame_ms: 0.0,
        }
    }

    /// Sample input, integrate the player, move the camera
    pub fn update(&mut self, now: Instant) {
        let ms = self.clock.advance(now);
        self.last_frame_ms = ms;

        let input = self.input_processor.frame_input(&self.input_state);
        self.player = self.physics_system.update(self.player, input, ms);
        self.camera_controller.follow(&mut self.camera, self.player.position);

        self.input_state.end_frame();
    }

    pub fn uniforms(&self) -> FrameUniforms {
        let (bottom, _) = self.player.capsule_endpoints(self.capsule_height);
        let marker = self.player.facing_marker(self.capsule_height, MARKER_DISTANCE);

        FrameUniforms {
            camera: CameraUniform { view_proj: self.camera.view_proj().to_cols_array_2d() },
            capsule: TransformUniform::from_translation(bottom),
            marker: TransformUniform::from_translation(marker),
        }
    }
}
