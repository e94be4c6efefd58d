// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod physics;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{FrameInput, InputEvent, InputProcessor, InputState, KeyBindings};
pub use physics::PhysicsSystem;
pub use camera_controller::CameraController;
pub use frame_loop::{CameraUniform, FrameClock, FrameLoopContext, FrameUniforms, LightingUniform, TransformUniform};
