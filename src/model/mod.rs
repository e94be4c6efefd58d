// MODEL: Game state and data
pub mod angle;
pub mod camera;
pub mod player;

pub use angle::AngleSmoother;
pub use camera::{Camera, Projection};
pub use player::PlayerState;
