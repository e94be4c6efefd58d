// Library modules shared by the binary and the tests
pub mod config;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use config::DemoConfig;
pub use model::angle::{normalize, turn_to_angle, AngleSmoother};
