// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::{EguiFrame, RenderState};
pub use gpu_init::GpuContext;
