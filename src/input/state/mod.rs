mod actions;
mod core;
mod mouse;
mod surface;

pub use core::{DrawingState, InputState};
pub use surface::RenderLayers;
