//! Input handling and tool state machine.
//!
//! This module translates host pointer and keyboard events into drawing actions.
//! It tracks the active tool and brush style, and routes each gesture to the
//! raster (freehand), the preview surface (shapes) or the text overlay.

pub mod events;
pub mod modifiers;
pub mod state;
pub mod text;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton, PointerDisposition};
pub use modifiers::Modifiers;
pub use state::{DrawingState, InputState, RenderLayers};
pub use text::{TextEdit, TextSession};
pub use tool::Tool;
