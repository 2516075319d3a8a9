//! Library exports for the lumina-draw annotation surface.
//!
//! The engine lives in [`input::InputState`]: hosts feed it pointer and key
//! events and read back composited frames. Configuration, export and the
//! clipboard/assistant seams are exposed so hosts and tools share the same
//! validation and serialization code as the bundled binaries.

pub mod assist;
pub mod clipboard;
pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod script;
pub mod util;

pub use config::Config;
pub use input::{InputState, RenderLayers};
