//! Rendering primitives and surfaces (Cairo-based).
//!
//! This module defines the drawing side of the engine:
//! - [`RasterSurface`]: the persistent bitmap holding committed ink
//! - [`PreviewSurface`]: the scratch layer for live shape drags
//! - [`Color`] and [`Style`]: brush value types
//! - Background layers, outline/text rendering and damage tracking

pub mod background;
pub mod color;
pub mod dirty;
pub mod error;
pub mod font;
pub mod pixels;
pub mod preview;
pub mod raster;
pub mod render;
pub mod shape;
pub mod style;

// Re-export commonly used types at module level
pub use background::{BackgroundImage, BackgroundLayers, BackgroundMode, render_background};
pub use color::Color;
pub use dirty::DirtyTracker;
pub use error::SurfaceError;
pub use font::FontDescriptor;
pub use pixels::PixelFrame;
pub use preview::PreviewSurface;
pub use raster::{HIGHLIGHTER_ALPHA, RasterSurface, StrokeParams};
pub use render::{render_outline, render_text_lines, render_text_preview};
pub use shape::ShapeOutline;
pub use style::Style;

// Palette constants for hosts building toolbars
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GRAY, GREEN, ORANGE, PALETTE, PINK, PURPLE, RED, WHITE, YELLOW};
