//! Error type for drawing surface operations.

use thiserror::Error;

/// Errors raised by the raster/preview surfaces and their pixel codecs.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("drawing surface is not mounted yet")]
    NotMounted,

    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("surface pixels are borrowed elsewhere: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(String),
}
