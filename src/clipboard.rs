//! Wayland clipboard access for pasted background images.

use std::collections::HashSet;
use std::io::Read;
use thiserror::Error;
use wl_clipboard_rs::paste::{ClipboardType, MimeType, Seat, get_contents, get_mime_types};

/// Formats tried in order before falling back to any `image/*` offer.
const PREFERRED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/bmp"];

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard does not offer an image")]
    NoImage,

    #[error("clipboard access failed: {0}")]
    Paste(#[from] wl_clipboard_rs::paste::Error),

    #[error("failed to read clipboard contents: {0}")]
    Io(#[from] std::io::Error),
}

/// Picks the image format to request from the offered MIME types.
pub fn pick_image_mime(offered: &HashSet<String>) -> Option<String> {
    PREFERRED_IMAGE_TYPES
        .iter()
        .find(|mime| offered.contains(**mime))
        .map(|mime| mime.to_string())
        .or_else(|| {
            let mut images: Vec<&String> =
                offered.iter().filter(|m| m.starts_with("image/")).collect();
            images.sort();
            images.first().map(|m| m.to_string())
        })
}

/// Reads the current clipboard image.
///
/// # Returns
/// The MIME type and the raw bytes, ready for `InputState::on_paste`.
pub fn read_clipboard_image() -> Result<(String, Vec<u8>), ClipboardError> {
    let offered = get_mime_types(ClipboardType::Regular, Seat::Unspecified)?;
    log::debug!("Clipboard offers {} MIME type(s)", offered.len());
    let mime = pick_image_mime(&offered).ok_or(ClipboardError::NoImage)?;

    let (mut pipe, mime) = get_contents(
        ClipboardType::Regular,
        Seat::Unspecified,
        MimeType::Specific(&mime),
    )?;
    let mut bytes = Vec::new();
    pipe.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(ClipboardError::NoImage);
    }

    log::info!("Read {} bytes of {} from clipboard", bytes.len(), mime);
    Ok((mime, bytes))
}
