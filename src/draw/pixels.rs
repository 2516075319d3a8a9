//! Owned ARGB32 pixel buffers that can cross threads.
//!
//! Cairo surfaces are not `Send`, so decoded snapshots and background images
//! travel as [`PixelFrame`]s and are turned into surfaces on the drawing
//! thread.

use super::error::SurfaceError;
use cairo::{Format, ImageSurface};

/// Premultiplied, native-endian ARGB32 pixels (Cairo's `ARgb32` layout).
#[derive(Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: i32,
    height: i32,
    stride: i32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelFrame {
    /// Wraps raw ARGB32 pixel data, checking that it covers `height * stride`.
    pub fn from_raw(width: i32, height: i32, stride: i32, data: Vec<u8>) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 || stride < width * 4 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        let expected = stride as usize * height as usize;
        if data.len() != expected {
            return Err(SurfaceError::Decode(format!(
                "pixel buffer holds {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Copies the current contents of an image surface.
    ///
    /// The surface must not be referenced by a live `cairo::Context`.
    pub fn capture(surface: &mut ImageSurface) -> Result<Self, SurfaceError> {
        surface.flush();
        let width = surface.width();
        let height = surface.height();
        let stride = surface.stride();
        if surface.format() != Format::ARgb32 {
            return Err(SurfaceError::Decode(format!(
                "unsupported surface format {:?}",
                surface.format()
            )));
        }
        let data = surface.data()?.to_vec();
        Self::from_raw(width, height, stride, data)
    }

    /// Decodes an encoded image (PNG, JPEG, GIF, WebP, BMP) into premultiplied ARGB32.
    pub fn from_encoded_image(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| SurfaceError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let width = i32::try_from(width).map_err(|_| SurfaceError::InvalidDimensions {
            width: i32::MAX,
            height: 0,
        })?;
        let height = i32::try_from(height).map_err(|_| SurfaceError::InvalidDimensions {
            width,
            height: i32::MAX,
        })?;
        let stride = Format::ARgb32.stride_for_width(width as u32)?;

        let mut data = vec![0u8; stride as usize * height as usize];
        for (y, row) in decoded.rows().enumerate() {
            let offset = y * stride as usize;
            for (x, pixel) in row.enumerate() {
                let [r, g, b, a] = pixel.0;
                let packed = pack_premultiplied(r, g, b, a);
                let start = offset + x * 4;
                data[start..start + 4].copy_from_slice(&packed.to_ne_bytes());
            }
        }
        Self::from_raw(width, height, stride, data)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns premultiplied `[a, r, g, b]` at the given pixel, if in bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let start = y as usize * self.stride as usize + x as usize * 4;
        let bytes: [u8; 4] = self.data[start..start + 4].try_into().ok()?;
        Some(u32::from_ne_bytes(bytes).to_be_bytes())
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|byte| *byte == 0)
    }

    /// Turns the frame into a Cairo surface that owns the pixel buffer.
    pub fn into_surface(self) -> Result<ImageSurface, SurfaceError> {
        Ok(ImageSurface::create_for_data(
            self.data,
            Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?)
    }
}

fn pack_premultiplied(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let premultiply = |channel: u8| ((channel as u32 * a as u32 + 127) / 255) & 0xff;
    (a as u32) << 24 | premultiply(r) << 16 | premultiply(g) << 8 | premultiply(b)
}
