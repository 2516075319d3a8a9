//! Self-contained history snapshot blobs.
//!
//! Layout: `b"LDSN"`, format version (u16 LE), width, height and stride
//! (u32 LE each), then the gzip-compressed ARGB32 pixel buffer. The encoding
//! is lossless; a decoded snapshot is byte-identical to the captured frame.

use crate::draw::{PixelFrame, SurfaceError};
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use std::sync::Arc;

const MAGIC: &[u8; 4] = b"LDSN";
const CURRENT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 4 * 3;

/// An immutable full-surface capture. Cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<[u8]>);

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Snapshot");
        if let Ok((width, height, _)) = self.header() {
            debug.field("width", &width).field("height", &height);
        }
        debug.field("bytes", &self.0.len()).finish()
    }
}

impl Snapshot {
    /// Compresses a captured frame into a snapshot blob.
    pub fn encode(frame: &PixelFrame) -> Result<Self, SurfaceError> {
        let mut blob = Vec::with_capacity(HEADER_LEN + frame.data().len() / 8);
        blob.extend_from_slice(MAGIC);
        blob.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
        for value in [frame.width(), frame.height(), frame.stride()] {
            blob.extend_from_slice(&(value as u32).to_le_bytes());
        }

        let mut encoder = GzEncoder::new(blob, Compression::fast());
        encoder.write_all(frame.data())?;
        Ok(Self(encoder.finish()?.into()))
    }

    /// Wraps bytes produced by [`Snapshot::as_bytes`], checking the header.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, SurfaceError> {
        let snapshot = Self(bytes.into());
        snapshot.header()?;
        Ok(snapshot)
    }

    /// Decompresses the snapshot back into pixels.
    pub fn decode(&self) -> Result<PixelFrame, SurfaceError> {
        let (width, height, stride) = self.header()?;
        let expected = stride as usize * height as usize;
        let mut data = Vec::with_capacity(expected);
        GzDecoder::new(&self.0[HEADER_LEN..]).read_to_end(&mut data)?;
        PixelFrame::from_raw(width, height, stride, data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Width and height recorded in the header.
    pub fn dimensions(&self) -> Result<(i32, i32), SurfaceError> {
        self.header().map(|(width, height, _)| (width, height))
    }

    fn header(&self) -> Result<(i32, i32, i32), SurfaceError> {
        let bytes = &self.0;
        if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
            return Err(SurfaceError::Decode("not a snapshot blob".into()));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != CURRENT_VERSION {
            return Err(SurfaceError::Decode(format!(
                "unsupported snapshot version {version}"
            )));
        }
        let field = |offset: usize| {
            let raw = u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
            i32::try_from(raw).map_err(|_| SurfaceError::Decode(format!("header field {raw} out of range")))
        };
        Ok((field(6)?, field(10)?, field(14)?))
    }
}
