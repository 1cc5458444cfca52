use std::path::Path;

use log::{debug, warn};

use crate::error::{EdgyError, Result};

/// Decoded picture for the raw dump path: no packing, no metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImageFile {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source before conversion to RGBA8.
    pub source_channels: u8,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl RawImageFile {
    pub const BYTES_PER_PIXEL: usize = 4;
}

/// Decode any format the `image` crate recognises and normalise it to RGBA8.
pub fn decode_image(path: impl AsRef<Path>) -> Result<RawImageFile> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| EdgyError::ImageDecodeFailure {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let source_channels = decoded.color().channel_count();
    if source_channels != 4 || decoded.color().bytes_per_pixel() != 4 {
        warn!(
            "{}: converting {:?} to 8-bit RGBA",
            path.display(),
            decoded.color()
        );
    }
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("decoded {} as {}x{}", path.display(), width, height);

    Ok(RawImageFile {
        width,
        height,
        source_channels,
        pixels: rgba.into_raw(),
    })
}
