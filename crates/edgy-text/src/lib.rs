//! edgy-text: font lookup and glyph rasterization for atlas baking.
//!
//! - `fontdb` resolves a family name against the system font database
//! - `fontdue` rasterizes glyphs and reports line metrics and kerning

pub mod loader;
pub mod rasterizer;

pub use loader::{FontData, load_font};
pub use rasterizer::FontdueRasterizer;

use thiserror::Error;

/// Errors that can occur while locating or parsing a font.
#[derive(Error, Debug)]
pub enum FontError {
    /// No file at the path and no installed family with that name.
    #[error("no font file or installed family named {0:?}")]
    NotFound(String),

    /// Font data could not be parsed.
    #[error("invalid font data: {0}")]
    InvalidFont(String),

    /// IO error.
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FontError> for edgy_core::EdgyError {
    fn from(err: FontError) -> Self {
        edgy_core::EdgyError::RasterizationFailure(err.to_string())
    }
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
