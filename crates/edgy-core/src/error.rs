//! Error types for atlas construction and container I/O.

use thiserror::Error;

/// Result type for edgy operations.
pub type Result<T> = std::result::Result<T, EdgyError>;

/// Errors that can occur while baking or reading an `edgy` container.
///
/// Every variant is terminal for the current invocation.
#[derive(Error, Debug)]
pub enum EdgyError {
    /// The font or one of its characters could not be rasterized.
    #[error("rasterization failed: {0}")]
    RasterizationFailure(String),

    /// A glyph in the fixed range produced no visible pixels.
    #[error("glyph {0:?} rasterized to a blank cell")]
    BlankGlyph(char),

    /// Packed glyph rows do not fit the fixed canvas height.
    #[error("atlas capacity exceeded: rows need {required}px but the canvas is {available}px tall")]
    AtlasCapacityExceeded { required: u32, available: u32 },

    /// A size or offset does not fit the container's signed 32-bit header fields.
    #[error("container too large: {0}")]
    ContainerTooLarge(String),

    /// Input image is unreadable or in an unsupported format.
    #[error("failed to decode image {path}: {reason}")]
    ImageDecodeFailure { path: String, reason: String },

    /// A container file whose sections disagree with its header.
    #[error("malformed edgy file: {0}")]
    Malformed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
