//! edgy-core: font atlas construction and the `edgy` container format.
//!
//! The font path runs in a fixed order over a single owned canvas:
//! - a [`GlyphRasterizer`] produces one coverage bitmap per printable ASCII glyph
//! - the bitmap is blitted at the packing cursor and its tight box extracted
//! - the [`AtlasPacker`] advances (and wraps) the cursor
//! - alpha is synthesized once over the whole canvas
//! - the [`FontAtlasFile`] is serialized behind a fixed offset table
//!
//! The raw image path decodes a picture and wraps it in a three-field header.

pub mod alpha;
pub mod bbox;
pub mod builder;
pub mod canvas;
pub mod error;
pub mod format;
pub mod glyph;
pub mod packer;
pub mod raster;
pub mod raw_image;
pub mod sink;

pub use alpha::synthesize_alpha;
pub use bbox::extract_bounding_box;
pub use builder::{AtlasBuildOptions, FontAtlasBuilder};
pub use canvas::AtlasCanvas;
pub use error::{EdgyError, Result};
pub use format::{
    FontAtlasFile, FontHeader, ImageHeader, OffsetTable, read_font_atlas, read_image,
};
pub use glyph::{ContainerRecord, GlyphBitmap, GlyphRenderInfo, KerningPair, PixelBox};
pub use packer::{AtlasPacker, PackOptions};
pub use raster::GlyphRasterizer;
pub use raw_image::{RawImageFile, decode_image};
pub use sink::{EdgySink, output_file_name};

/// Container tag shared by font and image files. Stored as the bytes `edgy`.
pub const MAGIC: u32 = u32::from_le_bytes(*b"edgy");

/// First character code baked into a font atlas (`!`).
pub const FIRST_GLYPH: u32 = 33;

/// Number of glyphs in a font atlas: printable ASCII 33..=126.
pub const GLYPH_COUNT: usize = 94;

pub const DEFAULT_ATLAS_WIDTH: u32 = 2048;
pub const DEFAULT_ATLAS_HEIGHT: u32 = 256;

/// Characters baked into every font atlas, in atlas order.
pub fn glyph_range() -> impl Iterator<Item = char> {
    (FIRST_GLYPH..FIRST_GLYPH + GLYPH_COUNT as u32).filter_map(char::from_u32)
}
