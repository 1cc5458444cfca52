use crate::error::Result;
use crate::glyph::{GlyphBitmap, KerningPair};

/// Rasterization driver for one font at one pixel size.
///
/// Implementations own the font; the atlas builder asks for glyphs one at a time in
/// ascending character order and draws them itself.
pub trait GlyphRasterizer {
    /// White-on-transparent coverage for `ch` plus its nominal cell metrics.
    fn rasterize_char(&self, ch: char) -> Result<GlyphBitmap>;

    /// Every kerning pair the font defines for the baked character set.
    fn kerning_pairs(&self) -> Vec<KerningPair>;

    /// Line height in pixels; also the atlas row height.
    fn line_height(&self) -> u32;

    /// Horizontal advance of the space character in pixels.
    fn space_advance(&self) -> u32;
}
