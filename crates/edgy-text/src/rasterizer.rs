use edgy_core::{GlyphBitmap, GlyphRasterizer, KerningPair};
use fontdue::{Font, FontSettings};
use log::{debug, warn};

use crate::loader::{FontData, load_font};
use crate::{FontError, Result};

/// Printable ASCII including space; kerning pairs are looked up over this range.
const KERNING_RANGE: std::ops::RangeInclusive<u8> = 32..=126;

/// fontdue-backed rasterization driver for a single font at a fixed pixel size.
///
/// Cells are laid out with the baseline `ascent` pixels below the cell top, so every
/// glyph from the same font shares a baseline inside its row.
pub struct FontdueRasterizer {
    font: Font,
    px: f32,
    ascent: i32,
    line_height: u32,
}

impl FontdueRasterizer {
    /// Resolve `identifier` (file path or family name) and prepare it at `px` pixels per em.
    pub fn load(identifier: &str, px: f32) -> Result<Self> {
        Self::from_data(load_font(identifier)?, px)
    }

    pub fn from_data(data: FontData, px: f32) -> Result<Self> {
        let settings = FontSettings {
            collection_index: data.index,
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data.bytes, settings)
            .map_err(|e| FontError::InvalidFont(e.to_string()))?;

        let lm = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| FontError::InvalidFont("font has no horizontal line metrics".into()))?;
        // Fontdue reports descent as a negative number.
        let ascent = lm.ascent.ceil() as i32;
        let line_height = (lm.ascent - lm.descent).ceil().max(1.0) as u32;
        debug!(
            "font at {}px: ascent {} descent {} line height {}",
            px, lm.ascent, lm.descent, line_height
        );

        Ok(Self {
            font,
            px,
            ascent,
            line_height,
        })
    }

    pub fn pixel_size(&self) -> f32 {
        self.px
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize_char(&self, ch: char) -> edgy_core::Result<GlyphBitmap> {
        if self.font.lookup_glyph_index(ch) == 0 {
            warn!("font has no glyph for {:?}; baking the fallback glyph", ch);
        }
        let (metrics, coverage) = self.font.rasterize(ch, self.px);
        if coverage.len() != metrics.width * metrics.height {
            return Err(edgy_core::EdgyError::RasterizationFailure(format!(
                "glyph {:?} bitmap is {} bytes for a {}x{} mask",
                ch,
                coverage.len(),
                metrics.width,
                metrics.height
            )));
        }
        Ok(GlyphBitmap {
            cell_width: metrics.advance_width.ceil().max(0.0) as u32,
            cell_height: self.line_height,
            offset_x: metrics.xmin,
            // ymin is the bottom edge measured upward from the baseline.
            offset_y: self.ascent - (metrics.ymin + metrics.height as i32),
            width: metrics.width as u32,
            height: metrics.height as u32,
            coverage,
        })
    }

    fn kerning_pairs(&self) -> Vec<KerningPair> {
        let mut pairs = Vec::new();
        for first in KERNING_RANGE.map(char::from) {
            for second in KERNING_RANGE.map(char::from) {
                let Some(kern) = self.font.horizontal_kern(first, second, self.px) else {
                    continue;
                };
                let amount = kern.round() as i32;
                if amount != 0 {
                    pairs.push(KerningPair::new(first, second, amount));
                }
            }
        }
        debug!("{} kerning pairs at {}px", pairs.len(), self.px);
        pairs
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn space_advance(&self) -> u32 {
        self.font.metrics(' ', self.px).advance_width.round().max(0.0) as u32
    }
}
