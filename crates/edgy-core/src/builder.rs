use log::{debug, info};

use crate::alpha::synthesize_alpha;
use crate::bbox::extract_bounding_box;
use crate::canvas::AtlasCanvas;
use crate::error::{EdgyError, Result};
use crate::format::{FontAtlasFile, OffsetTable};
use crate::glyph::GlyphRenderInfo;
use crate::packer::{AtlasPacker, PackOptions};
use crate::raster::GlyphRasterizer;
use crate::{DEFAULT_ATLAS_HEIGHT, DEFAULT_ATLAS_WIDTH, GLYPH_COUNT, glyph_range};

/// Canvas and packing parameters for one atlas build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasBuildOptions {
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub pack: PackOptions,
    /// Extra columns scanned right of each nominal cell, for glyphs that ink past
    /// their advance width.
    pub scan_padding: u32,
}

impl Default for AtlasBuildOptions {
    fn default() -> Self {
        Self {
            atlas_width: DEFAULT_ATLAS_WIDTH,
            atlas_height: DEFAULT_ATLAS_HEIGHT,
            pack: PackOptions::default(),
            scan_padding: 10,
        }
    }
}

/// Builds a [`FontAtlasFile`] from a rasterization driver.
///
/// The canvas is created fresh for every build and threaded through draw, scan and
/// alpha synthesis in that order; the finished file owns it afterwards.
#[derive(Clone, Debug, Default)]
pub struct FontAtlasBuilder {
    options: AtlasBuildOptions,
}

impl FontAtlasBuilder {
    pub fn new(options: AtlasBuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AtlasBuildOptions {
        &self.options
    }

    pub fn build<R: GlyphRasterizer + ?Sized>(&self, rasterizer: &R) -> Result<FontAtlasFile> {
        let AtlasBuildOptions {
            atlas_width,
            atlas_height,
            pack,
            scan_padding,
        } = self.options;

        let line_height = rasterizer.line_height();
        if line_height == 0 {
            return Err(EdgyError::RasterizationFailure(
                "font reports a zero line height".into(),
            ));
        }

        // Reject canvases the container cannot address before allocating one.
        OffsetTable::compute(GLYPH_COUNT, atlas_width, atlas_height, 0)?;

        let mut canvas = AtlasCanvas::new(atlas_width, atlas_height);
        let mut packer = AtlasPacker::new(atlas_width, atlas_height, line_height, pack);
        let mut glyphs = Vec::with_capacity(GLYPH_COUNT);

        for ch in glyph_range() {
            let bitmap = rasterizer.rasterize_char(ch)?;
            let mask_len = bitmap.width as usize * bitmap.height as usize;
            if bitmap.coverage.len() != mask_len {
                return Err(EdgyError::RasterizationFailure(format!(
                    "glyph {:?} has {} coverage bytes for a {}x{} mask",
                    ch,
                    bitmap.coverage.len(),
                    bitmap.width,
                    bitmap.height
                )));
            }
            let origin = packer.next_cell(bitmap.cell_width)?;
            canvas.draw_glyph(origin, &bitmap);

            let bbox = extract_bounding_box(
                &canvas,
                origin,
                bitmap.cell_width,
                bitmap.cell_height,
                scan_padding,
            )
            .ok_or(EdgyError::BlankGlyph(ch))?;

            let advance = packer.advance(bitmap.cell_width, &bbox);
            debug!(
                "glyph {:?} at ({}, {}) box {}x{} advance {}",
                ch,
                origin.0,
                origin.1,
                bbox.width(),
                bbox.height(),
                advance
            );
            glyphs.push(GlyphRenderInfo::from_box(
                bbox,
                origin,
                bitmap.cell_width,
                bitmap.cell_height,
                (atlas_width, atlas_height),
            ));
        }

        synthesize_alpha(&mut canvas);

        let kerning = rasterizer.kerning_pairs();
        info!(
            "packed {} glyphs into {} row(s) of {}px; {} kerning pairs",
            glyphs.len(),
            packer.rows(),
            line_height,
            kerning.len()
        );

        Ok(FontAtlasFile {
            line_height: line_height as i32,
            atlas_width,
            atlas_height,
            space_width: rasterizer.space_advance() as i32,
            glyphs,
            pixels: canvas.into_pixels(),
            kerning,
        })
    }
}
