use crate::error::{EdgyError, Result};
use crate::glyph::PixelBox;

/// How the cursor advances after each glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackOptions {
    /// Advance by the trimmed box plus `gutter` instead of the nominal cell width.
    pub tight: bool,
    /// Empty columns left after a tightly packed glyph.
    pub gutter: u32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            tight: true,
            gutter: 2,
        }
    }
}

/// Single-cursor row packer over a fixed-size canvas.
///
/// Glyphs are laid left to right; the row height is fixed for the whole pass. There is
/// no growth policy: a row that does not fit vertically is an error.
#[derive(Clone, Debug)]
pub struct AtlasPacker {
    atlas_width: u32,
    atlas_height: u32,
    row_height: u32,
    options: PackOptions,
    cursor_x: u32,
    cursor_y: u32,
    rows: u32,
}

impl AtlasPacker {
    pub fn new(atlas_width: u32, atlas_height: u32, row_height: u32, options: PackOptions) -> Self {
        Self {
            atlas_width,
            atlas_height,
            row_height,
            options,
            cursor_x: 0,
            cursor_y: 0,
            rows: 1,
        }
    }

    pub fn cursor(&self) -> (u32, u32) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Number of rows touched so far, including the current one.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Origin for the next glyph cell of nominal width `cell_width`.
    ///
    /// A cell that would hang off the right edge of a partly filled row starts a new row
    /// instead. Fails if the row would run past the bottom of the canvas.
    pub fn next_cell(&mut self, cell_width: u32) -> Result<(u32, u32)> {
        if self.cursor_x > 0 && self.cursor_x.saturating_add(cell_width) > self.atlas_width {
            self.wrap();
        }
        let required = self.cursor_y.saturating_add(self.row_height);
        if required > self.atlas_height {
            return Err(EdgyError::AtlasCapacityExceeded {
                required,
                available: self.atlas_height,
            });
        }
        Ok(self.cursor())
    }

    /// Distance the cursor moves past a glyph at the current cursor.
    pub fn advance_for(&self, cell_width: u32, bbox: &PixelBox) -> u32 {
        let advance = if self.options.tight {
            (bbox.x1 + self.options.gutter).saturating_sub(self.cursor_x)
        } else {
            cell_width
        };
        advance.max(1)
    }

    /// Move past the glyph just placed and wrap to the next row when another
    /// advance of the same size would overrun the canvas width.
    ///
    /// Returns the advance that was applied.
    pub fn advance(&mut self, cell_width: u32, bbox: &PixelBox) -> u32 {
        let advance = self.advance_for(cell_width, bbox);
        self.cursor_x += advance;
        if self.cursor_x + advance > self.atlas_width {
            self.wrap();
        }
        advance
    }

    fn wrap(&mut self) {
        self.cursor_x = 0;
        self.cursor_y += self.row_height;
        self.rows += 1;
    }
}
