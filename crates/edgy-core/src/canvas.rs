use crate::glyph::GlyphBitmap;

/// Pack channels into an atlas pixel. The little-endian bytes of the result are `R, G, B, A`.
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline]
pub fn red(pixel: u32) -> u8 {
    pixel.to_le_bytes()[0]
}

#[inline]
pub fn alpha(pixel: u32) -> u8 {
    pixel.to_le_bytes()[3]
}

/// Fixed-size, row-major RGBA pixel buffer owned by a single atlas build.
///
/// Stages borrow it mutably one after another; nothing else holds a view into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl AtlasCanvas {
    /// Cleared (all-zero) canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Draw a glyph's coverage as white-on-black with its cell origin at `origin`.
    ///
    /// Overlapping coverage keeps the brighter value; anything outside the canvas is clipped.
    /// Alpha is left at zero until [`crate::synthesize_alpha`] runs.
    pub fn draw_glyph(&mut self, origin: (u32, u32), bitmap: &GlyphBitmap) {
        let base_x = origin.0 as i64 + bitmap.offset_x as i64;
        let base_y = origin.1 as i64 + bitmap.offset_y as i64;
        for gy in 0..bitmap.height {
            let y = base_y + gy as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for gx in 0..bitmap.width {
                let x = base_x + gx as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let c = bitmap.coverage_at(gx, gy);
                if c == 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                if c > red(self.pixel(x, y)) {
                    self.set_pixel(x, y, pack_rgba(c, c, c, 0));
                }
            }
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}
