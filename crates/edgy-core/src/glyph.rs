use bytemuck::{Pod, Zeroable};

/// Fixed-layout record stored verbatim in a container section.
pub trait ContainerRecord: Pod {
    /// Swap every field between native and little-endian order. A no-op on
    /// little-endian targets, and its own inverse everywhere.
    fn to_le(self) -> Self;
}

fn f32_to_le(v: f32) -> f32 {
    f32::from_bits(v.to_bits().to_le())
}

/// Per-glyph record stored in the font container, one per character 33..=126.
///
/// The layout is part of the on-disk format: twelve 4-byte fields, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphRenderInfo {
    /// Inclusive pixel box of the glyph's visible pixels inside the atlas.
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    /// `(x0, y0) / atlas_size`.
    pub uv0: [f32; 2],
    /// `(x1 + 1, y1 + 1) / atlas_size`.
    pub uv1: [f32; 2],
    /// Offset from the cell origin down to the top of the box.
    pub top_gap: f32,
    /// Offset from the cell origin right to the left of the box.
    pub left_gap: f32,
    /// Nominal (untrimmed) advance metrics reported by the rasterizer.
    pub cell_width: i32,
    pub cell_height: i32,
}

impl GlyphRenderInfo {
    /// Size of one serialized record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Build a record from a tight box found in a cell whose origin is `cell_origin`.
    pub fn from_box(
        bbox: PixelBox,
        cell_origin: (u32, u32),
        cell_width: u32,
        cell_height: u32,
        atlas_size: (u32, u32),
    ) -> Self {
        let (aw, ah) = (atlas_size.0 as f32, atlas_size.1 as f32);
        Self {
            x0: bbox.x0 as i32,
            y0: bbox.y0 as i32,
            x1: bbox.x1 as i32,
            y1: bbox.y1 as i32,
            uv0: [bbox.x0 as f32 / aw, bbox.y0 as f32 / ah],
            uv1: [(bbox.x1 + 1) as f32 / aw, (bbox.y1 + 1) as f32 / ah],
            top_gap: bbox.y0 as f32 - cell_origin.1 as f32,
            left_gap: bbox.x0 as f32 - cell_origin.0 as f32,
            cell_width: cell_width as i32,
            cell_height: cell_height as i32,
        }
    }
}

impl ContainerRecord for GlyphRenderInfo {
    fn to_le(self) -> Self {
        Self {
            x0: self.x0.to_le(),
            y0: self.y0.to_le(),
            x1: self.x1.to_le(),
            y1: self.y1.to_le(),
            uv0: self.uv0.map(f32_to_le),
            uv1: self.uv1.map(f32_to_le),
            top_gap: f32_to_le(self.top_gap),
            left_gap: f32_to_le(self.left_gap),
            cell_width: self.cell_width.to_le(),
            cell_height: self.cell_height.to_le(),
        }
    }
}

/// Kerning adjustment between two adjacent characters, passed through untouched.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct KerningPair {
    pub first: u16,
    pub second: u16,
    pub amount: i32,
}

impl KerningPair {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(first: char, second: char, amount: i32) -> Self {
        Self {
            first: first as u16,
            second: second as u16,
            amount,
        }
    }
}

impl ContainerRecord for KerningPair {
    fn to_le(self) -> Self {
        Self {
            first: self.first.to_le(),
            second: self.second.to_le(),
            amount: self.amount.to_le(),
        }
    }
}

/// Inclusive pixel rectangle. Only ever constructed non-empty: `x0 <= x1`, `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelBox {
    /// Single-pixel box.
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Grow to include `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }
}

/// Coverage mask for one character as produced by a rasterization driver.
///
/// The mask is positioned relative to the nominal cell's top-left corner and may
/// hang outside the cell (e.g. negative left bearing).
#[derive(Clone, Debug, Default)]
pub struct GlyphBitmap {
    pub cell_width: u32,
    pub cell_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major 8-bit coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_container_layout() {
        assert_eq!(GlyphRenderInfo::SIZE, 48);
        assert_eq!(KerningPair::SIZE, 8);
    }

    #[test]
    fn uv_uses_exclusive_far_edge() {
        let bbox = PixelBox {
            x0: 10,
            y0: 4,
            x1: 19,
            y1: 27,
        };
        let info = GlyphRenderInfo::from_box(bbox, (8, 0), 14, 30, (2048, 256));
        assert_eq!(info.uv0, [10.0 / 2048.0, 4.0 / 256.0]);
        assert_eq!(info.uv1, [20.0 / 2048.0, 28.0 / 256.0]);
        assert_eq!(info.left_gap, 2.0);
        assert_eq!(info.top_gap, 4.0);
        assert_eq!((info.cell_width, info.cell_height), (14, 30));
    }

    #[test]
    fn byte_order_swap_is_its_own_inverse() {
        let info = GlyphRenderInfo {
            x0: 1,
            y0: -2,
            x1: 3,
            y1: 4,
            uv0: [0.25, 0.5],
            uv1: [0.75, 1.0],
            top_gap: 6.0,
            left_gap: -1.5,
            cell_width: 40,
            cell_height: 72,
        };
        assert_eq!(info.to_le().to_le(), info);
        let pair = KerningPair::new('A', 'V', -3);
        assert_eq!(pair.to_le().to_le(), pair);
    }

    #[test]
    fn box_grows_to_include_points() {
        let mut b = PixelBox::at(5, 5);
        b.include(2, 9);
        b.include(7, 3);
        assert_eq!(
            b,
            PixelBox {
                x0: 2,
                y0: 3,
                x1: 7,
                y1: 9
            }
        );
        assert_eq!((b.width(), b.height()), (6, 7));
    }
}
