use crate::canvas::AtlasCanvas;
use crate::glyph::PixelBox;

/// Find the tight box of all non-zero pixels in the scan rectangle
/// `[origin.x, origin.x + cell_width + pad) x [origin.y, origin.y + cell_height + 1)`.
///
/// The rectangle is clipped to the canvas. Returns `None` when every scanned pixel is
/// zero, so a blank cell can never turn into an inverted box.
pub fn extract_bounding_box(
    canvas: &AtlasCanvas,
    origin: (u32, u32),
    cell_width: u32,
    cell_height: u32,
    pad: u32,
) -> Option<PixelBox> {
    let x_end = origin
        .0
        .saturating_add(cell_width)
        .saturating_add(pad)
        .min(canvas.width());
    let y_end = origin
        .1
        .saturating_add(cell_height)
        .saturating_add(1)
        .min(canvas.height());

    let mut found: Option<PixelBox> = None;
    for y in origin.1..y_end {
        for x in origin.0..x_end {
            if canvas.pixel(x, y) == 0 {
                continue;
            }
            match found.as_mut() {
                Some(b) => b.include(x, y),
                None => found = Some(PixelBox::at(x, y)),
            }
        }
    }
    found
}
