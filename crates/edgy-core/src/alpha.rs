use crate::canvas::AtlasCanvas;

/// Rewrite every pixel's alpha to equal its red channel.
///
/// Glyphs are drawn white-on-black with no usable alpha. Run once, after all glyphs
/// are placed; running it again leaves the canvas unchanged.
pub fn synthesize_alpha(canvas: &mut AtlasCanvas) {
    for pixel in canvas.pixels_mut() {
        let [r, g, b, _] = pixel.to_le_bytes();
        *pixel = u32::from_le_bytes([r, g, b, r]);
    }
}
