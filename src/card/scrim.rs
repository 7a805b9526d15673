//! Uniform dark scrim for text legibility over arbitrary photos.

use image::RgbaImage;

/// Alpha-blend a full-canvas black layer of opacity `alpha` (0-255) over the
/// image, in place. Applied after cropping and before any text so every
/// subsequent draw lands on the darkened composite.
pub fn apply_scrim(img: &mut RgbaImage, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let keep = (255 - alpha) as u16;
    for px in img.pixels_mut() {
        px.0[0] = ((px.0[0] as u16 * keep) / 255) as u8;
        px.0[1] = ((px.0[1] as u16 * keep) / 255) as u8;
        px.0[2] = ((px.0[2] as u16 * keep) / 255) as u8;
        px.0[3] = 255;
    }
}
