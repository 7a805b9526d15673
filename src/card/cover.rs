//! Cover-fit: fill the target canvas completely, cropping the excess.

use image::{imageops, DynamicImage, RgbaImage};

/// Resize/crop `img` so the result is exactly `target_w x target_h` with the
/// source aspect ratio preserved. The wider side gets center-cropped; an
/// exact ratio match crops nothing. The canvas is always fully covered.
pub fn cover_fit(img: &DynamicImage, target_w: u32, target_h: u32) -> RgbaImage {
    let mut src = img.to_rgba8();
    let (iw, ih) = (src.width(), src.height());
    if iw == 0 || ih == 0 {
        return RgbaImage::from_pixel(target_w, target_h, image::Rgba([0, 0, 0, 255]));
    }

    let target_aspect = target_w as f32 / target_h as f32;
    let in_aspect = iw as f32 / ih as f32;

    let (crop_w, crop_h) = if in_aspect > target_aspect {
        // source relatively wider: full height, trim width
        let ch = ih;
        let cw = (ch as f32 * target_aspect).round().max(1.0) as u32;
        (cw.min(iw), ch)
    } else {
        // source relatively taller (or exact match): full width, trim height
        let cw = iw;
        let ch = (cw as f32 / target_aspect).round().max(1.0) as u32;
        (cw, ch.min(ih))
    };

    let left = (iw - crop_w) / 2;
    let top = (ih - crop_h) / 2;
    let cropped = imageops::crop(&mut src, left, top, crop_w, crop_h).to_image();

    if cropped.width() == target_w && cropped.height() == target_h {
        return cropped;
    }
    imageops::resize(&cropped, target_w, target_h, imageops::FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([50, 60, 70, 255])))
    }

    #[test]
    fn output_always_matches_target_exactly() {
        for (sw, sh) in [(100, 100), (1333, 1000), (640, 1136), (3000, 200), (7, 900)] {
            for (tw, th) in [(1080, 1350), (1080, 1080), (1920, 1080), (1080, 1920)] {
                let out = cover_fit(&solid(sw, sh), tw, th);
                assert_eq!((out.width(), out.height()), (tw, th), "{sw}x{sh} -> {tw}x{th}");
            }
        }
    }

    #[test]
    fn exact_ratio_match_crops_nothing() {
        // 540x675 has the feed ratio exactly; every source pixel survives
        let mut img = RgbaImage::from_pixel(540, 675, Rgba([1, 1, 1, 255]));
        img.put_pixel(0, 0, Rgba([200, 0, 0, 255]));
        img.put_pixel(539, 674, Rgba([0, 200, 0, 255]));
        let out = cover_fit(&DynamicImage::ImageRgba8(img), 1080, 1350);
        // corners upscale in place rather than being cut away
        assert!(out.get_pixel(0, 0)[0] > 100);
        assert!(out.get_pixel(1079, 1349)[1] > 100);
    }

    #[test]
    fn wide_source_into_tall_target_crops_sides() {
        // 4:3 source with green side bands and a blue body
        let mut img = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 200, 255]));
        for y in 0..300 {
            for x in 0..40 {
                img.put_pixel(x, y, Rgba([0, 200, 0, 255]));
                img.put_pixel(399 - x, y, Rgba([0, 200, 0, 255]));
            }
        }
        let out = cover_fit(&DynamicImage::ImageRgba8(img), 1080, 1920);
        assert_eq!((out.width(), out.height()), (1080, 1920));
        // side bands fall outside the centered 9:16 crop window
        assert!(out.get_pixel(0, 960)[2] > 100, "left edge should be body, not band");
        assert!(out.get_pixel(1079, 960)[2] > 100, "right edge should be body, not band");
    }

    #[test]
    fn tall_source_into_wide_target_crops_top_and_bottom() {
        let mut img = RgbaImage::from_pixel(300, 400, Rgba([0, 0, 200, 255]));
        for x in 0..300 {
            for y in 0..40 {
                img.put_pixel(x, y, Rgba([0, 200, 0, 255]));
                img.put_pixel(x, 399 - y, Rgba([0, 200, 0, 255]));
            }
        }
        let out = cover_fit(&DynamicImage::ImageRgba8(img), 1920, 1080);
        assert!(out.get_pixel(960, 0)[2] > 100, "top edge should be body, not band");
        assert!(out.get_pixel(960, 1079)[2] > 100, "bottom edge should be body, not band");
    }
}
