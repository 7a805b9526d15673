//! Glyph-level text drawing and measurement.
//!
//! Measurement is ink-box based (union of glyph pixel bounding boxes), so
//! diacritics and descenders count; advance widths alone would undershoot.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};

use super::fonts::SizedFont;

/// Outline pass drawn under the fill for legibility over busy backgrounds.
#[derive(Clone, Copy, Debug)]
pub struct Stroke {
    pub width: u32,
    pub color: Rgba<u8>,
}

fn line_gap(px: f32) -> i32 {
    (px * 0.3).round() as i32
}

fn layout_line<'f>(font: &'f Font<'static>, scale: Scale, line: &str) -> Vec<PositionedGlyph<'f>> {
    font.layout(line, scale, point(0.0, 0.0)).collect()
}

/// Ink box of a laid-out line, relative to its baseline origin.
fn ink_box(glyphs: &[PositionedGlyph<'_>]) -> Option<(i32, i32, i32, i32)> {
    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for g in glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            bounds = Some(match bounds {
                None => (bb.min.x, bb.max.x, bb.min.y, bb.max.y),
                Some((x0, x1, y0, y1)) => (
                    x0.min(bb.min.x),
                    x1.max(bb.max.x),
                    y0.min(bb.min.y),
                    y1.max(bb.max.y),
                ),
            });
        }
    }
    bounds
}

/// Measure the block `text` would occupy: widest line by ink, line ink
/// heights stacked with the fixed inter-line gap.
pub fn measure_block(font: &SizedFont, text: &str) -> (u32, u32) {
    let scale = font.scale();
    let gap = line_gap(font.px);

    let mut width = 0u32;
    let mut height = 0i32;
    let mut lines = 0i32;
    for line in text.split('\n') {
        let glyphs = layout_line(&font.font, scale, line);
        if let Some((x0, x1, y0, y1)) = ink_box(&glyphs) {
            width = width.max((x1 - x0) as u32);
            height += y1 - y0;
        }
        lines += 1;
    }
    if lines > 1 {
        height += gap * (lines - 1);
    }
    (width, height.max(0) as u32)
}

/// Draw `text` centered on `x_center` with its ink top at `y_top`, each
/// line centered independently, stacked with the fixed gap. Mutates the
/// raster in place and returns the drawn ink box `(width, height)` so
/// callers can stack subsequent fields below it.
pub fn draw_centered(
    img: &mut RgbaImage,
    text: &str,
    font: &SizedFont,
    x_center: i32,
    y_top: i32,
    color: Rgba<u8>,
    stroke: Option<Stroke>,
) -> (u32, u32) {
    let scale = font.scale();
    let gap = line_gap(font.px);

    let mut cursor = y_top;
    let mut width = 0u32;
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            cursor += gap;
        }
        first = false;

        let glyphs = layout_line(&font.font, scale, line);
        let Some((x0, x1, y0, y1)) = ink_box(&glyphs) else {
            continue;
        };
        let w = x1 - x0;
        let start_x = x_center - w / 2 - x0;
        let baseline_y = cursor - y0;

        if let Some(s) = stroke {
            let r = s.width as i32;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    blit_line(img, &glyphs, start_x + dx, baseline_y + dy, s.color);
                }
            }
        }
        blit_line(img, &glyphs, start_x, baseline_y, color);

        width = width.max(w as u32);
        cursor += y1 - y0;
    }
    (width, (cursor - y_top).max(0) as u32)
}

fn blit_line(
    img: &mut RgbaImage,
    glyphs: &[PositionedGlyph<'_>],
    offset_x: i32,
    offset_y: i32,
    color: Rgba<u8>,
) {
    for glyph in glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let px = gx as i32 + bb.min.x + offset_x;
            let py = gy as i32 + bb.min.y + offset_y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= img.width() || py >= img.height() {
                return;
            }
            let a = (v * 255.0) as u8;
            if a == 0 {
                return;
            }
            let dst = img.get_pixel_mut(px, py);
            // src over dst
            let sa = a as f32 / 255.0;
            let inv = 1.0 - sa;
            dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fonts::{FontService, FontWeight, DEFAULT_FAMILY};
    use std::sync::Arc;

    async fn font(px: u32) -> Arc<SizedFont> {
        FontService::new(reqwest::Client::new())
            .resolve(DEFAULT_FAMILY, FontWeight::Regular, px)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn width_grows_with_size() {
        let small = font(20).await;
        let large = font(80).await;
        let (ws, _) = measure_block(&small, "NÁPOLES");
        let (wl, _) = measure_block(&large, "NÁPOLES");
        assert!(wl > ws, "{wl} should exceed {ws}");
    }

    #[tokio::test]
    async fn widest_line_defines_block_width() {
        let f = font(40).await;
        let (w_short, _) = measure_block(&f, "HOTEL");
        let (w_long, _) = measure_block(&f, "HERCULANEUM");
        let (w_block, h_block) = measure_block(&f, "HOTEL\nHERCULANEUM");
        assert_eq!(w_block, w_long.max(w_short));
        let (_, h_single) = measure_block(&f, "HERCULANEUM");
        assert!(h_block > h_single);
    }

    #[tokio::test]
    async fn empty_text_measures_zero() {
        let f = font(40).await;
        assert_eq!(measure_block(&f, ""), (0, 0));
        assert_eq!(measure_block(&f, "   "), (0, 0));
    }

    #[tokio::test]
    async fn draw_reports_the_measured_box_and_touches_pixels() {
        let f = font(48).await;
        let mut img = RgbaImage::from_pixel(400, 200, image::Rgba([0, 0, 0, 255]));
        let measured = measure_block(&f, "DESDE");
        let drawn = draw_centered(
            &mut img,
            "DESDE",
            &f,
            200,
            60,
            image::Rgba([255, 255, 255, 255]),
            None,
        );
        assert_eq!(drawn, measured);
        let lit = img.pixels().filter(|p| p[0] > 0).count();
        assert!(lit > 50, "expected glyph coverage, got {lit} lit pixels");
    }

    #[tokio::test]
    async fn stroke_paints_outside_the_fill() {
        let f = font(60).await;
        let mut plain = RgbaImage::from_pixel(300, 150, image::Rgba([0, 0, 0, 255]));
        let mut stroked = plain.clone();
        draw_centered(&mut plain, "O", &f, 150, 40, image::Rgba([255, 0, 0, 255]), None);
        draw_centered(
            &mut stroked,
            "O",
            &f,
            150,
            40,
            image::Rgba([255, 0, 0, 255]),
            Some(Stroke { width: 3, color: image::Rgba([0, 0, 255, 255]) }),
        );
        let blue = stroked.pixels().filter(|p| p[2] > 128 && p[0] < 128).count();
        assert!(blue > 0, "stroke color should survive around the fill");
        let plain_ink = plain.pixels().filter(|p| p[0] > 0).count();
        let stroked_ink = stroked.pixels().filter(|p| p[0] > 0 || p[2] > 0).count();
        assert!(stroked_ink > plain_ink);
    }
}
