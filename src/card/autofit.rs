//! Auto-fit: the largest integer font size that keeps text inside a box.

use std::sync::Arc;

use super::fonts::{FontError, FontService, FontWeight, SizedFont};
use super::text;

pub struct FitResult {
    pub font: Arc<SizedFont>,
    pub size: u32,
    pub width: u32,
    pub height: u32,
    /// True when even `min_size` does not fit and the text will overflow.
    pub overflow: bool,
}

/// Binary-search integer sizes in `[min_size, max_size]` for the largest
/// whose measured ink box fits `max_width x max_height`. Feasibility is
/// monotone in the box dimensions, so growing either bound never shrinks
/// the chosen size. When nothing fits, the minimum size is returned and
/// the text overflows visually; an oversized destination name must not
/// kill the whole render.
pub async fn fit_to_box(
    fonts: &FontService,
    text_value: &str,
    family: &str,
    weight: FontWeight,
    max_width: u32,
    max_height: u32,
    min_size: u32,
    max_size: u32,
) -> Result<FitResult, FontError> {
    let min_size = min_size.max(1);
    let max_size = max_size.max(min_size);

    let mut lo = min_size;
    let mut hi = max_size;
    let mut best: Option<(u32, Arc<SizedFont>, u32, u32)> = None;

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let font = fonts.resolve(family, weight, mid).await?;
        let (w, h) = text::measure_block(&font, text_value);
        if w <= max_width && h <= max_height {
            best = Some((mid, font, w, h));
            lo = mid + 1;
        } else {
            if mid == min_size {
                break;
            }
            hi = mid - 1;
        }
    }

    match best {
        Some((size, font, width, height)) => Ok(FitResult {
            font,
            size,
            width,
            height,
            overflow: false,
        }),
        None => {
            let font = fonts.resolve(family, weight, min_size).await?;
            let (width, height) = text::measure_block(&font, text_value);
            Ok(FitResult {
                font,
                size: min_size,
                width,
                height,
                overflow: true,
            })
        }
    }
}
