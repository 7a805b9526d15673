//! Card composition: one pass from spec + background to finished raster.

use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::Arc;

use super::autofit::{self, FitResult};
use super::fonts::{FontService, FontWeight, SizedFont, DEFAULT_FAMILY};
use super::presets::{self, FormatPreset};
use super::{cover, ingest, scrim, text, CardError, CardSpec, RenderedCard};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Every font handle a card needs, resolved before a single pixel of text
/// is drawn. Font-chain exhaustion therefore aborts the render up front.
struct CardFonts {
    credential1: Arc<SizedFont>,
    credential2: Arc<SizedFont>,
    subtitle: Arc<SizedFont>,
    headline: FitResult,
    price_label: Arc<SizedFont>,
    price_value: Arc<SizedFont>,
    price_suffix: Arc<SizedFont>,
    icon_glyph: Arc<SizedFont>,
    icon_label: Arc<SizedFont>,
    footer: Arc<SizedFont>,
}

async fn resolve_fonts(
    fonts: &FontService,
    spec: &CardSpec,
    preset: &FormatPreset,
) -> Result<CardFonts, CardError> {
    let regular = |size: u32| fonts.resolve(DEFAULT_FAMILY, FontWeight::Regular, size);
    let bold = |size: u32| fonts.resolve(DEFAULT_FAMILY, FontWeight::Bold, size);

    let headline = autofit::fit_to_box(
        fonts,
        &spec.destination.to_uppercase(),
        DEFAULT_FAMILY,
        FontWeight::Bold,
        preset.headline.max_width,
        preset.headline.max_height,
        preset.headline.min_size,
        preset.headline.max_size,
    )
    .await?;
    if headline.overflow {
        tracing::warn!(
            destination = %spec.destination,
            size = headline.size,
            "headline exceeds its block even at minimum size; rendering with overflow"
        );
    }

    Ok(CardFonts {
        credential1: regular(preset.credential1.size).await?,
        credential2: regular(preset.credential2.size).await?,
        subtitle: regular(preset.subtitle.size).await?,
        headline,
        price_label: regular(preset.price.label_size).await?,
        price_value: bold(preset.price.value_size).await?,
        price_suffix: regular(preset.price.suffix_size).await?,
        icon_glyph: regular(preset.icons.glyph_size).await?,
        icon_label: regular(preset.icons.label_size).await?,
        footer: regular(preset.footer.size).await?,
    })
}

/// The pure pixel phase: no I/O, no font resolution, deterministic for a
/// given `(spec, background, fonts)`.
fn draw_card(
    spec: &CardSpec,
    preset: &FormatPreset,
    background: &DynamicImage,
    fonts: &CardFonts,
) -> RgbaImage {
    let _t = crate::perf_scope!("draw_card");

    let mut img = cover::cover_fit(background, preset.width, preset.height);
    scrim::apply_scrim(&mut img, preset.scrim_alpha);

    let center_x = (preset.width / 2) as i32;

    // top credential lines
    text::draw_centered(
        &mut img,
        &spec.credential_line1.to_uppercase(),
        &fonts.credential1,
        center_x,
        preset.credential1.y as i32,
        WHITE,
        None,
    );
    text::draw_centered(
        &mut img,
        &spec.credential_line2,
        &fonts.credential2,
        center_x,
        preset.credential2.y as i32,
        WHITE,
        None,
    );

    text::draw_centered(
        &mut img,
        &spec.subtitle.to_uppercase(),
        &fonts.subtitle,
        center_x,
        preset.subtitle.y as i32,
        WHITE,
        None,
    );

    text::draw_centered(
        &mut img,
        &spec.destination.to_uppercase(),
        &fonts.headline.font,
        center_x,
        preset.headline.y as i32,
        spec.accent,
        None,
    );

    // price column: label over value over suffix, stacked by measured height
    {
        let px = preset.price.x_center as i32;
        let mut y = preset.price.y as i32;
        let (_, label_h) = text::draw_centered(
            &mut img,
            &spec.price_label.to_uppercase(),
            &fonts.price_label,
            px,
            y,
            WHITE,
            None,
        );
        y += label_h as i32 + preset.price.gap as i32;
        let (_, value_h) = text::draw_centered(
            &mut img,
            &spec.price,
            &fonts.price_value,
            px,
            y,
            spec.accent,
            None,
        );
        y += value_h as i32 + preset.price.gap as i32;
        text::draw_centered(
            &mut img,
            &spec.price_suffix.to_uppercase(),
            &fonts.price_suffix,
            px,
            y,
            WHITE,
            None,
        );
    }

    // five icon slots, evenly spaced across the full width
    let spacing = preset.width / spec.icons.len() as u32;
    for (i, icon) in spec.icons.iter().enumerate() {
        let x = (spacing * i as u32 + spacing / 2) as i32;
        text::draw_centered(
            &mut img,
            &icon.glyph,
            &fonts.icon_glyph,
            x,
            preset.icons.glyph_y as i32,
            spec.accent,
            None,
        );
        text::draw_centered(
            &mut img,
            &icon.label.to_uppercase(),
            &fonts.icon_label,
            x,
            preset.icons.label_y as i32,
            WHITE,
            None,
        );
    }

    text::draw_centered(
        &mut img,
        &spec.footer.to_uppercase(),
        &fonts.footer,
        center_x,
        preset.footer.y as i32,
        WHITE,
        None,
    );

    img
}

/// Render a card from an already-decoded background.
///
/// Fonts resolve first (the only fallible, I/O-touching phase); the pixel
/// phase then runs on the blocking pool. Either the whole card comes back
/// or an error does; partial rasters never escape.
pub async fn render_card(
    fonts: &FontService,
    spec: &CardSpec,
    background: DynamicImage,
) -> Result<RenderedCard, CardError> {
    let preset = presets::preset_for(spec.format);
    let card_fonts = resolve_fonts(fonts, spec, preset).await?;

    let spec = spec.clone();
    let image = tokio::task::spawn_blocking(move || {
        draw_card(&spec, preset, &background, &card_fonts)
    })
    .await
    .map_err(|e| CardError::Internal(format!("render task: {e}")))?;

    debug_assert_eq!((image.width(), image.height()), (preset.width, preset.height));
    Ok(RenderedCard {
        image,
        format: preset.id,
    })
}

/// The single external entry point: undecoded background bytes in, PNG out.
pub async fn render(
    fonts: &FontService,
    spec: &CardSpec,
    background_bytes: &[u8],
) -> Result<Vec<u8>, CardError> {
    let background = ingest::ingest(background_bytes)?;
    let card = render_card(fonts, spec, background).await?;
    let _t = crate::perf_scope!("encode_png");
    card.to_png()
}
