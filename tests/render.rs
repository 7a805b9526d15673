//! End-to-end render scenarios against the public pipeline entry point.

use cardgen_backend::card::autofit::fit_to_box;
use cardgen_backend::card::fonts::{FontService, FontSource, FontWeight, DEFAULT_FAMILY};
use cardgen_backend::card::presets::{preset_for, FormatId};
use cardgen_backend::card::{compose, CardError, CardSpec, IconEntry};
use image::{GenericImageView, ImageEncoder, Rgba, RgbaImage};

fn fonts() -> FontService {
    FontService::new(reqwest::Client::new())
}

/// A deterministic 800x600 gradient photo, PNG-encoded.
fn background_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(800, 600, |x, y| {
        Rgba([(x / 4) as u8, (y / 3) as u8, 160, 255])
    });
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(&img, img.width(), img.height(), image::ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

fn spec(format: FormatId, destination: &str, price: &str) -> CardSpec {
    CardSpec {
        format,
        credential_line1: "CONSULTOR INDEPENDENTE RNAVT3301".into(),
        credential_line2: "iCliGo travel consultant".into(),
        subtitle: "Entre o sabor da pizza e a vista do Vesúvio".into(),
        destination: destination.into(),
        price_label: "DESDE".into(),
        price: price.into(),
        price_suffix: "POR PESSOA".into(),
        icons: [
            IconEntry { glyph: "✈".into(), label: "PORTO\n7 A 15 MARÇO".into() },
            IconEntry { glyph: "🏨".into(), label: "HOTEL\nHERCULANEUM".into() },
            IconEntry { glyph: "🍽".into(), label: "PEQUENO\nALMOÇO".into() },
            IconEntry { glyph: "💼".into(), label: "BAGAGEM\nDE MÃO".into() },
            IconEntry { glyph: "🚐".into(), label: "TRANSFER\nIN+OUT".into() },
        ],
        footer: "VALOR BASEADO EM 2 ADULTOS. PREÇOS SUJEITOS A ALTERAÇÕES.".into(),
        accent: Rgba([0, 255, 174, 255]),
    }
}

#[tokio::test]
async fn every_format_renders_at_its_exact_dimensions() {
    let svc = fonts();
    let bg = background_png();
    for id in FormatId::all() {
        let png = compose::render(&svc, &spec(id, "NÁPOLES", "409€"), &bg)
            .await
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        let p = preset_for(id);
        assert_eq!((decoded.width(), decoded.height()), (p.width, p.height), "{id}");
    }
}

#[tokio::test]
async fn square_headline_fits_ninety_percent_of_the_canvas() {
    let svc = fonts();
    let p = preset_for(FormatId::Square);

    let png = compose::render(&svc, &spec(FormatId::Square, "NÁPOLES", "409€"), &background_png())
        .await
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1080));

    let fit = fit_to_box(
        &svc,
        "NÁPOLES",
        DEFAULT_FAMILY,
        FontWeight::Bold,
        p.headline.max_width,
        p.headline.max_height,
        p.headline.min_size,
        p.headline.max_size,
    )
    .await
    .unwrap();
    assert!(fit.size <= p.headline.max_size);
    assert!(fit.width as f32 <= 0.9 * 1080.0);
}

#[tokio::test]
async fn overlong_destination_clamps_to_minimum_and_still_renders() {
    let svc = fonts();
    let destination = "SANTA CRUZ DE TENERIFE E SÃO MIGUEL DOS AÇORES";
    assert!(destination.chars().count() >= 40);

    let p = preset_for(FormatId::Feed);
    let fit = fit_to_box(
        &svc,
        destination,
        DEFAULT_FAMILY,
        FontWeight::Bold,
        p.headline.max_width,
        p.headline.max_height,
        p.headline.min_size,
        p.headline.max_size,
    )
    .await
    .unwrap();
    assert_eq!(fit.size, p.headline.min_size);
    assert!(fit.overflow);

    let png = compose::render(&svc, &spec(FormatId::Feed, destination, "999€"), &background_png())
        .await
        .unwrap();
    assert_eq!(image::load_from_memory(&png).unwrap().width(), 1080);
}

#[tokio::test]
async fn garbage_background_fails_without_partial_output() {
    let svc = fonts();
    let err = compose::render(&svc, &spec(FormatId::Feed, "NÁPOLES", "409€"), b"\x89PNG truncated")
        .await
        .unwrap_err();
    assert!(matches!(err, CardError::ImageDecode(_)));
}

#[tokio::test]
async fn unreachable_bold_sources_abort_before_drawing() {
    let svc = FontService::empty(reqwest::Client::new());
    // regular resolves from the bundled file; bold only has a dead mirror
    svc.register(
        DEFAULT_FAMILY,
        FontWeight::Regular,
        vec![FontSource::Bundled("DejaVuSans.ttf".into())],
    );
    svc.register(
        DEFAULT_FAMILY,
        FontWeight::Bold,
        vec![FontSource::Remote("http://127.0.0.1:9/DejaVuSans-Bold.ttf".into())],
    );

    let err = compose::render(&svc, &spec(FormatId::Square, "ROMA", "199€"), &background_png())
        .await
        .unwrap_err();
    assert!(matches!(err, CardError::FontResolution(_)));
}

#[tokio::test]
async fn four_by_three_photo_covers_the_story_canvas() {
    let svc = fonts();
    // 4:3 with loud green side bands; cover-fit must crop them away
    let img = RgbaImage::from_fn(800, 600, |x, _| {
        if x < 80 || x >= 720 {
            Rgba([0, 220, 0, 255])
        } else {
            Rgba([10, 10, 120, 255])
        }
    });
    let mut bg = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bg)
        .write_image(&img, img.width(), img.height(), image::ExtendedColorType::Rgba8)
        .unwrap();

    let png = compose::render(&svc, &spec(FormatId::Story, "BALI", "1.200€"), &bg)
        .await
        .unwrap();
    let out = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!((out.width(), out.height()), (1080, 1920));
    // mid-height edges come from the photo body (scrim-darkened blue), not the bands
    let left = out.get_pixel(0, 960);
    let right = out.get_pixel(1079, 960);
    assert!(left[2] > left[1], "left edge should be body blue, got {left:?}");
    assert!(right[2] > right[1], "right edge should be body blue, got {right:?}");
}

#[tokio::test]
async fn warm_cache_renders_are_byte_identical() {
    let svc = fonts();
    let bg = background_png();
    let s = spec(FormatId::Feed, "NÁPOLES", "409€");

    let first = compose::render(&svc, &s, &bg).await.unwrap();
    let second = compose::render(&svc, &s, &bg).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrent_renders_share_one_face_load_per_weight() {
    let svc = std::sync::Arc::new(fonts());
    let bg = background_png();

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let svc = std::sync::Arc::clone(&svc);
        let bg = bg.clone();
        tasks.push(tokio::spawn(async move {
            compose::render(&svc, &spec(FormatId::Square, "PARIS", "350€"), &bg).await
        }));
    }
    for t in tasks {
        assert!(t.await.unwrap().is_ok());
    }
    // one load for regular, one for bold, regardless of render count
    assert_eq!(svc.face_load_count(), 2);
}
