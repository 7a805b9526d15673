pub mod autofit;
pub mod compose;
pub mod cover;
pub mod fonts;
pub mod ingest;
pub mod presets;
pub mod scrim;
pub mod text;

use image::Rgba;
use thiserror::Error;

pub use presets::FormatId;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("image decode: {0}")]
    ImageDecode(String),
    #[error("network fetch: {0}")]
    NetworkFetch(#[from] crate::fetch::FetchError),
    #[error("font resolution: {0}")]
    FontResolution(#[from] fonts::FontError),
    #[error("unknown format: {0}")]
    UnknownFormat(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// One of the five icon slots at the bottom of the card.
/// `label` may carry an embedded `\n` for a two-line caption.
#[derive(Clone, Debug)]
pub struct IconEntry {
    pub glyph: String,
    pub label: String,
}

/// Everything the renderer needs for one card, validated up front.
/// Constructed once per request and consumed read-only.
#[derive(Clone, Debug)]
pub struct CardSpec {
    pub format: FormatId,
    pub credential_line1: String,
    pub credential_line2: String,
    pub subtitle: String,
    pub destination: String,
    pub price_label: String,
    pub price: String,
    pub price_suffix: String,
    pub icons: [IconEntry; 5],
    pub footer: String,
    pub accent: Rgba<u8>,
}

/// Finished raster at exactly the preset's dimensions.
pub struct RenderedCard {
    pub image: image::RgbaImage,
    pub format: FormatId,
}

/// `#RRGGBB` -> opaque RGBA. Leading `#` optional.
pub fn parse_accent(s: &str) -> Result<Rgba<u8>, CardError> {
    let t = s.trim().trim_start_matches('#');
    if t.len() != 6 {
        return Err(CardError::InvalidColor(s.to_string()));
    }
    let b = hex::decode(t).map_err(|_| CardError::InvalidColor(s.to_string()))?;
    Ok(Rgba([b[0], b[1], b[2], 255]))
}

impl RenderedCard {
    /// Encode the raster as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, CardError> {
        use image::ImageEncoder;

        let mut buf = Vec::new();
        let enc = image::codecs::png::PngEncoder::new(&mut buf);
        enc.write_image(
            &self.image,
            self.image.width(),
            self.image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CardError::Internal(format!("png encode: {e}")))?;
        Ok(buf)
    }
}
