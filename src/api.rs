use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::card::{self, presets, CardSpec, FormatId, IconEntry};
use crate::state::AppState;
use crate::util;

/// Wrap widths for the free-text fields; anything longer is ellipsized.
const SUBTITLE_MAX_CHARS: usize = 80;
const FOOTER_MAX_CHARS: usize = 90;

#[derive(Debug, Deserialize, ToSchema)]
pub struct IconRequest {
    pub glyph: String,
    pub label: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CardRequest {
    /// One of: feed, square, wide, story.
    pub format: String,
    pub destination: String,
    pub price: String,

    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_price_label")]
    pub price_label: String,
    #[serde(default = "default_price_suffix")]
    pub price_suffix: String,
    #[serde(default = "default_credential_line1")]
    pub credential_line1: String,
    #[serde(default = "default_credential_line2")]
    pub credential_line2: String,
    #[serde(default = "default_footer")]
    pub footer: String,
    #[serde(default = "default_accent")]
    pub accent_color: String,

    /// Exactly five entries when present; defaults to the stock strip.
    pub icons: Option<Vec<IconRequest>>,

    /// Background photo as base64 or data URI. Takes precedence over `photo_url`.
    pub photo: Option<String>,
    /// Background photo URL, fetched server-side with a timeout.
    pub photo_url: Option<String>,
}

fn default_price_label() -> String {
    "DESDE".into()
}
fn default_price_suffix() -> String {
    "POR PESSOA".into()
}
fn default_credential_line1() -> String {
    "CONSULTOR INDEPENDENTE RNAVT3301".into()
}
fn default_credential_line2() -> String {
    "iCliGo travel consultant".into()
}
fn default_footer() -> String {
    "VALOR BASEADO EM 2 ADULTOS. PREÇOS SUJEITOS A ALTERAÇÕES.".into()
}
fn default_accent() -> String {
    "#00ffae".into()
}

static DEFAULT_ICONS: Lazy<[IconEntry; 5]> = Lazy::new(|| {
    [
        IconEntry { glyph: "✈".into(), label: "PORTO\n7 A 15 MARÇO".into() },
        IconEntry { glyph: "🏨".into(), label: "HOTEL\nHERCULANEUM".into() },
        IconEntry { glyph: "🍽".into(), label: "PEQUENO\nALMOÇO".into() },
        IconEntry { glyph: "💼".into(), label: "BAGAGEM\nDE MÃO".into() },
        IconEntry { glyph: "🚐".into(), label: "TRANSFER\nIN+OUT".into() },
    ]
});

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatInfo {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

#[utoipa::path(get, path = "/health", tag = "cardgen", responses((status=200, body=HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

#[utoipa::path(
    get,
    path = "/formats",
    tag = "cardgen",
    responses((status=200, body=[FormatInfo]))
)]
pub async fn formats() -> impl IntoResponse {
    let list: Vec<FormatInfo> = FormatId::all()
        .into_iter()
        .map(|id| {
            let p = presets::preset_for(id);
            FormatInfo {
                id: id.as_str().into(),
                width: p.width,
                height: p.height,
            }
        })
        .collect();
    Json(list)
}

fn status_for(e: &card::CardError) -> StatusCode {
    use card::CardError::*;
    match e {
        ImageDecode(_) | UnknownFormat(_) | InvalidColor(_) => StatusCode::BAD_REQUEST,
        NetworkFetch(_) => StatusCode::BAD_GATEWAY,
        FontResolution(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn build_spec(req: &CardRequest) -> Result<CardSpec, (StatusCode, String)> {
    let map = |e: card::CardError| (status_for(&e), e.to_string());

    let format = FormatId::parse(&req.format).map_err(map)?;
    let accent = card::parse_accent(&req.accent_color).map_err(map)?;

    let icons = match &req.icons {
        None => DEFAULT_ICONS.clone(),
        Some(list) => {
            let entries: Vec<IconEntry> = list
                .iter()
                .map(|i| IconEntry {
                    glyph: i.glyph.clone(),
                    label: i.label.clone(),
                })
                .collect();
            entries
                .try_into()
                .map_err(|_| bad_request("exactly five icons are required"))?
        }
    };

    if req.destination.trim().is_empty() {
        return Err(bad_request("destination must not be empty"));
    }

    Ok(CardSpec {
        format,
        credential_line1: req.credential_line1.clone(),
        credential_line2: req.credential_line2.clone(),
        subtitle: util::truncate_with_ellipsis(req.subtitle.clone(), SUBTITLE_MAX_CHARS),
        destination: req.destination.clone(),
        price_label: req.price_label.clone(),
        price: req.price.clone(),
        price_suffix: req.price_suffix.clone(),
        icons,
        footer: util::truncate_with_ellipsis(req.footer.clone(), FOOTER_MAX_CHARS),
        accent,
    })
}

async fn background_bytes(
    st: &AppState,
    req: &CardRequest,
) -> Result<Vec<u8>, (StatusCode, String)> {
    if let Some(photo) = req.photo.as_deref() {
        return util::b64_decode(photo)
            .ok_or_else(|| bad_request("photo is not valid base64"));
    }
    if let Some(url) = req.photo_url.as_deref() {
        return crate::fetch::fetch_bytes(&st.http, url)
            .await
            .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()));
    }
    Err(bad_request("either photo or photo_url is required"))
}

fn render_timeout() -> std::time::Duration {
    let ms = std::env::var("RENDER_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30_000);
    std::time::Duration::from_millis(ms)
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "cardgen",
    request_body = CardRequest,
    responses(
        (status=200, description="Rendered card PNG", content_type="image/png"),
        (status=400, description="Bad request"),
        (status=502, description="Upstream fetch failed"),
        (status=504, description="Render timed out")
    )
)]
pub async fn generate(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CardRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let spec = build_spec(&req)?;
    let bytes = background_bytes(&st, &req).await?;

    let _slot = st
        .render_slots
        .acquire()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let png = tokio::time::timeout(
        render_timeout(),
        card::compose::render(&st.fonts, &spec, &bytes),
    )
    .await
    .map_err(|_| (StatusCode::GATEWAY_TIMEOUT, "render timed out".to_string()))?
    .map_err(|e| (status_for(&e), e.to_string()))?;

    tracing::debug!(format = %spec.format, bytes = png.len(), "card rendered");
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
