//! Font resolution with an explicit, injected cache.
//!
//! Sized handles are cached per `(family, weight, size)`; the underlying
//! face bytes are fetched and decoded once per `(family, weight)` behind a
//! per-key once-cell, so concurrent requests for a missing font coalesce
//! onto a single load and an auto-fit search over many candidate sizes
//! costs one decode. A face whose whole source chain fails is a terminal
//! error: substituting some system font would silently invalidate every
//! size the auto-fit search measured.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
};

use parking_lot::Mutex;
use rusttype::{Font, Scale};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::fetch;

#[derive(Clone, Debug, Error)]
pub enum FontError {
    #[error("no sources registered for font {family} ({weight})")]
    NoSources { family: String, weight: String },
    #[error("all sources failed for font {family} ({weight}): {detail}")]
    Exhausted {
        family: String,
        weight: String,
        detail: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Regular => "regular",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: FontWeight,
}

impl FaceKey {
    fn new(family: &str, weight: FontWeight) -> Self {
        Self {
            family: family.trim().to_ascii_lowercase(),
            weight,
        }
    }
}

/// One candidate in a face's fallback chain, tried in registration order.
#[derive(Clone, Debug)]
pub enum FontSource {
    /// Caller-supplied TTF bytes, highest priority.
    Bytes(Arc<Vec<u8>>),
    /// File name under the bundled fonts directory.
    Bundled(String),
    /// Mirror URL, fetched with its own timeout.
    Remote(String),
}

/// A face scaled to one pixel size. Cheap to clone and share.
#[derive(Debug)]
pub struct SizedFont {
    pub font: Arc<Font<'static>>,
    pub px: f32,
}

impl SizedFont {
    pub fn scale(&self) -> Scale {
        Scale::uniform(self.px)
    }
}

type FaceCell = Arc<OnceCell<Result<Arc<Font<'static>>, FontError>>>;

pub struct FontService {
    http: reqwest::Client,
    sources: Mutex<HashMap<FaceKey, Vec<FontSource>>>,
    faces: Mutex<HashMap<FaceKey, FaceCell>>,
    sized: Mutex<HashMap<(FaceKey, u32), Arc<SizedFont>>>,
    face_loads: AtomicUsize,
}

/// Family bundled with the repo and used by the card layout.
pub const DEFAULT_FAMILY: &str = "DejaVu Sans";

fn fonts_dir() -> PathBuf {
    if let Ok(p) = std::env::var("CARD_FONTS_DIR") {
        return PathBuf::from(p);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("fonts")
}

impl FontService {
    /// Service with the bundled DejaVu faces plus their npm CDN mirrors.
    pub fn new(http: reqwest::Client) -> Self {
        let svc = Self::empty(http);
        svc.register(
            DEFAULT_FAMILY,
            FontWeight::Regular,
            vec![
                FontSource::Bundled("DejaVuSans.ttf".into()),
                FontSource::Remote(
                    "https://cdn.jsdelivr.net/npm/dejavu-fonts-ttf@2.37.3/ttf/DejaVuSans.ttf".into(),
                ),
                FontSource::Remote(
                    "https://unpkg.com/dejavu-fonts-ttf@2.37.3/ttf/DejaVuSans.ttf".into(),
                ),
            ],
        );
        svc.register(
            DEFAULT_FAMILY,
            FontWeight::Bold,
            vec![
                FontSource::Bundled("DejaVuSans-Bold.ttf".into()),
                FontSource::Remote(
                    "https://cdn.jsdelivr.net/npm/dejavu-fonts-ttf@2.37.3/ttf/DejaVuSans-Bold.ttf"
                        .into(),
                ),
                FontSource::Remote(
                    "https://unpkg.com/dejavu-fonts-ttf@2.37.3/ttf/DejaVuSans-Bold.ttf".into(),
                ),
            ],
        );
        svc
    }

    /// Service with no registered faces (tests, exotic deployments).
    pub fn empty(http: reqwest::Client) -> Self {
        Self {
            http,
            sources: Mutex::new(HashMap::new()),
            faces: Mutex::new(HashMap::new()),
            sized: Mutex::new(HashMap::new()),
            face_loads: AtomicUsize::new(0),
        }
    }

    /// Replace the source chain for a face.
    pub fn register(&self, family: &str, weight: FontWeight, chain: Vec<FontSource>) {
        self.sources
            .lock()
            .insert(FaceKey::new(family, weight), chain);
    }

    /// Prepend caller-supplied bytes to a face's chain.
    pub fn register_bytes(&self, family: &str, weight: FontWeight, bytes: Vec<u8>) {
        let key = FaceKey::new(family, weight);
        let mut sources = self.sources.lock();
        let chain = sources.entry(key).or_default();
        chain.insert(0, FontSource::Bytes(Arc::new(bytes)));
    }

    /// Underlying fetch+decode attempts so far (one per missing face).
    pub fn face_load_count(&self) -> usize {
        self.face_loads.load(Ordering::Relaxed)
    }

    /// Resolve a face at a pixel size. Cached entries are immutable and
    /// shared; a failed load is evicted so a later call can retry.
    pub async fn resolve(
        &self,
        family: &str,
        weight: FontWeight,
        size: u32,
    ) -> Result<Arc<SizedFont>, FontError> {
        let key = FaceKey::new(family, weight);
        if let Some(hit) = self.sized.lock().get(&(key.clone(), size)) {
            return Ok(Arc::clone(hit));
        }

        let font = self.face(&key).await?;
        let handle = Arc::new(SizedFont {
            font,
            px: size as f32,
        });

        let mut sized = self.sized.lock();
        let entry = sized
            .entry((key, size))
            .or_insert_with(|| Arc::clone(&handle));
        Ok(Arc::clone(entry))
    }

    async fn face(&self, key: &FaceKey) -> Result<Arc<Font<'static>>, FontError> {
        let cell = {
            let mut faces = self.faces.lock();
            Arc::clone(faces.entry(key.clone()).or_default())
        };

        let result = cell.get_or_init(|| self.load_face(key)).await.clone();

        if result.is_err() {
            // drop the poisoned cell; the sources may come back
            let mut faces = self.faces.lock();
            if let Some(current) = faces.get(key) {
                if Arc::ptr_eq(current, &cell) {
                    faces.remove(key);
                }
            }
        }
        result
    }

    async fn load_face(&self, key: &FaceKey) -> Result<Arc<Font<'static>>, FontError> {
        self.face_loads.fetch_add(1, Ordering::Relaxed);

        let chain = self.sources.lock().get(key).cloned().unwrap_or_default();
        if chain.is_empty() {
            return Err(FontError::NoSources {
                family: key.family.clone(),
                weight: key.weight.as_str().into(),
            });
        }

        let mut failures = Vec::new();
        for source in chain {
            match self.try_source(&source).await {
                Ok(font) => {
                    tracing::debug!(
                        family = %key.family,
                        weight = key.weight.as_str(),
                        "font face loaded"
                    );
                    return Ok(Arc::new(font));
                }
                Err(why) => failures.push(why),
            }
        }

        Err(FontError::Exhausted {
            family: key.family.clone(),
            weight: key.weight.as_str().into(),
            detail: failures.join("; "),
        })
    }

    async fn try_source(&self, source: &FontSource) -> Result<Font<'static>, String> {
        let bytes = match source {
            FontSource::Bytes(b) => b.as_ref().clone(),
            FontSource::Bundled(name) => {
                let path = fonts_dir().join(name);
                std::fs::read(&path).map_err(|e| format!("{}: {e}", path.display()))?
            }
            FontSource::Remote(url) => fetch::fetch_bytes(&self.http, url)
                .await
                .map_err(|e| e.to_string())?,
        };
        Font::try_from_vec(bytes).ok_or_else(|| match source {
            FontSource::Bytes(_) => "supplied bytes are not a valid font".to_string(),
            FontSource::Bundled(name) => format!("{name}: not a valid font"),
            FontSource::Remote(url) => format!("{url}: not a valid font"),
        })
    }
}
