use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::card::fonts::FontService;

/// Shared per-process state: one HTTP client, one font cache, and a
/// semaphore bounding concurrent rasterization to the available cores.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub fonts: Arc<FontService>,
    pub render_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new() -> Self {
        let http = reqwest::Client::new();
        let fonts = Arc::new(FontService::new(http.clone()));
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            http,
            fonts,
            render_slots: Arc::new(Semaphore::new(parallelism)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
