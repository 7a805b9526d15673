//! Remote byte acquisition (background photos, font mirrors).
//!
//! Every attempt carries its own timeout so a dead mirror cannot stall a
//! render; retry policy lives with the caller's fallback list, not here.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Hard cap on fetched payloads (backgrounds and fonts alike).
const MAX_FETCH_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http: {0}")]
    Http(String),
    #[error("fetch timed out after {0:?}: {1}")]
    Timeout(Duration, String),
    #[error("remote returned {status}: {url}")]
    Status { status: StatusCode, url: String },
    #[error("payload too large ({0} bytes): {1}")]
    TooLarge(usize, String),
}

fn fetch_timeout() -> Duration {
    let ms = std::env::var("FONT_FETCH_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5_000);
    Duration::from_millis(ms)
}

/// Download `url` with the default per-attempt timeout.
pub async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    fetch_bytes_with_timeout(http, url, fetch_timeout()).await
}

pub async fn fetch_bytes_with_timeout(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let resp = http
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify(e, timeout, url))?;

    if !resp.status().is_success() {
        return Err(FetchError::Status {
            status: resp.status(),
            url: url.to_string(),
        });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| classify(e, timeout, url))?;
    if bytes.len() > MAX_FETCH_BYTES {
        return Err(FetchError::TooLarge(bytes.len(), url.to_string()));
    }
    Ok(bytes.to_vec())
}

fn classify(e: reqwest::Error, timeout: Duration, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(timeout, url.to_string())
    } else {
        FetchError::Http(e.to_string())
    }
}
