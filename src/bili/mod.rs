//! Bilibili web API client.
//!
//! All endpoints share the same envelope: `{code, message, data}` with
//! `code == 0` on success. Requests carry a browser user agent and a
//! bilibili.com referer, which the API expects.

pub mod audio;
pub mod metadata;

use crate::Result;
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub use audio::AudioTrack;
pub use metadata::{VideoMetadata, VideoStat};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REFERER: &str = "https://www.bilibili.com/";

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

pub struct BiliClient {
    client: reqwest::Client,
    base_url: String,
}

impl BiliClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static(REFERER),
        );
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build Bilibili API client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base_url}{path}`, unwrap the envelope and return its `data`.
    async fn get_data<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("{} answered HTTP {}", url, response.status());
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .with_context(|| format!("Malformed JSON from {}", url))?;

        if envelope.code != 0 {
            bail!("{} answered code {}: {}", path, envelope.code, envelope.message);
        }
        envelope
            .data
            .with_context(|| format!("{} answered code 0 but carried no data", path))
    }
}
