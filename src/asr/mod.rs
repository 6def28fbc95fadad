//! Client for the Whisper-style ASR job service.
//!
//! The service exposes two endpoints: `POST /submit` queues a transcription
//! (or answers straight from its cache) and `GET /get/{job_id}` reports job
//! status. Transcription options are fixed: JSON output, auto language
//! detection, word-level timestamps and voice-activity filtering.

use crate::utils::validate_and_normalize_url;
use crate::Result;
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Job record as the service reports it, shared by `/submit` and `/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct AsrJob {
    pub job_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cached: bool,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// The coordinator talks to the ASR service through this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a transcription request for `audio_url`, deduplicated
    /// server-side by `audio_id`.
    async fn submit(&self, audio_url: &str, audio_id: &str) -> Result<AsrJob>;

    /// Look up the current state of a job.
    async fn get(&self, job_id: &str) -> Result<AsrJob>;
}

pub struct AsrClient {
    client: reqwest::Client,
    base_url: String,
}

impl AsrClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        if base_url.trim().is_empty() {
            bail!("ASR service endpoint is not configured");
        }
        let base_url = validate_and_normalize_url(base_url)
            .context("Invalid ASR service endpoint")?
            .trim_end_matches('/')
            .to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build ASR service client")?;
        Ok(Self { client, base_url })
    }

    async fn read_job(&self, response: reqwest::Response) -> Result<AsrJob> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("ASR service answered HTTP {}: {}", status, body.trim());
        }
        response
            .json()
            .await
            .context("ASR service returned malformed JSON")
    }
}

#[async_trait]
impl JobService for AsrClient {
    async fn submit(&self, audio_url: &str, audio_id: &str) -> Result<AsrJob> {
        let url = format!("{}/submit", self.base_url);
        debug!("POST {} audio_id={}", url, audio_id);
        let response = self
            .client
            .post(&url)
            .query(&[
                ("audio_url", audio_url),
                ("audio_id", audio_id),
                ("output", "json"),
                ("task", "transcribe"),
                ("language", "auto"),
                ("word_timestamps", "true"),
                ("vad_filter", "true"),
            ])
            .send()
            .await
            .with_context(|| format!("Submit request to {} failed", url))?;
        self.read_job(response).await
    }

    async fn get(&self, job_id: &str) -> Result<AsrJob> {
        let url = format!("{}/get/{}", self.base_url, job_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Status request to {} failed", url))?;
        self.read_job(response).await
    }
}
