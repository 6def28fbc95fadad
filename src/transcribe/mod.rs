//! Transcription job coordination.
//!
//! The coordinator drives the subtitle workflow against the external ASR
//! service: locate the audio stream, derive the cache key, submit, then poll
//! until the job reaches a terminal state. Job state and the result cache
//! live entirely on the service side; the coordinator is a stateless,
//! re-entrant client over them, so every poll is a fresh round trip and
//! concurrent submissions for the same video page converge on one
//! server-side job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::asr::{AsrClient, JobService};
use crate::bili::BiliClient;
use crate::config::Config;
use crate::resolver::Bvid;
use crate::{BilisubError, Result};

pub mod poller;
pub mod result;

pub use result::{SubtitleResult, SubtitleSegment, SubtitleWord};

/// Lifecycle of a transcription job as observed through polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Map the service's status strings onto the four states. Unknown values
    /// count as pending.
    pub fn from_service(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "completed" | "done" => Self::Completed,
            "failed" | "error" => Self::Failed,
            "processing" | "started" | "running" | "in_progress" => Self::Processing,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// What `submit` hands back: a finished result on a cache hit, otherwise a
/// job handle to poll.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub job_id: String,
    pub status: JobStatus,
    pub cached: bool,
    pub result: Option<SubtitleResult>,
    pub error: Option<String>,
}

/// One poll round trip.
#[derive(Debug, Clone)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub result: Option<SubtitleResult>,
    pub error: Option<String>,
}

/// Cache key the ASR service uses to deduplicate transcription requests.
/// The same (bvid, cid) pair always maps to the same key, which is what
/// gives at-most-one-effective-transcription-per-resource semantics without
/// any local locking.
pub fn audio_cache_key(bvid: &str, cid: u64) -> String {
    format!("bili:{}:{}", bvid, cid)
}

/// Main transcription coordinator
pub struct JobCoordinator {
    bili: BiliClient,
    service: Box<dyn JobService>,
    simplify: bool,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl JobCoordinator {
    /// Create a coordinator wired to the configured Bilibili API and ASR
    /// service endpoints.
    pub fn new(config: &Config) -> Result<Self> {
        let bili = BiliClient::new(&config.api.base_url, config.api.timeout_secs)?;
        let service = AsrClient::new(&config.asr.endpoint, config.asr.timeout_secs)?;
        Ok(Self::with_service(
            bili,
            Box::new(service),
            config.app.simplify,
            Duration::from_secs(config.polling.interval_secs),
            config.polling.max_attempts,
        ))
    }

    /// Create a coordinator over an explicit job service implementation.
    pub fn with_service(
        bili: BiliClient,
        service: Box<dyn JobService>,
        simplify: bool,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Self {
        Self {
            bili,
            service,
            simplify,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Submit a transcription job for one video page. Locates the audio
    /// stream, derives the cache key, and hands both to the ASR service; a
    /// cached result comes back already parsed, so no polling is needed.
    pub async fn submit(&self, bvid: &Bvid, cid: u64) -> Result<JobSubmission> {
        let audio_url = self.bili.locate_audio(bvid, cid).await?;
        let cache_key = audio_cache_key(bvid.as_str(), cid);
        self.submit_audio(&audio_url, &cache_key).await
    }

    /// Submit an already-located audio stream under the given cache key.
    pub async fn submit_audio(&self, audio_url: &str, cache_key: &str) -> Result<JobSubmission> {
        info!("Submitting transcription job (cache key {})", cache_key);
        let job = self
            .service
            .submit(audio_url, cache_key)
            .await
            .map_err(|err| BilisubError::JobSubmission(format!("{:#}", err)))?;

        let status = JobStatus::from_service(&job.status);
        if job.cached {
            debug!("Cache hit for {}", cache_key);
        }

        let result = match (status, job.result) {
            (JobStatus::Completed, Some(raw)) => {
                Some(SubtitleResult::from_raw(raw, self.simplify)?)
            }
            _ => None,
        };

        Ok(JobSubmission {
            job_id: job.job_id,
            status,
            cached: job.cached,
            result,
            error: job.error,
        })
    }

    /// One status round trip for a submitted job.
    pub async fn poll(&self, job_id: &str) -> Result<JobStatusReport> {
        debug!("Polling job {}", job_id);
        let job = self
            .service
            .get(job_id)
            .await
            .map_err(|err| BilisubError::JobLookup(format!("{:#}", err)))?;

        let status = JobStatus::from_service(&job.status);
        let result = match (status, job.result) {
            (JobStatus::Completed, Some(raw)) => {
                Some(SubtitleResult::from_raw(raw, self.simplify)?)
            }
            _ => None,
        };

        Ok(JobStatusReport {
            status,
            result,
            error: job.error,
        })
    }
}
