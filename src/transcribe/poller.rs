//! Client-side polling loop.
//!
//! Fixed-interval, sequential polling with a bounded attempt count: a new
//! poll is scheduled only after the previous one resolves, and exceeding the
//! ceiling synthesizes a timeout failure distinct from a service-reported
//! one. Submissions that already carry a result or a failure never enter
//! the loop.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;
use tracing::{debug, info};

use super::{JobCoordinator, JobStatus, JobSubmission, SubtitleResult};
use crate::{BilisubError, Result};

impl JobCoordinator {
    /// Drive a submission to its subtitles: a failed submission is reported
    /// immediately with the message it carried, an attached result is
    /// returned as-is, anything else is polled to completion.
    pub async fn complete(&self, submission: JobSubmission) -> Result<SubtitleResult> {
        if submission.status == JobStatus::Failed {
            let reason = submission
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(BilisubError::JobFailed(reason).into());
        }
        match submission.result {
            Some(result) => {
                info!("Job {} served from the service cache", submission.job_id);
                Ok(result)
            }
            None => self.poll_until_complete(&submission.job_id).await,
        }
    }

    /// Poll until the job completes, fails, or the attempt ceiling is hit.
    pub async fn poll_until_complete(&self, job_id: &str) -> Result<SubtitleResult> {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        progress.set_message("Waiting for transcription job...");

        let start_time = std::time::Instant::now();

        for attempt in 1..=self.max_poll_attempts {
            let report = match self.poll(job_id).await {
                Ok(report) => report,
                Err(err) => {
                    progress.finish_with_message("Status lookup failed");
                    return Err(err);
                }
            };

            match report.status {
                JobStatus::Completed => {
                    progress.finish_with_message("Transcription completed!");
                    return report.result.ok_or_else(|| {
                        BilisubError::JobLookup(format!(
                            "job {} completed without a result",
                            job_id
                        ))
                        .into()
                    });
                }
                JobStatus::Failed => {
                    progress.finish_with_message("Transcription failed");
                    let reason = report
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(BilisubError::JobFailed(reason).into());
                }
                JobStatus::Processing => {
                    progress.set_message(format!(
                        "Transcribing... ({}s elapsed, check #{})",
                        start_time.elapsed().as_secs(),
                        attempt
                    ));
                }
                JobStatus::Pending => {
                    progress.set_message(format!(
                        "Waiting in queue... ({}s elapsed, check #{})",
                        start_time.elapsed().as_secs(),
                        attempt
                    ));
                }
            }

            debug!("Job {} is {} after check #{}", job_id, report.status, attempt);
            if attempt < self.max_poll_attempts {
                sleep(self.poll_interval).await;
            }
        }

        progress.finish_with_message("Transcription timed out");
        Err(BilisubError::PollingTimeout {
            attempts: self.max_poll_attempts,
            seconds: u64::from(self.max_poll_attempts) * self.poll_interval.as_secs(),
        }
        .into())
    }
}
