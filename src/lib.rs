//! bilisub - A Rust CLI tool for Bilibili video info and AI subtitles
//!
//! This library resolves Bilibili links (including b23.tv short links) to a
//! canonical BV id, aggregates video metadata, locates the audio stream for a
//! page, and drives an external Whisper-style ASR job service through
//! submission and polling until subtitles are available.

pub mod asr;
pub mod bili;
pub mod cli;
pub mod config;
pub mod llm;
pub mod normalize;
pub mod output;
pub mod resolver;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use resolver::{Bvid, Resolver};
pub use transcribe::{JobCoordinator, JobStatus, JobSubmission, SubtitleResult};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the subtitle pipeline
#[derive(thiserror::Error, Debug)]
pub enum BilisubError {
    #[error("Could not resolve a video id: {0}")]
    Resolution(String),

    #[error("No audio track found: {0}")]
    AudioNotFound(String),

    #[error("Transcription submit failed: {0}")]
    JobSubmission(String),

    #[error("Transcription status lookup failed: {0}")]
    JobLookup(String),

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("Transcription did not finish within {attempts} polls ({seconds}s)")]
    PollingTimeout { attempts: u32, seconds: u64 },
}
