use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bilisub",
    about = "Bilisub - Fetch Bilibili video info and generate AI subtitles",
    version,
    long_about = "A CLI tool for Bilibili videos: resolve b23.tv short links, show share-card style video info, and generate subtitles by sending the video's audio stream to a Whisper-style transcription service. Optionally summarizes the transcript with an LLM."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reduce logging to warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show video info as a share card
    Info {
        /// Video URL, BVID, b23.tv short link, or text containing one
        #[arg(value_name = "INPUT")]
        input: String,

        /// Print raw metadata as JSON instead of the card
        #[arg(long)]
        json: bool,
    },

    /// Generate subtitles for a video through the transcription service
    Transcribe {
        /// Video URL, BVID, b23.tv short link, or text containing one
        #[arg(value_name = "INPUT")]
        input: String,

        /// Transcribe a specific part (cid) instead of the first one
        #[arg(long, value_name = "CID")]
        cid: Option<u64>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (falls back to the configured default)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep traditional Chinese instead of converting to simplified
        #[arg(long)]
        no_simplify: bool,
    },

    /// Resolve an input to its BVID and canonical URL
    Resolve {
        /// Video URL, BVID, b23.tv short link, or text containing one
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Transcribe a video and summarize the transcript with an LLM
    Summarize {
        /// Video URL, BVID, b23.tv short link, or text containing one
        #[arg(value_name = "INPUT")]
        input: String,

        /// Summarize a specific part (cid) instead of the first one
        #[arg(long, value_name = "CID")]
        cid: Option<u64>,

        /// Custom summarization prompt
        #[arg(long, value_name = "TEXT")]
        prompt: Option<String>,
    },

    /// Show the configuration or where it lives
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain transcript text
    Text,
    /// JSON with segments and word timings
    Json,
    /// SRT subtitle format
    Srt,
    /// WebVTT format
    Vtt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
        }
    }
}
