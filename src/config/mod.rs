//! Configuration management.
//!
//! Settings are stored in a YAML file under the platform config directory
//! (`~/.config/bilisub/config.yaml` on Linux). A `config.yaml` in the
//! current directory takes precedence, which keeps per-project overrides
//! easy. A default file is written on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bilibili web API settings
    pub api: ApiConfig,

    /// Speech recognition service settings
    pub asr: AsrConfig,

    /// Job polling behavior
    pub polling: PollingConfig,

    /// LLM summarization settings
    pub llm: LlmConfig,

    /// General application behavior
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the Bilibili web API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Optional proxy endpoint for following b23.tv short links.
    /// When unset, redirects are followed directly.
    pub resolve_proxy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Transcription service endpoint (e.g. http://localhost:9000)
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds to wait between status checks
    pub interval_secs: u64,

    /// Give up after this many status checks
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API endpoint
    pub endpoint: String,

    /// API key for the LLM service
    pub api_key: String,

    /// Model to use for summarization
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Convert traditional Chinese subtitles to simplified
    pub simplify: bool,

    /// Default output format (text, json, srt, vtt)
    pub default_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.bilibili.com".to_string(),
                timeout_secs: 30,
                resolve_proxy: None,
            },
            asr: AsrConfig {
                endpoint: "http://localhost:9000".to_string(),
                timeout_secs: 60,
            },
            polling: PollingConfig {
                interval_secs: 10,
                max_attempts: 90,
            },
            llm: LlmConfig {
                endpoint: "https://api.openai.com/v1".to_string(),
                api_key: String::new(),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 120,
            },
            app: AppConfig {
                simplify: true,
                default_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration, creating a default file if none exists.
    pub async fn load() -> Result<Self> {
        // A config.yaml next to the invocation wins over the global one.
        let local = PathBuf::from("config.yaml");
        let path = if local.exists() {
            debug!("Using local config.yaml");
            local
        } else {
            Self::config_path()?
        };

        if !path.exists() {
            info!("No config found, creating default at {}", path.display());
            let config = Self::default();
            config.save().await?;
            return Ok(config);
        }

        let contents = fs_err::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to the global config file.
    pub async fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs_err::write(&path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Path to the global config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("bilisub");
        Ok(dir.join("config.yaml"))
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.asr.endpoint.is_empty() {
            anyhow::bail!("asr.endpoint must not be empty");
        }
        if self.polling.interval_secs == 0 {
            anyhow::bail!("polling.interval_secs must be at least 1");
        }
        if self.polling.max_attempts == 0 {
            anyhow::bail!("polling.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Print the active configuration to stdout.
    pub fn display(&self) {
        println!("Current configuration:");
        println!("  Bilibili API: {}", self.api.base_url);
        match &self.api.resolve_proxy {
            Some(proxy) => println!("  Resolve proxy: {proxy}"),
            None => println!("  Resolve proxy: (direct)"),
        }
        println!("  ASR endpoint: {}", self.asr.endpoint);
        println!(
            "  Polling: every {}s, up to {} attempts",
            self.polling.interval_secs, self.polling.max_attempts
        );
        println!("  LLM endpoint: {}", self.llm.endpoint);
        println!("  LLM model: {}", self.llm.model);
        if self.llm.api_key.is_empty() {
            println!("  LLM API key: (not set)");
        } else {
            println!("  LLM API key: ****");
        }
        println!("  Simplify subtitles: {}", self.app.simplify);
        println!("  Default format: {}", self.app.default_format);
    }
}
