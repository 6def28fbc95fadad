use crate::bili::BROWSER_USER_AGENT;
use crate::Result;
use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Follows a b23.tv short link one hop and reports the target URL.
///
/// Two strategies exist: hitting b23.tv directly with redirects disabled, and
/// asking a resolver proxy to do the hop on our behalf (useful where b23.tv
/// is unreachable or geo-blocked).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectFollower: Send + Sync {
    /// Strategy name used in logs.
    fn name(&self) -> &'static str;

    /// Resolve `short_url` to its redirect target.
    async fn follow(&self, short_url: &str) -> Result<String>;
}

/// Hits the short link directly with automatic redirects disabled and reads
/// the `Location` header off the 301/302 response.
pub struct DirectFollower {
    client: reqwest::Client,
}

impl DirectFollower {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client for redirect resolution")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectFollower for DirectFollower {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn follow(&self, short_url: &str) -> Result<String> {
        debug!("Following short link {} without redirects", short_url);
        let response = self
            .client
            .get(short_url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", short_url))?;

        let status = response.status();
        if status != StatusCode::MOVED_PERMANENTLY && status != StatusCode::FOUND {
            bail!("Expected a redirect from {}, got HTTP {}", short_url, status);
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .with_context(|| format!("Redirect from {} carried no Location header", short_url))?;

        debug!("Short link {} points at {}", short_url, location);
        Ok(location.to_string())
    }
}

/// Asks a resolver proxy (`GET {endpoint}?url=...`) to follow the short link.
/// The proxy answers with `{"location": "..."}`.
pub struct ProxyFollower {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ProxyReply {
    location: String,
}

impl ProxyFollower {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client for proxy resolution")?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RedirectFollower for ProxyFollower {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn follow(&self, short_url: &str) -> Result<String> {
        debug!("Resolving {} via proxy {}", short_url, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", short_url)])
            .send()
            .await
            .with_context(|| format!("Resolver proxy {} unreachable", self.endpoint))?;

        if !response.status().is_success() {
            bail!(
                "Resolver proxy {} answered HTTP {} for {}",
                self.endpoint,
                response.status(),
                short_url
            );
        }

        let reply: ProxyReply = response
            .json()
            .await
            .context("Resolver proxy returned malformed JSON")?;
        Ok(reply.location)
    }
}
