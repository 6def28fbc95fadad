//! Video id resolution.
//!
//! Accepts whatever a user pastes: full bilibili.com URLs, b23.tv short
//! links, bare short codes from share sheets, or a raw BV id. Short links
//! get followed one redirect hop, everything else goes straight to BV id
//! extraction.

pub mod redirect;

use crate::{BilisubError, Config, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, info, warn};

pub use redirect::{DirectFollower, ProxyFollower, RedirectFollower};

static BVID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"BV[a-zA-Z0-9]+").expect("valid BV id pattern"));

/// A Bilibili video id, e.g. `BV1GJ411x7h7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bvid(String);

impl Bvid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bvid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Bvid> for String {
    fn from(bvid: Bvid) -> Self {
        bvid.0
    }
}

/// Find the first BV id anywhere in `text`.
pub fn extract_bvid(text: &str) -> Option<Bvid> {
    BVID_PATTERN
        .find(text)
        .map(|m| Bvid(m.as_str().to_string()))
}

/// Heuristic for inputs that need redirect resolution before a BV id can be
/// extracted: explicit b23.tv links, or short alphanumeric share codes that
/// are clearly not BV ids or full URLs themselves.
pub fn looks_like_short_link(input: &str) -> bool {
    if input.contains("b23.tv/") {
        return true;
    }
    !input.starts_with("BV")
        && !input.contains("bilibili.com")
        && !input.is_empty()
        && input.len() < 15
        && input.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Build the URL to hand to the redirect follower. Bare share codes are
/// assumed to live under b23.tv.
fn normalize_short_url(input: &str) -> String {
    if input.contains("b23.tv/") {
        if input.starts_with("http") {
            input.to_string()
        } else {
            format!("https://{}", input)
        }
    } else {
        format!("https://b23.tv/{}", input)
    }
}

/// Drop tracking query parameters and a single trailing slash from a
/// redirect target.
fn strip_location(location: &str) -> &str {
    let without_query = match location.find('?') {
        Some(idx) => &location[..idx],
        None => location,
    };
    without_query.strip_suffix('/').unwrap_or(without_query)
}

/// Turns arbitrary user input into a [`Bvid`], following b23.tv short links
/// when needed.
pub struct Resolver {
    follower: Box<dyn RedirectFollower>,
}

impl Resolver {
    pub fn new(follower: Box<dyn RedirectFollower>) -> Self {
        Self { follower }
    }

    /// Pick the redirect strategy from configuration: a resolver proxy when
    /// one is configured, direct b23.tv access otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let follower: Box<dyn RedirectFollower> = match &config.api.resolve_proxy {
            Some(endpoint) if !endpoint.is_empty() => {
                Box::new(ProxyFollower::new(endpoint, config.api.timeout_secs)?)
            }
            _ => Box::new(DirectFollower::new(config.api.timeout_secs)?),
        };
        debug!("Using {} short link resolution", follower.name());
        Ok(Self::new(follower))
    }

    /// Resolve `input` to a BV id.
    ///
    /// A failed redirect hop is fatal only when the input explicitly named
    /// b23.tv; ambiguous short codes fall back to direct extraction so that
    /// unusual-but-valid inputs still work.
    pub async fn resolve(&self, input: &str) -> Result<Bvid> {
        let input = input.trim();

        if looks_like_short_link(input) {
            let candidate = normalize_short_url(input);
            info!("Attempting to resolve short link: {}", candidate);
            match self.follower.follow(&candidate).await {
                Ok(location) => {
                    let cleaned = strip_location(&location);
                    debug!("Short link resolved to: {}", cleaned);
                    return extract_bvid(cleaned).ok_or_else(|| {
                        BilisubError::Resolution(format!(
                            "no BV id in resolved URL {} (original input: {})",
                            cleaned, input
                        ))
                        .into()
                    });
                }
                Err(err) => {
                    if input.contains("b23.tv/") {
                        return Err(BilisubError::Resolution(format!(
                            "failed to resolve short link {}: {}",
                            candidate, err
                        ))
                        .into());
                    }
                    warn!(
                        "Could not resolve {} ({}); trying the input as-is",
                        candidate, err
                    );
                }
            }
        }

        extract_bvid(input).ok_or_else(|| {
            BilisubError::Resolution(format!("no BV id found in input: {}", input)).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::redirect::MockRedirectFollower;
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_extract_bvid() {
        assert_eq!(
            extract_bvid("https://www.bilibili.com/video/BV1GJ411x7h7").map(String::from),
            Some("BV1GJ411x7h7".to_string())
        );
        assert_eq!(
            extract_bvid("BV1qt4y1X7TW").map(String::from),
            Some("BV1qt4y1X7TW".to_string())
        );
        assert_eq!(
            extract_bvid("看看这个 BV1GJ411x7h7 视频").map(String::from),
            Some("BV1GJ411x7h7".to_string())
        );
        assert!(extract_bvid("https://example.com/video/123").is_none());
        assert!(extract_bvid("").is_none());
    }

    #[test]
    fn test_short_link_heuristic() {
        assert!(looks_like_short_link("https://b23.tv/abc123"));
        assert!(looks_like_short_link("b23.tv/abc123"));
        assert!(looks_like_short_link("7tX9mkv"));

        assert!(!looks_like_short_link("BV1GJ411x7h7"));
        assert!(!looks_like_short_link(
            "https://www.bilibili.com/video/BV1GJ411x7h7"
        ));
        assert!(!looks_like_short_link("not-a-code!"));
        assert!(!looks_like_short_link("averylongalphanumericstring"));
        assert!(!looks_like_short_link(""));
    }

    #[test]
    fn test_normalize_short_url() {
        assert_eq!(
            normalize_short_url("https://b23.tv/abc123"),
            "https://b23.tv/abc123"
        );
        assert_eq!(normalize_short_url("b23.tv/abc123"), "https://b23.tv/abc123");
        assert_eq!(normalize_short_url("abc123"), "https://b23.tv/abc123");
    }

    #[test]
    fn test_strip_location() {
        assert_eq!(
            strip_location("https://www.bilibili.com/video/BV1GJ411x7h7?share_source=copy_web&t=12"),
            "https://www.bilibili.com/video/BV1GJ411x7h7"
        );
        assert_eq!(
            strip_location("https://www.bilibili.com/video/BV1GJ411x7h7/"),
            "https://www.bilibili.com/video/BV1GJ411x7h7"
        );
        assert_eq!(
            strip_location("https://www.bilibili.com/video/BV1GJ411x7h7/?p=2"),
            "https://www.bilibili.com/video/BV1GJ411x7h7"
        );
        assert_eq!(
            strip_location("https://www.bilibili.com/video/BV1GJ411x7h7"),
            "https://www.bilibili.com/video/BV1GJ411x7h7"
        );
    }

    #[tokio::test]
    async fn test_resolve_full_url_skips_redirect() {
        // No expectations set: any follow() call would panic the test.
        let follower = MockRedirectFollower::new();
        let resolver = Resolver::new(Box::new(follower));

        let bvid = resolver
            .resolve("https://www.bilibili.com/video/BV1GJ411x7h7?p=1")
            .await
            .unwrap();
        assert_eq!(bvid.as_str(), "BV1GJ411x7h7");
    }

    #[tokio::test]
    async fn test_resolve_short_link() {
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .with(eq("https://b23.tv/abc123"))
            .times(1)
            .returning(|_| {
                Ok("https://www.bilibili.com/video/BV1GJ411x7h7/?share_source=copy_web".to_string())
            });
        let resolver = Resolver::new(Box::new(follower));

        let bvid = resolver.resolve("https://b23.tv/abc123").await.unwrap();
        assert_eq!(bvid.as_str(), "BV1GJ411x7h7");
    }

    #[tokio::test]
    async fn test_resolve_bare_code_hits_b23() {
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .with(eq("https://b23.tv/7tX9mkv"))
            .times(1)
            .returning(|_| Ok("https://www.bilibili.com/video/BV1qt4y1X7TW".to_string()));
        let resolver = Resolver::new(Box::new(follower));

        let bvid = resolver.resolve("7tX9mkv").await.unwrap();
        assert_eq!(bvid.as_str(), "BV1qt4y1X7TW");
    }

    #[tokio::test]
    async fn test_resolve_failure_fatal_for_explicit_b23_link() {
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let resolver = Resolver::new(Box::new(follower));

        let err = resolver.resolve("https://b23.tv/broken").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BilisubError>(),
            Some(BilisubError::Resolution(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_failure_falls_back_for_ambiguous_code() {
        // Input trips the short-code heuristic but also carries a BV id;
        // when the redirect hop fails we still extract it directly.
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let resolver = Resolver::new(Box::new(follower));

        let bvid = resolver.resolve("xyzBV1x7h7").await.unwrap();
        assert_eq!(bvid.as_str(), "BV1x7h7");
    }

    #[tokio::test]
    async fn test_resolve_unresolvable_code_reports_input() {
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let resolver = Resolver::new(Box::new(follower));

        let err = resolver.resolve("7tX9mkv").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("7tX9mkv"), "unexpected error: {}", message);
    }

    #[tokio::test]
    async fn test_resolve_redirect_without_bvid_is_an_error() {
        let mut follower = MockRedirectFollower::new();
        follower
            .expect_follow()
            .returning(|_| Ok("https://www.bilibili.com/blackboard/activity".to_string()));
        let resolver = Resolver::new(Box::new(follower));

        let err = resolver.resolve("https://b23.tv/abc123").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BilisubError>(),
            Some(BilisubError::Resolution(_))
        ));
    }
}
