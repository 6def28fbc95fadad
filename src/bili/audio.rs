//! Audio track location.
//!
//! Queries the stream-manifest (playurl) endpoint and picks the
//! highest-bandwidth audio track from the DASH manifest. Older videos only
//! expose a combined `durl` stream list, which serves as a fallback.

use super::BiliClient;
use crate::resolver::Bvid;
use crate::{BilisubError, Result};
use anyhow::Context;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PlayUrlData {
    dash: Option<Dash>,
    durl: Option<Vec<DurlItem>>,
}

#[derive(Debug, Deserialize)]
struct Dash {
    #[serde(default)]
    audio: Vec<AudioTrack>,
}

/// One audio entry from a DASH manifest. The API emits the URL under both
/// `baseUrl` and `base_url`, so both spellings are kept optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioTrack {
    #[serde(rename = "baseUrl")]
    base_url_camel: Option<String>,
    base_url: Option<String>,
    #[serde(default)]
    pub bandwidth: u64,
}

impl AudioTrack {
    pub fn url(&self) -> Option<&str> {
        self.base_url_camel.as_deref().or(self.base_url.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct DurlItem {
    url: String,
}

/// Selection rule: maximum bandwidth among DASH audio tracks, first one wins
/// ties; otherwise the first legacy stream. Returns the bandwidth only for
/// DASH picks.
fn select_audio(data: &PlayUrlData) -> Option<(String, Option<u64>)> {
    if let Some(dash) = &data.dash {
        let best = dash
            .audio
            .iter()
            .filter(|track| track.url().is_some())
            .reduce(|best, track| {
                if track.bandwidth > best.bandwidth {
                    track
                } else {
                    best
                }
            });
        if let Some(track) = best {
            if let Some(url) = track.url() {
                return Some((url.to_string(), Some(track.bandwidth)));
            }
        }
    }
    data.durl
        .as_ref()
        .and_then(|list| list.first())
        .map(|item| (item.url.clone(), None))
}

impl BiliClient {
    /// Find a playable audio stream URL for one video page.
    pub async fn locate_audio(&self, bvid: &Bvid, cid: u64) -> Result<String> {
        let cid_text = cid.to_string();
        let data: PlayUrlData = self
            .get_data(
                "/x/player/playurl",
                &[
                    ("bvid", bvid.as_str()),
                    ("cid", &cid_text),
                    // qn 64 is a moderate tier; fnval 16 requests a DASH
                    // manifest with separate audio tracks.
                    ("qn", "64"),
                    ("fnval", "16"),
                ],
            )
            .await
            .with_context(|| format!("Failed to fetch stream manifest for {}", bvid))?;

        match select_audio(&data) {
            Some((url, Some(bandwidth))) => {
                info!(
                    "Selected audio track at {} bps for {} (cid {})",
                    bandwidth, bvid, cid
                );
                Ok(url)
            }
            Some((url, None)) => {
                info!("No DASH audio for {} (cid {}); using legacy stream", bvid, cid);
                Ok(url)
            }
            None => Err(BilisubError::AudioNotFound(format!("{} (cid {})", bvid, cid)).into()),
        }
    }
}
