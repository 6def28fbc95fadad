//! Metadata aggregation.
//!
//! One required call (the view endpoint) plus two best-effort enrichment
//! calls: follower count for the uploader and live watching counts. The
//! enrichment calls degrade to missing values instead of failing the whole
//! lookup.

use super::BiliClient;
use crate::resolver::Bvid;
use crate::utils::format_count;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Aggregated record behind the info card.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub bvid: String,
    /// Sub-resource id of the first page; transcription targets this unless
    /// the caller overrides it.
    pub cid: u64,
    pub title: String,
    pub description: String,
    pub cover_url: String,
    pub owner_name: String,
    pub owner_mid: Option<u64>,
    pub follower_count: Option<u64>,
    pub stat: VideoStat,
    /// Display-ready watching counts; the endpoint mixes numbers and strings
    /// like "1000+", so these are formatted at fetch time.
    pub watching_total: Option<String>,
    pub watching_web: Option<String>,
    pub url: String,
    /// When this snapshot was taken; the live counts go stale quickly.
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VideoStat {
    #[serde(default)]
    pub view: u64,
    #[serde(default)]
    pub danmaku: u64,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub coin: u64,
    #[serde(default)]
    pub favorite: u64,
    #[serde(default)]
    pub share: u64,
}

#[derive(Debug, Deserialize)]
struct ViewData {
    bvid: String,
    cid: u64,
    title: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    pic: String,
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    stat: VideoStat,
}

#[derive(Debug, Default, Deserialize)]
struct Owner {
    #[serde(default)]
    name: String,
    mid: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RelationData {
    #[serde(default)]
    follower: u64,
}

#[derive(Debug, Deserialize)]
struct OnlineData {
    total: Option<CountField>,
    web_online: Option<CountField>,
    count: Option<CountField>,
}

/// The online endpoint reports counts either as numbers or as capped strings
/// like "1000+".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountField {
    Number(u64),
    Text(String),
}

fn display_count(field: CountField) -> String {
    match field {
        CountField::Number(n) => format_count(n),
        CountField::Text(s) => s,
    }
}

impl BiliClient {
    /// Fetch and aggregate everything the info card needs.
    pub async fn fetch_metadata(&self, bvid: &Bvid) -> Result<VideoMetadata> {
        let view: ViewData = self
            .get_data("/x/web-interface/view", &[("bvid", bvid.as_str())])
            .await
            .with_context(|| format!("Failed to fetch video info for {}", bvid))?;

        let follower_count = match view.owner.mid {
            Some(mid) => self.fetch_follower_count(mid).await,
            None => None,
        };
        let (watching_total, watching_web) = self.fetch_watching_counts(&view.bvid, view.cid).await;

        let url = format!("https://www.bilibili.com/video/{}", view.bvid);
        Ok(VideoMetadata {
            bvid: view.bvid,
            cid: view.cid,
            title: view.title,
            description: view.desc,
            cover_url: view.pic,
            owner_name: view.owner.name,
            owner_mid: view.owner.mid,
            follower_count,
            stat: view.stat,
            watching_total,
            watching_web,
            url,
            fetched_at: chrono::Utc::now(),
        })
    }

    async fn fetch_follower_count(&self, mid: u64) -> Option<u64> {
        let mid_text = mid.to_string();
        match self
            .get_data::<RelationData>("/x/relation/stat", &[("vmid", &mid_text)])
            .await
        {
            Ok(data) => Some(data.follower),
            Err(err) => {
                warn!("Follower lookup for mid {} failed: {}", mid, err);
                None
            }
        }
    }

    async fn fetch_watching_counts(
        &self,
        bvid: &str,
        cid: u64,
    ) -> (Option<String>, Option<String>) {
        let cid_text = cid.to_string();
        match self
            .get_data::<OnlineData>("/x/player/online/total", &[("bvid", bvid), ("cid", &cid_text)])
            .await
        {
            Ok(data) => {
                let total = data.total.map(display_count);
                let web = data.web_online.or(data.count).map(display_count);
                (total, web)
            }
            Err(err) => {
                warn!("Watching-count lookup for {} failed: {}", bvid, err);
                (None, None)
            }
        }
    }
}
