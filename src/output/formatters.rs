//! Renderers for subtitle results and the video info card.

use anyhow::Result;

use crate::bili::VideoMetadata;
use crate::transcribe::SubtitleResult;
use crate::utils::{format_count, format_srt_timestamp, format_vtt_timestamp};

/// Plain transcript text.
pub fn format_as_text(result: &SubtitleResult) -> String {
    result.text.trim().to_string()
}

/// Full result as pretty-printed JSON, segments and word timings included.
pub fn format_as_json(result: &SubtitleResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// SRT subtitle file. Untimed results (no segments) render as an empty body.
pub fn format_as_srt(result: &SubtitleResult) -> String {
    let mut srt = String::new();
    for (i, segment) in result.segments.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(segment.start),
            format_srt_timestamp(segment.end),
            segment.text.trim()
        ));
    }
    srt
}

/// WebVTT subtitle file.
pub fn format_as_vtt(result: &SubtitleResult) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    for (i, segment) in result.segments.iter().enumerate() {
        vtt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_vtt_timestamp(segment.start),
            format_vtt_timestamp(segment.end),
            segment.text.trim()
        ));
    }
    vtt
}

/// Render the info card in the layout of the Bilibili share card.
///
/// Optional enrichments (fan count, watching counts) are left out entirely
/// when unavailable or zero rather than shown as placeholders.
pub fn format_metadata_card(meta: &VideoMetadata) -> String {
    let mut lines = Vec::new();

    lines.push(format!("标题: {}", meta.title));

    let owner = if meta.owner_name.is_empty() {
        "N/A"
    } else {
        meta.owner_name.as_str()
    };
    let fans = meta
        .follower_count
        .filter(|n| *n > 0)
        .map(|n| format!(" 粉丝: {}", format_count(n)))
        .unwrap_or_default();
    lines.push(format!("UP主: {}{}", owner, fans));

    lines.push(format!(
        "👀播放: {} 💬弹幕: {}",
        format_count(meta.stat.view),
        format_count(meta.stat.danmaku)
    ));
    lines.push(format!(
        "👍点赞: {} 💰投币: {}",
        format_count(meta.stat.like),
        format_count(meta.stat.coin)
    ));
    lines.push(format!(
        "📁收藏: {} 🔗分享: {}",
        format_count(meta.stat.favorite),
        format_count(meta.stat.share)
    ));

    let description = if meta.description.is_empty() {
        "无"
    } else {
        meta.description.as_str()
    };
    lines.push(format!("📝简介: {}", description));

    if let Some(total) = shown_count(&meta.watching_total) {
        let web = shown_count(&meta.watching_web)
            .map(|w| format!("，{} 人在网页端观看", w))
            .unwrap_or_default();
        lines.push(format!("🏄‍♂️ 总共 {} 人在观看{}", total, web));
    }

    lines.push(meta.url.clone());
    lines.join("\n")
}

fn shown_count(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bili::VideoStat;
    use crate::transcribe::SubtitleSegment;

    fn sample_result() -> SubtitleResult {
        SubtitleResult {
            text: "大家好 欢迎收看".to_string(),
            segments: vec![
                SubtitleSegment {
                    start: 0.0,
                    end: 2.5,
                    text: "大家好".to_string(),
                    words: None,
                },
                SubtitleSegment {
                    start: 2.5,
                    end: 5.0,
                    text: "欢迎收看".to_string(),
                    words: None,
                },
            ],
        }
    }

    fn sample_metadata() -> VideoMetadata {
        VideoMetadata {
            bvid: "BV1GJ411x7h7".to_string(),
            cid: 124_627_730,
            title: "【官方 MV】Never Gonna Give You Up".to_string(),
            description: "现代经典".to_string(),
            cover_url: "https://i0.hdslb.com/bfs/archive/cover.jpg".to_string(),
            owner_name: "某UP主".to_string(),
            owner_mid: Some(12345),
            follower_count: Some(1_250_000),
            stat: VideoStat {
                view: 1_500_000,
                danmaku: 2300,
                like: 98_000,
                coin: 45_000,
                favorite: 32_000,
                share: 8700,
            },
            watching_total: Some("1000+".to_string()),
            watching_web: Some("523".to_string()),
            url: "https://www.bilibili.com/video/BV1GJ411x7h7".to_string(),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_srt_numbering_and_timestamps() {
        let srt = format_as_srt(&sample_result());
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,500\n大家好\n\n\
             2\n00:00:02,500 --> 00:00:05,000\n欢迎收看\n\n"
        );
    }

    #[test]
    fn test_srt_without_segments_is_empty() {
        let result = SubtitleResult {
            text: "untimed".to_string(),
            segments: Vec::new(),
        };
        assert_eq!(format_as_srt(&result), "");
    }

    #[test]
    fn test_vtt_header_and_dot_separator() {
        let vtt = format_as_vtt(&sample_result());
        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:02.500 --> 00:00:05.000"));
    }

    #[test]
    fn test_text_is_trimmed_transcript() {
        let result = SubtitleResult {
            text: "  hello  ".to_string(),
            segments: Vec::new(),
        };
        assert_eq!(format_as_text(&result), "hello");
    }

    #[test]
    fn test_json_includes_segments() {
        let json = format_as_json(&sample_result()).unwrap();
        assert!(json.contains("\"segments\""));
        assert!(json.contains("大家好"));
    }

    #[test]
    fn test_card_full_layout() {
        let card = format_metadata_card(&sample_metadata());
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "标题: 【官方 MV】Never Gonna Give You Up");
        assert_eq!(lines[1], "UP主: 某UP主 粉丝: 125.0万");
        assert_eq!(lines[2], "👀播放: 150.0万 💬弹幕: 2300");
        assert_eq!(lines[3], "👍点赞: 9.8万 💰投币: 4.5万");
        assert_eq!(lines[4], "📁收藏: 3.2万 🔗分享: 8700");
        assert_eq!(lines[5], "📝简介: 现代经典");
        assert_eq!(lines[6], "🏄‍♂️ 总共 1000+ 人在观看，523 人在网页端观看");
        assert_eq!(lines[7], "https://www.bilibili.com/video/BV1GJ411x7h7");
    }

    #[test]
    fn test_card_omits_unavailable_enrichments() {
        let mut meta = sample_metadata();
        meta.follower_count = None;
        meta.watching_total = Some("0".to_string());
        meta.watching_web = None;
        let card = format_metadata_card(&meta);
        assert!(card.contains("UP主: 某UP主\n"));
        assert!(!card.contains("粉丝"));
        assert!(!card.contains("人在观看"));
    }

    #[test]
    fn test_card_placeholders_for_missing_text() {
        let mut meta = sample_metadata();
        meta.owner_name = String::new();
        meta.description = String::new();
        let card = format_metadata_card(&meta);
        assert!(card.contains("UP主: N/A"));
        assert!(card.contains("📝简介: 无"));
    }

    #[test]
    fn test_card_keeps_watching_total_without_web_count() {
        let mut meta = sample_metadata();
        meta.watching_web = Some("0".to_string());
        let card = format_metadata_card(&meta);
        assert!(card.contains("🏄‍♂️ 总共 1000+ 人在观看"));
        assert!(!card.contains("网页端"));
    }
}
