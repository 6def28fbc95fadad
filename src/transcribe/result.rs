use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::normalize::to_simplified;
use crate::Result;

/// Parsed transcription result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleResult {
    /// Full transcript text
    #[serde(default)]
    pub text: String,

    /// Time-ordered subtitle segments
    #[serde(default)]
    pub segments: Vec<SubtitleSegment>,
}

/// Individual subtitle segment with timing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSegment {
    /// Start time in seconds
    #[serde(default)]
    pub start: f64,

    /// End time in seconds
    #[serde(default)]
    pub end: f64,

    /// Segment text
    #[serde(default)]
    pub text: String,

    /// Word-level timestamps, when the service provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<SubtitleWord>>,
}

/// Word-level timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleWord {
    #[serde(default)]
    pub start: f64,

    #[serde(default)]
    pub end: f64,

    #[serde(default)]
    pub word: String,

    /// Recognition confidence (0.0 to 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl SubtitleResult {
    /// Build a result from whatever the service put in its `result` field: a
    /// JSON-encoded string, a plain-text transcript, or an already-structured
    /// object. Strings are tried as JSON first and fall back to being the
    /// transcript itself.
    pub fn from_raw(raw: serde_json::Value, simplify: bool) -> Result<Self> {
        let mut parsed = match raw {
            serde_json::Value::String(text) => {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(value @ serde_json::Value::Object(_)) => Self::from_object(value)?,
                    _ => Self {
                        text,
                        segments: Vec::new(),
                    },
                }
            }
            value @ serde_json::Value::Object(_) => Self::from_object(value)?,
            other => bail!("Unrecognized transcription result shape: {}", other),
        };

        parsed
            .segments
            .sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        if parsed.text.is_empty() && !parsed.segments.is_empty() {
            parsed.text = parsed.segments.iter().map(|s| s.text.as_str()).collect();
        }
        if simplify {
            parsed.normalize_text();
        }
        Ok(parsed)
    }

    fn from_object(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("Malformed transcription result object")
    }

    /// Convert every text field to simplified Chinese.
    fn normalize_text(&mut self) {
        self.text = to_simplified(&self.text);
        for segment in &mut self.segments {
            segment.text = to_simplified(&segment.text);
            if let Some(words) = &mut segment.words {
                for word in words {
                    word.word = to_simplified(&word.word);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.segments.is_empty()
    }
}
