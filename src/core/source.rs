//! Decoded source descriptors and the unified video source representation

use crate::error::VsrcError;
use crate::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Structured plaintext recovered by the decoder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePayload {
    /// Playable streams
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    /// Subtitle and thumbnail tracks
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

/// One stream entry as served by the embed player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Stream URL
    pub file: String,
    /// Streaming format, e.g. "hls"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Quality label, e.g. "1080p"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One track entry as served by the embed player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Track URL
    pub file: String,
    /// Language label, e.g. "English"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Track kind, "captions" unless stated
    #[serde(default = "default_track_kind")]
    pub kind: String,
    /// Whether the player selects this track by default
    #[serde(default)]
    pub default: bool,
}

fn default_track_kind() -> String {
    "captions".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    List(Vec<SourceEntry>),
    Object(SourcePayload),
}

impl SourcePayload {
    /// Parse decoded plaintext.
    ///
    /// Accepts either an object with `sources` and `tracks` or a bare array of
    /// sources. Anything else, including an empty source list, means the keys
    /// were wrong or the upstream format changed.
    pub fn parse(plaintext: &str) -> Result<Self> {
        let payload = match serde_json::from_str::<RawPayload>(plaintext) {
            Ok(RawPayload::List(sources)) => SourcePayload {
                sources,
                tracks: Vec::new(),
            },
            Ok(RawPayload::Object(payload)) => payload,
            Err(err) => {
                return Err(VsrcError::MalformedPayload(format!(
                    "source list is not valid JSON: {}",
                    err
                )))
            }
        };

        if payload.sources.is_empty() {
            return Err(VsrcError::MalformedPayload(
                "source list is empty".to_string(),
            ));
        }
        Ok(payload)
    }

    /// Map into the application's source representation.
    ///
    /// Every source carries all subtitle tracks of the payload.
    pub fn into_video_sources(self) -> Vec<VideoSource> {
        let subtitles: Vec<SubtitleTrack> = self
            .tracks
            .into_iter()
            .filter(|track| track.kind != "thumbnails")
            .map(SubtitleTrack::from)
            .collect();

        self.sources
            .into_iter()
            .map(|entry| {
                let is_m3u8 = entry
                    .format
                    .as_deref()
                    .is_some_and(|format| format.eq_ignore_ascii_case("hls"))
                    || is_m3u8_url(&entry.file);
                VideoSource {
                    url: entry.file,
                    quality: entry.label.unwrap_or_else(|| "auto".to_string()),
                    is_m3u8,
                    subtitles: subtitles.clone(),
                }
            })
            .collect()
    }
}

fn is_m3u8_url(file: &str) -> bool {
    match Url::parse(file) {
        Ok(url) => url.path().ends_with(".m3u8"),
        Err(_) => file.ends_with(".m3u8"),
    }
}

/// Playable video source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Stream URL
    pub url: String,
    /// Quality label, "auto" when the player does not name one
    pub quality: String,
    /// HLS playlist rather than a progressive file
    pub is_m3u8: bool,
    /// Subtitle tracks
    pub subtitles: Vec<SubtitleTrack>,
}

/// Subtitle track attached to a video source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Track URL
    pub url: String,
    /// Language label
    pub lang: String,
    /// Selected by default
    pub is_default: bool,
}

impl From<TrackEntry> for SubtitleTrack {
    fn from(track: TrackEntry) -> Self {
        Self {
            url: track.file,
            lang: track.label.unwrap_or_else(|| "Unknown".to_string()),
            is_default: track.default,
        }
    }
}
