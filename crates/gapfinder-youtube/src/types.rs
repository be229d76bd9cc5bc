//! `YouTube` Data API v3 response types.
//!
//! Only the fields the catalog reads are modeled. Statistics arrive as
//! decimal strings and are kept that way on [`VideoRecord`] so the analytics
//! coercion rules apply uniformly.

use gapfinder_core::{ChannelInfo, RawCount, VideoRecord};
use serde::Deserialize;

/// Paged list envelope shared by every `*.list` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub video_count: Option<String>,
    #[serde(default)]
    pub view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub uploads: Option<String>,
}

impl From<ChannelItem> for ChannelInfo {
    fn from(item: ChannelItem) -> Self {
        let snippet = item.snippet.unwrap_or_default();
        let stats = item.statistics.as_ref();
        ChannelInfo {
            subscriber_count: stats.and_then(|s| parse_count(s.subscriber_count.as_deref())),
            video_count: stats.and_then(|s| parse_count(s.video_count.as_deref())),
            view_count: stats.and_then(|s| parse_count(s.view_count.as_deref())),
            uploads_playlist_id: item
                .content_details
                .and_then(|d| d.related_playlists.uploads),
            id: item.id,
            title: snippet.title,
            description: snippet.description,
        }
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse().ok())
}

// ---------------------------------------------------------------------------
// search.list (type=channel)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: String,
}

// ---------------------------------------------------------------------------
// playlistItems.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemDetails {
    pub video_id: String,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Absent keys mean the channel hides that counter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

impl From<VideoItem> for VideoRecord {
    fn from(item: VideoItem) -> Self {
        let snippet = item.snippet.unwrap_or_default();
        let stats = item.statistics.unwrap_or_default();
        VideoRecord {
            id: item.id,
            title: snippet.title,
            description: snippet.description,
            view_count: stats.view_count.map(RawCount::Text),
            like_count: stats.like_count.map(RawCount::Text),
            comment_count: stats.comment_count.map(RawCount::Text),
            published_at: snippet.published_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// `{"error": {"code": 403, "message": "...", "errors": [{"reason": "..."}]}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}
