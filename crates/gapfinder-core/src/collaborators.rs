//! Narrow contracts for the external systems around the analytics engine.
//!
//! The engine itself never calls these; the channel pipeline does. Each
//! adapter crate implements one trait, and tests substitute in-memory fakes.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::analysis::ChannelAnalysis;
use crate::gaps::{ContentGap, TopicAggregate};
use crate::video::VideoRecord;

/// Basic channel metadata returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subscriber_count: Option<u64>,
    pub video_count: Option<u64>,
    pub view_count: Option<u64>,
    /// Playlist holding every upload, when the catalog exposes one.
    pub uploads_playlist_id: Option<String>,
}

/// The document indexed into the corpus for one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedVideo {
    pub channel_id: String,
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// RFC 3339, UTC. Absent when the source timestamp was unusable.
    pub published_at: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub engagement_rate: f64,
    pub keywords: Vec<String>,
    pub topics: Vec<String>,
    pub analysis: ChannelAnalysis,
}

/// A corpus video returned by a topic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub view_count: u64,
    pub engagement_rate: f64,
}

/// One generated content idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub topic: String,
    pub description: String,
    pub estimated_potential: String,
    pub key_points: Vec<String>,
}

/// Generated market analysis for a single topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompetitionAnalysis {
    pub saturation_level: String,
    pub unexplored_angles: Vec<String>,
    pub differentiators: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Supplies channel metadata and video batches.
pub trait VideoCatalog {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve a channel URL (or bare id) to its metadata.
    fn resolve_channel(
        &self,
        channel_url: &str,
    ) -> impl Future<Output = Result<ChannelInfo, Self::Error>> + Send;

    /// List up to `max_results` of the channel's most recent videos.
    fn channel_videos(
        &self,
        channel: &ChannelInfo,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<VideoRecord>, Self::Error>> + Send;

    /// A cheaper, shorter listing of recent videos, tried when
    /// [`VideoCatalog::channel_videos`] fails.
    fn recent_videos(
        &self,
        channel: &ChannelInfo,
    ) -> impl Future<Output = Result<Vec<VideoRecord>, Self::Error>> + Send;
}

/// The searchable corpus of every analyzed channel's videos.
pub trait TopicCorpus {
    type Error: std::error::Error + Send + Sync + 'static;

    fn index_video(
        &self,
        document: &IndexedVideo,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Per-topic averages across the corpus, excluding `channel_id`.
    fn topic_aggregates(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Vec<TopicAggregate>, Self::Error>> + Send;

    fn videos_by_topic(
        &self,
        topic: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<VideoSummary>, Self::Error>> + Send;
}

/// Turns analysis output into natural-language suggestions.
pub trait SuggestionGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn content_suggestions(
        &self,
        channel: &ChannelInfo,
        gaps: &[ContentGap],
    ) -> impl Future<Output = Result<Vec<Suggestion>, Self::Error>> + Send;

    fn competition_analysis(
        &self,
        topic: &str,
        videos: &[VideoSummary],
    ) -> impl Future<Output = Result<Option<CompetitionAnalysis>, Self::Error>> + Send;
}
