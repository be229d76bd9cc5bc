//! Derived per-channel analysis. Recomputed on every request, never persisted
//! by the engine itself.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::quality::Analyzed;

/// The four independently computed sections of a channel analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChannelAnalysis {
    pub performance_metrics: Analyzed<PerformanceMetrics>,
    pub content_patterns: Analyzed<ContentPatterns>,
    pub temporal_patterns: Analyzed<TemporalPatterns>,
    pub engagement_analysis: Analyzed<EngagementAnalysis>,
}

impl ChannelAnalysis {
    /// `true` when any section had to fall back to defaults.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.performance_metrics.is_degraded()
            || self.content_patterns.is_degraded()
            || self.temporal_patterns.is_degraded()
            || self.engagement_analysis.is_degraded()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PerformanceMetrics {
    pub average_views: u64,
    pub median_views: u64,
    pub average_likes: u64,
    pub average_comments: u64,
    pub top_performing_videos: Vec<TopVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopVideo {
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ContentPatterns {
    pub common_keywords: Vec<String>,
    pub title_patterns: TitlePatterns,
    pub video_categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TitlePatterns {
    /// Mean whitespace-separated word count per title.
    pub average_length: f64,
    pub common_formats: TitleFormats,
}

/// Share of titles (0–100, one decimal) matching each format class.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TitleFormats {
    pub questions: f64,
    pub numbers: f64,
    pub brackets: f64,
    pub emojis: f64,
    pub caps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub theme: String,
    /// Share of all pooled title keyword occurrences, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TemporalPatterns {
    pub best_days: Determined<String>,
    pub best_hours: Determined<u32>,
    pub posting_frequency: PostingFrequency,
}

/// A value that may be unavailable for an empty batch.
///
/// Serializes as the inner value, or the string `"not determined"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Determined<T> {
    Known(T),
    #[default]
    NotDetermined,
}

impl<T> Determined<T> {
    #[must_use]
    pub fn known(self) -> Option<T> {
        match self {
            Determined::Known(v) => Some(v),
            Determined::NotDetermined => None,
        }
    }
}

impl<T> From<Option<T>> for Determined<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Determined::NotDetermined, Determined::Known)
    }
}

impl<T: Serialize> Serialize for Determined<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Determined::Known(v) => v.serialize(serializer),
            Determined::NotDetermined => serializer.serialize_str("not determined"),
        }
    }
}

/// Human-readable publishing cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostingFrequency {
    Daily,
    EveryDays(u32),
    EveryWeeks(u32),
    EveryMonths(u32),
    #[default]
    InsufficientData,
}

impl fmt::Display for PostingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PostingFrequency::Daily => f.write_str("daily"),
            PostingFrequency::EveryDays(n) => write!(f, "every {n} {}", plural(n, "day")),
            PostingFrequency::EveryWeeks(n) => write!(f, "every {n} {}", plural(n, "week")),
            PostingFrequency::EveryMonths(n) => write!(f, "every {n} {}", plural(n, "month")),
            PostingFrequency::InsufficientData => f.write_str("insufficient data"),
        }
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    }
}

impl Serialize for PostingFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EngagementAnalysis {
    pub average_engagement_rate: f64,
    pub high_engagement_topics: Vec<EngagementTopic>,
    pub engagement_trend: EngagementTrend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementTopic {
    /// Title keywords joined by a space.
    pub topic: String,
    /// Likes plus comments.
    pub engagement: u64,
    pub views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngagementTrend {
    Rising,
    Declining,
    #[default]
    Stable,
}
