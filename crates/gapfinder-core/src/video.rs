//! Raw video records as supplied by the video catalog.
//!
//! ## Observed shape from the `YouTube` Data API
//!
//! ### Counters
//! `statistics.viewCount`, `likeCount` and `commentCount` arrive as **decimal
//! strings** (`"12345"`), not JSON numbers. Channels can hide likes and
//! disable comments, in which case the key is omitted entirely. Records that
//! were round-tripped through other tools may carry plain numbers or floats
//! (`1234.0`). All of these are accepted as [`RawCount`] and coerced lazily so
//! one bad field never rejects the whole batch.
//!
//! ### `published_at`
//! ISO-8601 with a `Z` suffix (`"2024-03-01T17:00:05Z"`). Kept as the raw
//! string; parsing happens in the analytics engine.

use serde::{Deserialize, Serialize};

/// One published video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub view_count: Option<RawCount>,
    #[serde(default)]
    pub like_count: Option<RawCount>,
    #[serde(default)]
    pub comment_count: Option<RawCount>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl VideoRecord {
    /// Build a record with numeric counters, mostly useful in tests and fixtures.
    #[must_use]
    pub fn with_counts(
        id: impl Into<String>,
        title: impl Into<String>,
        views: u64,
        likes: u64,
        comments: u64,
        published_at: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            view_count: Some(RawCount::Int(views)),
            like_count: Some(RawCount::Int(likes)),
            comment_count: Some(RawCount::Int(comments)),
            published_at: published_at.map(str::to_owned),
        }
    }
}

/// A counter value before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Reason a [`RawCount`] could not be coerced to a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a non-negative count")]
pub struct CountError {
    pub raw: String,
}

impl RawCount {
    /// Coerce to a non-negative integer.
    ///
    /// Floats are truncated toward zero. Text is trimmed and parsed first as an
    /// integer, then as a float.
    ///
    /// # Errors
    ///
    /// Returns [`CountError`] for negative, non-finite, or non-numeric values.
    pub fn coerce(&self) -> Result<u64, CountError> {
        match self {
            RawCount::Int(n) => Ok(*n),
            RawCount::Float(f) => float_to_count(*f).ok_or_else(|| CountError {
                raw: f.to_string(),
            }),
            RawCount::Text(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<u64>() {
                    return Ok(n);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(float_to_count)
                    .ok_or_else(|| CountError { raw: s.clone() })
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(f: f64) -> Option<u64> {
    // u64::MAX as f64 rounds up to 2^64, so compare strictly below it.
    if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 {
        Some(f.trunc() as u64)
    } else {
        None
    }
}
