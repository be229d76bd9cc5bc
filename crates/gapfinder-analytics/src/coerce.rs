//! Field coercion shared by the analyzers.
//!
//! Bad counters become 0 and bad timestamps drop the record from date-based
//! computations; either way an [`Issue`] is recorded for the caller.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use gapfinder_core::{Issue, RawCount, VideoRecord};

/// Coerced counters for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl Counts {
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }

    /// `(likes + comments) / max(views, 1)`; always finite and non-negative.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn engagement_rate(&self) -> f64 {
        self.interactions() as f64 / self.views.max(1) as f64
    }
}

/// Coerce every counter of `video`, appending an issue for each failure.
///
/// Absent counters are 0 without an issue: the catalog omits likes and
/// comments when a channel hides them.
pub fn coerce_counts(video: &VideoRecord, issues: &mut Vec<Issue>) -> Counts {
    Counts {
        views: coerce_field(video, "view_count", video.view_count.as_ref(), issues),
        likes: coerce_field(video, "like_count", video.like_count.as_ref(), issues),
        comments: coerce_field(video, "comment_count", video.comment_count.as_ref(), issues),
    }
}

fn coerce_field(
    video: &VideoRecord,
    field: &'static str,
    raw: Option<&RawCount>,
    issues: &mut Vec<Issue>,
) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.coerce() {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(video_id = %video.id, field, error = %e, "counter coerced to 0");
            issues.push(Issue::InvalidCount {
                video_id: video.id.clone(),
                field,
                raw: e.raw,
            });
            0
        }
    }
}

/// Parse `published_at`, recording an issue when it is missing or unusable.
pub fn published_at(video: &VideoRecord, issues: &mut Vec<Issue>) -> Option<DateTime<Utc>> {
    let Some(raw) = video.published_at.as_deref() else {
        issues.push(Issue::MissingTimestamp {
            video_id: video.id.clone(),
        });
        return None;
    };
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::warn!(video_id = %video.id, raw, "unparseable published_at");
        issues.push(Issue::InvalidTimestamp {
            video_id: video.id.clone(),
            raw: raw.to_string(),
        });
    }
    parsed
}

/// Parse an ISO-8601 timestamp, normalized to UTC.
///
/// Accepts RFC 3339 with an offset, naive date-times (taken as UTC), and bare
/// dates (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
