//! Publishing cadence and preferred publish day/hour.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use gapfinder_core::{Analyzed, Determined, PostingFrequency, TemporalPatterns, VideoRecord};

use crate::coerce::published_at;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Derive temporal publishing patterns.
///
/// Records without a usable `published_at` are left out; an empty batch (or
/// one with no usable timestamps) reports "not determined" for day and hour.
#[must_use]
pub fn analyze_temporal_patterns(videos: &[VideoRecord]) -> Analyzed<TemporalPatterns> {
    let mut issues = Vec::new();
    let timestamps: Vec<DateTime<Utc>> = videos
        .iter()
        .filter_map(|v| published_at(v, &mut issues))
        .collect();

    let patterns = TemporalPatterns {
        best_days: mode(timestamps.iter().map(|t| weekday_name(t.weekday())))
            .map(str::to_string)
            .into(),
        best_hours: Determined::from(mode(timestamps.iter().map(|t| t.hour()))),
        posting_frequency: posting_frequency(&timestamps),
    };

    Analyzed::with_issues(patterns, issues)
}

/// Average gap between consecutive uploads mapped to a cadence bucket.
#[must_use]
pub fn posting_frequency(timestamps: &[DateTime<Utc>]) -> PostingFrequency {
    if timestamps.len() < 2 {
        return PostingFrequency::InsufficientData;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort();

    // The mean of consecutive gaps telescopes to span / (n - 1).
    let span = sorted[sorted.len() - 1] - sorted[0];
    #[allow(clippy::cast_precision_loss)]
    let avg_days = span.num_seconds() as f64 / SECONDS_PER_DAY / (sorted.len() - 1) as f64;
    cadence(avg_days)
}

fn cadence(avg_days: f64) -> PostingFrequency {
    if avg_days <= 1.0 {
        PostingFrequency::Daily
    } else if avg_days <= 7.0 {
        PostingFrequency::EveryDays(round_to_u32(avg_days).max(2))
    } else if avg_days <= 30.0 {
        PostingFrequency::EveryWeeks(round_to_u32(avg_days / 7.0).max(1))
    } else {
        PostingFrequency::EveryMonths(round_to_u32(avg_days / 30.0).max(1))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Most frequent value; ties go to the value seen first.
fn mode<T: Eq + Hash + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(value, _)| value)
}

#[must_use]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dated(id: &str, ts: &str) -> VideoRecord {
        VideoRecord::with_counts(id, id, 1, 0, 0, Some(ts))
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_batch_is_not_determined() {
        let out = analyze_temporal_patterns(&[]);
        assert!(!out.is_degraded());
        assert_eq!(out.value.best_days, Determined::NotDetermined);
        assert_eq!(out.value.best_hours, Determined::NotDetermined);
        assert_eq!(out.value.posting_frequency, PostingFrequency::InsufficientData);
    }

    #[test]
    fn best_day_and_hour_are_modes() {
        // 2024-03-04 is a Monday, 2024-03-05 a Tuesday.
        let videos = vec![
            dated("a", "2024-03-05T18:00:00Z"),
            dated("b", "2024-03-04T18:30:00Z"),
            dated("c", "2024-03-11T09:00:00Z"),
        ];
        let out = analyze_temporal_patterns(&videos).value;
        assert_eq!(out.best_days, Determined::Known("Monday".to_string()));
        assert_eq!(out.best_hours, Determined::Known(18));
    }

    #[test]
    fn mode_ties_go_to_first_seen() {
        assert_eq!(mode([3, 7, 7, 3].into_iter()), Some(3));
        assert_eq!(mode([9, 1].into_iter()), Some(9));
        assert_eq!(mode(std::iter::empty::<u32>()), None);
    }

    #[test]
    fn single_video_has_insufficient_frequency() {
        let out = analyze_temporal_patterns(&[dated("a", "2024-03-05T18:00:00Z")]).value;
        assert_eq!(out.posting_frequency, PostingFrequency::InsufficientData);
        assert_eq!(out.best_hours, Determined::Known(18));
    }

    #[test]
    fn cadence_buckets() {
        assert_eq!(
            posting_frequency(&[at(2024, 1, 1), at(2024, 1, 2), at(2024, 1, 3)]),
            PostingFrequency::Daily
        );
        assert_eq!(
            posting_frequency(&[at(2024, 1, 1), at(2024, 1, 4)]),
            PostingFrequency::EveryDays(3)
        );
        assert_eq!(
            posting_frequency(&[at(2024, 1, 15), at(2024, 1, 1)]),
            PostingFrequency::EveryWeeks(2)
        );
        assert_eq!(
            posting_frequency(&[at(2024, 1, 1), at(2024, 3, 1)]),
            PostingFrequency::EveryMonths(2)
        );
    }

    #[test]
    fn unparseable_dates_are_dropped_and_flagged() {
        let videos = vec![
            dated("a", "2024-03-05T18:00:00Z"),
            dated("b", "not a date"),
            VideoRecord::with_counts("c", "c", 1, 0, 0, None),
        ];
        let out = analyze_temporal_patterns(&videos);
        assert!(out.is_degraded());
        assert_eq!(out.issues().len(), 2);
        assert_eq!(out.value.best_days, Determined::Known("Tuesday".to_string()));
        assert_eq!(out.value.posting_frequency, PostingFrequency::InsufficientData);
    }
}
