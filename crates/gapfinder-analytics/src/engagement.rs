//! Engagement rate, the most-engaging topics, and the engagement trend.

use chrono::{DateTime, Utc};
use gapfinder_core::{
    Analyzed, AnalyzerConfig, EngagementAnalysis, EngagementTopic, EngagementTrend, VideoRecord,
};

use crate::coerce::{coerce_counts, published_at, Counts};
use crate::keywords::KeywordExtractor;

/// Compute engagement statistics for a batch.
#[must_use]
pub fn analyze_engagement(
    videos: &[VideoRecord],
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> Analyzed<EngagementAnalysis> {
    if videos.is_empty() {
        return Analyzed::default();
    }

    let mut issues = Vec::new();
    let counts: Vec<Counts> = videos
        .iter()
        .map(|v| coerce_counts(v, &mut issues))
        .collect();

    let rates: Vec<f64> = counts.iter().map(Counts::engagement_rate).collect();
    #[allow(clippy::cast_precision_loss)]
    let average_engagement_rate = rates.iter().sum::<f64>() / rates.len() as f64;

    let mut dated: Vec<(DateTime<Utc>, f64)> = videos
        .iter()
        .zip(&rates)
        .filter_map(|(v, &rate)| published_at(v, &mut issues).map(|t| (t, rate)))
        .collect();
    dated.sort_by_key(|&(t, _)| t);
    let series: Vec<f64> = dated.into_iter().map(|(_, rate)| rate).collect();

    let analysis = EngagementAnalysis {
        average_engagement_rate,
        high_engagement_topics: high_engagement_topics(videos, &counts, extractor, config),
        engagement_trend: engagement_trend(&series, config),
    };

    Analyzed::with_issues(analysis, issues)
}

fn high_engagement_topics(
    videos: &[VideoRecord],
    counts: &[Counts],
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> Vec<EngagementTopic> {
    let mut order: Vec<usize> = (0..videos.len()).collect();
    order.sort_by(|&a, &b| counts[b].interactions().cmp(&counts[a].interactions()));

    order
        .into_iter()
        .take(config.high_engagement_videos)
        .map(|i| {
            let keywords = extractor.extract(&videos[i].title, config.keywords_per_topic);
            let topic = if keywords.is_empty() {
                videos[i].title.trim().to_string()
            } else {
                keywords.join(" ")
            };
            EngagementTopic {
                topic,
                engagement: counts[i].interactions(),
                views: counts[i].views,
            }
        })
        .collect()
}

/// Classify a chronologically ordered engagement-rate series.
///
/// Series shorter than `min_trend_videos` are always stable. The slope
/// thresholds are fixed constants, not scaled by the series' variance.
#[must_use]
pub fn engagement_trend(series: &[f64], config: &AnalyzerConfig) -> EngagementTrend {
    if series.len() < config.min_trend_videos.max(2) {
        return EngagementTrend::Stable;
    }
    let slope = least_squares_slope(series);
    if slope > config.trend_threshold {
        EngagementTrend::Rising
    } else if slope < -config.trend_threshold {
        EngagementTrend::Declining
    } else {
        EngagementTrend::Stable
    }
}

/// Slope of the degree-1 least-squares fit of `ys` against `0..n`.
#[allow(clippy::cast_precision_loss)]
fn least_squares_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (num, den) = ys
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
