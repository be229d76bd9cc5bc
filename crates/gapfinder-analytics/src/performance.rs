//! Aggregate view/like/comment statistics and top videos.

use gapfinder_core::{Analyzed, AnalyzerConfig, PerformanceMetrics, TopVideo, VideoRecord};

use crate::coerce::{coerce_counts, Counts};

/// Compute performance metrics for a batch.
///
/// Means and the median are rounded down. An empty batch yields all zeros.
#[must_use]
pub fn analyze_performance(
    videos: &[VideoRecord],
    config: &AnalyzerConfig,
) -> Analyzed<PerformanceMetrics> {
    if videos.is_empty() {
        return Analyzed::default();
    }

    let mut issues = Vec::new();
    let counts: Vec<Counts> = videos
        .iter()
        .map(|v| coerce_counts(v, &mut issues))
        .collect();

    let views: Vec<u64> = counts.iter().map(|c| c.views).collect();
    let likes: Vec<u64> = counts.iter().map(|c| c.likes).collect();
    let comments: Vec<u64> = counts.iter().map(|c| c.comments).collect();

    let metrics = PerformanceMetrics {
        average_views: floor_mean(&views),
        median_views: floor_median(&views),
        average_likes: floor_mean(&likes),
        average_comments: floor_mean(&comments),
        top_performing_videos: top_by_views(videos, &counts, config.top_videos),
    };

    Analyzed::with_issues(metrics, issues)
}

/// Integer floor of the mean; 0 for an empty slice.
#[must_use]
pub fn floor_mean(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    narrow(sum / values.len() as u128)
}

/// Integer floor of the median; 0 for an empty slice.
#[must_use]
pub fn floor_median(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        narrow((u128::from(sorted[mid - 1]) + u128::from(sorted[mid])) / 2)
    }
}

/// The mean of u64 values always fits back into u64.
fn narrow(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn top_by_views(videos: &[VideoRecord], counts: &[Counts], n: usize) -> Vec<TopVideo> {
    let mut order: Vec<usize> = (0..videos.len()).collect();
    // Stable: equal view counts keep batch order.
    order.sort_by(|&a, &b| counts[b].views.cmp(&counts[a].views));
    order
        .into_iter()
        .take(n)
        .map(|i| TopVideo {
            title: videos[i].title.clone(),
            view_count: counts[i].views,
            like_count: counts[i].likes,
        })
        .collect()
}
