//! Opportunity scoring for corpus topics.

use gapfinder_core::{Analyzed, AnalyzerConfig, ContentGap, Issue, TopicAggregate};

/// Blend reach and engagement into one opportunity score.
///
/// `(views × views_weight + engagement × engagement_scale × engagement_weight)
/// / normalizer`. With the default tuning this is
/// `(views × 0.7 + engagement × 10000 × 0.3) / 10000`.
#[must_use]
pub fn opportunity_score(average_views: f64, average_engagement: f64, config: &AnalyzerConfig) -> f64 {
    (average_views * config.gap_views_weight
        + average_engagement * config.gap_engagement_scale * config.gap_engagement_weight)
        / config.gap_normalizer
}

/// Score every aggregate and rank by opportunity, highest first.
///
/// Ties keep input order. Negative or non-finite statistics are replaced by
/// zero and reported as issues; no topic is ever dropped.
#[must_use]
pub fn score_content_gaps(
    aggregates: &[TopicAggregate],
    config: &AnalyzerConfig,
) -> Analyzed<Vec<ContentGap>> {
    let mut issues = Vec::new();
    let mut gaps: Vec<ContentGap> = aggregates
        .iter()
        .map(|agg| {
            let average_views = sanitize(&agg.topic, "average_views", agg.average_views, &mut issues);
            let average_engagement = sanitize(
                &agg.topic,
                "average_engagement",
                agg.average_engagement,
                &mut issues,
            );
            ContentGap {
                topic: agg.topic.clone(),
                average_views,
                average_engagement,
                opportunity_score: opportunity_score(average_views, average_engagement, config),
            }
        })
        .collect();

    gaps.sort_by(|a, b| b.opportunity_score.total_cmp(&a.opportunity_score));
    Analyzed::with_issues(gaps, issues)
}

fn sanitize(topic: &str, field: &'static str, value: f64, issues: &mut Vec<Issue>) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    tracing::warn!(topic, field, value, "invalid topic aggregate replaced by 0");
    issues.push(Issue::InvalidAggregate {
        topic: topic.to_string(),
        field,
        value,
    });
    0.0
}
