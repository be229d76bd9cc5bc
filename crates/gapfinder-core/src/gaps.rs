//! Corpus topic statistics and the ranked content gaps derived from them.

use serde::{Deserialize, Serialize};

/// Per-topic statistics aggregated by the document store across every channel
/// except the requesting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAggregate {
    pub topic: String,
    pub average_views: f64,
    /// Mean engagement rate; usually in `[0, 1]` but not bounded above.
    pub average_engagement: f64,
}

/// A scored content opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentGap {
    pub topic: String,
    pub average_views: f64,
    pub average_engagement: f64,
    pub opportunity_score: f64,
}
