//! Content analytics engine.
//!
//! Turns a batch of raw [`VideoRecord`]s into a [`ChannelAnalysis`] and a set
//! of corpus [`TopicAggregate`]s into ranked [`ContentGap`]s. Everything here
//! is synchronous and pure: each call owns its intermediate state, and the
//! only shared handle (an optional part-of-speech tagger) is read-only.

pub mod coerce;
mod document;
pub mod engagement;
pub mod gaps;
pub mod keywords;
pub mod patterns;
pub mod performance;
pub mod tagger;
pub mod temporal;

use std::sync::Arc;

use gapfinder_core::{
    Analyzed, AnalyzerConfig, ChannelAnalysis, ContentGap, IndexedVideo, TopicAggregate,
    VideoRecord,
};

pub use engagement::analyze_engagement;
pub use gaps::opportunity_score;
pub use keywords::{extract_keywords, KeywordExtractor};
pub use patterns::analyze_content_patterns;
pub use performance::analyze_performance;
pub use tagger::{LexiconError, LexiconTagger, PartOfSpeech, PosTagger};
pub use temporal::analyze_temporal_patterns;

/// The analytics engine with its tuning and optional tagger.
///
/// Cloning is cheap; clones share the tagger.
#[derive(Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    tagger: Option<Arc<dyn PosTagger>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("tagger", &self.tagger.as_ref().map(|_| "dyn PosTagger"))
            .finish()
    }
}

impl Analyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            tagger: None,
        }
    }

    #[must_use]
    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn extractor(&self) -> KeywordExtractor<'_> {
        KeywordExtractor::new(self.tagger.as_deref())
    }

    /// Run all four analyzers over `videos`.
    ///
    /// Never fails: an empty batch yields zeroed sections, and bad records
    /// mark the affected sections degraded.
    #[must_use]
    pub fn analyze_channel_content(&self, videos: &[VideoRecord]) -> ChannelAnalysis {
        let analysis = analyze_batch(videos, &self.extractor(), &self.config);
        if analysis.is_degraded() {
            tracing::info!(videos = videos.len(), "channel analysis completed with degraded sections");
        } else {
            tracing::debug!(videos = videos.len(), "channel analysis complete");
        }
        analysis
    }

    /// Score and rank corpus topics by opportunity.
    #[must_use]
    pub fn score_content_gaps(&self, aggregates: &[TopicAggregate]) -> Analyzed<Vec<ContentGap>> {
        gaps::score_content_gaps(aggregates, &self.config)
    }

    /// The corpus document for one video of `channel_id`.
    #[must_use]
    pub fn index_document(&self, channel_id: &str, video: &VideoRecord) -> IndexedVideo {
        document::build_document(channel_id, video, &self.extractor(), &self.config)
    }
}

/// [`Analyzer::analyze_channel_content`] with default tuning and no tagger.
#[must_use]
pub fn analyze_channel_content(videos: &[VideoRecord]) -> ChannelAnalysis {
    Analyzer::default().analyze_channel_content(videos)
}

/// [`Analyzer::score_content_gaps`] with default tuning, quality tag dropped.
#[must_use]
pub fn score_content_gaps(aggregates: &[TopicAggregate]) -> Vec<ContentGap> {
    Analyzer::default()
        .score_content_gaps(aggregates)
        .into_value()
}

fn analyze_batch(
    videos: &[VideoRecord],
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> ChannelAnalysis {
    ChannelAnalysis {
        performance_metrics: analyze_performance(videos, config),
        content_patterns: analyze_content_patterns(videos, extractor, config),
        temporal_patterns: analyze_temporal_patterns(videos),
        engagement_analysis: analyze_engagement(videos, extractor, config),
    }
}
