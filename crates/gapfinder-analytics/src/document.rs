//! Per-video documents for the topic corpus.

use gapfinder_core::{AnalyzerConfig, IndexedVideo, VideoRecord};

use crate::coerce::{coerce_counts, published_at};
use crate::keywords::KeywordExtractor;

/// Keywords kept as a document's topics.
const TOPICS_PER_DOCUMENT: usize = 3;

/// Build the corpus document for one video of `channel_id`.
///
/// Counters are coerced with the same rules as the analyzers, and the
/// document embeds the analysis of the video on its own. Data problems are
/// carried inside that analysis rather than reported separately.
pub(crate) fn build_document(
    channel_id: &str,
    video: &VideoRecord,
    extractor: &KeywordExtractor<'_>,
    config: &AnalyzerConfig,
) -> IndexedVideo {
    let mut issues = Vec::new();
    let counts = coerce_counts(video, &mut issues);
    let published = published_at(video, &mut issues);

    let keywords = extractor.extract(&video.title, config.title_keyword_count);
    let topics = keywords.iter().take(TOPICS_PER_DOCUMENT).cloned().collect();

    IndexedVideo {
        channel_id: channel_id.to_string(),
        video_id: video.id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        published_at: published.map(|t| t.to_rfc3339()),
        view_count: counts.views,
        like_count: counts.likes,
        comment_count: counts.comments,
        engagement_rate: counts.engagement_rate(),
        keywords,
        topics,
        analysis: crate::analyze_batch(std::slice::from_ref(video), extractor, config),
    }
}
