//! Channel and topic pipelines, generic over the collaborator traits.
//!
//! Only channel resolution and topic search abort a run. Listing, indexing,
//! aggregation, and generation failures are logged and degrade to empty
//! results so the caller still gets a complete report.

use anyhow::Context;
use futures::stream::{self, StreamExt};
use gapfinder_analytics::Analyzer;
use gapfinder_core::{
    Analyzed, ChannelAnalysis, ChannelInfo, CompetitionAnalysis, ContentGap, IndexedVideo,
    Suggestion, SuggestionGenerator, TopicCorpus, VideoCatalog, VideoRecord, VideoSummary,
};
use serde::Serialize;

/// Corpus hits fetched for a topic analysis.
pub(crate) const TOPIC_SEARCH_LIMIT: usize = 10;

/// Corpus hits echoed back in a [`TopicReport`].
pub(crate) const TOPIC_REPORT_VIDEOS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PipelineOptions {
    pub max_videos: usize,
    pub index_concurrency: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelReport {
    pub channel: ChannelInfo,
    pub analysis: ChannelAnalysis,
    pub content_gaps: Analyzed<Vec<ContentGap>>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicReport {
    pub topic: String,
    pub competition_analysis: Option<CompetitionAnalysis>,
    pub existing_videos: Vec<VideoSummary>,
}

/// Resolve, analyze, index, and score one channel.
///
/// # Errors
///
/// Returns an error only when the channel cannot be resolved.
pub(crate) async fn run_channel_analysis<C, S, G>(
    catalog: &C,
    store: &S,
    generator: Option<&G>,
    analyzer: &Analyzer,
    channel_url: &str,
    options: PipelineOptions,
) -> anyhow::Result<ChannelReport>
where
    C: VideoCatalog,
    S: TopicCorpus,
    G: SuggestionGenerator,
{
    let channel = catalog
        .resolve_channel(channel_url)
        .await
        .with_context(|| format!("failed to resolve channel '{channel_url}'"))?;
    tracing::info!(channel_id = %channel.id, title = %channel.title, "resolved channel");

    let videos = list_videos(catalog, &channel, options.max_videos).await;
    let analysis = analyzer.analyze_channel_content(&videos);

    let documents: Vec<IndexedVideo> = videos
        .iter()
        .map(|video| analyzer.index_document(&channel.id, video))
        .collect();
    index_documents(store, &documents, options.index_concurrency).await;

    let aggregates = match store.topic_aggregates(&channel.id).await {
        Ok(aggregates) => aggregates,
        Err(e) => {
            tracing::warn!(channel_id = %channel.id, error = %e, "topic aggregation failed");
            Vec::new()
        }
    };
    let content_gaps = analyzer.score_content_gaps(&aggregates);

    let suggestions = match generator {
        Some(generator) => generator
            .content_suggestions(&channel, &content_gaps.value)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(channel_id = %channel.id, error = %e, "suggestion generation failed");
                Vec::new()
            }),
        None => {
            tracing::debug!("no text generator configured, skipping suggestions");
            Vec::new()
        }
    };

    Ok(ChannelReport {
        channel,
        analysis,
        content_gaps,
        suggestions,
    })
}

/// Data API listing first, then the shorter feed.
async fn list_videos<C: VideoCatalog>(
    catalog: &C,
    channel: &ChannelInfo,
    max_videos: usize,
) -> Vec<VideoRecord> {
    match catalog.channel_videos(channel, max_videos).await {
        Ok(videos) => {
            tracing::info!(channel_id = %channel.id, count = videos.len(), "listed channel videos");
            videos
        }
        Err(e) => {
            tracing::warn!(
                channel_id = %channel.id,
                error = %e,
                "video listing failed, falling back to recent feed"
            );
            catalog.recent_videos(channel).await.unwrap_or_else(|e| {
                tracing::warn!(channel_id = %channel.id, error = %e, "recent feed failed");
                Vec::new()
            })
        }
    }
}

/// Index every document with at most `concurrency` requests in flight.
///
/// Returns the number of documents indexed successfully.
async fn index_documents<S: TopicCorpus>(
    store: &S,
    documents: &[IndexedVideo],
    concurrency: usize,
) -> usize {
    let results = stream::iter(documents.iter().map(|document| async move {
        (document, store.index_video(document).await)
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut indexed = 0usize;
    for (document, result) in results {
        match result {
            Ok(()) => indexed += 1,
            Err(e) => tracing::warn!(
                video_id = %document.video_id,
                error = %e,
                "failed to index video"
            ),
        }
    }
    tracing::info!(indexed, total = documents.len(), "indexed channel videos");
    indexed
}

/// Search the corpus for `topic` and ask for a competition analysis.
///
/// # Errors
///
/// Returns an error when the corpus search fails.
pub(crate) async fn run_topic_analysis<S, G>(
    store: &S,
    generator: Option<&G>,
    topic: &str,
) -> anyhow::Result<TopicReport>
where
    S: TopicCorpus,
    G: SuggestionGenerator,
{
    let mut existing_videos = store
        .videos_by_topic(topic, TOPIC_SEARCH_LIMIT)
        .await
        .with_context(|| format!("failed to search corpus for topic '{topic}'"))?;
    tracing::info!(topic = %topic, count = existing_videos.len(), "found corpus videos");

    let competition_analysis = match generator {
        Some(generator) => generator
            .competition_analysis(topic, &existing_videos)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(topic = %topic, error = %e, "competition analysis failed");
                None
            }),
        None => None,
    };

    existing_videos.truncate(TOPIC_REPORT_VIDEOS);
    Ok(TopicReport {
        topic: topic.to_owned(),
        competition_analysis,
        existing_videos,
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
