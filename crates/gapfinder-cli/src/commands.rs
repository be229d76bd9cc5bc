//! Command handlers: build the real collaborators from configuration, run a
//! pipeline or the offline engine, and print the result as JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use gapfinder_analytics::{Analyzer, LexiconTagger};
use gapfinder_core::{AnalyzerConfig, AppConfig, TopicAggregate, VideoRecord};
use gapfinder_search::SearchClient;
use gapfinder_suggest::LlmClient;
use gapfinder_youtube::YoutubeClient;
use serde::Serialize;

use crate::pipeline::{self, PipelineOptions};

/// Build the analyzer from an optional tuning file and POS lexicon.
pub(crate) fn build_analyzer(
    tuning: Option<&Path>,
    pos_lexicon: Option<&Path>,
) -> anyhow::Result<Analyzer> {
    let config = match tuning {
        Some(path) => gapfinder_core::load_analyzer_config(path)?,
        None => AnalyzerConfig::default(),
    };
    let mut analyzer = Analyzer::new(config);

    if let Some(path) = pos_lexicon {
        let tagger = LexiconTagger::from_path(path)?;
        tracing::info!(path = %path.display(), entries = tagger.len(), "loaded POS lexicon");
        analyzer = analyzer.with_tagger(Arc::new(tagger));
    }
    Ok(analyzer)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn search_client(config: &AppConfig) -> anyhow::Result<SearchClient> {
    SearchClient::new(
        &config.elasticsearch_url,
        &config.elasticsearch_index,
        config.http_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))
}

/// `None` when no API key is configured.
fn llm_client(config: &AppConfig) -> anyhow::Result<Option<LlmClient>> {
    let Some(api_key) = config.llm_api_key.as_deref() else {
        tracing::info!("TOGETHER_API_KEY not set, text generation disabled");
        return Ok(None);
    };
    let client = LlmClient::new(
        api_key,
        &config.llm_base_url,
        &config.llm_model,
        config.http_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build text generation client: {e}"))?;
    Ok(Some(client))
}

/// Analyze a live channel and print the [`pipeline::ChannelReport`].
///
/// # Errors
///
/// Returns an error if `YOUTUBE_API_KEY` is missing, a client cannot be
/// built, the index cannot be prepared, or the channel cannot be resolved.
pub(crate) async fn run_analyze_channel(
    config: &AppConfig,
    analyzer: &Analyzer,
    channel_url: &str,
    max_videos: Option<usize>,
) -> anyhow::Result<()> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("YOUTUBE_API_KEY is required for analyze-channel"))?;
    let catalog = YoutubeClient::with_base_url(
        api_key,
        config.http_timeout_secs,
        &config.youtube_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build YouTube client: {e}"))?
    .with_retry(config.http_max_retries, config.http_backoff_base_ms);

    let store = search_client(config)?;
    store
        .ensure_index()
        .await
        .with_context(|| format!("failed to prepare index '{}'", store.index()))?;
    let generator = llm_client(config)?;

    let options = PipelineOptions {
        max_videos: max_videos.unwrap_or(config.max_videos).max(1),
        index_concurrency: config.index_concurrency,
    };
    let report = pipeline::run_channel_analysis(
        &catalog,
        &store,
        generator.as_ref(),
        analyzer,
        channel_url,
        options,
    )
    .await?;

    print_json(&report)
}

/// Search the corpus for `topic` and print the [`pipeline::TopicReport`].
///
/// # Errors
///
/// Returns an error if a client cannot be built or the search fails.
pub(crate) async fn run_analyze_topic(config: &AppConfig, topic: &str) -> anyhow::Result<()> {
    let store = search_client(config)?;
    let generator = llm_client(config)?;
    let report = pipeline::run_topic_analysis(&store, generator.as_ref(), topic).await?;
    print_json(&report)
}

#[derive(Serialize)]
struct FileReport {
    analysis: gapfinder_core::ChannelAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_gaps: Option<gapfinder_core::Analyzed<Vec<gapfinder_core::ContentGap>>>,
}

/// Analyze video records from a JSON file, optionally scoring aggregates too.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed.
pub(crate) fn run_analyze_file(
    analyzer: &Analyzer,
    videos: &Path,
    aggregates: Option<&Path>,
) -> anyhow::Result<()> {
    let records: Vec<VideoRecord> = read_json(videos)?;
    let content_gaps = aggregates
        .map(read_json::<Vec<TopicAggregate>>)
        .transpose()?
        .map(|aggs| analyzer.score_content_gaps(&aggs));

    print_json(&FileReport {
        analysis: analyzer.analyze_channel_content(&records),
        content_gaps,
    })
}

/// Score topic aggregates from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) fn run_score_gaps(analyzer: &Analyzer, aggregates: &Path) -> anyhow::Result<()> {
    let aggregates: Vec<TopicAggregate> = read_json(aggregates)?;
    print_json(&analyzer.score_content_gaps(&aggregates))
}
