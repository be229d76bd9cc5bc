//! HTTP client for the Elasticsearch topic corpus.

use std::time::Duration;

use gapfinder_core::{IndexedVideo, TopicAggregate, TopicCorpus, VideoSummary};
use reqwest::{Client, StatusCode, Url};

use crate::error::SearchError;
use crate::query::{
    index_mapping, parse_search_hits, parse_topic_buckets, topic_aggregation_query,
    topic_search_query,
};

/// Client for one Elasticsearch index holding video documents.
pub struct SearchClient {
    client: Client,
    base_url: Url,
    index: String,
}

impl SearchClient {
    /// Creates a client for `index` on the cluster at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, index: &str, timeout_secs: u64) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            index: index.to_owned(),
        })
    }

    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Create the index with its mapping unless it already exists.
    ///
    /// Returns `true` when the index was created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnexpectedStatus`] for any answer other than
    /// "exists", "created", or "already exists".
    pub async fn ensure_index(&self) -> Result<bool, SearchError> {
        let url = self.url(&[]);
        let exists = self.client.head(url.clone()).send().await?;
        match exists.status() {
            StatusCode::OK => return Ok(false),
            StatusCode::NOT_FOUND => {}
            other => return Err(unexpected(other, &url, String::new())),
        }

        let response = self.client.put(url.clone()).json(&index_mapping()).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::info!(index = %self.index, "created index");
            return Ok(true);
        }
        let body = response.text().await?;
        // Another process created it between the two calls.
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            return Ok(false);
        }
        Err(unexpected(status, &url, body))
    }

    /// Index (or replace) one video document under its video id.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] on network failure and
    /// [`SearchError::UnexpectedStatus`] for non-2xx answers.
    pub async fn index_video(&self, document: &IndexedVideo) -> Result<(), SearchError> {
        let url = self.url(&["_doc", &document.video_id]);
        let response = self.client.put(url.clone()).json(document).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(unexpected(status, &url, response.text().await?));
        }
        tracing::debug!(video_id = %document.video_id, channel_id = %document.channel_id, "indexed video");
        Ok(())
    }

    /// Per-topic averages across every channel except `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnexpectedStatus`] for non-2xx answers and
    /// [`SearchError::Deserialize`] when the aggregation is missing.
    pub async fn topic_aggregates(&self, channel_id: &str) -> Result<Vec<TopicAggregate>, SearchError> {
        let body = self.search(&topic_aggregation_query(channel_id)).await?;
        parse_topic_buckets(&body).map_err(|e| SearchError::Deserialize {
            context: format!("topic aggregation (channel_id={channel_id})"),
            source: e,
        })
    }

    /// Corpus videos matching `topic`, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnexpectedStatus`] for non-2xx answers and
    /// [`SearchError::Deserialize`] for malformed hit lists.
    pub async fn search_videos_by_topic(
        &self,
        topic: &str,
        limit: usize,
    ) -> Result<Vec<VideoSummary>, SearchError> {
        let body = self.search(&topic_search_query(topic, limit)).await?;
        parse_search_hits(&body).map_err(|e| SearchError::Deserialize {
            context: format!("topic search (topic={topic})"),
            source: e,
        })
    }

    async fn search(&self, query: &serde_json::Value) -> Result<String, SearchError> {
        let url = self.url(&["_search"]);
        let response = self.client.post(url.clone()).json(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(unexpected(status, &url, body));
        }
        Ok(body)
    }

    /// `{base}/{index}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&self.index).extend(segments);
        }
        url
    }
}

fn unexpected(status: StatusCode, url: &Url, body: String) -> SearchError {
    SearchError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    }
}

impl TopicCorpus for SearchClient {
    type Error = SearchError;

    async fn index_video(&self, document: &IndexedVideo) -> Result<(), SearchError> {
        SearchClient::index_video(self, document).await
    }

    async fn topic_aggregates(&self, channel_id: &str) -> Result<Vec<TopicAggregate>, SearchError> {
        SearchClient::topic_aggregates(self, channel_id).await
    }

    async fn videos_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<VideoSummary>, SearchError> {
        self.search_videos_by_topic(topic, limit).await
    }
}
