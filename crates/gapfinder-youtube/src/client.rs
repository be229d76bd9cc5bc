//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! quota-aware error mapping, and retry with back-off for transient failures.

use std::collections::HashMap;
use std::time::Duration;

use gapfinder_core::{ChannelInfo, VideoCatalog, VideoRecord};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::channel_url::{parse_channel_url, ChannelRef};
use crate::error::YoutubeError;
use crate::retry::retry_with_backoff;
use crate::rss::parse_channel_feed;
use crate::types::{
    ChannelItem, ErrorEnvelope, ListResponse, PlaylistItem, SearchItem, VideoItem,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";
const DEFAULT_FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";

/// Maximum page size of `playlistItems.list` and id batch size of `videos.list`.
const PAGE_SIZE: usize = 50;

/// Error reasons that mean the quota is spent.
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded"];

/// Client for the `YouTube` Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    feed_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production Data API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom Data API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("gapfinder/0.1 (content-analytics)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parse_base(base_url, true)?,
            feed_url: parse_base(DEFAULT_FEED_URL, false)?,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Override the retry policy (defaults: 3 retries, 1 s base delay).
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Point the RSS fallback at a different feed endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::InvalidBaseUrl`] if `feed_url` does not parse.
    pub fn with_feed_url(mut self, feed_url: &str) -> Result<Self, YoutubeError> {
        self.feed_url = parse_base(feed_url, false)?;
        Ok(self)
    }

    /// Resolve a parsed channel reference to its metadata.
    ///
    /// Custom `/c/` names go through `search.list(type=channel)`, handles
    /// through `channels.list(forHandle)`, legacy usernames through
    /// `channels.list(forUsername)`.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if nothing matches.
    /// - [`YoutubeError::QuotaExceeded`] / [`YoutubeError::Api`] for API errors.
    /// - [`YoutubeError::Http`] on network failure.
    pub async fn fetch_channel(&self, channel: &ChannelRef) -> Result<ChannelInfo, YoutubeError> {
        const PARTS: &str = "snippet,statistics,contentDetails";

        let (filter, value): (&str, String) = match channel {
            ChannelRef::Id(id) => ("id", id.clone()),
            ChannelRef::Handle(handle) => ("forHandle", handle.clone()),
            ChannelRef::Username(name) => ("forUsername", name.clone()),
            ChannelRef::CustomName(name) => ("id", self.search_channel_id(name).await?),
        };

        let url = self.build_url("channels", &[("part", PARTS), (filter, &value)]);
        let page: ListResponse<ChannelItem> = self
            .get_json(&url, &format!("channels.list({filter}={value})"))
            .await?;

        let info = page
            .items
            .into_iter()
            .next()
            .map(ChannelInfo::from)
            .ok_or_else(|| YoutubeError::ChannelNotFound(value.clone()))?;

        tracing::debug!(channel_id = %info.id, title = %info.title, "resolved channel");
        Ok(info)
    }

    /// List up to `max_results` of the channel's most recent uploads with
    /// their statistics.
    ///
    /// Pages the uploads playlist, then fetches details in id batches of 50.
    /// Videos that vanish between the two calls (deleted or made private)
    /// are skipped.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if the channel has no uploads playlist.
    /// - [`YoutubeError::QuotaExceeded`] / [`YoutubeError::Api`] for API errors.
    /// - [`YoutubeError::Http`] on network failure.
    pub async fn list_uploads(
        &self,
        channel: &ChannelInfo,
        max_results: usize,
    ) -> Result<Vec<VideoRecord>, YoutubeError> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let playlist_id = match &channel.uploads_playlist_id {
            Some(id) => id.clone(),
            None => self.uploads_playlist_id(&channel.id).await?,
        };

        let ids = self.playlist_video_ids(&playlist_id, max_results).await?;
        let mut videos = Vec::with_capacity(ids.len());
        for batch in ids.chunks(PAGE_SIZE) {
            videos.extend(self.video_details(batch).await?);
        }

        tracing::info!(
            channel_id = %channel.id,
            requested = max_results,
            listed = ids.len(),
            fetched = videos.len(),
            "listed channel uploads"
        );
        Ok(videos)
    }

    /// Fetch the channel's public RSS feed (at most 15 recent videos).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] on network failure or non-2xx status and
    /// [`YoutubeError::Xml`] for malformed feed content.
    pub async fn fetch_channel_feed(&self, channel_id: &str) -> Result<Vec<VideoRecord>, YoutubeError> {
        let mut url = self.feed_url.clone();
        url.query_pairs_mut().append_pair("channel_id", channel_id);

        let url = &url;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let response = self.client.get(url.clone()).send().await?;
            Ok(response.error_for_status()?.text().await?)
        })
        .await?;

        let videos = parse_channel_feed(&body)?;
        tracing::info!(channel_id, videos = videos.len(), "fetched channel RSS feed");
        Ok(videos)
    }

    async fn search_channel_id(&self, name: &str) -> Result<String, YoutubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "1"),
                ("q", name),
            ],
        );
        let page: ListResponse<SearchItem> = self
            .get_json(&url, &format!("search.list(q={name})"))
            .await?;
        page.items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id)
            .ok_or_else(|| YoutubeError::ChannelNotFound(name.to_owned()))
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let url = self.build_url("channels", &[("part", "contentDetails"), ("id", channel_id)]);
        let page: ListResponse<ChannelItem> = self
            .get_json(&url, &format!("channels.list(id={channel_id})"))
            .await?;
        page.items
            .into_iter()
            .next()
            .and_then(|item| item.content_details)
            .and_then(|details| details.related_playlists.uploads)
            .ok_or_else(|| YoutubeError::ChannelNotFound(channel_id.to_owned()))
    }

    async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<String>, YoutubeError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        while ids.len() < max_results {
            let page_size = (max_results - ids.len()).min(PAGE_SIZE).to_string();
            let mut params = vec![
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.as_str()));
            }

            let url = self.build_url("playlistItems", &params);
            let page: ListResponse<PlaylistItem> = self
                .get_json(&url, &format!("playlistItems.list(playlistId={playlist_id})"))
                .await?;

            ids.extend(page.items.into_iter().map(|item| item.content_details.video_id));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        ids.truncate(max_results);
        Ok(ids)
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoRecord>, YoutubeError> {
        let joined = ids.join(",");
        let url = self.build_url("videos", &[("part", "snippet,statistics"), ("id", &joined)]);
        let page: ListResponse<VideoItem> = self
            .get_json(&url, &format!("videos.list({} ids)", ids.len()))
            .await?;

        // Keep playlist order regardless of the order videos.list answers in.
        let mut by_id: HashMap<String, VideoItem> = page
            .items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Ok(ids
            .iter()
            .filter_map(|id| {
                let item = by_id.remove(id);
                if item.is_none() {
                    tracing::debug!(video_id = %id, "video missing from videos.list; skipped");
                }
                item.map(VideoRecord::from)
            })
            .collect())
    }

    /// Builds `{base}/{endpoint}?key=...&...` with percent-encoded parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// GET `url` with retries and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url, context: &str) -> Result<T, YoutubeError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_text(url)
        })
        .await?;
        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends a GET request and returns the body, mapping non-2xx responses
    /// to [`YoutubeError::QuotaExceeded`] or [`YoutubeError::Api`].
    async fn request_text(&self, url: &Url) -> Result<String, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        Err(api_error(status, &body))
    }
}

fn api_error(status: StatusCode, body: &str) -> YoutubeError {
    let (reason, message) = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| {
            let reason = env
                .error
                .errors
                .into_iter()
                .next()
                .map(|d| d.reason)
                .unwrap_or_default();
            (reason, env.error.message)
        })
        .unwrap_or_else(|_| (String::new(), body.chars().take(200).collect()));

    if status == StatusCode::FORBIDDEN && QUOTA_REASONS.contains(&reason.as_str()) {
        return YoutubeError::QuotaExceeded(message);
    }
    YoutubeError::Api {
        status: status.as_u16(),
        reason,
        message,
    }
}

/// Parse a base URL; API bases get exactly one trailing slash so endpoint
/// names append as a new path segment.
fn parse_base(raw: &str, trailing_slash: bool) -> Result<Url, YoutubeError> {
    let normalised = if trailing_slash {
        format!("{}/", raw.trim_end_matches('/'))
    } else {
        raw.to_owned()
    };
    Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

impl VideoCatalog for YoutubeClient {
    type Error = YoutubeError;

    async fn resolve_channel(&self, channel_url: &str) -> Result<ChannelInfo, YoutubeError> {
        let channel = parse_channel_url(channel_url)?;
        self.fetch_channel(&channel).await
    }

    async fn channel_videos(
        &self,
        channel: &ChannelInfo,
        max_results: usize,
    ) -> Result<Vec<VideoRecord>, YoutubeError> {
        self.list_uploads(channel, max_results).await
    }

    async fn recent_videos(&self, channel: &ChannelInfo) -> Result<Vec<VideoRecord>, YoutubeError> {
        self.fetch_channel_feed(&channel.id).await
    }
}
