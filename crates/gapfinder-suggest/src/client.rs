//! Client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use gapfinder_core::{
    ChannelInfo, CompetitionAnalysis, ContentGap, Suggestion, SuggestionGenerator, VideoSummary,
};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SuggestError;
use crate::parse::{parse_competition_analysis, parse_suggestions};
use crate::prompt::{build_competition_prompt, build_suggestion_prompt, SYSTEM_PROMPT};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Chat-completions client used to turn gaps into video ideas.
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmClient {
    /// Creates a client for `model` served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SuggestError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SuggestError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            model: model.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Override sampling temperature and completion length.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user exchange and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::UnexpectedStatus`] for non-2xx answers,
    /// [`SuggestError::Deserialize`] for malformed bodies, and
    /// [`SuggestError::EmptyCompletion`] when no text came back.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, SuggestError> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| SuggestError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SuggestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| SuggestError::Deserialize {
                context: format!("chat completion (model={})", self.model),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(SuggestError::EmptyCompletion)
    }
}

impl SuggestionGenerator for LlmClient {
    type Error = SuggestError;

    async fn content_suggestions(
        &self,
        channel: &ChannelInfo,
        gaps: &[ContentGap],
    ) -> Result<Vec<Suggestion>, SuggestError> {
        if gaps.is_empty() {
            tracing::debug!(channel_id = %channel.id, "no content gaps, skipping suggestions");
            return Ok(Vec::new());
        }
        let answer = self
            .complete(SYSTEM_PROMPT, &build_suggestion_prompt(channel, gaps))
            .await?;
        let suggestions = parse_suggestions(&answer);
        tracing::info!(
            channel_id = %channel.id,
            count = suggestions.len(),
            "generated content suggestions"
        );
        Ok(suggestions)
    }

    async fn competition_analysis(
        &self,
        topic: &str,
        videos: &[VideoSummary],
    ) -> Result<Option<CompetitionAnalysis>, SuggestError> {
        let answer = self
            .complete(SYSTEM_PROMPT, &build_competition_prompt(topic, videos))
            .await?;
        let analysis = parse_competition_analysis(&answer);
        if analysis.is_none() {
            tracing::warn!(topic = %topic, "competition analysis answer could not be parsed");
        }
        Ok(analysis)
    }
}
