use thiserror::Error;

/// Errors returned by the `YouTube` catalog client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The URL does not name a channel in any supported form.
    #[error("not a YouTube channel URL: {0}")]
    InvalidChannelUrl(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// The daily Data API quota is spent; retrying before the reset is futile.
    #[error("YouTube API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The Data API answered with a non-2xx status.
    #[error("YouTube API returned {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("RSS feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
