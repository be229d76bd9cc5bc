//! `YouTube` catalog adapter: Data API v3 client, channel URL parsing, and
//! the public RSS feed fallback.

pub mod channel_url;
pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod rss;
pub mod types;

pub use channel_url::{parse_channel_url, ChannelRef};
pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use rss::{parse_channel_feed, MAX_FEED_VIDEOS};
