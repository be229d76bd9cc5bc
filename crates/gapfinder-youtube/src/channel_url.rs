//! Channel URL parsing.
//!
//! Supported forms:
//!
//! | Input                                   | Result                     |
//! |-----------------------------------------|----------------------------|
//! | `youtube.com/channel/UC…`               | [`ChannelRef::Id`]         |
//! | `youtube.com/c/<name>`                  | [`ChannelRef::CustomName`] |
//! | `youtube.com/user/<name>`               | [`ChannelRef::Username`]   |
//! | `youtube.com/@handle`, `@handle`        | [`ChannelRef::Handle`]     |
//! | bare `UC…` id                           | [`ChannelRef::Id`]         |
//!
//! Scheme, `www.`/`m.` prefixes, trailing path segments, and query strings
//! are ignored.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::YoutubeError;

static CHANNEL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/(channel|c|user)/([^/?#]+)")
        .expect("valid channel path regex")
});

static HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:https?://)?(?:www\.|m\.)?youtube\.com/)?@([^/?#]+)")
        .expect("valid handle regex")
});

static CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UC[A-Za-z0-9_-]{22}$").expect("valid channel id regex")
});

/// A channel reference extracted from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    /// Legacy `/c/` vanity name; resolved through channel search.
    CustomName(String),
    /// Legacy `/user/` name; resolved with `forUsername`.
    Username(String),
    /// `@handle`, stored without the `@`.
    Handle(String),
}

/// Parse a channel URL or bare channel id.
///
/// # Errors
///
/// Returns [`YoutubeError::InvalidChannelUrl`] when the input matches none
/// of the supported forms.
pub fn parse_channel_url(input: &str) -> Result<ChannelRef, YoutubeError> {
    let trimmed = input.trim();

    if CHANNEL_ID.is_match(trimmed) {
        return Ok(ChannelRef::Id(trimmed.to_owned()));
    }

    if let Some(caps) = CHANNEL_PATH.captures(trimmed) {
        let value = decode(&caps[2]);
        return Ok(match &caps[1] {
            "channel" => ChannelRef::Id(value),
            "c" => ChannelRef::CustomName(value),
            _ => ChannelRef::Username(value),
        });
    }

    if let Some(caps) = HANDLE.captures(trimmed) {
        return Ok(ChannelRef::Handle(decode(&caps[1])));
    }

    Err(YoutubeError::InvalidChannelUrl(input.to_owned()))
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
