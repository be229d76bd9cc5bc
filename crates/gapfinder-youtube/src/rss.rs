//! Public channel RSS feed, used when the Data API listing is unavailable.
//!
//! The feed carries the 15 most recent uploads. View counts come from
//! `media:statistics/@views` and the rating count from
//! `media:starRating/@count`, which stands in for likes. Comment counts are
//! not published in the feed and stay absent.

use gapfinder_core::{RawCount, VideoRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::YoutubeError;

/// Entries the feed ever returns.
pub const MAX_FEED_VIDEOS: usize = 15;

/// Parse a channel feed document into video records.
///
/// # Errors
///
/// Returns [`YoutubeError::Xml`] for malformed feed content.
pub fn parse_channel_feed(xml: &str) -> Result<Vec<VideoRecord>, YoutubeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut entry = FeedEntry::default();
    let mut videos = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(&e);
                if name == "entry" {
                    in_entry = true;
                    entry = FeedEntry::default();
                }
                current_tag = name;
            }
            Event::Empty(e) => {
                if in_entry {
                    match tag_name(&e).as_str() {
                        "media:statistics" => entry.views = attribute(&e, b"views"),
                        "media:starRating" => entry.ratings = attribute(&e, b"count"),
                        _ => {}
                    }
                }
            }
            Event::Text(e) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "yt:videoId" => entry.id = text,
                        "title" => entry.title = text,
                        "published" => entry.published = Some(text),
                        "media:description" => entry.description = text,
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"entry" {
                    in_entry = false;
                    if let Some(video) = std::mem::take(&mut entry).into_record() {
                        videos.push(video);
                        if videos.len() >= MAX_FEED_VIDEOS {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(videos)
}

#[derive(Debug, Default)]
struct FeedEntry {
    id: String,
    title: String,
    description: String,
    published: Option<String>,
    views: Option<String>,
    ratings: Option<String>,
}

impl FeedEntry {
    fn into_record(self) -> Option<VideoRecord> {
        if self.id.is_empty() {
            return None;
        }
        Some(VideoRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            view_count: self.views.map(RawCount::Text),
            like_count: self.ratings.map(RawCount::Text),
            comment_count: None,
            published_at: self.published,
        })
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(attr.value.as_ref()).into_owned())
}
