//! Elasticsearch adapter for the topic corpus: index bootstrap, video
//! indexing, topic aggregation, and topic search.

pub mod client;
pub mod error;
pub mod query;

pub use client::SearchClient;
pub use error::SearchError;
pub use query::{
    index_mapping, parse_search_hits, parse_topic_buckets, topic_aggregation_query,
    topic_search_query, TOPIC_BUCKETS,
};
