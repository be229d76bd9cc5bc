//! Elasticsearch request bodies and response shapes for the topic corpus.

use gapfinder_core::{TopicAggregate, VideoSummary};
use serde::Deserialize;
use serde_json::{json, Value};

/// Name of the terms aggregation over `topics`.
const TOPICS_AGG: &str = "successful_topics";

/// Topics returned by the aggregation.
pub const TOPIC_BUCKETS: usize = 20;

/// Index mapping for video documents.
///
/// Titles and descriptions use the French analyzer. The embedded per-video
/// analysis is stored but not indexed: some of its fields switch between
/// numbers and sentinel strings, which dynamic mapping would reject.
#[must_use]
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "channel_id": { "type": "keyword" },
                "video_id": { "type": "keyword" },
                "title": {
                    "type": "text",
                    "analyzer": "french",
                    "fields": { "keyword": { "type": "keyword" } }
                },
                "description": { "type": "text", "analyzer": "french" },
                "published_at": { "type": "date" },
                "view_count": { "type": "long" },
                "like_count": { "type": "long" },
                "comment_count": { "type": "long" },
                "engagement_rate": { "type": "float" },
                "keywords": { "type": "keyword" },
                "topics": { "type": "keyword" },
                "analysis": { "type": "object", "enabled": false }
            }
        }
    })
}

/// Per-topic view and engagement averages over every other channel, best
/// average views first.
#[must_use]
pub fn topic_aggregation_query(channel_id: &str) -> Value {
    json!({
        "size": 0,
        "query": {
            "bool": {
                "must_not": [{ "term": { "channel_id": channel_id } }]
            }
        },
        "aggs": {
            TOPICS_AGG: {
                "terms": {
                    "field": "topics",
                    "size": TOPIC_BUCKETS,
                    "order": { "avg_views": "desc" }
                },
                "aggs": {
                    "avg_views": { "avg": { "field": "view_count" } },
                    "avg_engagement": { "avg": { "field": "engagement_rate" } }
                }
            }
        }
    })
}

/// Full-text search for videos about `topic`, topic keywords weighted highest.
#[must_use]
pub fn topic_search_query(topic: &str, limit: usize) -> Value {
    json!({
        "size": limit,
        "query": {
            "multi_match": {
                "query": topic,
                "fields": ["topics^3", "title^2", "description"]
            }
        },
        "_source": ["video_id", "channel_id", "title", "view_count", "engagement_rate"]
    })
}

#[derive(Debug, Deserialize)]
struct AggregationResponse {
    aggregations: Aggregations,
}

#[derive(Debug, Deserialize)]
struct Aggregations {
    #[serde(rename = "successful_topics")]
    topics: TermsAggregation,
}

#[derive(Debug, Deserialize)]
struct TermsAggregation {
    #[serde(default)]
    buckets: Vec<TopicBucket>,
}

#[derive(Debug, Deserialize)]
struct TopicBucket {
    key: String,
    avg_views: AvgValue,
    avg_engagement: AvgValue,
}

/// `avg` aggregations report `null` when no document in the bucket has the
/// field.
#[derive(Debug, Deserialize)]
struct AvgValue {
    value: Option<f64>,
}

/// Turn an aggregation response into topic aggregates, in bucket order.
///
/// # Errors
///
/// Returns the deserialization error when the response lacks the expected
/// aggregation.
pub fn parse_topic_buckets(body: &str) -> Result<Vec<TopicAggregate>, serde_json::Error> {
    let response: AggregationResponse = serde_json::from_str(body)?;
    Ok(response
        .aggregations
        .topics
        .buckets
        .into_iter()
        .map(|bucket| TopicAggregate {
            topic: bucket.key,
            average_views: bucket.avg_views.value.unwrap_or(0.0),
            average_engagement: bucket.avg_engagement.value.unwrap_or(0.0),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: HitSource,
}

#[derive(Debug, Default, Deserialize)]
struct HitSource {
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    engagement_rate: f64,
}

/// Turn a search response into video summaries, in relevance order.
///
/// # Errors
///
/// Returns the deserialization error when the response has no `hits`.
pub fn parse_search_hits(body: &str) -> Result<Vec<VideoSummary>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .hits
        .hits
        .into_iter()
        .map(|hit| VideoSummary {
            video_id: hit.source.video_id.unwrap_or(hit.id),
            channel_id: hit.source.channel_id,
            title: hit.source.title,
            view_count: hit.source.view_count,
            engagement_rate: hit.source.engagement_rate,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_excludes_requesting_channel() {
        let q = topic_aggregation_query("UC123");
        assert_eq!(q["size"], 0);
        assert_eq!(q["query"]["bool"]["must_not"][0]["term"]["channel_id"], "UC123");
        let terms = &q["aggs"][TOPICS_AGG]["terms"];
        assert_eq!(terms["field"], "topics");
        assert_eq!(terms["size"], 20);
        assert_eq!(terms["order"]["avg_views"], "desc");
    }

    #[test]
    fn buckets_become_aggregates_with_null_as_zero() {
        let body = r#"{
            "took": 3,
            "hits": { "total": { "value": 40 }, "hits": [] },
            "aggregations": {
                "successful_topics": {
                    "doc_count_error_upper_bound": 0,
                    "buckets": [
                        { "key": "pizza", "doc_count": 12,
                          "avg_views": { "value": 15000.5 }, "avg_engagement": { "value": 0.042 } },
                        { "key": "sushi", "doc_count": 1,
                          "avg_views": { "value": null }, "avg_engagement": { "value": null } }
                    ]
                }
            }
        }"#;
        let aggs = parse_topic_buckets(body).expect("parse");
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].topic, "pizza");
        assert!((aggs[0].average_views - 15000.5).abs() < 1e-9);
        assert!(aggs[1].average_views.abs() < f64::EPSILON);
        assert!(aggs[1].average_engagement.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_aggregation_is_an_error() {
        assert!(parse_topic_buckets(r#"{"hits": {"hits": []}}"#).is_err());
    }

    #[test]
    fn hits_fall_back_to_document_id() {
        let body = r#"{
            "hits": { "hits": [
                { "_id": "vid9", "_source": { "channel_id": "UC9", "title": "Pizza", "view_count": 10 } },
                { "_id": "vid8", "_source": { "video_id": "v8", "engagement_rate": 0.5 } }
            ] }
        }"#;
        let hits = parse_search_hits(body).expect("parse");
        assert_eq!(hits[0].video_id, "vid9");
        assert_eq!(hits[0].channel_id, "UC9");
        assert_eq!(hits[1].video_id, "v8");
        assert!((hits[1].engagement_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mapping_disables_analysis_indexing() {
        let m = index_mapping();
        assert_eq!(m["mappings"]["properties"]["analysis"]["enabled"], false);
        assert_eq!(m["mappings"]["properties"]["title"]["analyzer"], "french");
    }
}
