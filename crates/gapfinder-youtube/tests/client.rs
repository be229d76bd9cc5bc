//! Integration tests for `YoutubeClient` using wiremock HTTP mocks.

use gapfinder_core::{RawCount, VideoCatalog};
use gapfinder_youtube::{ChannelRef, YoutubeClient, YoutubeError};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry(2, 0)
}

fn channel_body(id: &str) -> serde_json::Value {
    serde_json::json!({
        "items": [{
            "id": id,
            "snippet": { "title": "Chef Maison", "description": "Recettes faciles" },
            "statistics": { "subscriberCount": "15400", "videoCount": "230", "viewCount": "990000" },
            "contentDetails": { "relatedPlaylists": { "uploads": "UU_uploads" } }
        }]
    })
}

fn video_item(id: &str, views: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "snippet": {
            "title": format!("Video {id}"),
            "description": "",
            "publishedAt": "2024-03-01T17:00:05Z"
        },
        "statistics": { "viewCount": views, "likeCount": "10", "commentCount": "2" }
    })
}

#[tokio::test]
async fn resolve_channel_by_id_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UC_x5XG1OV2P6uZZ5FSM9Ttw"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(channel_body("UC_x5XG1OV2P6uZZ5FSM9Ttw")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let info = client
        .resolve_channel("https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw")
        .await
        .expect("should resolve channel");

    assert_eq!(info.id, "UC_x5XG1OV2P6uZZ5FSM9Ttw");
    assert_eq!(info.title, "Chef Maison");
    assert_eq!(info.subscriber_count, Some(15_400));
    assert_eq!(info.uploads_playlist_id.as_deref(), Some("UU_uploads"));
}

#[tokio::test]
async fn custom_name_resolves_through_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "channel"))
        .and(query_param("q", "ChefMaison"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{ "snippet": { "channelId": "UCfound" } }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UCfound"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_body("UCfound")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let info = client
        .fetch_channel(&ChannelRef::CustomName("ChefMaison".into()))
        .await
        .expect("should resolve custom name");
    assert_eq!(info.id, "UCfound");
}

#[tokio::test]
async fn handle_without_match_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("forHandle", "inconnu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .resolve_channel("https://www.youtube.com/@inconnu")
        .await
        .expect_err("no channel");
    assert!(matches!(err, YoutubeError::ChannelNotFound(ref h) if h == "inconnu"));
}

#[tokio::test]
async fn list_uploads_pages_playlist_and_batches_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU_uploads"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "contentDetails": { "videoId": "v1" } },
                { "contentDetails": { "videoId": "v2" } }
            ],
            "nextPageToken": "page2"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("pageToken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "contentDetails": { "videoId": "v3" } },
                { "contentDetails": { "videoId": "v4" } }
            ],
            "nextPageToken": "page3"
        })))
        .mount(&server)
        .await;

    // Answered out of order and missing v3 (deleted between calls).
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v1,v2,v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [video_item("v2", "200"), video_item("v1", "100")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let info = gapfinder_core::ChannelInfo {
        id: "UC1".into(),
        title: "Chef".into(),
        description: String::new(),
        subscriber_count: None,
        video_count: None,
        view_count: None,
        uploads_playlist_id: Some("UU_uploads".into()),
    };
    let videos = client
        .channel_videos(&info, 3)
        .await
        .expect("should list uploads");

    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
    assert_eq!(videos[0].view_count, Some(RawCount::Text("100".into())));
    assert_eq!(videos[0].published_at.as_deref(), Some("2024-03-01T17:00:05Z"));
}

#[tokio::test]
async fn quota_exceeded_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [{ "reason": "quotaExceeded", "domain": "youtube.quota" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_channel(&ChannelRef::Id("UC1".into()))
        .await
        .expect_err("quota error");
    assert!(matches!(err, YoutubeError::QuotaExceeded(_)));
}

#[tokio::test]
async fn server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_body("UC1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let info = client
        .fetch_channel(&ChannelRef::Id("UC1".into()))
        .await
        .expect("should succeed after retry");
    assert_eq!(info.id, "UC1");
}

#[tokio::test]
async fn recent_videos_reads_rss_feed() {
    let server = MockServer::start().await;

    let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <yt:videoId>rss1</yt:videoId>
    <title>Focaccia express</title>
    <published>2024-04-02T08:00:00+00:00</published>
    <media:group>
      <media:community>
        <media:starRating count="42" average="5.00" min="1" max="5"/>
        <media:statistics views="900"/>
      </media:community>
    </media:group>
  </entry>
</feed>"#;

    Mock::given(method("GET"))
        .and(path("/feeds/videos.xml"))
        .and(query_param("channel_id", "UC1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .mount(&server)
        .await;

    let client = test_client(&server.uri())
        .with_feed_url(&format!("{}/feeds/videos.xml", server.uri()))
        .expect("feed url");
    let info = gapfinder_core::ChannelInfo {
        id: "UC1".into(),
        title: String::new(),
        description: String::new(),
        subscriber_count: None,
        video_count: None,
        view_count: None,
        uploads_playlist_id: None,
    };
    let videos = client.recent_videos(&info).await.expect("feed");
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "rss1");
    assert_eq!(videos[0].view_count, Some(RawCount::Text("900".into())));
    assert_eq!(videos[0].like_count, Some(RawCount::Text("42".into())));
}
