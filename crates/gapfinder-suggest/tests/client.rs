//! Integration tests for `LlmClient` using wiremock HTTP mocks.

use gapfinder_core::{ChannelInfo, ContentGap, SuggestionGenerator, VideoSummary};
use gapfinder_suggest::{LlmClient, SuggestError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> LlmClient {
    LlmClient::new("test-key", &format!("{base_url}/v1"), "test-model", 30)
        .expect("client construction should not fail")
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn channel() -> ChannelInfo {
    ChannelInfo {
        id: "UC1".into(),
        title: "Chef Maison".into(),
        description: "Recettes faciles".into(),
        subscriber_count: Some(15_400),
        video_count: Some(230),
        view_count: None,
        uploads_playlist_id: None,
    }
}

#[tokio::test]
async fn complete_posts_chat_request_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "temperature": 0.7,
            "max_tokens": 1000,
            "messages": [{ "role": "system", "content": "sys" }, { "role": "user", "content": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("bonjour")))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client(&server.uri())
        .complete("sys", "hello")
        .await
        .expect("should complete");
    assert_eq!(text, "bonjour");
}

#[tokio::test]
async fn content_suggestions_parses_fenced_answer() {
    let server = MockServer::start().await;

    let answer = "Voici mes idées :\n```json\n{\"suggestions\": [{\"title\": \"Focaccia en 15 minutes\", \"topic\": \"focaccia\", \"description\": \"Express\", \"estimated_potential\": \"élevé\", \"key_points\": [\"pâte\", \"cuisson\"]}]}\n```";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let gaps = vec![ContentGap {
        topic: "focaccia".into(),
        average_views: 8000.0,
        average_engagement: 0.08,
        opportunity_score: 0.64,
    }];
    let suggestions = test_client(&server.uri())
        .content_suggestions(&channel(), &gaps)
        .await
        .expect("should generate");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].topic, "focaccia");
    assert_eq!(suggestions[0].key_points, vec!["pâte", "cuisson"]);
}

#[tokio::test]
async fn content_suggestions_without_gaps_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let suggestions = test_client(&server.uri())
        .content_suggestions(&channel(), &[])
        .await
        .expect("no gaps");
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn competition_analysis_reads_market_analysis() {
    let server = MockServer::start().await;

    let answer = r#"{"market_analysis": {"saturation_level": "faible", "unexplored_angles": ["sans four"], "differentiators": [], "recommendations": ["tutoriel"]}}"#;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(answer)))
        .mount(&server)
        .await;

    let videos = vec![VideoSummary {
        video_id: "a".into(),
        channel_id: "UC2".into(),
        title: "Pizza au feu de bois".into(),
        view_count: 12_000,
        engagement_rate: 0.06,
    }];
    let analysis = test_client(&server.uri())
        .competition_analysis("pizza", &videos)
        .await
        .expect("request")
        .expect("parsed analysis");

    assert_eq!(analysis.saturation_level, "faible");
    assert_eq!(analysis.unexplored_angles, vec!["sans four"]);
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete("sys", "hello")
        .await
        .expect_err("unauthorized");
    assert!(matches!(err, SuggestError::UnexpectedStatus { status: 401, .. }));
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete("sys", "hello")
        .await
        .expect_err("no choices");
    assert!(matches!(err, SuggestError::EmptyCompletion));
}
