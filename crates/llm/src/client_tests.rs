use inner_map_core::Transcript;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{ImageProvider, InsightProvider, LlmClient, LlmError, QuestionProvider};

fn client(server: &MockServer) -> LlmClient {
    LlmClient::new("test-key".to_owned(), format!("{}/", server.uri())).unwrap()
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn test_start_conversation_returns_trimmed_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
            "  Welcome. If your feelings were a landscape, what would it look like?\n",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let question = client(&server).start_conversation().await.unwrap();
    assert_eq!(question, "Welcome. If your feelings were a landscape, what would it look like?");
}

#[tokio::test]
async fn test_next_question_sends_transcript() {
    let server = MockServer::start().await;
    let mut transcript = Transcript::new();
    let pair = transcript.push_question("What colour is today?");
    transcript.set_answer(pair, "Grey-blue").unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Who do you call first?")))
        .mount(&server)
        .await;

    let question = client(&server).next_question(&transcript).await.unwrap();
    assert_eq!(question, "Who do you call first?");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("respondent: Grey-blue"));
    assert_eq!(body["messages"][0]["role"], "system");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).start_conversation().await.unwrap_err();
    assert!(matches!(err, LlmError::HttpStatus { code: 503, .. }));
    assert!(!err.is_schema_violation());
}

#[tokio::test]
async fn test_empty_content_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server).start_conversation().await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_synthesize_requests_json_schema() {
    let server = MockServer::start().await;
    let content = serde_json::json!({
        "reflection": "r",
        "poem": "p",
        "symbolicMapTitle": "t",
        "symbolicMapDescription": "d",
        "symbolicMapImagePrompt": "a lighthouse",
        "patterns": [
            {"iconName": "Path", "title": "a", "description": "a"},
            {"iconName": "Heart", "title": "b", "description": "b"},
            {"iconName": "Lightbulb", "title": "c", "description": "c"}
        ],
        "isMilestone": true,
        "milestoneReason": "A breakthrough."
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"response_format": {"type": "json_schema"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(&content.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let insight = client(&server).synthesize("Answer 1: calm").await.unwrap();
    assert!(insight.is_milestone);
    assert_eq!(insight.milestone_reason.as_deref(), Some("A breakthrough."));
    assert_eq!(insight.image_prompt, "a lighthouse");
}

#[tokio::test]
async fn test_synthesize_malformed_is_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(r#"{"reflection": "r"}"#)))
        .mount(&server)
        .await;

    let err = client(&server).synthesize("Answer 1: calm").await.unwrap_err();
    assert!(err.is_schema_violation());
}

#[tokio::test]
async fn test_generate_image_decodes_base64() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_partial_json(serde_json::json!({"n": 1, "size": "1024x1024", "model": "gpt-image-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": [{"b64_json": "iVBORw0KGgo="}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let image = client(&server).generate_image("a lighthouse").await.unwrap();
    assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn test_generate_image_downloads_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"data": [{"url": format!("{}/files/map.jpg", server.uri())}]}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/map.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xff, 0xd8, 0xff]),
        )
        .mount(&server)
        .await;

    let image = client(&server).generate_image("a lighthouse").await.unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.bytes, vec![0xff, 0xd8, 0xff]);
}

#[tokio::test]
async fn test_generate_image_without_data_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let err = client(&server).generate_image("a lighthouse").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}
