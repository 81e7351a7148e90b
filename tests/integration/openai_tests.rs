//! Integration tests for the OpenAI-compatible completion client

use rpa_scout::classifier::{CompletionRequest, CompletionService, OpenAiClient, ServiceError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("test-key").with_base_url(server.uri())
}

fn request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        prompt: "Classify these pages".to_string(),
        temperature: 0.3,
        max_tokens: 1500,
    }
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

#[tokio::test]
async fn test_complete_sends_single_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{ "role": "user", "content": "Classify these pages" }],
            "max_tokens": 1500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).complete(request("gpt-4o")).await.unwrap();
    assert_eq!(reply, "[]");
}

#[tokio::test]
async fn test_reasoning_models_send_max_completion_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "max_completion_tokens": 1500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).complete(request("o3-mini")).await.unwrap();
    assert_eq!(reply, "ok");
}

#[tokio::test]
async fn test_api_error_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request("gpt-4o"))
        .await
        .unwrap_err();

    match err {
        ServiceError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_choice_is_empty_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request("gpt-4o"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmptyReply));
}

#[tokio::test]
async fn test_garbled_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request("gpt-4o"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let client = OpenAiClient::new("test-key").with_base_url("http://127.0.0.1:9/v1");

    let err = client.complete(request("gpt-4o")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
}

#[tokio::test]
async fn test_list_models_filters_and_sorts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                { "id": "gpt-4o-mini", "object": "model" },
                { "id": "whisper-1", "object": "model" },
                { "id": "gpt-4o", "object": "model" },
                { "id": "dall-e-3", "object": "model" },
                { "id": "gpt-3.5-turbo", "object": "model" }
            ]
        })))
        .mount(&server)
        .await;

    let models = client_for(&server).list_models().await.unwrap();
    assert_eq!(models, vec!["gpt-3.5-turbo", "gpt-4o", "gpt-4o-mini"]);
}
