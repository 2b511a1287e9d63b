//! Mock API tests for the Google Gemini adapter.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llm_relay::prelude::*;
use llm_relay::providers::GoogleProvider;

fn generate_content_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {
                "content": {
                    "parts": [{"text": text}],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }
        ],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 10}
    })
}

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new("test-api-key")
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn generate_content_flattens_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .and(header("x-goog-api-key", "test-api-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generate_content_response("Bonjour!")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = find_model("gemini-2.5-pro").unwrap();
    let text = provider(&server)
        .get_response(model, "Say bonjour", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(text, "Bonjour!");
}

#[tokio::test]
async fn models_prefix_in_full_name_is_not_doubled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_response("ok")))
        .expect(1)
        .mount(&server)
        .await;

    // Catalog entry whose full name already carries the "models/" prefix.
    let model = find_model("gemini-2.5-flash").unwrap();
    assert_eq!(model.full_name, "models/gemini-2.5-flash");
    provider(&server)
        .get_response(model, "hi", &RequestOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn generation_config_carries_candidate_count_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_response("ok")))
        .mount(&server)
        .await;

    let model = find_model("gemini-2.5-pro").unwrap();
    let options = RequestOptions::new().with_temperature(0.4).with_max_tokens(2048);
    provider(&server)
        .get_response(model, "hi", &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["generationConfig"]["candidateCount"], 1);
    assert_eq!(body["generationConfig"]["temperature"], 0.4);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
}

#[tokio::test]
async fn structured_response_handles_leading_prose() {
    let server = MockServer::start().await;
    let text = "Sure, here is the JSON you asked for:\n{\"name\": \"Joan\", \"age\": 52}";
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_response(text)))
        .mount(&server)
        .await;

    let model = find_model("gemini-2.5-pro").unwrap();
    let schema = ResponseSchema::object(&[("name", "string"), ("age", "integer")]).unwrap();
    let value = provider(&server)
        .get_structured_response(model, "Describe a person", &schema, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(value, json!({"name": "Joan", "age": 52}));
}
