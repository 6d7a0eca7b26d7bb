//! HTTP transports against a local canned-response server

mod common;

use common::{request_json, serve};
use resume_screener::config::Provider;
use resume_screener::llm::client::{self, ChatClient, ClientSettings};
use resume_screener::llm::ollama::OllamaClient;
use resume_screener::llm::openai::OpenAiClient;
use resume_screener::{Config, ScreenerError};

fn settings(model: &str) -> ClientSettings {
    ClientSettings::new(model, Some("You screen resumes."), 0.1).unwrap()
}

#[tokio::test]
async fn test_openai_returns_first_choice_content() {
    let body = r###"{"choices":[{"message":{"role":"assistant","content":"## Verdict\nStrong fit"}}]}"###;
    let (base, server) = serve(vec![("200 OK", body.to_string())]).await;

    let client = OpenAiClient::new(settings("gpt-4o-mini"), "sk-test", &format!("{}/v1/", base)).unwrap();
    let reply = client.send("Evaluate Alice").await.unwrap();
    assert_eq!(reply, "## Verdict\nStrong fit");

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));

    let json = request_json(request);
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][0]["content"], "You screen resumes.");
    assert_eq!(json["messages"][1]["role"], "user");
    assert_eq!(json["messages"][1]["content"], "Evaluate Alice");
    assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_openai_error_status_carries_api_message() {
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
    let (base, _server) = serve(vec![("401 Unauthorized", body.to_string())]).await;

    let client = OpenAiClient::new(settings("gpt-4o-mini"), "sk-wrong", &base).unwrap();
    match client.send("Evaluate Alice").await {
        Err(ScreenerError::Api { status, message, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_openai_missing_content_is_unexpected_response() {
    let body = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
    let (base, _server) = serve(vec![("200 OK", body.to_string())]).await;

    let client = OpenAiClient::new(settings("gpt-4o-mini"), "sk-test", &base).unwrap();
    assert!(matches!(
        client.send("Evaluate Alice").await,
        Err(ScreenerError::UnexpectedResponse { .. })
    ));
}

#[tokio::test]
async fn test_openai_no_choices_is_unexpected_response() {
    let (base, _server) = serve(vec![("200 OK", r#"{"choices":[]}"#.to_string())]).await;

    let client = OpenAiClient::new(settings("gpt-4o-mini"), "sk-test", &base).unwrap();
    assert!(matches!(
        client.send("Evaluate Alice").await,
        Err(ScreenerError::UnexpectedResponse { .. })
    ));
}

#[tokio::test]
async fn test_openai_unreachable_endpoint_is_connectivity_error() {
    let client = OpenAiClient::new(settings("gpt-4o-mini"), "sk-test", "http://127.0.0.1:9/v1").unwrap();
    assert!(matches!(
        client.send("Evaluate Alice").await,
        Err(ScreenerError::Connectivity(_))
    ));
}

#[tokio::test]
async fn test_ollama_probes_then_chats() {
    let (base, server) = serve(vec![
        ("200 OK", r#"{"version":"0.3.12"}"#.to_string()),
        (
            "200 OK",
            r#"{"model":"llama3","message":{"role":"assistant","content":"Looks good"},"done":true}"#
                .to_string(),
        ),
    ])
    .await;

    let client = OllamaClient::connect(settings("llama3"), &format!("{}/v1", base))
        .await
        .unwrap();
    assert_eq!(client.host(), base);

    let reply = client.send("Evaluate Alice").await.unwrap();
    assert_eq!(reply, "Looks good");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/version"));
    assert!(requests[1].starts_with("POST /api/chat"));

    let json = request_json(&requests[1]);
    assert_eq!(json["model"], "llama3");
    assert_eq!(json["stream"], false);
    assert_eq!(json["messages"][1]["content"], "Evaluate Alice");
    assert!((json["options"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_ollama_unknown_model_is_api_error() {
    let (base, _server) = serve(vec![
        ("200 OK", r#"{"version":"0.3.12"}"#.to_string()),
        ("404 Not Found", r#"{"error":"model \"nope\" not found"}"#.to_string()),
    ])
    .await;

    let client = OllamaClient::connect(settings("nope"), &base).await.unwrap();
    match client.send("Evaluate Alice").await {
        Err(ScreenerError::Api { status, message, .. }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "model \"nope\" not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connect_selects_local_transport_from_config() {
    let (base, _server) = serve(vec![("200 OK", r#"{"version":"0.3.12"}"#.to_string())]).await;

    let mut config = Config::default();
    config.llm.provider = Provider::Local;
    config.llm.model = "llama3".to_string();
    config.llm.ollama_host = base;

    let client = client::connect(&config, None).await.unwrap();
    assert_eq!(client.model_name(), "llama3");
}
