//! Summarizer client tests against a mock completion server

use gleaner::config::SummarizerConfig;
use gleaner::summarizer::{SummarizerClient, SummaryOptions, SummaryStatus};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1/chat/completions";

/// Client pointed at the mock server through the regular settings
fn client_for(server: &MockServer) -> SummarizerClient {
    let address = server.address();
    let config = SummarizerConfig {
        host: address.ip().to_string(),
        port: address.port(),
        timeout_seconds: 5,
        ..SummarizerConfig::default()
    };
    SummarizerClient::new(&config).unwrap()
}

async fn mount_reply(server: &MockServer, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(reply)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_completion_style_reply() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": [{"text": "Greeting."}]})),
    )
    .await;

    let response = client_for(&server)
        .summarize("Hello world", &SummaryOptions::default())
        .await;

    assert_eq!(response.status, SummaryStatus::Success);
    assert_eq!(response.summary, "Greeting.");
    assert!(response.raw.is_some());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_chat_style_reply_and_request_body() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "\n  A short summary.  "},
                "finish_reason": "stop"
            }]
        })),
    )
    .await;

    let options = SummaryOptions {
        model: "local-model".to_string(),
        max_tokens: 64,
        min_words: 5,
        max_words: 15,
        ..SummaryOptions::default()
    };
    let response = client_for(&server)
        .summarize("Some longer text to summarize", &options)
        .await;

    assert!(response.is_success());
    assert_eq!(response.summary, "A short summary.");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["model"], "local-model");
    assert_eq!(body["max_tokens"], 64);
    assert_eq!(body["messages"][0]["role"], "user");
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("Aim for 5-15 words."));
    assert!(prompt.ends_with("Some longer text to summarize"));
}

#[tokio::test]
async fn test_unreachable_server_is_error_response() {
    // Reserve a port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = SummarizerClient::with_endpoint(
        format!("http://127.0.0.1:{}{}", port, ENDPOINT),
        Duration::from_secs(5),
    )
    .unwrap();

    let response = client.summarize("Hello world", &SummaryOptions::default()).await;

    assert_eq!(response.status, SummaryStatus::Error);
    assert!(response.summary.is_empty());
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_unexpected_shape_is_error_response() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"result": "Greeting."})),
    )
    .await;

    let response = client_for(&server)
        .summarize("Hello world", &SummaryOptions::default())
        .await;

    assert_eq!(response.status, SummaryStatus::Error);
    assert!(response.error.unwrap().contains("Unexpected summarizer reply"));
}

#[tokio::test]
async fn test_non_json_reply_is_error_response() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
    )
    .await;

    let response = client_for(&server)
        .summarize("Hello world", &SummaryOptions::default())
        .await;

    assert_eq!(response.status, SummaryStatus::Error);
    assert!(response.error.unwrap().contains("not valid JSON"));
}

#[tokio::test]
async fn test_server_error_status_is_error_response() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(500).set_body_raw("model not loaded", "text/plain"),
    )
    .await;

    let response = client_for(&server)
        .summarize("Hello world", &SummaryOptions::default())
        .await;

    assert_eq!(response.status, SummaryStatus::Error);
    let reason = response.error.unwrap();
    assert!(reason.contains("500"));
    assert!(reason.contains("model not loaded"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"choices": [{"text": "Late."}]}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let client = SummarizerClient::with_endpoint(
        format!("{}{}", server.uri(), ENDPOINT),
        Duration::from_millis(500),
    )
    .unwrap();
    let response = client.summarize("Hello world", &SummaryOptions::default()).await;

    assert_eq!(response.status, SummaryStatus::Error);
    assert!(response.error.unwrap().contains("did not answer"));
}

#[tokio::test]
async fn test_summarize_saved_file() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": [{"text": "File summary."}]})),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("page.txt");
    std::fs::write(&file, "Saved page text").unwrap();
    let empty = dir.path().join("empty.txt");
    std::fs::write(&empty, "").unwrap();

    let client = client_for(&server);
    let response = client.summarize_file(&file, &SummaryOptions::default()).await;
    assert_eq!(response.summary, "File summary.");

    let response = client.summarize_file(&empty, &SummaryOptions::default()).await;
    assert_eq!(response.status, SummaryStatus::Error);
}
