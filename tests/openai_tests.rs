use axum::http::{HeaderMap, StatusCode, header};
use axum::{Json, Router, routing::post};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use querycraft::config::Config;
use querycraft::error::{ExtractionError, ProviderError};
use querycraft::extractor::{IntentExtractor, SYSTEM_INSTRUCTION};
use querycraft::llm::{LanguageModel, OpenAiChat};

mod test_helpers {
    use super::*;

    /// Last request seen by the fake provider: headers and JSON body.
    pub type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    /// A provider answering every completion with `status` and `body`.
    pub async fn canned_provider(status: StatusCode, body: Value) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let sink = sink.clone();
                let body = body.clone();
                async move {
                    *sink.lock().unwrap() = Some((headers, request));
                    (status, Json(body))
                }
            }),
        );
        (spawn_provider(router).await, captured)
    }

    /// A provider answering every completion with a raw, possibly non-JSON body.
    pub async fn raw_provider(status: StatusCode, content_type: &'static str, body: &'static str) -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move || async move { (status, [(header::CONTENT_TYPE, content_type)], body) }),
        );
        spawn_provider(router).await
    }

    pub fn chat_reply(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ]
        })
    }

    pub fn client(base_url: &str) -> OpenAiChat {
        OpenAiChat::new(&Config::new("sk-test-key").with_base_url(base_url)).unwrap()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_complete_sends_chat_request() {
    let (base_url, captured) =
        canned_provider(StatusCode::OK, chat_reply(r#"{"main_query":"rust"}"#)).await;

    let reply = client(&base_url)
        .complete("system prompt", "find rust docs", 0.3)
        .await
        .unwrap();
    assert_eq!(reply, r#"{"main_query":"rust"}"#);

    let (headers, request) = captured.lock().unwrap().take().unwrap();
    assert_eq!(headers["authorization"], "Bearer sk-test-key");
    assert_eq!(request["model"], "gpt-3.5-turbo");
    assert_eq!(request["messages"][0], json!({"role": "system", "content": "system prompt"}));
    assert_eq!(request["messages"][1], json!({"role": "user", "content": "find rust docs"}));
    let temperature = request["temperature"].as_f64().unwrap();
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_error_payload_is_rejected() {
    let (base_url, _) = canned_provider(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}),
    )
    .await;

    let err = client(&base_url).complete("s", "u", 0.3).await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::Rejected("You exceeded your current quota".into())
    );
}

#[tokio::test]
async fn test_error_payload_with_ok_status_is_rejected() {
    let (base_url, _) =
        canned_provider(StatusCode::OK, json!({"error": {"message": "model overloaded"}})).await;

    let err = client(&base_url).complete("s", "u", 0.3).await.unwrap_err();
    assert_eq!(err, ProviderError::Rejected("model overloaded".into()));
}

#[tokio::test]
async fn test_no_choices_is_empty() {
    let (base_url, _) = canned_provider(StatusCode::OK, json!({"choices": []})).await;

    let err = client(&base_url).complete("s", "u", 0.3).await.unwrap_err();
    assert_eq!(err, ProviderError::Empty);
}

#[tokio::test]
async fn test_gateway_html_page_is_rejected_with_status() {
    let base_url = raw_provider(
        StatusCode::BAD_GATEWAY,
        "text/html",
        "<html><body>502 Bad Gateway</body></html>",
    )
    .await;

    match client(&base_url).complete("s", "u", 0.3).await.unwrap_err() {
        ProviderError::Rejected(msg) => {
            assert!(msg.starts_with("HTTP 502"), "unexpected message: {msg}");
            assert!(msg.contains("<html>"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_status_without_error_payload_is_rejected() {
    let (base_url, _) =
        canned_provider(StatusCode::SERVICE_UNAVAILABLE, json!({"detail": "try later"})).await;

    match client(&base_url).complete("s", "u", 0.3).await.unwrap_err() {
        ProviderError::Rejected(msg) => assert!(msg.starts_with("HTTP 503"), "unexpected message: {msg}"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_ok_body_is_rejected() {
    let base_url = raw_provider(StatusCode::OK, "text/plain", "definitely not json").await;

    match client(&base_url).complete("s", "u", 0.3).await.unwrap_err() {
        ProviderError::Rejected(msg) => {
            assert!(msg.starts_with("unreadable response body"), "unexpected message: {msg}")
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_null_content_fails_as_malformed_intent() {
    let (base_url, _) = canned_provider(
        StatusCode::OK,
        json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]}),
    )
    .await;

    assert_eq!(client(&base_url).complete("s", "u", 0.3).await.unwrap(), "");

    let extractor = IntentExtractor::new(Arc::new(client(&base_url)), 0.3);
    let err = extractor
        .extract("anything", &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        ExtractionError::MalformedIntent { raw, .. } => assert_eq!(raw, ""),
        other => panic!("expected MalformedIntent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_transport() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/v1"))
        .complete("s", "u", 0.3)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_request_timeout_is_transport() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(chat_reply("{}"))
        }),
    );
    let base_url = spawn_provider(router).await;
    let config = Config::new("k")
        .with_base_url(&base_url)
        .with_request_timeout(Duration::from_millis(100));

    let err = OpenAiChat::new(&config)
        .unwrap()
        .complete("s", "u", 0.3)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_extractor_end_to_end() {
    let content = "\n  {\"main_query\":\"machine learning\",\"exact_phrases\":[\"research papers\"],\"site_filter\":\"arxiv.org\",\"file_type\":\"pdf\",\"exclude_words\":[\"blog\"],\"date_range\":\"2024\"}\n";
    let (base_url, captured) = canned_provider(StatusCode::OK, chat_reply(content)).await;

    let extractor = IntentExtractor::new(Arc::new(client(&base_url)), 0.3);
    let intent = extractor
        .extract("ml papers", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(intent.file_type, "pdf");

    let (_, request) = captured.lock().unwrap().take().unwrap();
    assert_eq!(request["messages"][0]["content"], SYSTEM_INSTRUCTION);
}

#[tokio::test]
async fn test_extractor_cancels_slow_provider() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(chat_reply("{}"))
        }),
    );
    let base_url = spawn_provider(router).await;
    let extractor = IntentExtractor::new(Arc::new(client(&base_url)), 0.3);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), extractor.extract("x", &cancel))
        .await
        .expect("cancellation must not hang");
    assert_eq!(result.unwrap_err(), ExtractionError::canceled());
}
