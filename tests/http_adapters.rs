//! Wire-level tests for the HTTP status source and the Telegram notifier.

use review_notifier::config::ApiToken;
use review_notifier::review::{
    adapters::{HttpStatusSource, TelegramNotifier},
    domain::PollCursor,
    ports::{NotifierError, StatusNotifier, StatusSource, StatusSourceError},
};
use rstest::rstest;
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_PATH: &str = "/api/user_api/homework_statuses/";
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn status_source(base: &str) -> HttpStatusSource {
    HttpStatusSource::new(
        format!("{base}{STATUS_PATH}"),
        ApiToken::new("practicum-secret"),
    )
    .expect("HTTP client should build")
}

fn telegram(base: &str) -> TelegramNotifier {
    TelegramNotifier::new(base, ApiToken::new("telegram-secret"), "424242")
        .expect("HTTP client should build")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_sends_oauth_header_and_cursor() {
    let server = MockServer::start().await;
    let body = json!({
        "homeworks": [{"homework_name": "lab1", "status": "approved"}],
        "current_date": 1_700_000_600
    });
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(header("authorization", "OAuth practicum-secret"))
        .and(query_param("from_date", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = status_source(&server.uri())
        .fetch(PollCursor::from_epoch_seconds(1_700_000_000))
        .await
        .expect("fetch should succeed");

    assert_eq!(raw, body);
}

#[rstest]
#[case(401)]
#[case(404)]
#[case(500)]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_rejects_non_success_status(#[case] code: u16) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(code).set_body_string("nope"))
        .mount(&server)
        .await;

    let result = status_source(&server.uri())
        .fetch(PollCursor::from_epoch_seconds(0))
        .await;

    assert!(matches!(
        result,
        Err(StatusSourceError::UnexpectedStatus { status, ref body })
            if status == code && body == "nope"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_reports_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = status_source(&server.uri())
        .fetch(PollCursor::from_epoch_seconds(0))
        .await;

    assert!(matches!(result, Err(StatusSourceError::Decode(_))));
}

/// Serves one response whose body is shorter than its declared length.
fn truncated_response_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("listener has an address");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0_u8; 4096];
            let _read = stream.read(&mut request);
            let _written = stream.write_all(
                b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\n\r\npartial",
            );
        }
    });
    format!("http://{addr}")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_keeps_status_when_error_body_is_unreadable() {
    let base = truncated_response_server();

    let result = status_source(&base)
        .fetch(PollCursor::from_epoch_seconds(0))
        .await;

    assert!(matches!(
        result,
        Err(StatusSourceError::UnexpectedStatus { status: 503, ref body }) if body.is_empty()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fetch_reports_unreachable_endpoint() {
    let result = status_source(UNREACHABLE)
        .fetch(PollCursor::from_epoch_seconds(0))
        .await;

    assert!(matches!(result, Err(StatusSourceError::Transport(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notify_posts_send_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottelegram-secret/sendMessage"))
        .and(body_json(json!({"chat_id": "424242", "text": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    telegram(&server.uri())
        .notify("hello")
        .await
        .expect("delivery should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notify_surfaces_bot_api_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottelegram-secret/sendMessage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let result = telegram(&server.uri()).notify("hello").await;

    assert!(matches!(
        result,
        Err(NotifierError::Rejected { status: 400, ref description })
            if description == "Bad Request: chat not found"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notify_error_does_not_leak_bot_token() {
    let result = telegram(UNREACHABLE).notify("hello").await;

    let err = result.expect_err("unreachable API must fail");
    assert!(matches!(err, NotifierError::Delivery(_)));
    assert!(!err.to_string().contains("telegram-secret"));
}
