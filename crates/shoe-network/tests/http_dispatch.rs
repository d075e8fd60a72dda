//! Integration tests for HttpDispatcher
//!
//! These tests run the dispatcher against a minimal HTTP responder on a
//! local TcpListener, so the real request bytes can be inspected.

use shoe_core::{Rank, ServerConfig, Suit};
use shoe_network::{CardDispatcher, DispatchError, HttpDispatcher};
use shoe_protocol::CanonicalCard;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const TIMESTAMP: &str = "2025-10-16T14:30:00.123456-03:00";

/// Request as seen by the mock server.
#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read one HTTP/1.1 request with a Content-Length body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        raw.extend_from_slice(&chunk[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8(raw[..header_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
    let request_line = lines.next().unwrap().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending body");
        raw.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&raw[header_end..header_end + content_length]).unwrap();
    CapturedRequest {
        request_line,
        headers,
        body,
    }
}

/// Start a server that answers one request with `status` and reports it.
async fn spawn_responder(status: &'static str) -> (u16, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let response =
            format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        let _ = tx.send(request);
    });

    (port, rx)
}

fn server_on(port: u16, path: &str) -> ServerConfig {
    ServerConfig::new("127.0.0.1", port, path).unwrap()
}

fn four_of_spades() -> CanonicalCard {
    CanonicalCard::new(Rank::Four, Suit::Spades)
}

/// Test a 200 response and the exact request shape
#[tokio::test]
async fn test_send_success_request_shape() {
    let (port, captured) = spawn_responder("200 OK").await;
    let dispatcher = HttpDispatcher::new().unwrap();

    let delivered = dispatcher
        .send(&server_on(port, "/api/holdem/beetek/card"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(delivered);

    let request = captured.await.unwrap();
    assert_eq!(request.request_line, "POST /api/holdem/beetek/card HTTP/1.1");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body["card"], "S4");
    assert_eq!(request.body["timestamp"], TIMESTAMP);
}

/// Test any 2xx counts as delivered
#[tokio::test]
async fn test_send_created_is_success() {
    let (port, _captured) = spawn_responder("201 Created").await;
    let dispatcher = HttpDispatcher::new().unwrap();

    let status = dispatcher
        .try_send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await
        .unwrap();
    assert_eq!(status, 201);
}

/// Test a server error is reported as failure, not raised
#[tokio::test]
async fn test_send_server_error() {
    let (port, _captured) = spawn_responder("500 Internal Server Error").await;
    let dispatcher = HttpDispatcher::new().unwrap();

    let delivered = dispatcher
        .send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(!delivered);
}

/// Test try_send exposes the rejected status
#[tokio::test]
async fn test_try_send_status_error() {
    let (port, _captured) = spawn_responder("404 Not Found").await;
    let dispatcher = HttpDispatcher::new().unwrap();

    let result = dispatcher
        .try_send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(matches!(result, Err(DispatchError::Status(404))));
}

/// Test a server that never answers hits the timeout
#[tokio::test]
async fn test_send_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let dispatcher = HttpDispatcher::with_timeout(Duration::from_millis(200)).unwrap();
    let result = dispatcher
        .try_send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(matches!(result, Err(DispatchError::Timeout(200))));

    let delivered = dispatcher
        .send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(!delivered);
}

/// Test connection refused is a transport error
#[tokio::test]
async fn test_send_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dispatcher = HttpDispatcher::new().unwrap();
    let result = dispatcher
        .try_send(&server_on(port, "cards"), four_of_spades(), TIMESTAMP)
        .await;
    assert!(matches!(result, Err(DispatchError::Transport(_))));
}
