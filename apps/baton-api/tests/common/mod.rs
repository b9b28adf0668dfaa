#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::Router;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::time;

use baton_api::config::Config;
use baton_api::AppState;

/// Build a test AppState with default configuration.
pub fn test_state() -> AppState {
    AppState::new(Config::default())
}

/// Build the full application router wired to a fresh test state.
pub fn test_app() -> (Router, AppState) {
    test_app_with(Config::default())
}

/// Build the application router with a custom configuration.
pub fn test_app_with(config: Config) -> (Router, AppState) {
    let state = AppState::new(config);
    let app = baton_api::app(state.clone());
    (app, state)
}

/// Start an actual TCP server for streaming tests. The server runs in the
/// background for the rest of the test.
pub async fn start_server() -> (SocketAddr, AppState) {
    let (app, state) = test_app();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// Minimal SSE reader over a streaming `reqwest` response.
pub struct SseReader {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    buffer: String,
}

impl SseReader {
    /// Open `GET /api/events/stream` on a running server.
    pub async fn connect(addr: SocketAddr) -> Self {
        let resp = reqwest::get(format!("http://{addr}/api/events/stream"))
            .await
            .expect("stream request");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"), "{content_type}");

        Self {
            body: resp.bytes_stream().boxed(),
            buffer: String::new(),
        }
    }

    /// Next raw frame, without its trailing blank line.
    pub async fn next_frame(&mut self) -> String {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame = self.buffer[..end].to_string();
                self.buffer.replace_range(..end + 2, "");
                return frame;
            }

            let chunk = time::timeout(Duration::from_secs(5), self.body.next())
                .await
                .expect("timeout waiting for SSE frame")
                .expect("stream ended")
                .expect("stream read error");
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    /// Next `data:` frame parsed as JSON, skipping comments.
    pub async fn next_data(&mut self) -> serde_json::Value {
        loop {
            let frame = self.next_frame().await;
            if let Some(json) = frame.strip_prefix("data: ") {
                return serde_json::from_str(json).expect("parse data frame");
            }
            assert!(frame.starts_with(':'), "unexpected frame {frame:?}");
        }
    }
}

/// POST a raw body to an ingestion path on a running server.
pub async fn post_raw(addr: SocketAddr, path: &str, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .header(reqwest::header::CONTENT_TYPE, "text/plain")
        .body(body.to_string())
        .send()
        .await
        .expect("ingest request")
}

/// Wait until the broadcaster reports `expected` subscribers.
pub async fn wait_for_subscribers(state: &AppState, expected: usize) {
    time::timeout(Duration::from_secs(5), async {
        while state.broadcaster.subscriber_count() != expected {
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timeout waiting for subscriber count");
}
