#![allow(dead_code)]

// Re-export commonly used test types and utilities
pub use relay_dispatcher::{
    MessageTransport, RawSharePayload, RelayDispatcher, RelayError, SendMessageRequest,
    ShareOutcome, TransportResponse,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Test configuration constants
pub const TEST_BOT_TOKEN: &str = "123456:TEST-token";
pub const TEST_CHAT_ID: &str = "-1001234567890";

pub fn full_config() -> HashMap<String, String> {
    config(&[
        ("TELEGRAM_BOT_TOKEN", TEST_BOT_TOKEN),
        ("TELEGRAM_CHAT_ID", TEST_CHAT_ID),
    ])
}

pub fn config(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn valid_payload() -> RawSharePayload {
    RawSharePayload {
        title: Some("Hypercar breaks Nürburgring record".to_string()),
        url: Some("https://www.caranddriver.com/news/hypercar-record".to_string()),
        source: Some("Car and Driver".to_string()),
        summary: Some("A 7:05 lap on street tyres.".to_string()),
    }
}

/// What the fake endpoint does when called.
#[derive(Clone)]
pub enum Canned {
    Reply(u16, String),
    Unreachable(String),
}

/// Transport double that records every call instead of touching the network.
pub struct RecordingTransport {
    canned: Canned,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, SendMessageRequest)>>,
}

impl RecordingTransport {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            canned,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Self::new(Canned::Reply(status, body.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, SendMessageRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, bot_token: &str, request: &SendMessageRequest) -> Result<TransportResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((bot_token.to_string(), request.clone()));
        match &self.canned {
            Canned::Reply(status, body) => Ok(TransportResponse { status: *status, body: body.clone() }),
            Canned::Unreachable(reason) => Err(RelayError::Delivery(reason.clone())),
        }
    }
}

pub fn dispatcher(transport: Arc<RecordingTransport>, config: HashMap<String, String>) -> RelayDispatcher {
    RelayDispatcher::new(transport, Arc::new(config))
}

/// Request line and body seen by the HTTP stub.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

/// Answer exactly one HTTP request with `status`/`body` and hand back what
/// was received.
pub async fn serve_once(status: u16, body: &str) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let body = body.to_string();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else { return };

        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => data.extend_from_slice(&buf[..n]),
            }
            if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&data[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        while data.len() < header_end + content_length {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => data.extend_from_slice(&buf[..n]),
            }
        }

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        let _ = tx.send(CapturedRequest {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&data[header_end..]).to_string(),
        });
    });

    (format!("http://{}", addr), rx)
}
