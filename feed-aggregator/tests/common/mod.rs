#![allow(dead_code)]

use async_trait::async_trait;
use feed_aggregator::{AggregatorError, FeedTransport, Result, SourceDescriptor};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One RSS `<item>`: title, link and optional RFC 2822 date.
pub struct Item<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub pub_date: Option<&'a str>,
}

pub fn item<'a>(title: &'a str, link: &'a str, pub_date: Option<&'a str>) -> Item<'a> {
    Item { title, link, pub_date }
}

pub fn rss_feed(channel_title: &str, items: &[Item<'_>]) -> String {
    let mut body = String::new();
    for item in items {
        body.push_str("<item>");
        body.push_str(&format!("<title>{}</title>", item.title));
        body.push_str(&format!("<link>{}</link>", item.link));
        body.push_str(&format!("<description>About {}</description>", item.title));
        if let Some(date) = item.pub_date {
            body.push_str(&format!("<pubDate>{}</pubDate>", date));
        }
        body.push_str("</item>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>{}</title><link>https://example.com/</link><description>test</description>{}</channel></rss>"#,
        channel_title, body
    )
}

pub fn atom_feed(feed_title: &str, entries: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (title, link, published) in entries {
        body.push_str(&format!(
            r#"<entry><title>{}</title><link rel="alternate" href="{}"/><id>{}</id><published>{}</published><updated>{}</updated><summary>Atom summary</summary></entry>"#,
            title, link, link, published, published
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><feed xmlns="http://www.w3.org/2005/Atom"><title>{}</title><id>urn:test</id><updated>2025-10-15T00:00:00Z</updated>{}</feed>"#,
        feed_title, body
    )
}

pub fn source(id: &str, feed_url: &str) -> SourceDescriptor {
    SourceDescriptor::new(id, &id.to_uppercase(), feed_url)
}

#[derive(Clone)]
pub enum FakeResponse {
    Feed(String),
    Delayed(String, Duration),
    Status(u16),
}

/// In-memory transport keyed by feed URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: FakeResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedTransport for FakeTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(url) {
            Some(FakeResponse::Feed(body)) => Ok(body.clone()),
            Some(FakeResponse::Delayed(body, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
            Some(FakeResponse::Status(status)) => Err(AggregatorError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(AggregatorError::Status { status: 404, url: url.to_string() }),
        }
    }
}

/// Canned reply of the HTTP stub. Clones share the hit counter.
#[derive(Clone)]
pub struct StubReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    /// Requests answered with 503 before the canned reply is served.
    unavailable_first: usize,
    hits: Arc<AtomicUsize>,
}

impl StubReply {
    fn new(status: u16, body: String, delay: Duration) -> Self {
        Self { status, body, delay, unavailable_first: 0, hits: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn ok(body: String) -> Self {
        Self::new(200, body, Duration::ZERO)
    }

    pub fn status(status: u16) -> Self {
        Self::new(status, String::new(), Duration::ZERO)
    }

    pub fn hang() -> Self {
        Self::new(200, String::new(), Duration::from_secs(60))
    }

    pub fn unavailable_first(mut self, times: usize) -> Self {
        self.unavailable_first = times;
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `routes` (path -> reply) on a random local port and return the base
/// URL. The listener lives until the test runtime shuts down.
pub async fn serve(routes: HashMap<String, StubReply>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let reply = routes.get(&path).cloned().unwrap_or_else(|| StubReply::status(404));

                let hit = reply.hits.fetch_add(1, Ordering::SeqCst);
                let (status, body) = if hit < reply.unavailable_first {
                    (503, "")
                } else {
                    (reply.status, reply.body.as_str())
                };

                tokio::time::sleep(reply.delay).await;
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    if status < 400 { "OK" } else { "Error" },
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}
