use chrono::{DateTime, Utc};
// Shared shapes live in the interfaces crate
pub use interfaces::defs::{CanonicalArticle, RegistryError, SourceDescriptor};

/// Longest summary kept on a normalized article, in characters.
pub const SUMMARY_MAX_CHARS: usize = 280;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Hard limit for one source, retries included.
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "CarRelay-Aggregator/1.0".to_string(),
            timeout_ms: 10_000,
            max_retries: 1,
            retry_delay_ms: 500,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Feed-level data pulled out of a parsed document, before normalization.
#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub site_link: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub links: Vec<ParsedLink>,
    pub summary_html: Option<String>,
    pub content_html: Option<String>,
    pub media_images: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ParsedLink {
    pub href: String,
    pub rel: Option<String>,
}

/// Outcome of one source in one aggregation cycle.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source_id: String,
    pub entries: usize,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl SourceReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Invalid source registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
