use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// One entry of the static source registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    pub feed_url: String,
}

impl SourceDescriptor {
    pub fn new(id: &str, name: &str, feed_url: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            feed_url: feed_url.to_owned(),
        }
    }
}

/// A normalized news item, independent of the feed format it came from.
///
/// `source_id` and `source_name` only point back at the registry entry; the
/// article does not own its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_id: String,
    pub source_name: String,
}

/// The untyped fields of a share request, exactly as a form would submit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSharePayload {
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub summary: Option<String>,
}

impl RawSharePayload {
    /// Builds a payload from form key/value pairs. Unknown keys are ignored and
    /// a repeated key keeps its first value.
    pub fn from_form<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut payload = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "title" => &mut payload.title,
                "url" => &mut payload.url,
                "source" => &mut payload.source,
                "summary" => &mut payload.summary,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_owned());
            }
        }
        payload
    }
}

impl From<&CanonicalArticle> for RawSharePayload {
    fn from(article: &CanonicalArticle) -> Self {
        Self {
            title: Some(article.title.clone()),
            url: Some(article.link.clone()),
            source: Some(article.source_name.clone()),
            summary: if article.summary.is_empty() {
                None
            } else {
                Some(article.summary.clone())
            },
        }
    }
}

/// Result of one relay attempt, rendered by the caller as a static UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ShareOutcome {
    #[default]
    Idle,
    Success { message: String },
    Error { message: String },
}

impl ShareOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success { message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Success { message } | Self::Error { message } => Some(message),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate source id: {0}")]
    DuplicateId(String),

    #[error("source {0} has an empty id or name")]
    MissingField(String),

    #[error("source {id} has an invalid feed URL: {url}")]
    InvalidFeedUrl { id: String, url: String },
}

/// Checks a registry before it is handed to the aggregator.
pub fn validate_registry(sources: &[SourceDescriptor]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for source in sources {
        if source.id.trim().is_empty() || source.name.trim().is_empty() {
            return Err(RegistryError::MissingField(source.feed_url.clone()));
        }
        if !seen.insert(source.id.as_str()) {
            return Err(RegistryError::DuplicateId(source.id.clone()));
        }
        let valid_url = Url::parse(&source.feed_url)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .unwrap_or(false);
        if !valid_url {
            return Err(RegistryError::InvalidFeedUrl {
                id: source.id.clone(),
                url: source.feed_url.clone(),
            });
        }
    }
    Ok(())
}
