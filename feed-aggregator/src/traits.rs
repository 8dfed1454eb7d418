use crate::types::Result;
use async_trait::async_trait;

/// Something that can turn a feed URL into the raw feed document.
///
/// The aggregator only ever calls this through a shared reference, so one
/// transport serves every concurrent source fetch.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Fetch the document behind `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}
