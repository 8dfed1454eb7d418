use crate::rss_utils::links;
use crate::traits::FeedTransport;
use crate::types::{AggregatorError, CanonicalArticle, FetchConfig, Result, SourceDescriptor, SourceReport};
use crate::{FeedParser, Fetcher};
use futures::future::join_all;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Fans a registry out to concurrent per-source fetches and folds the
/// results into one ordered, de-duplicated collection.
pub struct FeedAggregator {
    transport: Arc<dyn FeedTransport>,
    source_timeout: Duration,
}

impl FeedAggregator {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        let source_timeout = Duration::from_millis(fetch_config.timeout_ms);
        let fetcher = Fetcher::new(fetch_config)?;

        Ok(Self {
            transport: Arc::new(fetcher),
            source_timeout,
        })
    }

    pub fn with_transport(transport: Arc<dyn FeedTransport>, source_timeout: Duration) -> Self {
        Self { transport, source_timeout }
    }

    /// One aggregation cycle. Never fails: a broken source only means fewer
    /// articles.
    pub async fn fetch_articles(&self, sources: &[SourceDescriptor]) -> Vec<CanonicalArticle> {
        self.fetch_with_report(sources).await.0
    }

    /// Like [`fetch_articles`](Self::fetch_articles), plus one report per
    /// source in registry order.
    pub async fn fetch_with_report(
        &self,
        sources: &[SourceDescriptor],
    ) -> (Vec<CanonicalArticle>, Vec<SourceReport>) {
        if sources.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let cycle_start = Instant::now();
        info!("Fetching {} sources", sources.len());

        // join_all keeps input order, so results line up with the registry
        // no matter which source answers first.
        let results = join_all(sources.iter().map(|source| self.fetch_source_bounded(source))).await;

        let mut per_source = Vec::with_capacity(results.len());
        let mut reports = Vec::with_capacity(results.len());

        for (source, (result, elapsed_ms)) in sources.iter().zip(results) {
            match result {
                Ok(articles) => {
                    reports.push(SourceReport {
                        source_id: source.id.clone(),
                        entries: articles.len(),
                        error: None,
                        elapsed_ms,
                    });
                    per_source.push(articles);
                }
                Err(e) => {
                    warn!("Source {} ({}) contributed nothing: {}", source.id, source.feed_url, e);
                    reports.push(SourceReport {
                        source_id: source.id.clone(),
                        entries: 0,
                        error: Some(e.to_string()),
                        elapsed_ms,
                    });
                }
            }
        }

        let merged = merge_articles(per_source);
        let succeeded = reports.iter().filter(|r| r.succeeded()).count();
        info!(
            "Aggregated {} articles from {}/{} sources in {}ms",
            merged.len(),
            succeeded,
            sources.len(),
            cycle_start.elapsed().as_millis()
        );

        (merged, reports)
    }

    async fn fetch_source_bounded(&self, source: &SourceDescriptor) -> (Result<Vec<CanonicalArticle>>, u64) {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.source_timeout, self.fetch_source(source)).await {
            Ok(result) => result,
            Err(_) => Err(AggregatorError::Timeout {
                ms: self.source_timeout.as_millis() as u64,
            }),
        };
        (result, start.elapsed().as_millis() as u64)
    }

    async fn fetch_source(&self, source: &SourceDescriptor) -> Result<Vec<CanonicalArticle>> {
        let content = self.transport.fetch(&source.feed_url).await?;
        let parsed = FeedParser::parse_feed(&content)?;
        Ok(FeedParser::normalize_feed(&parsed, source))
    }
}

/// Convenience entry point using the default fetch configuration.
pub async fn fetch_articles(sources: &[SourceDescriptor]) -> Vec<CanonicalArticle> {
    match FeedAggregator::new(FetchConfig::default()) {
        Ok(aggregator) => aggregator.fetch_articles(sources).await,
        Err(e) => {
            error!("Failed to build feed client: {}", e);
            Vec::new()
        }
    }
}

/// Merge per-source lists given in registry order. The first occurrence of a
/// dedup key wins, then everything is sorted newest first with undated
/// articles last. The sort is stable, so equal timestamps keep merge order.
pub fn merge_articles(per_source: Vec<Vec<CanonicalArticle>>) -> Vec<CanonicalArticle> {
    let mut seen = HashSet::new();
    let mut merged: Vec<CanonicalArticle> = per_source
        .into_iter()
        .flatten()
        .filter(|article| {
            let key = links::dedup_key(&article.link).unwrap_or_else(|| article.link.clone());
            seen.insert(key)
        })
        .collect();

    merged.sort_by(newest_first);
    merged
}

pub fn newest_first(a: &CanonicalArticle, b: &CanonicalArticle) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
