use anyhow::Context;
use clap::Parser;
use feed_aggregator::{car_sources, load_registry, FeedAggregator, FetchConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Run one aggregation cycle over the car news sources and print the result.
#[derive(Parser, Debug)]
#[command(name = "feed-aggregator", version, about)]
struct Cli {
    /// JSON file with a source registry; the built-in car sources otherwise
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Hard per-source timeout in milliseconds
    #[arg(long, default_value_t = FetchConfig::default().timeout_ms)]
    timeout_ms: u64,

    /// Retries per source for transient failures
    #[arg(long, default_value_t = FetchConfig::default().max_retries)]
    retries: u32,

    /// Print at most this many articles
    #[arg(long)]
    limit: Option<usize>,

    /// Print the articles as JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let sources = match &cli.sources {
        Some(path) => load_registry(path)
            .with_context(|| format!("Failed to load source registry from {}", path.display()))?,
        None => car_sources(),
    };

    let fetch_config = FetchConfig {
        timeout_ms: cli.timeout_ms,
        max_retries: cli.retries,
        ..FetchConfig::default()
    };
    let aggregator = FeedAggregator::new(fetch_config).context("Failed to build feed client")?;

    info!("Starting aggregation over {} sources", sources.len());
    let (mut articles, reports) = aggregator.fetch_with_report(&sources).await;

    for report in &reports {
        match &report.error {
            None => info!("  {}: {} articles in {}ms", report.source_id, report.entries, report.elapsed_ms),
            Some(e) => warn!("  {}: failed after {}ms: {}", report.source_id, report.elapsed_ms, e),
        }
    }

    if let Some(limit) = cli.limit {
        articles.truncate(limit);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else {
        for article in &articles {
            let published = article
                .published_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "----------------".to_string());
            println!("{}  [{}] {}", published, article.source_name, article.title);
            println!("                  {}", article.link);
        }
    }

    Ok(())
}
