pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod aggregator;
pub mod rss_utils;
pub mod sources;

pub use types::*;
pub use traits::FeedTransport;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use aggregator::{fetch_articles, merge_articles, FeedAggregator};
pub use sources::{car_sources, load_registry};
