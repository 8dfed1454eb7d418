//! Source registries: the built-in automotive list, or one loaded from disk.

use crate::types::{Result, SourceDescriptor};
use interfaces::validate_registry;
use std::path::Path;
use tracing::info;

/// Built-in registry of automotive publications, in tie-break order.
pub fn car_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("autocar", "Autocar", "https://www.autocar.co.uk/rss"),
        SourceDescriptor::new(
            "caranddriver",
            "Car and Driver",
            "https://www.caranddriver.com/rss/all.xml/",
        ),
        SourceDescriptor::new("motor1", "Motor1", "https://www.motor1.com/rss/news/all/"),
        SourceDescriptor::new("autoblog", "Autoblog", "https://www.autoblog.com/rss.xml"),
        SourceDescriptor::new("insideevs", "InsideEVs", "https://insideevs.com/rss/news/all/"),
        SourceDescriptor::new("thedrive", "The Drive", "https://www.thedrive.com/feed"),
    ]
}

/// Load a registry from a JSON array of `{ "id", "name", "feedUrl" }` objects.
pub fn load_registry(path: impl AsRef<Path>) -> Result<Vec<SourceDescriptor>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let sources: Vec<SourceDescriptor> = serde_json::from_str(&raw)?;
    validate_registry(&sources)?;

    info!("Loaded {} sources from {}", sources.len(), path.display());
    Ok(sources)
}
