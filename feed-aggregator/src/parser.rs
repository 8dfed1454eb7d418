use crate::rss_utils::{html, links, text};
use crate::types::{
    AggregatorError, CanonicalArticle, ParsedEntry, ParsedFeed, ParsedLink, Result,
    SourceDescriptor, SUMMARY_MAX_CHARS,
};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// Parses RSS, Atom and JSON Feed documents and normalizes their entries.
pub struct FeedParser;

impl FeedParser {
    pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let site_link = pick_link(
            &feed
                .links
                .iter()
                .map(|l| ParsedLink { href: l.href.clone(), rel: l.rel.clone() })
                .collect::<Vec<_>>(),
        )
        .map(|l| l.href.clone());

        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, site_link, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let links = entry
            .links
            .into_iter()
            .map(|l| ParsedLink { href: l.href, rel: l.rel })
            .collect();

        let mut media_images = Vec::new();
        for object in &entry.media {
            for content in &object.content {
                let Some(url) = &content.url else { continue };
                let url = url.to_string();
                let is_image = match &content.content_type {
                    Some(mime) => mime.essence_str().starts_with("image/"),
                    None => has_image_extension(&url),
                };
                if is_image {
                    media_images.push(url);
                }
            }
            for thumbnail in &object.thumbnails {
                media_images.push(thumbnail.image.uri.clone());
            }
        }

        ParsedEntry {
            title: entry.title.map(|t| t.content),
            links,
            summary_html: entry.summary.map(|s| s.content),
            content_html: entry.content.and_then(|c| c.body),
            media_images,
            published_at: entry.published,
            updated_at: entry.updated,
        }
    }

    /// Turn parsed entries into canonical articles for `source`. Entries
    /// without a usable title or absolute link are dropped, as are repeats of
    /// a link already seen earlier in the same feed.
    pub fn normalize_feed(parsed: &ParsedFeed, source: &SourceDescriptor) -> Vec<CanonicalArticle> {
        let base = parsed
            .site_link
            .as_deref()
            .and_then(|l| links::resolve(l, None))
            .or_else(|| Url::parse(&source.feed_url).ok());

        let mut seen = HashSet::new();
        let mut articles = Vec::with_capacity(parsed.entries.len());

        for entry in &parsed.entries {
            let Some(article) = Self::normalize_entry(entry, base.as_ref(), source) else {
                continue;
            };
            if seen.insert(article.id.clone()) {
                articles.push(article);
            } else {
                debug!("Skipping repeated entry in {}: {}", source.id, article.link);
            }
        }

        info!(
            "Normalized {}/{} entries from {}",
            articles.len(),
            parsed.entries.len(),
            source.id
        );
        articles
    }

    pub fn normalize_entry(
        entry: &ParsedEntry,
        base: Option<&Url>,
        source: &SourceDescriptor,
    ) -> Option<CanonicalArticle> {
        let title = entry.title.as_deref().map(html::to_plain_text).unwrap_or_default();
        if title.is_empty() {
            debug!("Dropping entry without title from {}", source.id);
            return None;
        }

        let Some(link) = pick_link(&entry.links).and_then(|l| links::resolve(&l.href, base)) else {
            debug!("Dropping entry without usable link from {}: {}", source.id, title);
            return None;
        };
        let key = links::dedup_key(link.as_str())?;

        let summary = [entry.summary_html.as_deref(), entry.content_html.as_deref()]
            .into_iter()
            .flatten()
            .map(html::to_plain_text)
            .find(|s| !s.is_empty())
            .map(|s| text::truncate(&s, SUMMARY_MAX_CHARS))
            .unwrap_or_default();

        let image = entry
            .media_images
            .iter()
            .find(|src| !html::looks_like_pixel(src))
            .cloned()
            .or_else(|| entry.summary_html.as_deref().and_then(html::first_image_src))
            .or_else(|| entry.content_html.as_deref().and_then(html::first_image_src))
            .and_then(|src| links::resolve(&src, Some(&link)))
            .map(|url| url.to_string());

        Some(CanonicalArticle {
            id: article_id(&source.id, &key),
            title,
            summary,
            link: link.to_string(),
            image,
            published_at: entry.published_at.or(entry.updated_at),
            source_id: source.id.clone(),
            source_name: source.name.clone(),
        })
    }
}

/// Stable across fetches: the same source and link always give the same id.
pub fn article_id(source_id: &str, dedup_key: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{}|{}", source_id, dedup_key).as_bytes()).to_string()
}

/// The `alternate` (or rel-less) link if there is one, else the first link.
fn pick_link(links: &[ParsedLink]) -> Option<&ParsedLink> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
}

fn has_image_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    [".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif"]
        .iter()
        .any(|ext| path.ends_with(ext))
}
