//! Feed-specific helpers used while normalizing entries

/// Link utilities: absolute-URL checks, resolution and the dedup key
pub mod links {
    use url::Url;

    /// Query parameters that only identify a campaign or a click, never content.
    const TRACKING_PARAMS: &[&str] = &[
        "fbclid", "gclid", "dclid", "msclkid", "mc_cid", "mc_eid", "_ga", "ref", "cmpid", "ito",
        "ncid", "sr_share", "guccounter",
    ];

    pub fn is_tracking_param(name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        name.starts_with("utm_") || TRACKING_PARAMS.contains(&name.as_str())
    }

    /// Parse `href` as an absolute http(s) URL, resolving it against `base`
    /// when it is relative.
    pub fn resolve(href: &str, base: Option<&Url>) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
            Err(_) => return None,
        };
        is_web_url(&url).then_some(url)
    }

    pub fn is_web_url(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    }

    /// Key used to collapse the same story published under slightly
    /// different links: scheme, host, path without trailing slash, and the
    /// non-tracking query parameters in their original order.
    pub fn dedup_key(link: &str) -> Option<String> {
        let url = Url::parse(link).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();

        let mut key = format!("{}://{}", url.scheme(), host);
        if let Some(port) = url.port() {
            key.push_str(&format!(":{}", port));
        }
        key.push_str(url.path().trim_end_matches('/'));

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| !is_tracking_param(name))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        if !kept.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(kept)
                .finish();
            key.push('?');
            key.push_str(&query);
        }

        Some(key)
    }
}

/// HTML-to-text helpers for titles and summaries
pub mod html {
    use once_cell::sync::Lazy;
    use regex::{Captures, Regex};

    static ENTITY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern"));
    static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["']"#).expect("img pattern")
    });

    const BLOCK_TAGS: &[&str] = &[
        "br", "p", "div", "li", "ul", "ol", "tr", "td", "blockquote", "h1", "h2", "h3", "h4",
        "h5", "h6", "figure", "figcaption",
    ];

    /// Drop markup, decode entities and collapse whitespace.
    pub fn to_plain_text(html: &str) -> String {
        collapse_whitespace(&decode_entities(&strip_tags(html)))
    }

    /// Remove markup. A `<` only opens a tag when a letter, `/` or `!`
    /// follows it, so text such as `<3` or `<$40k` survives.
    pub fn strip_tags(html: &str) -> String {
        let mut text = String::with_capacity(html.len());
        let mut tag = String::new();
        let mut in_tag = false;
        let mut chars = html.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '<' if !in_tag && chars.peek().is_some_and(|&n| opens_tag(n)) => {
                    in_tag = true;
                    tag.clear();
                }
                '>' if in_tag => {
                    in_tag = false;
                    if BLOCK_TAGS.contains(&tag_name(&tag).as_str()) {
                        text.push(' ');
                    }
                }
                _ if in_tag => tag.push(c),
                _ => text.push(c),
            }
        }

        // never closed, so it was text after all
        if in_tag {
            text.push('<');
            text.push_str(&tag);
        }

        text
    }

    fn opens_tag(next: char) -> bool {
        next.is_ascii_alphabetic() || next == '/' || next == '!'
    }

    fn tag_name(tag: &str) -> String {
        tag.trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase()
    }

    pub fn decode_entities(text: &str) -> String {
        ENTITY
            .replace_all(text, |caps: &Captures| {
                let entity = &caps[1];
                decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn decode_entity(entity: &str) -> Option<String> {
        if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            return char::from_u32(u32::from_str_radix(hex, 16).ok()?).map(String::from);
        }
        if let Some(dec) = entity.strip_prefix('#') {
            return char::from_u32(dec.parse().ok()?).map(String::from);
        }
        let decoded = match entity {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "apos" => "'",
            "nbsp" => " ",
            "hellip" => "…",
            "mdash" => "—",
            "ndash" => "–",
            "lsquo" => "‘",
            "rsquo" => "’",
            "ldquo" => "“",
            "rdquo" => "”",
            "copy" => "©",
            "reg" => "®",
            "trade" => "™",
            _ => return None,
        };
        Some(decoded.to_string())
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// First `<img src>` in the markup that doesn't look like a tracking pixel.
    pub fn first_image_src(html: &str) -> Option<String> {
        IMG_SRC
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).map(|m| decode_entities(m.as_str())))
            .find(|src| !looks_like_pixel(src))
    }

    pub fn looks_like_pixel(src: &str) -> bool {
        let lower = src.to_ascii_lowercase();
        lower.contains("1x1") || lower.contains("pixel") || lower.contains("spacer")
    }
}

/// Text helpers
pub mod text {
    /// Cut `text` to at most `max_chars` characters, ending in an ellipsis
    /// when anything was removed.
    pub fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        if max_chars == 0 {
            return String::new();
        }
        let kept: String = text.chars().take(max_chars - 1).collect();
        format!("{}…", kept.trim_end())
    }
}
