use crate::error::ValidationError;
use interfaces::RawSharePayload;
use url::Url;

pub const TITLE_MAX_CHARS: usize = 500;
pub const SOURCE_MAX_CHARS: usize = 200;
pub const SUMMARY_MAX_CHARS: usize = 2000;

/// A share request that passed validation. Only lives for one relay call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub url: Url,
    pub source: String,
    pub summary: Option<String>,
}

impl TryFrom<RawSharePayload> for SharePayload {
    type Error = ValidationError;

    fn try_from(raw: RawSharePayload) -> Result<Self, Self::Error> {
        let title = required("Title", raw.title.as_deref(), TITLE_MAX_CHARS)?;

        let url = raw
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::Missing { field: "URL" })?;
        let url = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ValidationError::InvalidUrl);
        }

        let source = required("Source", raw.source.as_deref(), SOURCE_MAX_CHARS)?;

        let summary = match raw.summary {
            Some(summary) if summary.chars().count() > SUMMARY_MAX_CHARS => {
                return Err(ValidationError::TooLong {
                    field: "Summary",
                    max: SUMMARY_MAX_CHARS,
                })
            }
            Some(summary) if summary.trim().is_empty() => None,
            other => other,
        };

        Ok(Self { title, url, source, summary })
    }
}

fn required(field: &'static str, value: Option<&str>, max: usize) -> Result<String, ValidationError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}
