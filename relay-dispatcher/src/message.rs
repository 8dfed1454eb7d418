use crate::payload::SharePayload;
use serde::{Deserialize, Serialize};

pub const PARSE_MODE: &str = "HTML";

/// Body of the `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
}

impl SendMessageRequest {
    pub fn new(chat_id: &str, payload: &SharePayload) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            text: format_message(payload),
            parse_mode: PARSE_MODE.to_string(),
            disable_web_page_preview: false,
        }
    }
}

/// Bold title, underlined source, optional summary, then the link.
pub fn format_message(payload: &SharePayload) -> String {
    let mut text = format!(
        "<b>{}</b>\n<u>{}</u>",
        escape_html(&payload.title),
        escape_html(&payload.source)
    );
    if let Some(summary) = &payload.summary {
        text.push_str("\n\n");
        text.push_str(&escape_html(summary.trim()));
    }
    text.push_str("\n\n");
    text.push_str(&escape_html(payload.url.as_str()));
    text
}

/// Telegram's HTML mode only needs these three escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
