use crate::error::RelayError;
use crate::message::SendMessageRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw answer of the messaging endpoint, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one message. Implementations make exactly one outbound call per
/// `send` and never retry.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Network-level failures come back as [`RelayError::Delivery`]; any HTTP
    /// answer, successful or not, is a [`TransportResponse`].
    async fn send(&self, bot_token: &str, request: &SendMessageRequest) -> Result<TransportResponse, RelayError>;
}

/// Telegram Bot API over `reqwest`.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    api_base: String,
}

impl TelegramTransport {
    pub const TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(api_base: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("CarRelay-Dispatcher/1.0")
            .timeout(Self::TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    fn endpoint(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base.trim_end_matches('/'), bot_token)
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, bot_token: &str, request: &SendMessageRequest) -> Result<TransportResponse, RelayError> {
        debug!("Posting message to chat {}", request.chat_id);

        // The token is part of the URL, so errors are reported without it
        let response = self
            .client
            .post(self.endpoint(bot_token))
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("Failed to reach Telegram: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Delivery(format!("Failed to read Telegram response: {}", e.without_url())))?;

        Ok(TransportResponse { status, body })
    }
}
