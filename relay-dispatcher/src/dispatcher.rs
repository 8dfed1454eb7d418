use crate::config::{api_base, ConfigSource, EnvConfig, TelegramCredentials};
use crate::error::RelayError;
use crate::message::SendMessageRequest;
use crate::payload::SharePayload;
use crate::transport::{MessageTransport, TelegramTransport, TransportResponse};
use interfaces::{RawSharePayload, ShareOutcome};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const DELIVERED_MESSAGE: &str = "Delivered to Telegram";
pub const DELIVERY_FALLBACK_MESSAGE: &str = "Telegram API responded with an error.";

/// Validates one share request and delivers it to the configured chat.
///
/// Holds nothing between calls apart from the transport and the config
/// source, both read-only, so one dispatcher can serve concurrent requests.
pub struct RelayDispatcher {
    transport: Arc<dyn MessageTransport>,
    config: Arc<dyn ConfigSource>,
}

/// Envelope every Bot API reply carries.
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<String>,
}

impl RelayDispatcher {
    pub fn new(transport: Arc<dyn MessageTransport>, config: Arc<dyn ConfigSource>) -> Self {
        Self { transport, config }
    }

    /// Telegram over HTTP, configured from the process environment.
    pub fn from_env() -> Result<Self, reqwest::Error> {
        let transport = TelegramTransport::new(api_base(&EnvConfig))?;
        Ok(Self::new(Arc::new(transport), Arc::new(EnvConfig)))
    }

    pub async fn relay(&self, raw: RawSharePayload) -> ShareOutcome {
        match self.try_relay(raw).await {
            Ok(()) => {
                info!("Share delivered");
                ShareOutcome::success(DELIVERED_MESSAGE)
            }
            Err(e) => {
                error!("Failed to share to Telegram: {}", e);
                e.into()
            }
        }
    }

    /// The relay with its failure kept typed, for callers that want to tell
    /// validation, configuration and delivery problems apart.
    pub async fn try_relay(&self, raw: RawSharePayload) -> Result<(), RelayError> {
        let payload = SharePayload::try_from(raw)?;
        debug!("Validated share of {}", payload.url);

        let credentials = TelegramCredentials::resolve(self.config.as_ref())?;
        let request = SendMessageRequest::new(&credentials.chat_id, &payload);

        let response = self.transport.send(&credentials.bot_token, &request).await?;
        interpret(response)
    }
}

fn interpret(response: TransportResponse) -> Result<(), RelayError> {
    if !response.is_success() {
        let message = if response.body.trim().is_empty() {
            DELIVERY_FALLBACK_MESSAGE.to_string()
        } else {
            response.body
        };
        return Err(RelayError::Delivery(message));
    }

    // A 2xx with {"ok": false} is still a refusal
    match serde_json::from_str::<BotApiReply>(&response.body) {
        Ok(BotApiReply { ok: false, description }) => Err(RelayError::Delivery(
            description.unwrap_or_else(|| DELIVERY_FALLBACK_MESSAGE.to_string()),
        )),
        _ => Ok(()),
    }
}

/// One-shot relay through Telegram, configured from the environment.
pub async fn relay(raw: RawSharePayload) -> ShareOutcome {
    match RelayDispatcher::from_env() {
        Ok(dispatcher) => dispatcher.relay(raw).await,
        Err(e) => setup_failure(raw, &e),
    }
}

/// Nothing can be sent without a client, but a bad payload still gets its
/// own validation message.
fn setup_failure(raw: RawSharePayload, cause: &dyn std::fmt::Display) -> ShareOutcome {
    let error = match SharePayload::try_from(raw) {
        Err(invalid) => RelayError::from(invalid),
        Ok(_) => RelayError::Setup(cause.to_string()),
    };
    error!("Failed to share to Telegram: {}", error);
    error.into()
}
