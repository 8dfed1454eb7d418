//! Relay of a single car news article into a Telegram channel.
//!
//! A share request arrives as untyped form fields, is validated into a
//! [`SharePayload`], formatted as an HTML message and posted once to the Bot
//! API. Every path ends in a [`ShareOutcome`] the caller can render.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod payload;
pub mod transport;

pub use config::{ConfigSource, EnvConfig, TelegramCredentials};
pub use dispatcher::{relay, RelayDispatcher, DELIVERED_MESSAGE, DELIVERY_FALLBACK_MESSAGE};
pub use error::{RelayError, ValidationError};
pub use interfaces::{RawSharePayload, ShareOutcome};
pub use message::{format_message, SendMessageRequest};
pub use payload::SharePayload;
pub use transport::{MessageTransport, TelegramTransport, TransportResponse};
