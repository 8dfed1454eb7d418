use crate::error::RelayError;
use std::collections::HashMap;
use std::env;

pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const API_BASE_VAR: &str = "TELEGRAM_API_BASE";
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Where the relay reads its deployment settings from.
pub trait ConfigSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Process environment, read at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// The two secrets every delivery needs.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    pub fn resolve(config: &dyn ConfigSource) -> Result<Self, RelayError> {
        Ok(Self {
            bot_token: require(config, BOT_TOKEN_VAR)?,
            chat_id: require(config, CHAT_ID_VAR)?,
        })
    }
}

// Keep the token out of debug output
impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn require(config: &dyn ConfigSource, name: &'static str) -> Result<String, RelayError> {
    config
        .get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(RelayError::MissingConfig { name })
}

pub fn api_base(config: &dyn ConfigSource) -> String {
    config
        .get(API_BASE_VAR)
        .map(|base| base.trim().trim_end_matches('/').to_string())
        .filter(|base| !base.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}
