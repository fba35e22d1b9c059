use serde::{Deserialize, Serialize};

use crate::{channel::address::DEFAULT_ENDPOINT_PATH, infra::error::AppError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub chat: ChatConfig,
    pub reconnect: ReconnectConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        let reconnect = &self.reconnect;
        let problem = if !self.chat.endpoint_path.starts_with('/') {
            Some(format!(
                "chat.endpoint_path `{}` must start with `/`",
                self.chat.endpoint_path
            ))
        } else if reconnect.initial_delay_ms == 0 || reconnect.connect_timeout_ms == 0 {
            Some("reconnect delays and timeout must be greater than zero".to_owned())
        } else if reconnect.max_delay_ms < reconnect.initial_delay_ms {
            Some("reconnect.max_delay_ms must not be below initial_delay_ms".to_owned())
        } else if !(reconnect.decay >= 1.0 && reconnect.decay.is_finite()) {
            Some(format!(
                "reconnect.decay must be a finite number >= 1, got {}",
                reconnect.decay
            ))
        } else {
            None
        };

        match problem {
            Some(details) => Err(AppError::InvalidConfig { details }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Log to a rolling file instead of stderr; the terminal shell needs the screen.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Site origin the chat belongs to, e.g. `https://example.com`.
    pub origin: String,
    pub endpoint_path: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:8000".to_owned(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconnectConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub decay: f64,
    pub connect_timeout_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            decay: 1.5,
            connect_timeout_ms: 2_000,
        }
    }
}
