//! Configuration loaded from the environment

use std::str::FromStr;

use crate::domain::TriggerPolicy;
use crate::shared::errors::ConfigError;

/// Immutable run configuration.
///
/// All secrets and selectors come from the environment (or a `.env`
/// file); operational knobs like the history path are CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub name_selector: String,
    pub price_selector: String,
    pub threshold: f64,
    pub bot_token: String,
    pub chat_id: i64,
    pub policy: TriggerPolicy,
}

impl Config {
    /// Read configuration from the process environment, after dotenv.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "URL")?;
        let name_selector = required(&lookup, "SELECTOR_NAME")?;
        let price_selector = required(&lookup, "SELECTOR_PRICE")?;
        let bot_token = required(&lookup, "BOT_TOKEN")?;

        let chat_id_raw = required(&lookup, "CHAT_ID")?;
        let chat_id = chat_id_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidVar {
                name: "CHAT_ID",
                reason: format!("{:?} is not a chat id", chat_id_raw),
            })?;

        let threshold_raw = required(&lookup, "THRESHOLD")?;
        let threshold = threshold_raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| ConfigError::InvalidVar {
                name: "THRESHOLD",
                reason: format!("{:?} is not a finite number", threshold_raw),
            })?;

        let policy = match lookup("TRIGGER_POLICY") {
            Some(raw) if !raw.trim().is_empty() => {
                TriggerPolicy::from_str(raw.trim()).map_err(|reason| ConfigError::InvalidVar {
                    name: "TRIGGER_POLICY",
                    reason,
                })?
            }
            _ => TriggerPolicy::default(),
        };

        Ok(Self {
            url,
            name_selector,
            price_selector,
            threshold,
            bot_token,
            chat_id,
            policy,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
