//! Per-client runtime configuration.

use std::env;
use std::str::FromStr;

use crate::registry::Model;
use crate::{Error, ErrorContext, Result};

/// Knobs read on every request. Never reset by the client itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    /// Overrides the endpoint's default model.
    pub model: Option<Model>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Store assistant replies in the conversation history as well as user turns.
    ///
    /// Off by default: history then holds only the user's messages.
    pub record_replies: bool,
}

impl Configuration {
    /// Read `AI_MODEL`, `AI_TEMPERATURE` and `AI_MAX_TOKENS`. Unset variables stay `None`.
    pub fn from_env() -> Result<Self> {
        let model = env::var("AI_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.trim().parse::<Model>().ok());

        Ok(Self {
            model,
            temperature: parse_env("AI_TEMPERATURE")?,
            max_tokens: parse_env("AI_MAX_TOKENS")?,
            record_replies: false,
        })
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot parse {}", key),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(format!("{:?}: {}", raw, e))
                    .with_source("configuration"),
            )
        }),
        _ => Ok(None),
    }
}
