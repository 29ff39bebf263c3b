use crate::client::chat::Conversation;
use crate::client::config::Configuration;
use crate::client::core::AiClient;
use crate::pipeline::Pipeline;
use crate::registry::Model;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const KEYRING_SERVICE: &str = "ai-lib-gpt";
const KEYRING_USER: &str = "openai";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable (developer-friendly).
pub struct AiClientBuilder {
    api_key: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    config: Configuration,
}

impl AiClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
            http_client: None,
            config: Configuration::default(),
        }
    }

    /// Builder with the API key and settings taken from the environment.
    ///
    /// The key is looked up in the OS keyring first (service `ai-lib-gpt`, user
    /// `openai`), then in `OPENAI_API_KEY`. `AI_BASE_URL` overrides the base URL,
    /// and the request knobs come from [`Configuration::from_env`].
    pub fn from_env() -> Result<Self> {
        let api_key = Self::lookup_api_key().ok_or_else(|| {
            Error::configuration_with_context(
                "no API key found",
                ErrorContext::new()
                    .with_field_path(API_KEY_ENV)
                    .with_details("set OPENAI_API_KEY or store the key in the OS keyring")
                    .with_source("client_builder"),
            )
        })?;

        let mut builder = Self::new(api_key).configuration(Configuration::from_env()?);
        if let Ok(url) = env::var("AI_BASE_URL") {
            if !url.trim().is_empty() {
                builder = builder.base_url(url.trim());
            }
        }
        Ok(builder)
    }

    fn lookup_api_key() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variable
        env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
    }

    /// Override the API base URL (default `https://api.openai.com/v1`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bound every request, streamed bodies included. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured `reqwest` client; `timeout` is then ignored.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: Model) -> Self {
        self.config.model = Some(model);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Keep assistant replies in history too.
    pub fn record_replies(mut self, enable: bool) -> Self {
        self.config.record_replies = enable;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AiClient> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "API key must not be empty",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("client_builder"),
            ));
        }

        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid base URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(format!("{}: {}", raw_url, e))
                    .with_source("client_builder"),
            )
        })?;

        let transport = match self.http_client {
            Some(client) => HttpTransport::from_client(client),
            None => HttpTransport::with_timeout(self.timeout)?,
        };

        Ok(AiClient {
            transport,
            pipeline: Pipeline::default(),
            base_url,
            api_key: self.api_key,
            config: self.config,
            conversation: Conversation::new(),
        })
    }
}
