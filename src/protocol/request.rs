//! Request envelope and HTTP request construction.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::client::config::Configuration;
use crate::client::endpoint::EndPoint;
use crate::types::message::Message;
use crate::{registry, Error, ErrorContext, Result};

/// Outgoing JSON envelope: shared knobs plus the endpoint-specific body, merged
/// into one top-level object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope<B> {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub stream: bool,
    #[serde(flatten)]
    pub body: B,
}

/// Body of the `completions` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionBody {
    pub prompt: String,
}

/// Body of the `chat/completions` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBody {
    pub messages: Vec<Message>,
}

/// Compose a ready-to-send request. Performs no I/O.
pub fn build_request<B: Serialize>(
    base_url: &Url,
    api_key: &str,
    endpoint: EndPoint,
    body: B,
    stream: bool,
    config: &Configuration,
) -> Result<Request> {
    let model = registry::resolve(config.model.as_ref(), endpoint);
    if !endpoint.supports(model) {
        warn!(
            model = %model,
            endpoint = endpoint.path(),
            "model is not listed as compatible with endpoint"
        );
    }

    let envelope = RequestEnvelope {
        model: model.id().to_string(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        stream,
        body,
    };
    let payload = super::encode(&envelope)?;

    let url = endpoint_url(base_url, endpoint)?;

    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
        Error::configuration_with_context(
            "API key is not a valid header value",
            ErrorContext::new()
                .with_field_path("api_key")
                .with_details(e.to_string())
                .with_source("request_builder"),
        )
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    debug!(
        url = %url,
        body = %String::from_utf8_lossy(&payload),
        "prepared request"
    );

    let mut request = Request::new(Method::POST, url);
    *request.headers_mut() = headers;
    *request.body_mut() = Some(payload.into());
    Ok(request)
}

fn endpoint_url(base_url: &Url, endpoint: EndPoint) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        endpoint.path()
    );
    Url::parse(&joined).map_err(|e| {
        Error::configuration_with_context(
            "invalid endpoint URL",
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details(format!("{}: {}", joined, e))
                .with_source("request_builder"),
        )
    })
}
