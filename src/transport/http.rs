use crate::transport::TransportError;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Proxy, Request, StatusCode};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info};

/// Issues prepared requests and applies the status policy shared by buffered and
/// streaming calls: 200 is success, any other final status is a remote error whose
/// body text is captured verbatim.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport using env-tuned defaults and no overall request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Build a transport; `timeout` bounds each whole request including streamed bodies.
    ///
    /// `AI_HTTP_TIMEOUT_SECS` is used when `timeout` is `None`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.or_else(|| env_u64("AI_HTTP_TIMEOUT_SECS").map(Duration::from_secs));

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(
                env_u64("AI_HTTP_CONNECT_TIMEOUT_SECS").unwrap_or(10),
            ))
            .pool_max_idle_per_host(
                env::var("AI_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env_u64("AI_HTTP_POOL_IDLE_TIMEOUT_SECS").unwrap_or(90),
            )));

        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        if let Ok(proxy_url) = env::var("AI_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest` client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send `request` and return the full body of a 200 response.
    pub async fn call_buffered(&self, request: Request) -> Result<Bytes> {
        info!(url = %request.url(), "sending request");
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(TransportError::Http)?;

        match interpret_status(resp.status())? {
            StatusOutcome::Success => {
                let body = resp.bytes().await.map_err(TransportError::Http)?;
                debug!(body = %String::from_utf8_lossy(&body), "response");
                Ok(body)
            }
            StatusOutcome::Failure(status) => {
                let body = resp.text().await.map_err(TransportError::Http)?;
                error!(status, body = %body, "request failed");
                Err(Error::Remote { status, body })
            }
        }
    }

    /// Send `request` and hand back the live body stream of a 200 response.
    ///
    /// On failure the error body also arrives as a stream, so it is drained in full
    /// before the error is returned.
    pub async fn call_stream(&self, request: Request) -> Result<BoxStream<'static, Bytes>> {
        info!(url = %request.url(), "opening stream");
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(TransportError::Http)?;

        match interpret_status(resp.status())? {
            StatusOutcome::Success => {
                let byte_stream = resp
                    .bytes_stream()
                    .map_err(|e| Error::Transport(TransportError::Http(e)));
                Ok(Box::pin(byte_stream))
            }
            StatusOutcome::Failure(status) => {
                let mut chunks = resp.bytes_stream();
                let mut raw = Vec::new();
                while let Some(chunk) = chunks.next().await {
                    raw.extend_from_slice(&chunk.map_err(TransportError::Http)?);
                }
                let body = String::from_utf8_lossy(&raw).into_owned();
                error!(status, body = %body, "stream request failed");
                Err(Error::Remote { status, body })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusOutcome {
    Success,
    Failure(u16),
}

/// Only final statuses are meaningful here; an informational one means the
/// HTTP layer handed over something that is not a complete response.
pub(crate) fn interpret_status(
    status: StatusCode,
) -> std::result::Result<StatusOutcome, TransportError> {
    if status.is_informational() {
        return Err(TransportError::InvalidResponseShape {
            status: status.as_u16(),
        });
    }
    if status == StatusCode::OK {
        Ok(StatusOutcome::Success)
    } else {
        Ok(StatusOutcome::Failure(status.as_u16()))
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
}
