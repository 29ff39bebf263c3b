//! HTTP transport: sends prepared requests and interprets response status.

pub mod http;

pub use http::HttpTransport;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP layer returned something that is not a final HTTP response.
    #[error("Invalid response shape (status {status})")]
    InvalidResponseShape { status: u16 },

    #[error("Transport error: {0}")]
    Other(String),
}
