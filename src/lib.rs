//! # ai-lib-gpt
//!
//! Lightweight async client for OpenAI-style text-completion and chat-completion
//! APIs, with buffered and Server-Sent Events (SSE) streaming modes and a running
//! conversation history.
//!
//! ## Key Features
//!
//! - **Two endpoints**: [`EndPoint::Completions`] (single prompt) and [`EndPoint::Chat`] (multi-turn)
//! - **Streaming pipeline**: bytes to lines to SSE fragments to typed envelopes to content
//! - **Conversation history**: chat turns are kept per client and sent with every chat request
//! - **Explicit cancellation**: [`ControlledStream`] plus [`CancelHandle`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_lib_gpt::{AiClient, Model};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> ai_lib_gpt::Result<()> {
//!     let mut client = AiClient::builder("your-api-key")
//!         .model(Model::Gpt35Turbo)
//!         .build()?;
//!
//!     let reply = client.chat("Hello, how are you?").await?;
//!     println!("{reply}");
//!
//!     let mut stream = client.chat_stream("Tell me more").await?;
//!     while let Some(piece) = stream.next().await {
//!         print!("{}", piece?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client facade, builder, configuration and conversation |
//! | [`registry`] | Known model identifiers |
//! | [`protocol`] | Request envelope construction and JSON codec |
//! | [`transport`] | HTTP execution and status interpretation |
//! | [`pipeline`] | Streaming response decoding |
//! | [`types`] | Messages and response envelopes |

pub mod client;
pub mod pipeline;
pub mod protocol;
pub mod registry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{
    AiClient, AiClientBuilder, CancelHandle, Configuration, ControlledStream, Conversation,
    EndPoint,
};
pub use registry::Model;
pub use types::{
    message::{Message, MessageRole},
    response::{ChatResponse, CompletionResponse, Usage},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A specialized Result for pipeline operations
pub type PipeResult<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `PipeResult<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = PipeResult<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
