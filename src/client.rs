//! Client facade.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod chat;
pub mod config;
pub mod core;
pub mod endpoint;
pub mod types;

pub use builder::AiClientBuilder;
pub use chat::Conversation;
pub use config::Configuration;
pub use core::AiClient;
pub use endpoint::EndPoint;
pub use types::{CancelHandle, ControlledStream};
