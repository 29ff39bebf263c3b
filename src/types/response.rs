//! Response envelopes for completion and chat calls.
//!
//! Buffered and streaming chat responses differ only in their choice shape
//! (`message` vs `delta`), so [`ChatResponse`] is generic over the choice and
//! content extraction goes through [`Contentable`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Anything that can yield the text content of one choice.
pub trait Contentable: DeserializeOwned + Send + 'static {
    fn content(&self) -> Option<&str>;
}

/// Token accounting reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat response envelope, generic over the choice shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse<C> {
    pub choices: Vec<C>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl<C: Contentable> ChatResponse<C> {
    /// Content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.content())
    }
}

/// Full-message choice of a buffered chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: Message,
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Contentable for ChatChoice {
    fn content(&self) -> Option<&str> {
        self.message.content()
    }
}

/// Incremental choice of a streamed chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDeltaChoice {
    pub delta: Message,
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Contentable for ChatDeltaChoice {
    fn content(&self) -> Option<&str> {
        self.delta.content()
    }
}

/// Choice of a completion response (buffered or streamed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Contentable for CompletionChoice {
    fn content(&self) -> Option<&str> {
        Some(&self.text)
    }
}

/// Completion response envelope.
pub type CompletionResponse = ChatResponse<CompletionChoice>;
