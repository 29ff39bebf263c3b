//! Core data types exchanged with the API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat turn with role and optional content |
//! | [`ChatResponse`] | Response envelope, generic over the choice shape |
//! | [`Contentable`] | Content accessor shared by all choice shapes |
//! | [`Usage`] | Token counters reported by the server |

pub mod message;
pub mod response;

pub use message::{Message, MessageRole};
pub use response::{
    ChatChoice, ChatDeltaChoice, ChatResponse, CompletionChoice, CompletionResponse, Contentable,
    Usage,
};
