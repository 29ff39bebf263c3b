use crate::client::chat::{record_streamed_turn, Conversation};
use crate::client::config::Configuration;
use crate::client::endpoint::EndPoint;
use crate::client::types::{cancel_pair, CancelHandle, ControlledStream};
use crate::pipeline::Pipeline;
use crate::protocol::{self, build_request, ChatBody, CompletionBody};
use crate::registry::Model;
use crate::transport::HttpTransport;
use crate::types::{
    ChatChoice, ChatDeltaChoice, ChatResponse, CompletionChoice, CompletionResponse, Message,
};
use crate::{Error, Result};
use reqwest::Request;
use serde::Serialize;
use tracing::info;
use url::Url;

/// Client for the completion and chat endpoints.
///
/// Holds the API key, one [`Configuration`] and one [`Conversation`]. Methods that
/// touch the conversation take `&mut self`, and a chat stream keeps the client
/// borrowed until it is dropped, so history is never mutated concurrently.
pub struct AiClient {
    pub(crate) transport: HttpTransport,
    pub(crate) pipeline: Pipeline,
    pub(crate) base_url: Url,
    pub(crate) api_key: String,
    pub(crate) config: Configuration,
    pub(crate) conversation: Conversation,
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("history_len", &self.conversation.len())
            .finish_non_exhaustive()
    }
}

impl AiClient {
    /// Create a client for the default base URL. The API key is the only required input.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        crate::client::builder::AiClientBuilder::new(api_key).build()
    }

    /// Start a builder for a client with custom settings.
    pub fn builder(api_key: impl Into<String>) -> crate::client::builder::AiClientBuilder {
        crate::client::builder::AiClientBuilder::new(api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    pub fn set_model(&mut self, model: Option<Model>) {
        self.config.model = model;
    }

    pub fn set_temperature(&mut self, temperature: Option<f64>) {
        self.config.temperature = temperature;
    }

    pub fn set_max_tokens(&mut self, max_tokens: Option<u32>) {
        self.config.max_tokens = max_tokens;
    }

    /// Build the HTTP request for `endpoint` without sending it.
    pub fn prepare<B: Serialize>(&self, endpoint: EndPoint, body: B, stream: bool) -> Result<Request> {
        build_request(&self.base_url, &self.api_key, endpoint, body, stream, &self.config)
    }

    /// Buffered text completion.
    pub async fn complete(&self, prompt: impl Into<String>) -> Result<CompletionResponse> {
        let body = CompletionBody {
            prompt: prompt.into(),
        };
        let request = self.prepare(EndPoint::Completions, body, false)?;
        let bytes = self.transport.call_buffered(request).await?;
        protocol::decode(&bytes)
    }

    /// Streamed text completion; yields the text of each fragment.
    pub async fn complete_stream(
        &self,
        prompt: impl Into<String>,
    ) -> Result<ControlledStream<'static, String>> {
        let content = self.open_completion_stream(prompt.into()).await?;
        Ok(ControlledStream::new(content, None))
    }

    /// Like [`AiClient::complete_stream`], plus a handle that can cancel the stream.
    pub async fn complete_stream_with_cancel(
        &self,
        prompt: impl Into<String>,
    ) -> Result<(ControlledStream<'static, String>, CancelHandle)> {
        let content = self.open_completion_stream(prompt.into()).await?;
        let (handle, rx) = cancel_pair();
        Ok((ControlledStream::new(content, Some(rx)), handle))
    }

    async fn open_completion_stream(&self, prompt: String) -> Result<crate::BoxStream<'static, String>> {
        let request = self.prepare(EndPoint::Completions, CompletionBody { prompt }, true)?;
        let bytes = self.transport.call_stream(request).await?;
        Ok(self.pipeline.process_stream::<CompletionChoice>(bytes))
    }

    /// Send `text` as the next chat turn and return the reply.
    ///
    /// History is updated only when the call succeeds.
    pub async fn chat(&mut self, text: impl Into<String>) -> Result<String> {
        let user = Message::user(text);
        let body = ChatBody {
            messages: self.conversation.request_messages(&user),
        };
        let request = self.prepare(EndPoint::Chat, body, false)?;
        let bytes = self.transport.call_buffered(request).await?;
        let response: ChatResponse<ChatChoice> = protocol::decode(&bytes)?;

        let first = response.choices.first().ok_or(Error::NoChoices)?;
        let reply = first.message.content().ok_or(Error::NoContent)?.to_string();

        let stored_reply = self
            .config
            .record_replies
            .then(|| Message::assistant(reply.clone()));
        self.conversation.commit(user, stored_reply);
        info!(history = self.conversation.len(), "chat turn completed");
        Ok(reply)
    }

    /// Send `text` as the next chat turn and stream the reply.
    ///
    /// The user turn is added to history when the first piece of content arrives.
    pub async fn chat_stream(
        &mut self,
        text: impl Into<String>,
    ) -> Result<ControlledStream<'_, String>> {
        let content = self.open_chat_stream(text.into()).await?;
        Ok(ControlledStream::new(content, None))
    }

    /// Like [`AiClient::chat_stream`], plus a handle that can cancel the stream.
    pub async fn chat_stream_with_cancel(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(ControlledStream<'_, String>, CancelHandle)> {
        let content = self.open_chat_stream(text.into()).await?;
        let (handle, rx) = cancel_pair();
        Ok((ControlledStream::new(content, Some(rx)), handle))
    }

    async fn open_chat_stream(&mut self, text: String) -> Result<crate::BoxStream<'_, String>> {
        let user = Message::user(text);
        let body = ChatBody {
            messages: self.conversation.request_messages(&user),
        };
        let request = self.prepare(EndPoint::Chat, body, true)?;
        let bytes = self.transport.call_stream(request).await?;
        let content = self.pipeline.process_stream::<ChatDeltaChoice>(bytes);
        let record_replies = self.config.record_replies;
        Ok(record_streamed_turn(
            content,
            &mut self.conversation,
            user,
            record_replies,
        ))
    }

    /// Forget the conversation so far.
    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    /// Content of every stored history message, oldest first.
    pub fn historical(&self) -> Vec<String> {
        self.conversation.historical()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
