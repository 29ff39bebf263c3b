//! Conversation engine: running chat history and its append policy.
//!
//! Buffered turns are committed only after the reply decoded successfully.
//! Streamed turns are committed when the first piece of content arrives, exactly
//! once per call.

use crate::types::message::Message;
use crate::BoxStream;
use futures::{stream, StreamExt};
use tracing::debug;

/// Ordered chat history owned by a single client.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message list for the next request: the full history followed by `next`.
    pub fn request_messages(&self, next: &Message) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.extend(self.history.iter().cloned());
        messages.push(next.clone());
        messages
    }

    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Record a finished buffered turn.
    pub fn commit(&mut self, user: Message, reply: Option<Message>) {
        self.history.push(user);
        if let Some(reply) = reply {
            self.history.push(reply);
        }
        debug!(turns = self.history.len(), "history updated");
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Content of every stored message, skipping messages without content.
    pub fn historical(&self) -> Vec<String> {
        self.history
            .iter()
            .filter_map(|m| m.content.clone())
            .collect()
    }

    pub fn messages(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

struct Recorder<'a> {
    content: BoxStream<'a, String>,
    conversation: &'a mut Conversation,
    user: Option<Message>,
    reply: Option<String>,
}

/// Wrap a reply stream so the user turn is appended on its first content item.
///
/// With `record_replies`, the collected reply is appended as an assistant turn
/// once the stream ends without error.
pub fn record_streamed_turn<'a>(
    content: BoxStream<'a, String>,
    conversation: &'a mut Conversation,
    user: Message,
    record_replies: bool,
) -> BoxStream<'a, String> {
    let state = Recorder {
        content,
        conversation,
        user: Some(user),
        reply: record_replies.then(String::new),
    };

    let recorded = stream::unfold(Some(state), |state| async move {
        let mut st = match state {
            Some(st) => st,
            None => return None,
        };
        match st.content.next().await {
            Some(Ok(text)) => {
                if let Some(user) = st.user.take() {
                    st.conversation.push(user);
                    debug!(turns = st.conversation.len(), "user turn recorded");
                }
                if let Some(reply) = st.reply.as_mut() {
                    reply.push_str(&text);
                }
                Some((Ok(text), Some(st)))
            }
            Some(Err(e)) => Some((Err(e), None)),
            None => {
                if st.user.is_none() {
                    if let Some(reply) = st.reply.take() {
                        st.conversation.push(Message::assistant(reply));
                        debug!(turns = st.conversation.len(), "assistant turn recorded");
                    }
                }
                None
            }
        }
    });

    Box::pin(recorded)
}
