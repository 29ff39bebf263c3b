//! Typed decoding of stream fragments and first-choice content selection.

use crate::protocol;
use crate::types::{ChatResponse, Contentable};
use crate::BoxStream;
use futures::{future, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::trace;

/// Decode every JSON fragment into `T`.
///
/// A fragment that does not match the expected shape yields one `Err` and ends
/// the stream.
pub fn decode_fragments<'a, T>(fragments: BoxStream<'a, String>) -> BoxStream<'a, T>
where
    T: DeserializeOwned + Send + 'a,
{
    let decoded = fragments
        .and_then(|fragment| future::ready(protocol::decode_str::<T>(&fragment)))
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        });
    Box::pin(decoded)
}

/// Keep only the first choice's content of every envelope.
///
/// Envelopes with no choices, or whose first choice carries no content (role
/// announcements, finish markers), are skipped.
pub fn select_content<'a, C>(responses: BoxStream<'a, ChatResponse<C>>) -> BoxStream<'a, String>
where
    C: Contentable,
{
    let content = responses.try_filter_map(|resp| {
        let text = resp.text().map(str::to_owned);
        if text.is_none() {
            trace!(choices = resp.choices.len(), "skipping fragment without content");
        }
        future::ready(Ok(text))
    });
    Box::pin(content)
}
