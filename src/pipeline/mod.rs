//! Streaming response pipeline.
//!
//! ```text
//! Raw Bytes → Lines → SSE Decoder → Typed Decode → Content Select
//!     │         │          │              │              │
//!   HTTP     split on   `data: ` /    ChatResponse<C>  first choice
//!   body      '\n'      `[DONE]`                        content
//! ```
//!
//! Every stage is lazy: pulling one item from the end of the chain pulls only as
//! many bytes from the network as that item needs.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | byte stream to lines, lines to SSE fragments |
//! | [`select`] | fragment decoding and content selection |

pub mod decode;
pub mod select;


pub use decode::{split_lines, SseDecoder, SseLine};
pub use select::{decode_fragments, select_content};

use crate::types::{ChatResponse, Contentable};
use crate::BoxStream;
use bytes::Bytes;

/// The decoder chain applied to every successful streaming response.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    decoder: SseDecoder,
}

impl Pipeline {
    pub fn new(decoder: SseDecoder) -> Self {
        Self { decoder }
    }

    /// Raw JSON fragments, in arrival order, up to the termination sentinel.
    pub fn fragments<'a>(&self, input: BoxStream<'a, Bytes>) -> BoxStream<'a, String> {
        self.decoder.decode_stream(split_lines(input))
    }

    /// Typed envelopes decoded from each fragment.
    pub fn responses<'a, C: Contentable>(
        &self,
        input: BoxStream<'a, Bytes>,
    ) -> BoxStream<'a, ChatResponse<C>> {
        decode_fragments(self.fragments(input))
    }

    /// Content of the first choice of every fragment that has one.
    pub fn process_stream<'a, C: Contentable>(
        &self,
        input: BoxStream<'a, Bytes>,
    ) -> BoxStream<'a, String> {
        select_content(self.responses::<C>(input))
    }
}
