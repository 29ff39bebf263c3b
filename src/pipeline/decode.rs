//! Streaming decoders: bytes -> lines -> SSE `data:` fragments.

use crate::BoxStream;
use bytes::Bytes;
use futures::{stream, StreamExt};
use tracing::{debug, trace};

/// Split a byte stream into text lines.
///
/// Bytes are buffered across chunk boundaries so multi-byte characters are never
/// cut in half. `\r\n` endings are normalized, and an unterminated final line is
/// flushed at end of input. An upstream error is passed through and ends the stream.
pub fn split_lines<'a>(input: BoxStream<'a, Bytes>) -> BoxStream<'a, String> {
    let lines = stream::unfold(
        (input, Vec::<u8>::new(), false),
        |(mut input, mut buf, mut eof)| async move {
            loop {
                if let Some(idx) = buf.iter().position(|b| *b == b'\n') {
                    let raw: Vec<u8> = buf.drain(..=idx).collect();
                    let line = to_line(&raw[..raw.len() - 1]);
                    return Some((Ok(line), (input, buf, eof)));
                }

                if eof {
                    if buf.is_empty() {
                        return None;
                    }
                    let line = to_line(&buf);
                    return Some((Ok(line), (input, Vec::new(), true)));
                }

                match input.next().await {
                    Some(Ok(bytes)) => buf.extend_from_slice(&bytes),
                    Some(Err(e)) => return Some((Err(e), (input, Vec::new(), true))),
                    None => eof = true,
                }
            }
        },
    );

    Box::pin(lines)
}

fn to_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// What a single event-stream line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'l> {
    /// The termination sentinel; nothing after it is read.
    Done,
    /// A JSON fragment with the prefix stripped.
    Data(&'l str),
    /// Keep-alives, comments and anything else without the data prefix.
    Ignored,
}

/// Line-oriented SSE decoder:
/// - a line containing `done_signal` (default `[DONE]`) ends the stream
/// - a line starting with `prefix` (default `"data: "`) yields the rest
/// - every other line is dropped
#[derive(Debug, Clone)]
pub struct SseDecoder {
    prefix: String,
    done_signal: String,
}

impl SseDecoder {
    pub fn new(prefix: Option<String>, done_signal: Option<String>) -> Self {
        Self {
            prefix: prefix.unwrap_or_else(|| "data: ".to_string()),
            done_signal: done_signal.unwrap_or_else(|| "[DONE]".to_string()),
        }
    }

    pub fn classify<'l>(&self, line: &'l str) -> SseLine<'l> {
        classify_line(line, &self.prefix, &self.done_signal)
    }

    /// Turn a line stream into a stream of raw JSON fragments.
    ///
    /// The line stream is dropped as soon as the sentinel is seen, which releases
    /// the underlying connection.
    pub fn decode_stream<'a>(&self, lines: BoxStream<'a, String>) -> BoxStream<'a, String> {
        let prefix = self.prefix.clone();
        let done_signal = self.done_signal.clone();

        let fragments = stream::unfold(Some(lines), move |state| {
            let prefix = prefix.clone();
            let done_signal = done_signal.clone();
            async move {
                let mut lines = match state {
                    Some(lines) => lines,
                    None => return None,
                };
                loop {
                    match lines.next().await {
                        Some(Ok(line)) => {
                            trace!(line = %line, "stream line");
                            match classify_line(&line, &prefix, &done_signal) {
                                SseLine::Done => {
                                    debug!("stream finished");
                                    return None;
                                }
                                SseLine::Data(payload) => {
                                    let payload = payload.to_string();
                                    return Some((Ok(payload), Some(lines)));
                                }
                                SseLine::Ignored => continue,
                            }
                        }
                        Some(Err(e)) => return Some((Err(e), None)),
                        None => return None,
                    }
                }
            }
        });

        Box::pin(fragments)
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn classify_line<'l>(line: &'l str, prefix: &str, done_signal: &str) -> SseLine<'l> {
    if line.contains(done_signal) {
        SseLine::Done
    } else if let Some(payload) = line.strip_prefix(prefix) {
        SseLine::Data(payload)
    } else {
        SseLine::Ignored
    }
}
