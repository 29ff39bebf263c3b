//! Wire codec: JSON encoding of request envelopes and decoding of responses.
//!
//! Field names on the wire are snake_case, which matches the Rust field names,
//! so no renaming layer is needed. Absent optional knobs are omitted rather than
//! sent as `null`, and the endpoint body is flattened into the envelope.

pub mod request;

pub use request::{build_request, ChatBody, CompletionBody, RequestEnvelope};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Serialize a value to its JSON wire form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a JSON payload into `T`. Shape mismatches surface as [`crate::Error::Decode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Same as [`decode`], for text fragments taken from an event stream.
pub fn decode_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}
