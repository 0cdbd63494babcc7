//! Response decoding.
//!
//! # Design
//! List endpoints may answer with a bare JSON array or with an object that
//! wraps the array next to paging metadata. The decoder looks at the first
//! structural byte of the payload and picks one decode path; it never tries
//! one shape and falls back to the other on error.

use serde::de::DeserializeOwned;

use crate::error::{DecodeFailure, RestError};
use crate::types::{ListEnvelope, PagedResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Top-level JSON shape of a payload, judged by its first structural byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Object,
    Other,
}

/// Inspect the leading token, skipping a UTF-8 BOM and whitespace.
pub fn leading_shape(payload: &[u8]) -> Shape {
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
    match payload.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => Shape::Array,
        Some(b'{') => Shape::Object,
        _ => Shape::Other,
    }
}

/// Decode a single entity.
pub fn decode_entity<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RestError> {
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
    serde_json::from_slice(payload).map_err(|e| RestError::decode(DecodeFailure::Entity, Some(&e)))
}

/// Decode either list shape into a `PagedResult`.
pub fn decode_list<T: DeserializeOwned>(payload: &[u8]) -> Result<PagedResult<T>, RestError> {
    let shape = leading_shape(payload);
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
    match shape {
        Shape::Array => decode_array(payload),
        Shape::Object => decode_envelope(payload),
        Shape::Other => Err(RestError::decode(DecodeFailure::NoList, None)),
    }
}

fn decode_array<T: DeserializeOwned>(payload: &[u8]) -> Result<PagedResult<T>, RestError> {
    let items: Vec<T> =
        serde_json::from_slice(payload).map_err(|e| RestError::decode(DecodeFailure::List, Some(&e)))?;
    Ok(PagedResult::from_items(items))
}

fn decode_envelope<T: DeserializeOwned>(payload: &[u8]) -> Result<PagedResult<T>, RestError> {
    let envelope: ListEnvelope<T> =
        serde_json::from_slice(payload).map_err(|e| RestError::decode(DecodeFailure::List, Some(&e)))?;
    envelope
        .into_paged()
        .ok_or_else(|| RestError::decode(DecodeFailure::NoList, None))
}
