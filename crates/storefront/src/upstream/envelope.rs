//! Tolerant decoding of upstream response envelopes.
//!
//! Upstream sources wrap their product list in different shapes. Decoders are
//! tried in a fixed priority order; each either recognizes the payload or
//! declines. The first decoder that recognizes it wins, and a payload no
//! decoder recognizes is treated as an empty batch.

use serde_json::Value;
use tracing::{debug, warn};

/// Recognizes one envelope shape.
pub trait EnvelopeDecoder: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The record list, or `None` if the payload is not this shape.
    fn decode<'a>(&self, payload: &'a Value) -> Option<&'a [Value]>;
}

/// `{"content": [...]}` (paged responses).
pub struct ContentEnvelope;

/// `[...]`
pub struct BareList;

/// `{"products": [...]}`
pub struct ProductsEnvelope;

/// `{"data": [...]}`
pub struct DataEnvelope;

fn array_member<'a>(payload: &'a Value, key: &str) -> Option<&'a [Value]> {
    payload.get(key)?.as_array().map(Vec::as_slice)
}

impl EnvelopeDecoder for ContentEnvelope {
    fn name(&self) -> &'static str {
        "content"
    }

    fn decode<'a>(&self, payload: &'a Value) -> Option<&'a [Value]> {
        array_member(payload, "content")
    }
}

impl EnvelopeDecoder for BareList {
    fn name(&self) -> &'static str {
        "list"
    }

    fn decode<'a>(&self, payload: &'a Value) -> Option<&'a [Value]> {
        payload.as_array().map(Vec::as_slice)
    }
}

impl EnvelopeDecoder for ProductsEnvelope {
    fn name(&self) -> &'static str {
        "products"
    }

    fn decode<'a>(&self, payload: &'a Value) -> Option<&'a [Value]> {
        array_member(payload, "products")
    }
}

impl EnvelopeDecoder for DataEnvelope {
    fn name(&self) -> &'static str {
        "data"
    }

    fn decode<'a>(&self, payload: &'a Value) -> Option<&'a [Value]> {
        array_member(payload, "data")
    }
}

/// Decoders in priority order.
pub static DECODERS: &[&dyn EnvelopeDecoder] = &[
    &ContentEnvelope,
    &BareList,
    &ProductsEnvelope,
    &DataEnvelope,
];

/// Extract the record list from a payload using [`DECODERS`].
#[must_use]
pub fn decode_envelope(payload: &Value) -> Vec<Value> {
    decode_with(DECODERS, payload)
}

/// Extract the record list using a custom decoder chain.
#[must_use]
pub fn decode_with(decoders: &[&dyn EnvelopeDecoder], payload: &Value) -> Vec<Value> {
    for decoder in decoders {
        if let Some(records) = decoder.decode(payload) {
            debug!(
                shape = decoder.name(),
                records = records.len(),
                "Decoded upstream envelope"
            );
            return records.to_vec();
        }
    }

    warn!("Unrecognized upstream envelope, treating as empty batch");
    Vec::new()
}
