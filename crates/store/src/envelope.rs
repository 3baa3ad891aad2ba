//! Compress-on-write envelope around encoded values
//!
//! Encoded JSON longer than the threshold is compressed and prefixed with
//! [`COMPRESSION_MARKER`]; anything at or under the threshold is stored as
//! plain JSON. The decision depends on size alone, not on whether compression
//! actually makes the text shorter. JSON text can never start with the marker,
//! so the prefix is unambiguous.

use crate::codec;
use crate::serialization;
use cellar_core::{
    Graph, Result, Value, COMPRESSION_MARKER, DEFAULT_COMPRESSION_THRESHOLD,
};
use std::borrow::Cow;

/// Envelope policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Longest JSON text, in characters, that is stored uncompressed
    threshold: usize,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_THRESHOLD)
    }
}

impl Envelope {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Encode a value tree for storage
    pub fn encode(&self, value: &Value) -> Result<String> {
        let json = serialization::encode(value)?;
        Ok(self.wrap(json))
    }

    /// Encode an arena graph for storage
    pub fn encode_graph(&self, graph: &Graph) -> Result<String> {
        let json = serialization::encode_graph(graph)?;
        Ok(self.wrap(json))
    }

    fn wrap(&self, json: String) -> String {
        let len = json.chars().count();
        if len <= self.threshold {
            return json;
        }
        let packed = codec::compress_text(&json);
        tracing::debug!(
            json_len = len,
            compressed_len = packed.chars().count(),
            threshold = self.threshold,
            "compressed envelope"
        );
        let mut out = String::with_capacity(COMPRESSION_MARKER.len() + packed.len());
        out.push_str(COMPRESSION_MARKER);
        out.push_str(&packed);
        out
    }

    /// Decode stored text; an empty string is the empty collection
    pub fn decode(&self, stored: &str) -> Result<Value> {
        if stored.is_empty() {
            return Ok(Value::empty_collection());
        }
        let json = match stored.strip_prefix(COMPRESSION_MARKER) {
            Some(payload) => Cow::Owned(codec::decompress_text(payload)?),
            None => Cow::Borrowed(stored),
        };
        serialization::decode(&json)
    }

    /// Whether stored text carries the compression marker
    pub fn is_compressed(stored: &str) -> bool {
        stored.starts_with(COMPRESSION_MARKER)
    }
}
