// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph schema and vertex codecs.
//!
//! A [`Schema`] names the edge groups a store accepts and carries the single
//! vertex codec shared by every key-encoding path. Vertex codecs are the
//! order-preserving foundation under [`crate::codec::ElementIdCodec`]: for
//! vertices `a < b` under [`crate::value::Value`]'s natural order, an
//! order-preserving codec must produce `encode(a) < encode(b)` bytewise.
use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::value::{Value, Vertex};

/// Error raised while encoding a vertex or element id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Error)]
pub enum EncodeError {
    /// The codec handles a different [`Value`] variant than the one given.
    #[error("vertex codec expects a {expected} value, found {found}")]
    VertexKindMismatch {
        /// Variant tag the codec encodes.
        expected: &'static str,
        /// Variant tag of the rejected value.
        found: &'static str,
    },
    /// A vertex encoding is too long for a `u32` length frame.
    #[error("vertex encoding of {len} byte(s) exceeds the u32 frame limit")]
    VertexTooLarge {
        /// Byte length of the oversized encoding.
        len: usize,
    },
}

/// Error raised while decoding bytes into a vertex or element id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before a required field was complete.
    #[error("truncated input: needed {needed} more byte(s) for {field}")]
    Truncated {
        /// Field being decoded when input ran out.
        field: &'static str,
        /// Bytes still required.
        needed: usize,
    },
    /// Leading discriminator byte is not a known element-id variant.
    #[error("unknown element id discriminator: {0:#04x}")]
    UnknownDiscriminator(u8),
    /// Directed-flag byte was neither 0 nor 1.
    #[error("invalid directed flag byte: {0:#04x}")]
    InvalidDirectedFlag(u8),
    /// Bytes remained after a complete edge id was decoded.
    #[error("{0} trailing byte(s) after edge id")]
    TrailingBytes(usize),
    /// The vertex payload is not a valid encoding for the schema's codec.
    #[error("invalid vertex bytes: {0}")]
    InvalidVertex(String),
}

/// Stateless vertex encoder/decoder sourced from a schema.
///
/// Implementations must be deterministic: identical inputs produce
/// byte-identical output, with no ambient state (time, randomness, global
/// config) consulted. [`VertexCodec::preserves_ordering`] additionally
/// promises that bytewise output order matches the vertices' natural order.
pub trait VertexCodec: Send + Sync + std::fmt::Debug {
    /// Encodes `vertex` into its canonical byte representation.
    fn encode(&self, vertex: &Vertex) -> Result<Bytes, EncodeError>;

    /// Decodes `bytes` back into a vertex.
    fn decode(&self, bytes: &[u8]) -> Result<Vertex, DecodeError>;

    /// True when identical inputs always produce byte-identical output.
    fn is_consistent(&self) -> bool {
        true
    }

    /// True when bytewise output order matches the vertices' natural order.
    fn preserves_ordering(&self) -> bool;
}

/// UTF-8 string vertex codec. Order-preserving: Rust `String` ordering is
/// the lexicographic order of its UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrVertexCodec;

impl VertexCodec for StrVertexCodec {
    fn encode(&self, vertex: &Vertex) -> Result<Bytes, EncodeError> {
        match vertex {
            Value::Str(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
            other => Err(EncodeError::VertexKindMismatch {
                expected: "str",
                found: other.kind_name(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vertex, DecodeError> {
        std::str::from_utf8(bytes)
            .map(|s| Value::Str(s.to_owned()))
            .map_err(|e| DecodeError::InvalidVertex(e.to_string()))
    }

    fn preserves_ordering(&self) -> bool {
        true
    }
}

/// Unsigned 64-bit vertex codec. Fixed 8-byte big-endian output keeps
/// bytewise comparison aligned with numeric order.
#[derive(Debug, Clone, Copy, Default)]
pub struct U64VertexCodec;

impl VertexCodec for U64VertexCodec {
    fn encode(&self, vertex: &Vertex) -> Result<Bytes, EncodeError> {
        match vertex {
            Value::U64(n) => {
                let mut buf = BytesMut::with_capacity(8);
                buf.put_u64(*n);
                Ok(buf.freeze())
            }
            other => Err(EncodeError::VertexKindMismatch {
                expected: "u64",
                found: other.kind_name(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vertex, DecodeError> {
        let arr: [u8; 8] = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidVertex(format!("expected 8 bytes, found {}", bytes.len())))?;
        Ok(Value::U64(u64::from_be_bytes(arr)))
    }

    fn preserves_ordering(&self) -> bool {
        true
    }
}

/// Identity codec over raw byte vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawVertexCodec;

impl VertexCodec for RawVertexCodec {
    fn encode(&self, vertex: &Vertex) -> Result<Bytes, EncodeError> {
        match vertex {
            Value::Raw(b) => Ok(b.clone()),
            other => Err(EncodeError::VertexKindMismatch {
                expected: "raw",
                found: other.kind_name(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vertex, DecodeError> {
        Ok(Value::Raw(Bytes::copy_from_slice(bytes)))
    }

    fn preserves_ordering(&self) -> bool {
        true
    }
}

/// Definition of one edge group in a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeDefinition {
    /// Human-readable description of the source endpoint.
    pub source: String,
    /// Human-readable description of the destination endpoint.
    pub destination: String,
    /// Whether edges of this group are directed.
    pub directed: bool,
}

/// Graph schema: edge-group definitions plus the shared vertex codec.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    edge_groups: BTreeMap<String, EdgeDefinition>,
    vertex_codec: Option<Arc<dyn VertexCodec>>,
}

impl Schema {
    /// Creates an empty schema with no vertex codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vertex codec, consuming and returning the schema.
    #[must_use]
    pub fn with_vertex_codec(mut self, codec: Arc<dyn VertexCodec>) -> Self {
        self.vertex_codec = Some(codec);
        self
    }

    /// Adds an edge-group definition, consuming and returning the schema.
    #[must_use]
    pub fn with_edge_group(mut self, group: impl Into<String>, def: EdgeDefinition) -> Self {
        self.edge_groups.insert(group.into(), def);
        self
    }

    /// Returns the shared vertex codec, when configured.
    #[must_use]
    pub fn vertex_codec(&self) -> Option<&Arc<dyn VertexCodec>> {
        self.vertex_codec.as_ref()
    }

    /// Returns the definition for `group`, when declared.
    #[must_use]
    pub fn edge_group(&self, group: &str) -> Option<&EdgeDefinition> {
        self.edge_groups.get(group)
    }

    /// Iterates declared edge-group names in deterministic order.
    pub fn edge_group_names(&self) -> impl Iterator<Item = &str> {
        self.edge_groups.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_codec_rejects_other_kinds() {
        let err = StrVertexCodec.encode(&Value::U64(7));
        assert_eq!(
            err,
            Err(EncodeError::VertexKindMismatch {
                expected: "str",
                found: "u64",
            })
        );
    }

    #[test]
    fn u64_codec_is_big_endian() {
        let one = U64VertexCodec.encode(&Value::U64(1));
        let big = U64VertexCodec.encode(&Value::U64(256));
        assert_eq!(one, Ok(Bytes::from_static(&[0, 0, 0, 0, 0, 0, 0, 1])));
        assert!(one < big, "bytewise order must match numeric order");
    }

    #[test]
    fn u64_codec_rejects_short_input() {
        assert!(matches!(
            U64VertexCodec.decode(&[1, 2, 3]),
            Err(DecodeError::InvalidVertex(_))
        ));
    }
}
