// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Order-preserving element-id codec.
//!
//! Encodes [`ElementId`]s into sortable byte keys for range-scanning stores.
//! Layout is a one-byte variant discriminator followed by the variant's
//! fields in fixed order:
//!
//! ```text
//! entity: 0x00 | vertex bytes (to end of buffer)
//! edge:   0x01 | u32be src len | src bytes | u32be dst len | dst bytes | flag
//! ```
//!
//! An entity id's payload is the raw vertex encoding with no framing, so an
//! entity key's bytewise order tracks the vertex codec's order.
//! [`ElementIdCodec::encode_vertex`] emits the vertex's full entity key
//! (discriminator included): it decodes back to the entity id and is a
//! usable scan prefix over entity keys.
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::element::{EdgeId, ElementId, EntityId};
use crate::schema::{DecodeError, EncodeError, Schema, VertexCodec};
use crate::value::Vertex;

/// Discriminator byte for [`ElementId::Entity`].
const DISC_ENTITY: u8 = 0x00;
/// Discriminator byte for [`ElementId::Edge`].
const DISC_EDGE: u8 = 0x01;

/// Error raised when an [`ElementIdCodec`] cannot be constructed from a
/// schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema carries no vertex codec.
    #[error("vertex codec is required")]
    VertexCodecRequired,
    /// The schema's vertex codec does not preserve ordering, so keys built
    /// from it could not back range scans.
    #[error("vertex codec must preserve ordering")]
    OrderingNotPreserved,
}

/// Kinds of value the codec can be asked about via
/// [`ElementIdCodec::can_handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandledKind {
    /// The [`ElementId`] family (either variant).
    ElementId,
    /// [`crate::element::EntityId`] specifically.
    EntityId,
    /// [`crate::element::EdgeId`] specifically.
    EdgeId,
    /// A realized [`crate::element::Edge`].
    Edge,
    /// A bare vertex value.
    Vertex,
}

/// Stateless, schema-configured codec mapping element ids to ordered byte
/// keys.
///
/// Construction fails without an order-preserving vertex codec; afterwards
/// the codec is immutable and safe for unsynchronised concurrent use.
#[derive(Debug, Clone)]
pub struct ElementIdCodec {
    vertex_codec: Arc<dyn VertexCodec>,
}

impl ElementIdCodec {
    /// Builds a codec over `schema`'s vertex codec.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        let vertex_codec = schema
            .vertex_codec()
            .ok_or(SchemaError::VertexCodecRequired)?;
        if !vertex_codec.preserves_ordering() {
            return Err(SchemaError::OrderingNotPreserved);
        }
        Ok(Self {
            vertex_codec: Arc::clone(vertex_codec),
        })
    }

    /// Encodes `id` into its byte key.
    pub fn encode(&self, id: &ElementId) -> Result<Bytes, EncodeError> {
        match id {
            ElementId::Entity(entity) => {
                let vertex = self.vertex_codec.encode(&entity.vertex)?;
                let mut buf = BytesMut::with_capacity(1 + vertex.len());
                buf.put_u8(DISC_ENTITY);
                buf.put_slice(&vertex);
                Ok(buf.freeze())
            }
            ElementId::Edge(edge) => {
                let source = self.vertex_codec.encode(&edge.source)?;
                let destination = self.vertex_codec.encode(&edge.destination)?;
                let mut buf =
                    BytesMut::with_capacity(1 + 4 + source.len() + 4 + destination.len() + 1);
                buf.put_u8(DISC_EDGE);
                put_framed(&mut buf, &source)?;
                put_framed(&mut buf, &destination)?;
                buf.put_u8(u8::from(edge.directed));
                Ok(buf.freeze())
            }
        }
    }

    /// Decodes a byte key back into an element id.
    ///
    /// Zero-length input is the documented "no bound" sentinel for
    /// open-ended range scans and yields `Ok(None)`. Any malformed
    /// *non-empty* input is a [`DecodeError`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<ElementId>, DecodeError> {
        let Some((&disc, rest)) = bytes.split_first() else {
            return Ok(None);
        };
        match disc {
            DISC_ENTITY => {
                let vertex = self.vertex_codec.decode(rest)?;
                Ok(Some(ElementId::Entity(EntityId { vertex })))
            }
            DISC_EDGE => {
                let (source, rest) = self.take_framed_vertex(rest, "source")?;
                let (destination, rest) = self.take_framed_vertex(rest, "destination")?;
                let (&flag, rest) = rest.split_first().ok_or(DecodeError::Truncated {
                    field: "directed flag",
                    needed: 1,
                })?;
                if !rest.is_empty() {
                    return Err(DecodeError::TrailingBytes(rest.len()));
                }
                let directed = match flag {
                    0 => false,
                    1 => true,
                    other => return Err(DecodeError::InvalidDirectedFlag(other)),
                };
                Ok(Some(ElementId::Edge(EdgeId {
                    source,
                    destination,
                    directed,
                })))
            }
            other => Err(DecodeError::UnknownDiscriminator(other)),
        }
    }

    /// Encodes a bare vertex as its entity key: byte-identical to
    /// [`encode`](Self::encode) on the vertex's entity id, so the output
    /// decodes back to that entity id and doubles as a range-scan prefix
    /// over entity keys.
    pub fn encode_vertex(&self, vertex: &Vertex) -> Result<Bytes, EncodeError> {
        let payload = self.vertex_codec.encode(vertex)?;
        let mut buf = BytesMut::with_capacity(1 + payload.len());
        buf.put_u8(DISC_ENTITY);
        buf.put_slice(&payload);
        Ok(buf.freeze())
    }

    /// True only for the [`ElementId`] family.
    #[must_use]
    pub fn can_handle(kind: HandledKind) -> bool {
        matches!(
            kind,
            HandledKind::ElementId | HandledKind::EntityId | HandledKind::EdgeId
        )
    }

    /// Identical inputs always produce byte-identical output.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.vertex_codec.is_consistent()
    }

    /// Bytewise key order matches the ids' natural order; guaranteed by the
    /// ordering check at construction.
    #[must_use]
    pub fn preserves_ordering(&self) -> bool {
        true
    }

    /// Reads one `u32be`-framed vertex field, returning it with the
    /// remaining input.
    fn take_framed_vertex<'a>(
        &self,
        bytes: &'a [u8],
        field: &'static str,
    ) -> Result<(Vertex, &'a [u8]), DecodeError> {
        if bytes.len() < 4 {
            return Err(DecodeError::Truncated {
                field,
                needed: 4 - bytes.len(),
            });
        }
        let (len_bytes, rest) = bytes.split_at(4);
        let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]])
            as usize;
        if rest.len() < len {
            return Err(DecodeError::Truncated {
                field,
                needed: len - rest.len(),
            });
        }
        let (payload, rest) = rest.split_at(len);
        Ok((self.vertex_codec.decode(payload)?, rest))
    }
}

/// Frame length for a `len`-byte payload, rejecting lengths a `u32` frame
/// cannot carry.
fn frame_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::VertexTooLarge { len })
}

/// Writes `payload` prefixed with its `u32be` length.
fn put_framed(buf: &mut BytesMut, payload: &[u8]) -> Result<(), EncodeError> {
    buf.put_u32(frame_len(payload.len())?);
    buf.put_slice(payload);
    Ok(())
}
