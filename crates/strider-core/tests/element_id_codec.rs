// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use bytes::Bytes;
use strider_core::{
    DecodeError, ElementId, ElementIdCodec, EncodeError, HandledKind, Schema, SchemaError,
    StrVertexCodec, U64VertexCodec, Vertex, VertexCodec,
};

fn str_codec() -> ElementIdCodec {
    let schema = Schema::new().with_vertex_codec(Arc::new(StrVertexCodec));
    ElementIdCodec::new(&schema).expect("schema carries a vertex codec")
}

#[test]
fn construction_requires_a_vertex_codec() {
    let schema = Schema::new();
    assert_eq!(
        ElementIdCodec::new(&schema).err(),
        Some(SchemaError::VertexCodecRequired)
    );
}

/// Valid UTF-8 codec whose key order does not follow the vertex order.
#[derive(Debug)]
struct UnorderedCodec;

impl VertexCodec for UnorderedCodec {
    fn encode(&self, vertex: &Vertex) -> Result<Bytes, EncodeError> {
        StrVertexCodec.encode(vertex)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vertex, DecodeError> {
        StrVertexCodec.decode(bytes)
    }

    fn preserves_ordering(&self) -> bool {
        false
    }
}

#[test]
fn construction_rejects_a_non_order_preserving_codec() {
    let schema = Schema::new().with_vertex_codec(Arc::new(UnorderedCodec));
    assert_eq!(
        ElementIdCodec::new(&schema).err(),
        Some(SchemaError::OrderingNotPreserved)
    );
}

#[test]
fn entity_id_round_trips() {
    let codec = str_codec();
    let id = ElementId::entity("vertex");
    let encoded = codec.encode(&id).unwrap();
    assert_eq!(codec.decode(&encoded).unwrap(), Some(id));
}

#[test]
fn edge_id_round_trips() {
    let codec = str_codec();
    for directed in [true, false] {
        let id = ElementId::edge("source", "destination", directed);
        let encoded = codec.encode(&id).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), Some(id));
    }
}

#[test]
fn edge_id_with_empty_endpoint_round_trips() {
    let codec = str_codec();
    let id = ElementId::edge("", "destination", true);
    let encoded = codec.encode(&id).unwrap();
    assert_eq!(codec.decode(&encoded).unwrap(), Some(id));
}

#[test]
fn u64_ids_round_trip() {
    let schema = Schema::new().with_vertex_codec(Arc::new(U64VertexCodec));
    let codec = ElementIdCodec::new(&schema).unwrap();
    let id = ElementId::edge(7u64, u64::MAX, false);
    let encoded = codec.encode(&id).unwrap();
    assert_eq!(codec.decode(&encoded).unwrap(), Some(id));
}

#[test]
fn vertex_encoding_is_the_entity_key() {
    // Callers build range-scan prefix keys from the vertex-only path; it
    // must be byte-identical to the full entity key `encode` emits.
    let codec = str_codec();
    let vertex = Vertex::from("testVertex");
    let vertex_key = codec.encode_vertex(&vertex).unwrap();
    let full = codec.encode(&ElementId::entity(vertex)).unwrap();
    assert_eq!(full, vertex_key);
}

#[test]
fn vertex_key_decodes_to_its_entity_id() {
    let codec = str_codec();
    let key = codec.encode_vertex(&Vertex::from("testVertex")).unwrap();
    assert_eq!(
        codec.decode(&key).unwrap(),
        Some(ElementId::entity("testVertex"))
    );
}

#[test]
fn empty_input_is_the_open_bound_sentinel() {
    let codec = str_codec();
    assert_eq!(codec.decode(&[]), Ok(None));
}

#[test]
fn truncated_edge_id_is_rejected() {
    let codec = str_codec();
    let encoded = codec.encode(&ElementId::edge("ab", "cd", true)).unwrap();
    for cut in 1..encoded.len() {
        let err = codec.decode(&encoded[..cut]);
        assert!(err.is_err(), "prefix of length {cut} must not decode");
    }
}

#[test]
fn invalid_directed_flag_is_rejected() {
    let codec = str_codec();
    let mut encoded = codec.encode(&ElementId::edge("a", "b", true)).unwrap().to_vec();
    let last = encoded.len() - 1;
    encoded[last] = 0x02;
    assert_eq!(
        codec.decode(&encoded),
        Err(DecodeError::InvalidDirectedFlag(0x02))
    );
}

#[test]
fn handles_only_the_element_id_family() {
    assert!(ElementIdCodec::can_handle(HandledKind::ElementId));
    assert!(ElementIdCodec::can_handle(HandledKind::EntityId));
    assert!(ElementIdCodec::can_handle(HandledKind::EdgeId));
    assert!(!ElementIdCodec::can_handle(HandledKind::Edge));
    assert!(!ElementIdCodec::can_handle(HandledKind::Vertex));
}

#[test]
fn codec_is_consistent_and_order_preserving() {
    let codec = str_codec();
    assert!(codec.is_consistent());
    assert!(codec.preserves_ordering());
}

#[test]
fn vertex_keys_sort_like_vertices() {
    let codec = str_codec();
    let a = codec.encode_vertex(&Vertex::from("aardvark")).unwrap();
    let b = codec.encode_vertex(&Vertex::from("zebra")).unwrap();
    assert!(a < b);
}
