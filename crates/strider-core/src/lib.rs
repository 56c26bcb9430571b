// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! strider-core: graph element model, order-preserving id codec, and walk
//! traversal.
//!
//! The crate carries the three load-bearing pieces of the strider engine:
//! the schema-configured [`codec::ElementIdCodec`] whose byte keys sort like
//! the ids they encode, the [`op`]/[`handler`] framework dispatching closed
//! units of work against a [`store::Store`], and the [`traversal`] engine
//! composing per-hop edge fetches into enumerated [`element::Walk`]s.
//! Federation across many stores lives in `strider-federated`.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::cognitive_complexity,
    clippy::option_if_let_else,
    clippy::significant_drop_tightening,
    clippy::doc_markdown,
    clippy::too_many_lines,
    clippy::too_long_first_doc_paragraph,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names,
    clippy::manual_let_else,
    clippy::needless_pass_by_value,
    clippy::multiple_crate_versions
)]

/// Order-preserving element-id codec.
pub mod codec;
/// Graph elements: ids, edges, walks.
pub mod element;
/// Operation dispatch: context, registry, executor.
pub mod handler;
/// In-memory reference store.
pub mod memory;
/// Units of work and validation.
pub mod op;
/// Graph schema and vertex codecs.
pub mod schema;
/// The store seam handlers execute against.
pub mod store;
/// Walk-traversal engine.
pub mod traversal;
/// Vertex and property values.
pub mod value;
/// Query views.
pub mod view;

// Re-exports for stable public API
pub use codec::{ElementIdCodec, HandledKind, SchemaError};
pub use element::{Edge, EdgeId, ElementId, EntityId, Properties, Walk, WalkError};
pub use handler::{
    Context, ExecError, Executor, Handler, HandlerRegistry, OpOutput, RegistryError, User,
};
pub use memory::MemoryStore;
pub use op::{
    AddEdges, CloneError, GetEdges, GetWalks, Op, OpKind, Options, ValidationResult,
};
pub use schema::{
    DecodeError, EdgeDefinition, EncodeError, RawVertexCodec, Schema, StrVertexCodec,
    U64VertexCodec, VertexCodec,
};
pub use store::{Store, StoreError};
pub use traversal::traverse;
pub use value::{Value, Vertex};
pub use view::View;
