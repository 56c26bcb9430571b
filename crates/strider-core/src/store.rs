// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The store seam consumed by operation handlers.
use thiserror::Error;

use crate::element::Edge;
use crate::schema::Schema;
use crate::value::Vertex;
use crate::view::View;

/// Error raised by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An ingested edge names a group the schema does not declare.
    #[error("unknown edge group: `{group}`")]
    UnknownEdgeGroup {
        /// The undeclared group name.
        group: String,
    },
    /// A store-internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
    /// Backend-specific failure, already rendered for display.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Minimal backing-store contract the handler framework executes against.
///
/// A store owns its schema and answers seed-adjacent edge queries; how it
/// batches, indexes, or parallelises internally is opaque to the engine.
/// Implementations must return each stored edge at most once per query
/// (parallel byte-identical edges count separately) — the traversal engine
/// branches once per returned edge.
pub trait Store: Send + Sync {
    /// The schema this store was built from.
    fn schema(&self) -> &Schema;

    /// Fetches every edge incident to at least one seed vertex, filtered by
    /// `view` when present.
    fn fetch_edges(&self, seeds: &[Vertex], view: Option<&View>) -> Result<Vec<Edge>, StoreError>;

    /// Ingests a batch of edges.
    fn add_edges(&self, edges: &[Edge]) -> Result<(), StoreError>;
}
