// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory reference store.
//!
//! `MemoryStore` keeps adjacency buckets in `BTreeMap`s for deterministic
//! iteration. It is the executable reference backend for tests and small
//! graphs; production backends implement [`Store`] over their own engines.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::element::Edge;
use crate::schema::Schema;
use crate::store::{Store, StoreError};
use crate::value::Vertex;
use crate::view::View;

/// Schema-checked in-memory [`Store`] backed by vertex-keyed adjacency
/// buckets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schema: Schema,
    /// Each edge appears in the bucket of both endpoints (once for a
    /// self-loop), so a seed lookup sees all incident edges.
    buckets: RwLock<BTreeMap<Vertex, Vec<Edge>>>,
}

impl MemoryStore {
    /// Creates an empty store over `schema`.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            buckets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Total number of stored edges.
    pub fn edge_count(&self) -> Result<usize, StoreError> {
        let buckets = self.buckets.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut count = 0;
        for (vertex, edges) in &*buckets {
            for edge in edges {
                // Count each edge at its source bucket only; a self-loop is
                // bucketed once so it is counted exactly once too.
                if edge.source == *vertex {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}

/// Applies `view` to `edge`: group filter plus property projection.
fn apply_view(edge: &Edge, view: Option<&View>) -> Option<Edge> {
    let Some(view) = view else {
        return Some(edge.clone());
    };
    if !view.matches_edge_group(&edge.group) {
        return None;
    }
    let mut out = edge.clone();
    if let Some(keep) = &view.properties {
        out.properties.retain(|key, _| keep.contains(key));
    }
    Some(out)
}

impl Store for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn fetch_edges(&self, seeds: &[Vertex], view: Option<&View>) -> Result<Vec<Edge>, StoreError> {
        let buckets = self.buckets.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut out: Vec<Edge> = Vec::new();
        // Dedupe by provenance, not value: an edge incident to two seeds
        // sits in both buckets and must come back once, while parallel
        // byte-identical edges ingested separately must all come back.
        let mut done: BTreeSet<&Vertex> = BTreeSet::new();
        for seed in seeds {
            if done.contains(seed) {
                continue;
            }
            if let Some(bucket) = buckets.get(seed) {
                for edge in bucket {
                    let opposite = if edge.source == *seed {
                        &edge.destination
                    } else {
                        &edge.source
                    };
                    // Already emitted from the opposite endpoint's bucket.
                    if opposite != seed && done.contains(opposite) {
                        continue;
                    }
                    if let Some(filtered) = apply_view(edge, view) {
                        out.push(filtered);
                    }
                }
            }
            done.insert(seed);
        }
        Ok(out)
    }

    fn add_edges(&self, edges: &[Edge]) -> Result<(), StoreError> {
        for edge in edges {
            if self.schema.edge_group(&edge.group).is_none() {
                return Err(StoreError::UnknownEdgeGroup {
                    group: edge.group.clone(),
                });
            }
        }
        let mut buckets = self.buckets.write().map_err(|_| StoreError::LockPoisoned)?;
        for edge in edges {
            buckets
                .entry(edge.source.clone())
                .or_default()
                .push(edge.clone());
            if edge.destination != edge.source {
                buckets
                    .entry(edge.destination.clone())
                    .or_default()
                    .push(edge.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .with_edge_group("knows", crate::schema::EdgeDefinition::default())
            .with_edge_group("owns", crate::schema::EdgeDefinition::default())
    }

    #[test]
    fn rejects_undeclared_edge_group() {
        let store = MemoryStore::new(schema());
        let err = store.add_edges(&[Edge::new("likes", "A", "B", true)]);
        assert_eq!(
            err,
            Err(StoreError::UnknownEdgeGroup {
                group: "likes".to_owned()
            })
        );
    }

    #[test]
    fn seed_lookup_sees_edges_from_both_ends() {
        let store = MemoryStore::new(schema());
        store
            .add_edges(&[Edge::new("knows", "A", "B", true)])
            .unwrap();
        let from_destination = store.fetch_edges(&[Vertex::from("B")], None).unwrap();
        assert_eq!(from_destination.len(), 1);
    }

    #[test]
    fn incident_edge_shared_by_two_seeds_returned_once() {
        let store = MemoryStore::new(schema());
        store
            .add_edges(&[Edge::new("knows", "A", "B", true)])
            .unwrap();
        let both = store
            .fetch_edges(&[Vertex::from("A"), Vertex::from("B")], None)
            .unwrap();
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn parallel_identical_edges_keep_their_multiplicity() {
        let store = MemoryStore::new(schema());
        let edge = Edge::new("knows", "A", "B", true);
        store.add_edges(&[edge.clone()]).unwrap();
        store.add_edges(&[edge]).unwrap();

        let from_one_end = store.fetch_edges(&[Vertex::from("A")], None).unwrap();
        assert_eq!(from_one_end.len(), 2);

        // Both copies sit in both endpoint buckets; each copy still comes
        // back exactly once.
        let from_both_ends = store
            .fetch_edges(&[Vertex::from("A"), Vertex::from("B")], None)
            .unwrap();
        assert_eq!(from_both_ends.len(), 2);
    }

    #[test]
    fn repeated_seed_does_not_repeat_its_bucket() {
        let store = MemoryStore::new(schema());
        store
            .add_edges(&[Edge::new("knows", "A", "B", true)])
            .unwrap();
        let edges = store
            .fetch_edges(&[Vertex::from("A"), Vertex::from("A")], None)
            .unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn view_filters_groups_and_projects_properties() {
        let store = MemoryStore::new(schema());
        store
            .add_edges(&[
                Edge::new("knows", "A", "B", true)
                    .with_property("since", 2020u64)
                    .with_property("weight", 3u64),
                Edge::new("owns", "A", "C", true),
            ])
            .unwrap();

        let view = View::edges(["knows"]).with_properties(["since"]);
        let edges = store
            .fetch_edges(&[Vertex::from("A")], Some(&view))
            .unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].group, "knows");
        assert!(edges[0].properties.contains_key("since"));
        assert!(!edges[0].properties.contains_key("weight"));
    }
}
