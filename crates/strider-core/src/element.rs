// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph elements: polymorphic identifiers, realized edges, and walks.
use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{Value, Vertex};

/// Identifier for a single vertex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId {
    /// The vertex value this id addresses.
    pub vertex: Vertex,
}

impl EntityId {
    /// Creates an entity id for `vertex`.
    #[must_use]
    pub fn new(vertex: impl Into<Vertex>) -> Self {
        Self {
            vertex: vertex.into(),
        }
    }
}

/// Identifier for an edge: both endpoints plus the directed flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId {
    /// Source vertex.
    pub source: Vertex,
    /// Destination vertex.
    pub destination: Vertex,
    /// Whether the identified edge is directed.
    pub directed: bool,
}

impl EdgeId {
    /// Creates an edge id from endpoints and direction.
    #[must_use]
    pub fn new(source: impl Into<Vertex>, destination: impl Into<Vertex>, directed: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            directed,
        }
    }
}

/// Polymorphic element identifier.
///
/// Equality is variant-aware: an `Entity` id never compares equal to an
/// `Edge` id, even when the entity's vertex matches one of the edge's
/// endpoints. The byte encoding in [`crate::codec::ElementIdCodec`] commits
/// the variant in its leading discriminator byte for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementId {
    /// A vertex identifier.
    Entity(EntityId),
    /// An edge identifier.
    Edge(EdgeId),
}

impl ElementId {
    /// Convenience constructor for an entity id.
    #[must_use]
    pub fn entity(vertex: impl Into<Vertex>) -> Self {
        Self::Entity(EntityId::new(vertex))
    }

    /// Convenience constructor for an edge id.
    #[must_use]
    pub fn edge(
        source: impl Into<Vertex>,
        destination: impl Into<Vertex>,
        directed: bool,
    ) -> Self {
        Self::Edge(EdgeId::new(source, destination, directed))
    }
}

impl From<EntityId> for ElementId {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

impl From<EdgeId> for ElementId {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

/// String-keyed property bag attached to a realized edge.
pub type Properties = BTreeMap<String, Value>;

/// A realized graph edge as returned by store queries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Schema group this edge belongs to.
    pub group: String,
    /// Source vertex.
    pub source: Vertex,
    /// Destination vertex.
    pub destination: Vertex,
    /// Whether the edge is directed from source to destination.
    pub directed: bool,
    /// Property bag.
    pub properties: Properties,
}

impl Edge {
    /// Creates an edge with an empty property bag.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        source: impl Into<Vertex>,
        destination: impl Into<Vertex>,
        directed: bool,
    ) -> Self {
        Self {
            group: group.into(),
            source: source.into(),
            destination: destination.into(),
            directed,
            properties: Properties::new(),
        }
    }

    /// Adds a property, consuming and returning the edge.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns this edge's identifier.
    #[must_use]
    pub fn id(&self) -> EdgeId {
        EdgeId {
            source: self.source.clone(),
            destination: self.destination.clone(),
            directed: self.directed,
        }
    }

    /// True when `vertex` is either endpoint of this edge.
    #[must_use]
    pub fn touches(&self, vertex: &Vertex) -> bool {
        self.source == *vertex || self.destination == *vertex
    }

    /// Returns the endpoint opposite `vertex`, or `None` when the edge does
    /// not touch `vertex`.
    ///
    /// For a self-loop both endpoints coincide and the "other" end is the
    /// same vertex.
    #[must_use]
    pub fn other_end(&self, vertex: &Vertex) -> Option<&Vertex> {
        if self.source == *vertex {
            Some(&self.destination)
        } else if self.destination == *vertex {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Returns the vertex a walk arrives at when it crosses this edge from
    /// `vertex`, honoring the directed flag.
    ///
    /// A directed edge can only be crossed from its source; an undirected
    /// edge can be crossed from either endpoint. `None` means the edge
    /// cannot be walked from `vertex`.
    #[must_use]
    pub fn traverse_from(&self, vertex: &Vertex) -> Option<&Vertex> {
        if self.directed {
            (self.source == *vertex).then_some(&self.destination)
        } else {
            self.other_end(vertex)
        }
    }
}

/// Error raised when a [`Walk`] cannot be constructed from its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// A walk must contain at least one edge.
    #[error("walk must contain at least one edge")]
    Empty,
    /// The first edge does not touch the declared start vertex.
    #[error("start vertex is not an endpoint of the first edge")]
    DetachedStart,
    /// Two adjacent edges do not share the frontier vertex.
    #[error("edge {index} does not continue from the previous frontier")]
    Discontiguous {
        /// 0-based index of the offending edge.
        index: usize,
    },
}

/// A completed path: a non-empty, endpoint-contiguous sequence of edges.
///
/// Walks are produced by the traversal engine and are immutable once built.
/// [`Walk::new`] is the only constructor and enforces the contiguity
/// invariant: each edge must be crossable from the frontier left by its
/// predecessor ([`Edge::traverse_from`] — direction-aware for directed
/// edges), and the frontier then moves to the arrival vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Walk {
    start: Vertex,
    edges: Vec<Edge>,
}

impl Walk {
    /// Builds a walk from a start vertex and an edge sequence, validating
    /// non-emptiness and endpoint contiguity.
    pub fn new(start: impl Into<Vertex>, edges: Vec<Edge>) -> Result<Self, WalkError> {
        let start = start.into();
        if edges.is_empty() {
            return Err(WalkError::Empty);
        }
        let mut frontier = start.clone();
        for (index, edge) in edges.iter().enumerate() {
            match edge.traverse_from(&frontier) {
                Some(next) => frontier = next.clone(),
                None if index == 0 => return Err(WalkError::DetachedStart),
                None => return Err(WalkError::Discontiguous { index }),
            }
        }
        Ok(Self { start, edges })
    }

    /// Number of edges (hops) in this walk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always false; walks are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The vertex the walk departs from.
    #[must_use]
    pub fn start(&self) -> &Vertex {
        &self.start
    }

    /// The vertex the walk arrives at after its final edge.
    #[must_use]
    pub fn end(&self) -> &Vertex {
        let mut frontier = &self.start;
        for edge in &self.edges {
            // Contiguity was checked in `new`; a detached edge cannot occur.
            if let Some(next) = edge.traverse_from(frontier) {
                frontier = next;
            }
        }
        frontier
    }

    /// The edges of this walk, in traversal order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The sequence of visited vertices, start first: `len() + 1` entries.
    #[must_use]
    pub fn vertices(&self) -> Vec<&Vertex> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        let mut frontier = &self.start;
        out.push(frontier);
        for edge in &self.edges {
            if let Some(next) = edge.traverse_from(frontier) {
                frontier = next;
                out.push(frontier);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn entity_and_edge_ids_never_compare_equal() {
        let entity = ElementId::entity("A");
        let edge = ElementId::edge("A", "A", true);
        assert_ne!(entity, edge);
    }

    #[test]
    fn walk_rejects_empty_and_detached_edges() {
        assert_eq!(Walk::new("A", vec![]), Err(WalkError::Empty));

        let unrelated = Edge::new("knows", "X", "Y", true);
        assert_eq!(
            Walk::new("A", vec![unrelated]),
            Err(WalkError::DetachedStart)
        );

        let ab = Edge::new("knows", "A", "B", true);
        let cd = Edge::new("knows", "C", "D", true);
        assert_eq!(
            Walk::new("A", vec![ab, cd]),
            Err(WalkError::Discontiguous { index: 1 })
        );
    }

    #[test]
    fn walk_tracks_frontier_through_reversed_edges() {
        // B→A stored source-first but entered from A; frontier still moves to B.
        let ba = Edge::new("knows", "B", "A", false);
        let bc = Edge::new("knows", "B", "C", true);
        let walk = Walk::new("A", vec![ba, bc]).unwrap();
        assert_eq!(walk.len(), 2);
        assert_eq!(walk.end(), &Vertex::from("C"));
        let visited: Vec<_> = walk.vertices().into_iter().cloned().collect();
        assert_eq!(
            visited,
            vec![Vertex::from("A"), Vertex::from("B"), Vertex::from("C")]
        );
    }

    #[test]
    fn self_loop_keeps_frontier_in_place() {
        let aa = Edge::new("knows", "A", "A", true);
        let ab = Edge::new("knows", "A", "B", true);
        let walk = Walk::new("A", vec![aa, ab]).unwrap();
        assert_eq!(walk.end(), &Vertex::from("B"));
    }
}
