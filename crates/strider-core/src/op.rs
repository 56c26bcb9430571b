// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Units of work: the closed operation type, options, and validation.
//!
//! Dispatch is keyed by [`OpKind`] rather than runtime type identity; every
//! operation the engine executes is one variant of [`Op`]. The framework
//! never auto-validates — executing an op whose [`Op::validate`] result is
//! non-empty is a caller contract violation, documented here as a
//! precondition rather than checked at dispatch time.
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::element::Edge;
use crate::value::Vertex;
use crate::view::View;

/// Error raised when an operation cannot satisfy the shallow-clone contract.
///
/// The closed variants in this crate always clone cleanly; the error exists
/// so store-specific rewrite hooks keep a fallible seam.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation could not be shallow-cloned: {reason}")]
pub struct CloneError {
    /// Human-readable failure description.
    pub reason: String,
}

/// Ordered collection of validation errors. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one validation error.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// True when no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded errors, in the order they were added.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Execution-hint bag carried by every operation.
///
/// Hints this crate acts on get typed fields; the string map is a
/// forward-compatible escape hatch that is carried but never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// When true, a federated dispatch continues past members whose
    /// execution fails instead of aborting.
    pub skip_failed_federated_execute: bool,
    /// Unvalidated extras, keyed by caller-defined strings.
    pub extras: BTreeMap<String, String>,
}

impl Options {
    /// Options with every hint at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the federated skip-failed hint.
    #[must_use]
    pub fn skip_failed_federated_execute(mut self, skip: bool) -> Self {
        self.skip_failed_federated_execute = skip;
        self
    }
}

/// One hop's edge fetch: seed vertices, an optional view, options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetEdges {
    /// Vertices whose incident edges are fetched.
    pub seeds: Vec<Vertex>,
    /// Optional filter restricting matched groups and properties.
    pub view: Option<View>,
    /// Execution hints.
    pub options: Options,
}

impl GetEdges {
    /// An edge fetch seeded with `seeds` and no view.
    #[must_use]
    pub fn new<I, V>(seeds: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vertex>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            view: None,
            options: Options::new(),
        }
    }

    /// Attaches a view, consuming and returning the op.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    /// Structural validation; edge fetches are currently always valid.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::new()
    }

    /// Duplicates top-level fields into a new container.
    pub fn shallow_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

/// Walk-traversal request: ordered hops, seeds, options.
///
/// Hops execute sequentially; hop `i + 1` is seeded by the frontier
/// vertices hop `i` produced. See [`crate::traversal`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetWalks {
    /// Per-hop edge-fetch operations, in traversal order.
    pub hops: Vec<GetEdges>,
    /// Seed vertices: one partial walk starts at each.
    pub seeds: Vec<Vertex>,
    /// Execution hints.
    pub options: Options,
}

impl GetWalks {
    /// A traversal over `hops` starting from `seeds`.
    #[must_use]
    pub fn new<I, V>(seeds: I, hops: Vec<GetEdges>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vertex>,
    {
        Self {
            hops,
            seeds: seeds.into_iter().map(Into::into).collect(),
            options: Options::new(),
        }
    }

    /// Validates the request without executing it.
    ///
    /// A traversal needs at least one hop, and a walk is a sequence of
    /// edges, so any hop whose view selects entities is a configuration
    /// error; the message names that hop's 0-based index.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if self.hops.is_empty() {
            result.add_error("no hop operations provided");
            return result;
        }
        for (index, hop) in self.hops.iter().enumerate() {
            if let Some(view) = &hop.view {
                if view.has_entities() {
                    result.add_error(format!(
                        "the view for hop {index} must not select entities"
                    ));
                }
                if !view.has_edges() {
                    result.add_error(format!(
                        "the view for hop {index} selects no edge groups"
                    ));
                }
            }
        }
        result
    }

    /// Duplicates top-level fields: same hop values, new containers.
    pub fn shallow_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

/// Edge-ingest operation: adds a batch of realized edges to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddEdges {
    /// Edges to ingest.
    pub edges: Vec<Edge>,
    /// Execution hints.
    pub options: Options,
}

impl AddEdges {
    /// An ingest of `edges`.
    #[must_use]
    pub fn new(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            options: Options::new(),
        }
    }

    /// Structural validation; ingests are currently always valid (schema
    /// membership is enforced by the store at execution time).
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::new()
    }

    /// Duplicates top-level fields into a new container.
    pub fn shallow_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

/// Dispatch tag for an [`Op`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// [`Op::GetEdges`].
    GetEdges,
    /// [`Op::GetWalks`].
    GetWalks,
    /// [`Op::AddEdges`].
    AddEdges,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetEdges => "GetEdges",
            Self::GetWalks => "GetWalks",
            Self::AddEdges => "AddEdges",
        };
        f.write_str(name)
    }
}

/// The closed unit-of-work type executed through the handler framework.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    /// One edge fetch.
    GetEdges(GetEdges),
    /// A multi-hop walk traversal.
    GetWalks(GetWalks),
    /// An edge-batch ingest.
    AddEdges(AddEdges),
}

impl Op {
    /// The dispatch tag for this op.
    #[must_use]
    pub fn kind(&self) -> OpKind {
        match self {
            Self::GetEdges(_) => OpKind::GetEdges,
            Self::GetWalks(_) => OpKind::GetWalks,
            Self::AddEdges(_) => OpKind::AddEdges,
        }
    }

    /// This op's execution hints.
    #[must_use]
    pub fn options(&self) -> &Options {
        match self {
            Self::GetEdges(op) => &op.options,
            Self::GetWalks(op) => &op.options,
            Self::AddEdges(op) => &op.options,
        }
    }

    /// Validates the op without executing it. Callers must refuse to
    /// execute an op whose result is non-empty.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        match self {
            Self::GetEdges(op) => op.validate(),
            Self::GetWalks(op) => op.validate(),
            Self::AddEdges(op) => op.validate(),
        }
    }

    /// Duplicates top-level fields without deep-copying nested collections'
    /// elements.
    pub fn shallow_clone(&self) -> Result<Self, CloneError> {
        Ok(match self {
            Self::GetEdges(op) => Self::GetEdges(op.shallow_clone()?),
            Self::GetWalks(op) => Self::GetWalks(op.shallow_clone()?),
            Self::AddEdges(op) => Self::AddEdges(op.shallow_clone()?),
        })
    }
}

impl From<GetEdges> for Op {
    fn from(op: GetEdges) -> Self {
        Self::GetEdges(op)
    }
}

impl From<GetWalks> for Op {
    fn from(op: GetWalks) -> Self {
        Self::GetWalks(op)
    }
}

impl From<AddEdges> for Op {
    fn from(op: AddEdges) -> Self {
        Self::AddEdges(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hop_list_is_invalid() {
        let op = GetWalks::new(["A"], vec![]);
        let result = op.validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors(), ["no hop operations provided"]);
    }

    #[test]
    fn entity_selecting_hop_view_names_its_index() {
        let mut bad_view = View::edges(["knows"]);
        bad_view.entity_groups.insert("person".to_owned());
        let op = GetWalks::new(
            ["A"],
            vec![
                GetEdges::new(Vec::<Vertex>::new()).with_view(View::edges(["knows"])),
                GetEdges::new(Vec::<Vertex>::new()).with_view(bad_view),
            ],
        );
        let result = op.validate();
        assert_eq!(
            result.errors(),
            ["the view for hop 1 must not select entities"]
        );
    }

    #[test]
    fn shallow_clone_duplicates_containers() {
        let op = Op::from(GetWalks::new(
            ["A"],
            vec![GetEdges::new(Vec::<Vertex>::new())],
        ));
        let clone = op.shallow_clone();
        assert_eq!(clone, Ok(op));
    }
}
