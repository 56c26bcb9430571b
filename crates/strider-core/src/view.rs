// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Query views: group and property filters applied by store queries.
use std::collections::BTreeSet;

/// Restricts which element groups and properties a query may return.
///
/// A view naming edge groups matches only edges in those groups; a view
/// naming entity groups would match entities, which hop queries must never
/// do (see [`crate::op::GetWalks::validate`]). The optional property set
/// projects each matched edge's property bag down to the named keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    /// Edge groups matched by this view. Empty means "no edge groups".
    pub edge_groups: BTreeSet<String>,
    /// Entity groups matched by this view. Must stay empty for hop queries.
    pub entity_groups: BTreeSet<String>,
    /// Optional property projection applied to matched edges.
    pub properties: Option<BTreeSet<String>>,
}

impl View {
    /// Builds an edge-only view over the given groups.
    #[must_use]
    pub fn edges<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            edge_groups: groups.into_iter().map(Into::into).collect(),
            entity_groups: BTreeSet::new(),
            properties: None,
        }
    }

    /// Restricts matched edges' property bags to the named keys.
    #[must_use]
    pub fn with_properties<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// True when the view selects at least one entity group.
    #[must_use]
    pub fn has_entities(&self) -> bool {
        !self.entity_groups.is_empty()
    }

    /// True when the view selects at least one edge group.
    #[must_use]
    pub fn has_edges(&self) -> bool {
        !self.edge_groups.is_empty()
    }

    /// True when `group` is an edge group matched by this view.
    #[must_use]
    pub fn matches_edge_group(&self, group: &str) -> bool {
        self.edge_groups.contains(group)
    }
}
