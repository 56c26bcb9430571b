// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! strider-federated: one logical operation replayed across many graphs.
//!
//! A [`FederatedStore`] holds an ordered collection of independently
//! addressable member graphs plus a rewrite hook deciding, per member, how
//! (or whether) a dispatched operation applies to it. [`dispatch`] replays
//! an arbitrary [`Op`] against every member strictly in store order. A
//! member failure aborts the dispatch naming the failing graph, unless the
//! op sets the skip-failed hint, in which case that member is skipped.
//!
//! No result merging happens here; callers receive the ordered per-graph
//! results and aggregate them themselves ([`concat_edges`]/[`concat_walks`]
//! cover the common concatenating cases).
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

use std::sync::Arc;

use thiserror::Error;

use strider_core::{
    CloneError, Context, Edge, ExecError, Executor, HandlerRegistry, Op, OpOutput, Store, Walk,
};

/// Error raised by a federated dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The store's rewrite hook failed to produce a per-graph operation.
    #[error("operation rewrite failed for graph `{graph_id}`")]
    Rewrite {
        /// Identifier of the graph being rewritten for.
        graph_id: String,
        /// Underlying clone failure.
        #[source]
        source: CloneError,
    },
    /// A member graph's execution failed and the skip hint was unset.
    ///
    /// The inner error is [`ExecError::GraphFailed`], naming the member and
    /// the operation's kind and wrapping the original cause.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// A named member graph: its own backing store and handler registry.
#[derive(Clone)]
pub struct FederatedGraph {
    graph_id: String,
    store: Arc<dyn Store>,
    registry: Arc<HandlerRegistry>,
}

impl std::fmt::Debug for FederatedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederatedGraph")
            .field("graph_id", &self.graph_id)
            .finish_non_exhaustive()
    }
}

impl FederatedGraph {
    /// Creates a member over `store` with the default handler registry.
    #[must_use]
    pub fn new(graph_id: impl Into<String>, store: Arc<dyn Store>) -> Self {
        Self {
            graph_id: graph_id.into(),
            store,
            registry: Arc::new(HandlerRegistry::with_defaults()),
        }
    }

    /// Replaces the member's handler registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// This member's identifier, unique within its federated store.
    #[must_use]
    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    /// Executes `op` against this member alone.
    pub fn execute(&self, op: &Op, ctx: &Context) -> Result<OpOutput, ExecError> {
        Executor::new(&self.registry, &*self.store).execute(op, ctx)
    }
}

/// Rewrite hook mapping (operation, member) to the operation that member
/// should run, or `None` to skip the member entirely.
pub type RewriteFn = fn(&Op, &FederatedGraph) -> Result<Option<Op>, CloneError>;

/// Default rewrite: every member runs a shallow clone of the original op.
pub fn rewrite_unchanged(op: &Op, _graph: &FederatedGraph) -> Result<Option<Op>, CloneError> {
    op.shallow_clone().map(Some)
}

/// An ordered collection of member graphs queried as one logical store.
///
/// Member order is caller-determined and meaningful: dispatch walks it
/// sequentially, so it fixes which member an aborting failure names and
/// which members never ran.
#[derive(Debug, Clone)]
pub struct FederatedStore {
    graphs: Vec<FederatedGraph>,
    rewrite: RewriteFn,
}

impl FederatedStore {
    /// Creates a store over `graphs` with the identity rewrite.
    #[must_use]
    pub fn new(graphs: Vec<FederatedGraph>) -> Self {
        Self {
            graphs,
            rewrite: rewrite_unchanged,
        }
    }

    /// Replaces the rewrite hook.
    #[must_use]
    pub fn with_rewrite(mut self, rewrite: RewriteFn) -> Self {
        self.rewrite = rewrite;
        self
    }

    /// The member graphs, in dispatch order.
    #[must_use]
    pub fn graphs(&self) -> &[FederatedGraph] {
        &self.graphs
    }

    /// Applies the rewrite hook for one member.
    pub fn rewrite_for_graph(
        &self,
        op: &Op,
        graph: &FederatedGraph,
    ) -> Result<Option<Op>, CloneError> {
        (self.rewrite)(op, graph)
    }
}

/// One member's contribution to a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResult {
    /// The contributing member's identifier.
    pub graph_id: String,
    /// The member's output for the (possibly rewritten) operation.
    pub output: OpOutput,
}

/// Replays `op` against every member of `store`, strictly in member order.
///
/// Rewrite-skipped members contribute nothing. When a member's execution
/// fails and `op` does not set the skip-failed hint, the dispatch aborts
/// with an error naming that member and the op's kind; members before it
/// keep whatever side effects they committed (no rollback), members after
/// it never run. With the hint set, failed members are logged and skipped
/// and the dispatch completes.
pub fn dispatch(
    store: &FederatedStore,
    op: &Op,
    ctx: &Context,
) -> Result<Vec<GraphResult>, DispatchError> {
    let skip_failed = op.options().skip_failed_federated_execute;
    let mut results = Vec::with_capacity(store.graphs().len());

    for graph in store.graphs() {
        let rewritten = store
            .rewrite_for_graph(op, graph)
            .map_err(|source| DispatchError::Rewrite {
                graph_id: graph.graph_id().to_owned(),
                source,
            })?;
        let Some(rewritten) = rewritten else {
            tracing::debug!(graph = graph.graph_id(), "rewrite skipped graph");
            continue;
        };

        match graph.execute(&rewritten, ctx) {
            Ok(output) => results.push(GraphResult {
                graph_id: graph.graph_id().to_owned(),
                output,
            }),
            Err(source) if skip_failed => {
                tracing::debug!(
                    graph = graph.graph_id(),
                    error = %source,
                    "skipping failed federated execute"
                );
            }
            Err(source) => {
                return Err(ExecError::GraphFailed {
                    graph_id: graph.graph_id().to_owned(),
                    op_kind: op.kind(),
                    source: Box::new(source),
                }
                .into());
            }
        }
    }
    Ok(results)
}

/// Concatenates the edges of every edge-bearing per-graph result, in
/// dispatch order.
#[must_use]
pub fn concat_edges(results: &[GraphResult]) -> Vec<Edge> {
    results
        .iter()
        .filter_map(|result| match &result.output {
            OpOutput::Edges(edges) => Some(edges.iter().cloned()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// Concatenates the walks of every walk-bearing per-graph result, in
/// dispatch order.
#[must_use]
pub fn concat_walks(results: &[GraphResult]) -> Vec<Walk> {
    results
        .iter()
        .filter_map(|result| match &result.output {
            OpOutput::Walks(walks) => Some(walks.iter().cloned()),
            _ => None,
        })
        .flatten()
        .collect()
}
