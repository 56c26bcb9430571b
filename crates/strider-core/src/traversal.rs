// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Walk-traversal engine.
//!
//! Turns a chain of per-hop edge fetches into enumerated paths. Hops are
//! strictly sequential — hop `i + 1` is seeded by the frontier vertices hop
//! `i` produced — while a single hop's fetch may batch or parallelise
//! internally, opaque to this engine.
//!
//! Fan-out is unbounded by design: total output is the product of per-hop
//! branching factors, with no capping, memory limiting, or deduplication of
//! revisited vertices. Callers bound cost through each hop's view filters.
use crate::element::{Edge, Walk};
use crate::handler::{Context, ExecError, Executor, OpOutput};
use crate::op::{GetWalks, Op};
use crate::value::Vertex;

/// One in-flight path: the edges walked so far plus the open frontier.
struct Partial {
    start: Vertex,
    edges: Vec<Edge>,
    frontier: Vertex,
}

/// Enumerates every walk of exactly `request.hops.len()` edges reachable
/// from the request's seeds.
///
/// Validation is the caller's precondition (`request.validate()` must be
/// empty); the engine only executes. Output order follows seed order and
/// per-hop fetch order, neither of which is guaranteed by the contract.
///
/// # Errors
/// Any hop's failed edge fetch aborts the whole traversal with
/// [`ExecError::HopFailed`] wrapping the cause; no partial results are
/// returned.
pub fn traverse(
    exec: Executor<'_>,
    ctx: &Context,
    request: &GetWalks,
) -> Result<Vec<Walk>, ExecError> {
    if request.hops.is_empty() {
        // Callers must refuse invalid requests; reaching here is a contract
        // violation, not a query with zero results.
        return Err(ExecError::Internal("traversal executed with no hops"));
    }

    let mut partials: Vec<Partial> = request
        .seeds
        .iter()
        .map(|seed| Partial {
            start: seed.clone(),
            edges: Vec::new(),
            frontier: seed.clone(),
        })
        .collect();

    for (index, hop) in request.hops.iter().enumerate() {
        if partials.is_empty() {
            // Every branch has terminated; later hops would query nothing.
            tracing::debug!(hop = index, "no surviving partial walks");
            return Ok(Vec::new());
        }

        let frontier = distinct_frontier(&partials);
        let mut hop_op = hop.clone();
        hop_op.seeds = frontier;

        let fetched = exec
            .execute(&Op::GetEdges(hop_op), ctx)
            .map_err(|source| ExecError::HopFailed {
                index,
                source: Box::new(source),
            })?;
        let OpOutput::Edges(edges) = fetched else {
            return Err(ExecError::UnexpectedOutput {
                op_kind: crate::op::OpKind::GetEdges,
            });
        };
        tracing::debug!(
            hop = index,
            partials = partials.len(),
            edges = edges.len(),
            "hop fetched"
        );

        partials = branch(partials, &edges);
    }

    let mut walks = Vec::with_capacity(partials.len());
    for partial in partials {
        // Survivors hold exactly `hops.len()` contiguous edges; a
        // construction failure here is an engine bug, not caller input.
        let walk = Walk::new(partial.start, partial.edges)
            .map_err(|_| ExecError::Internal("traversal produced a malformed walk"))?;
        walks.push(walk);
    }
    Ok(walks)
}

/// Distinct frontier vertices in first-seen order, used as the next hop's
/// seed set.
fn distinct_frontier(partials: &[Partial]) -> Vec<Vertex> {
    let mut frontier: Vec<Vertex> = Vec::new();
    for partial in partials {
        if !frontier.contains(&partial.frontier) {
            frontier.push(partial.frontier.clone());
        }
    }
    frontier
}

/// Extends every partial by every fetched edge crossable from its frontier.
///
/// Each crossable edge branches independently (directed edges only from
/// their source, undirected from either end); a frontier with no crossable
/// edge terminates that branch with no output.
fn branch(partials: Vec<Partial>, edges: &[Edge]) -> Vec<Partial> {
    let mut next = Vec::new();
    for partial in partials {
        for edge in edges {
            if let Some(arrival) = edge.traverse_from(&partial.frontier) {
                let mut extended = partial.edges.clone();
                extended.push(edge.clone());
                next.push(Partial {
                    start: partial.start.clone(),
                    edges: extended,
                    frontier: arrival.clone(),
                });
            }
        }
    }
    next
}
