// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operation dispatch: context, registry, executor, and execution errors.
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::element::{Edge, Walk};
use crate::op::{Op, OpKind};
use crate::store::{Store, StoreError};
use crate::traversal;

/// Opaque identity token for the caller issuing an operation.
///
/// The engine never inspects the id; it only forwards the context through
/// every dispatch so backing stores can apply their own access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: String,
}

impl User {
    /// Creates a user token from an opaque id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The opaque id, for stores that consume it.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Execution context threaded through every dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    user: User,
}

impl Context {
    /// Creates a context for `user`.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The caller's identity token.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}

/// Typed result of executing an [`Op`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutput {
    /// Edges from an edge fetch.
    Edges(Vec<Edge>),
    /// Completed walks from a traversal.
    Walks(Vec<Walk>),
    /// The op produced no output (side effects only).
    None,
}

/// Error raised while executing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// No handler is registered for the op's kind.
    #[error("no handler registered for {0}")]
    UnhandledOp(OpKind),
    /// The registry routed an op to a handler for a different variant.
    #[error("handler for {expected} invoked with a {found} operation")]
    WrongHandler {
        /// Variant the handler serves.
        expected: OpKind,
        /// Variant actually received.
        found: OpKind,
    },
    /// A nested dispatch returned an output shape its caller cannot use.
    #[error("handler for {op_kind} returned unexpected output")]
    UnexpectedOutput {
        /// Kind of the nested op.
        op_kind: OpKind,
    },
    /// A traversal hop's edge fetch failed; the whole traversal aborts.
    #[error("hop {index} failed")]
    HopFailed {
        /// 0-based hop index.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<ExecError>,
    },
    /// A federated member failed; names the graph and the op's kind.
    #[error("graph `{graph_id}` failed to execute {op_kind}")]
    GraphFailed {
        /// Identifier of the failing graph.
        graph_id: String,
        /// Kind of the dispatched op.
        op_kind: OpKind,
        /// Underlying failure.
        #[source]
        source: Box<ExecError>,
    },
    /// Internal invariant violation; indicates an engine bug.
    #[error("internal corruption: {0}")]
    Internal(&'static str),
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handler invoked for one op variant.
///
/// Handlers receive the [`Executor`] they were dispatched from so composite
/// operations (a walk traversal's hops) can re-enter dispatch against the
/// same store and context.
pub type Handler = fn(&Op, &Context, Executor<'_>) -> Result<OpOutput, ExecError>;

/// Error raised while building a [`HandlerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler is already registered for this kind.
    #[error("duplicate handler registration for {0}")]
    Duplicate(OpKind),
}

/// Dispatch table mapping [`OpKind`] to its handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<OpKind, Handler>,
}

impl HandlerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry wired with this crate's default handlers for every op
    /// variant.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Fresh registry; duplicate registration cannot occur here.
        let _ = registry.register(OpKind::GetEdges, get_edges_handler);
        let _ = registry.register(OpKind::GetWalks, get_walks_handler);
        let _ = registry.register(OpKind::AddEdges, add_edges_handler);
        registry
    }

    /// Registers `handler` for `kind`.
    pub fn register(&mut self, kind: OpKind, handler: Handler) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&kind) {
            return Err(RegistryError::Duplicate(kind));
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    /// Looks up the handler for `kind`.
    #[must_use]
    pub fn handler(&self, kind: OpKind) -> Option<Handler> {
        self.handlers.get(&kind).copied()
    }
}

/// Borrowed dispatch seam: a registry paired with the store it executes
/// against. `Copy` so handlers can re-enter dispatch freely.
#[derive(Clone, Copy)]
pub struct Executor<'a> {
    registry: &'a HandlerRegistry,
    store: &'a dyn Store,
}

impl<'a> Executor<'a> {
    /// Creates an executor over `registry` and `store`.
    #[must_use]
    pub fn new(registry: &'a HandlerRegistry, store: &'a dyn Store) -> Self {
        Self { registry, store }
    }

    /// The store this executor dispatches against.
    #[must_use]
    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    /// Executes `op` by dispatching to the registered handler for its kind.
    ///
    /// Precondition: `op.validate()` is empty. The executor does not
    /// re-validate; see [`crate::op`].
    pub fn execute(&self, op: &Op, ctx: &Context) -> Result<OpOutput, ExecError> {
        let kind = op.kind();
        let handler = self
            .registry
            .handler(kind)
            .ok_or(ExecError::UnhandledOp(kind))?;
        tracing::trace!(op = %kind, "dispatching operation");
        handler(op, ctx, *self)
    }
}

/// Default handler for [`Op::GetEdges`]: a seed-adjacent store query.
fn get_edges_handler(op: &Op, _ctx: &Context, exec: Executor<'_>) -> Result<OpOutput, ExecError> {
    let Op::GetEdges(op) = op else {
        return Err(ExecError::WrongHandler {
            expected: OpKind::GetEdges,
            found: op.kind(),
        });
    };
    let edges = exec.store().fetch_edges(&op.seeds, op.view.as_ref())?;
    Ok(OpOutput::Edges(edges))
}

/// Default handler for [`Op::GetWalks`]: the walk-traversal engine.
fn get_walks_handler(op: &Op, ctx: &Context, exec: Executor<'_>) -> Result<OpOutput, ExecError> {
    let Op::GetWalks(op) = op else {
        return Err(ExecError::WrongHandler {
            expected: OpKind::GetWalks,
            found: op.kind(),
        });
    };
    let walks = traversal::traverse(exec, ctx, op)?;
    Ok(OpOutput::Walks(walks))
}

/// Default handler for [`Op::AddEdges`]: a schema-checked ingest.
fn add_edges_handler(op: &Op, _ctx: &Context, exec: Executor<'_>) -> Result<OpOutput, ExecError> {
    let Op::AddEdges(op) = op else {
        return Err(ExecError::WrongHandler {
            expected: OpKind::AddEdges,
            found: op.kind(),
        });
    };
    exec.store().add_edges(&op.edges)?;
    Ok(OpOutput::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::GetEdges;
    use crate::value::Vertex;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::with_defaults();
        assert_eq!(
            registry.register(OpKind::GetEdges, get_edges_handler),
            Err(RegistryError::Duplicate(OpKind::GetEdges))
        );
    }

    #[test]
    fn empty_registry_reports_unhandled_op() {
        let registry = HandlerRegistry::new();
        let store = crate::memory::MemoryStore::default();
        let exec = Executor::new(&registry, &store);
        let ctx = Context::new(User::new("tester"));
        let op = Op::from(GetEdges::new(Vec::<Vertex>::new()));
        assert_eq!(
            exec.execute(&op, &ctx),
            Err(ExecError::UnhandledOp(OpKind::GetEdges))
        );
    }
}
