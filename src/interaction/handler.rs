//! Handler chain entries
//!
//! Internal representation of a registered handler. Handlers come in two
//! operational shapes: immediate (runs synchronously against a context) and
//! deferred (produces a future whose resolution decides the outcome). The
//! public registration methods on `Interaction` adapt the three caller-facing
//! closure shapes down to these two.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::context::InteractionContext;

/// Handler run synchronously against a per-invocation context
pub(crate) type ImmediateFn<I, O> = Box<dyn Fn(&mut InteractionContext<I, O>) + Send + Sync>;

/// Handler that starts deferred work; the resolved value decides the outcome
pub(crate) type DeferredFn<I, O> = Box<dyn Fn(I) -> BoxFuture<'static, Option<O>> + Send + Sync>;

/// A registered handler in one of its two operational shapes
pub(crate) enum Handler<I, O> {
    /// Sets output on the context before returning, or declines by not doing so
    Immediate(ImmediateFn<I, O>),
    /// Produces deferred work; `Some` resolves the interaction, `None` declines
    Deferred(DeferredFn<I, O>),
}

/// One entry in a mediator's handler chain
///
/// The id ties the entry to its registration guard so the guard can remove
/// exactly this handler, and shows up in log events for traceability.
pub(crate) struct HandlerEntry<I, O> {
    pub id: u64,
    pub handler: Arc<Handler<I, O>>,
}

impl<I, O> Clone for HandlerEntry<I, O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}
