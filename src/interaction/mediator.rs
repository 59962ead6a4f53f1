//! # Interaction Mediator
//!
//! Decouples requesters (typically view models) from responders (typically
//! views). A view model raises an interaction — "confirm this action?" —
//! without knowing which view, dialog, or test double will answer it; whoever
//! currently has a handler registered gets the chance to respond.
//!
//! Handlers form a chain resolved in reverse registration order, so the most
//! recently registered handler wins by default. That makes temporary
//! overrides natural: a dialog registers its handler on entry, holds the
//! returned guard for its lifetime, and dropping the guard on exit restores
//! the previous behavior.

use std::sync::{Arc, Mutex, Weak};

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::oneshot;

use super::context::InteractionContext;
use super::handler::{Handler, HandlerEntry};
use crate::scheduler::Scheduler;

/// Recoverable failure: the handler chain was exhausted without a response
///
/// Carries the mediator's name and the original input unchanged so the caller
/// can log, retry with a different input, or fall back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("interaction `{interaction}` was not handled")]
pub struct UnhandledInteraction<I> {
    /// Name of the mediator that raised the request
    pub interaction: String,
    /// The input the requester supplied, returned unchanged
    pub input: I,
}

/// Scoped registration token returned by the `register_*` methods
///
/// Dropping the guard removes exactly its handler from future chain walks,
/// on every exit path, without disturbing the relative order of the
/// remaining handlers. The guard holds no strong reference to the mediator,
/// so it may safely outlive it.
#[must_use = "dropping the guard unregisters the handler immediately"]
pub struct HandlerGuard {
    unregister: Option<Box<dyn FnOnce() + Send>>,
}

impl HandlerGuard {
    /// Remove the handler now rather than at end of scope
    pub fn unregister(self) {
        // Drop does the work
    }
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

struct Chain<I, O> {
    next_id: u64,
    entries: Vec<HandlerEntry<I, O>>,
}

/// Mediator for one typed request/response contract
///
/// `I` is the request payload, `O` the response. Cloning an `Interaction`
/// yields another handle onto the same handler chain, so a view model and
/// its views can each hold one.
///
/// ```
/// # use crossbind::interaction::Interaction;
/// let confirm: Interaction<String, bool> = Interaction::new("confirm-delete");
/// let _guard = confirm.register_handler(|ctx| {
///     // a real view would prompt; tests just answer
///     ctx.set_output(ctx.input().contains("temp"));
/// });
/// assert_eq!(confirm.handle_blocking("temp.txt".into()), Ok(true));
/// ```
pub struct Interaction<I, O> {
    name: String,
    chain: Arc<Mutex<Chain<I, O>>>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl<I, O> Clone for Interaction<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            chain: Arc::clone(&self.chain),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<I, O> Interaction<I, O>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
{
    /// Create a mediator that invokes handlers on the caller's context
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: Arc::new(Mutex::new(Chain {
                next_id: 0,
                entries: Vec::new(),
            })),
            scheduler: None,
        }
    }

    /// Create a mediator that marshals every handler invocation onto `scheduler`
    ///
    /// With a scheduler affinity, handlers run only when the scheduler runs
    /// them — against a [`TestScheduler`](crate::scheduler::TestScheduler)
    /// nothing resolves until the test pumps the queue, which pins down
    /// handler timing deterministically.
    pub fn with_scheduler(name: impl Into<String>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler: Some(scheduler),
            ..Self::new(name)
        }
    }

    /// Diagnostic name, also carried by [`UnhandledInteraction`]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of handlers currently registered (for testing/debugging)
    pub fn handler_count(&self) -> usize {
        self.chain.lock().unwrap().entries.len()
    }

    /// Register a synchronous handler
    ///
    /// The handler sets output on the context to respond, or returns without
    /// setting it to decline and let an earlier-registered handler try.
    pub fn register_handler<F>(&self, handler: F) -> HandlerGuard
    where
        F: Fn(&mut InteractionContext<I, O>) + Send + Sync + 'static,
    {
        self.register(Handler::Immediate(Box::new(handler)))
    }

    /// Register a handler that responds through deferred work
    ///
    /// The returned future resolves the interaction with `Some(output)` or
    /// declines with `None`. Only one handler's deferred work is live at a
    /// time during a walk; a resolution stops the chain.
    pub fn register_async_handler<F, Fut>(&self, handler: F) -> HandlerGuard
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<O>> + Send + 'static,
    {
        self.register(Handler::Deferred(Box::new(move |input| {
            handler(input).boxed()
        })))
    }

    /// Register a handler whose deferred work always produces a response
    pub fn register_task_handler<F, Fut>(&self, handler: F) -> HandlerGuard
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = O> + Send + 'static,
    {
        self.register(Handler::Deferred(Box::new(move |input| {
            handler(input).map(Some).boxed()
        })))
    }

    fn register(&self, handler: Handler<I, O>) -> HandlerGuard {
        let id = {
            let mut chain = self.chain.lock().unwrap();
            let id = chain.next_id;
            chain.next_id += 1;
            chain.entries.push(HandlerEntry {
                id,
                handler: Arc::new(handler),
            });
            id
        };
        tracing::debug!(interaction = %self.name, handler_id = id, "registered interaction handler");

        let weak: Weak<Mutex<Chain<I, O>>> = Arc::downgrade(&self.chain);
        let name = self.name.clone();
        HandlerGuard {
            unregister: Some(Box::new(move || {
                if let Some(chain) = weak.upgrade() {
                    let mut chain = chain.lock().unwrap();
                    if let Some(pos) = chain.entries.iter().position(|entry| entry.id == id) {
                        chain.entries.remove(pos);
                        tracing::debug!(
                            interaction = %name,
                            handler_id = id,
                            "unregistered interaction handler"
                        );
                    }
                }
            })),
        }
    }

    /// Raise the interaction with `input`
    ///
    /// Lazy: nothing happens until the returned future is first polled. The
    /// walk then takes a snapshot of the chain (handlers registered or
    /// removed mid-walk do not affect it) and tries handlers from most
    /// recently registered to least, one at a time, stopping at the first
    /// that responds. An exhausted chain yields [`UnhandledInteraction`].
    ///
    /// Dropping the future cancels the call: in-flight deferred work is
    /// dropped, and a handler invocation still queued on the scheduler is
    /// skipped instead of run.
    pub async fn handle(&self, input: I) -> Result<O, UnhandledInteraction<I>> {
        let snapshot: Vec<HandlerEntry<I, O>> = {
            let chain = self.chain.lock().unwrap();
            chain.entries.iter().rev().cloned().collect()
        };
        tracing::debug!(
            interaction = %self.name,
            handlers = snapshot.len(),
            "dispatching interaction"
        );

        for entry in &snapshot {
            if let Some(output) = self.invoke(entry, input.clone()).await {
                tracing::debug!(
                    interaction = %self.name,
                    handler_id = entry.id,
                    "interaction handled"
                );
                return Ok(output);
            }
            tracing::trace!(
                interaction = %self.name,
                handler_id = entry.id,
                "handler declined"
            );
        }

        tracing::warn!(interaction = %self.name, "interaction not handled");
        Err(UnhandledInteraction {
            interaction: self.name.clone(),
            input,
        })
    }

    /// Blocking adapter over [`handle`](Self::handle) for synchronous callers
    ///
    /// Must not be called from inside an async runtime; deferred handlers
    /// relying on a live runtime (e.g. tokio timers) will not make progress
    /// under it. A mediator with scheduler affinity is just as hazardous:
    /// the walk blocks waiting on the queued invocation, so unless another
    /// thread pumps the scheduler the call deadlocks. Intended for
    /// plain-threaded callers whose handlers run on the calling context.
    pub fn handle_blocking(&self, input: I) -> Result<O, UnhandledInteraction<I>> {
        futures::executor::block_on(self.handle(input))
    }

    /// Try one handler, on the caller's context or marshaled via the scheduler
    async fn invoke(&self, entry: &HandlerEntry<I, O>, input: I) -> Option<O> {
        let Some(scheduler) = &self.scheduler else {
            return match entry.handler.as_ref() {
                Handler::Immediate(run) => {
                    let mut ctx = InteractionContext::new(input);
                    run(&mut ctx);
                    ctx.into_output()
                }
                Handler::Deferred(start) => start(input).await,
            };
        };

        match entry.handler.as_ref() {
            Handler::Immediate(_) => {
                let handler = Arc::clone(&entry.handler);
                let (tx, rx) = oneshot::channel::<Option<O>>();
                scheduler.schedule(Box::new(move || {
                    // The handle() future was dropped: skip the invocation so
                    // a cancelled call produces no side effects.
                    if tx.is_closed() {
                        return;
                    }
                    if let Handler::Immediate(run) = handler.as_ref() {
                        let mut ctx = InteractionContext::new(input);
                        run(&mut ctx);
                        let _ = tx.send(ctx.into_output());
                    }
                }));
                match rx.await {
                    Ok(output) => output,
                    Err(_) => {
                        tracing::warn!(
                            interaction = %self.name,
                            handler_id = entry.id,
                            "scheduler dropped a queued handler invocation; treating as declined"
                        );
                        None
                    }
                }
            }
            Handler::Deferred(_) => {
                let handler = Arc::clone(&entry.handler);
                let (tx, rx) = oneshot::channel();
                scheduler.schedule(Box::new(move || {
                    if tx.is_closed() {
                        return;
                    }
                    if let Handler::Deferred(start) = handler.as_ref() {
                        let _ = tx.send(start(input));
                    }
                }));
                match rx.await {
                    Ok(work) => work.await,
                    Err(_) => {
                        tracing::warn!(
                            interaction = %self.name,
                            handler_id = entry.id,
                            "scheduler dropped a queued handler invocation; treating as declined"
                        );
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_should_fail_unhandled_with_input() {
        let interaction: Interaction<u32, &str> = Interaction::new("confirm");
        let err = interaction.handle_blocking(42).unwrap_err();
        assert_eq!(err.interaction, "confirm");
        assert_eq!(err.input, 42);
        assert_eq!(err.to_string(), "interaction `confirm` was not handled");
    }

    #[test]
    fn most_recent_handler_should_win() {
        let interaction: Interaction<(), &str> = Interaction::new("pick");
        let _first = interaction.register_handler(|ctx| ctx.set_output("first"));
        let _second = interaction.register_handler(|ctx| ctx.set_output("second"));

        assert_eq!(interaction.handle_blocking(()), Ok("second"));
    }

    #[test]
    fn guard_drop_should_remove_exactly_its_handler() {
        let interaction: Interaction<(), &str> = Interaction::new("pick");
        let _first = interaction.register_handler(|ctx| ctx.set_output("first"));
        let second = interaction.register_handler(|ctx| ctx.set_output("second"));
        assert_eq!(interaction.handler_count(), 2);

        drop(second);
        assert_eq!(interaction.handler_count(), 1);
        assert_eq!(interaction.handle_blocking(()), Ok("first"));
    }

    #[test]
    fn explicit_unregister_should_behave_like_drop() {
        let interaction: Interaction<(), &str> = Interaction::new("pick");
        let guard = interaction.register_handler(|ctx| ctx.set_output("only"));
        guard.unregister();
        assert_eq!(interaction.handler_count(), 0);
    }

    #[test]
    fn guard_should_outlive_mediator_safely() {
        let interaction: Interaction<(), ()> = Interaction::new("short-lived");
        let guard = interaction.register_handler(|ctx| ctx.set_output(()));
        drop(interaction);
        drop(guard); // chain is gone; must not panic
    }

    #[test]
    fn clones_should_share_one_chain() {
        let interaction: Interaction<(), &str> = Interaction::new("shared");
        let view_side = interaction.clone();
        let _guard = view_side.register_handler(|ctx| ctx.set_output("from-view"));

        assert_eq!(interaction.handle_blocking(()), Ok("from-view"));
    }

    #[tokio::test]
    async fn async_handler_should_resolve_or_decline() {
        let interaction: Interaction<bool, &str> = Interaction::new("maybe");
        let _fallback = interaction.register_handler(|ctx| ctx.set_output("fallback"));
        let _maybe = interaction
            .register_async_handler(|input| async move { input.then_some("resolved") });

        assert_eq!(interaction.handle(true).await, Ok("resolved"));
        assert_eq!(interaction.handle(false).await, Ok("fallback"));
    }

    #[tokio::test]
    async fn task_handler_should_always_respond() {
        let interaction: Interaction<u32, u32> = Interaction::new("double");
        let _guard = interaction.register_task_handler(|input| async move { input * 2 });
        assert_eq!(interaction.handle(21).await, Ok(42));
    }

    #[test]
    #[should_panic(expected = "already set")]
    fn double_set_output_in_handler_should_panic() {
        let interaction: Interaction<(), &str> = Interaction::new("buggy");
        let _guard = interaction.register_handler(|ctx| {
            ctx.set_output("once");
            ctx.set_output("twice");
        });
        let _ = interaction.handle_blocking(());
    }
}
