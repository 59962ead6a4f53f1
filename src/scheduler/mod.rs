//! # Scheduler Abstraction
//!
//! Injectable scheduling seam for the interaction mediator.
//!
//! An [`Interaction`](crate::interaction::Interaction) configured with a
//! scheduler affinity marshals every handler invocation onto that scheduler
//! instead of running it on whatever context polled the `handle` future.
//! This allows two very different deployments behind one contract:
//!
//! - Production: [`TokioScheduler`] dispatches work onto the tokio runtime.
//! - Testing: [`TestScheduler`] queues work against a virtual clock that the
//!   test advances manually, making handler timing fully deterministic.
//!
//! The trait is deliberately tiny — a fire-and-forget job queue with an
//! optional delay — so that platform layers can supply their own (e.g. a UI
//! main-loop scheduler) without pulling in any of this crate's internals.

pub mod test_scheduler;
pub mod tokio_scheduler;

pub use test_scheduler::TestScheduler;
pub use tokio_scheduler::TokioScheduler;

use std::time::Duration;

use tokio::sync::oneshot;

/// One unit of work handed to a scheduler
pub type Job = Box<dyn FnOnce() + Send>;

/// A queue that runs jobs, now or after a delay
///
/// Implementations decide *where* and *when* jobs run; callers only get the
/// guarantee that each job runs at most once. A scheduler that is torn down
/// may drop queued jobs without running them.
pub trait Scheduler: Send + Sync {
    /// Enqueue a job to run as soon as the scheduler is able
    fn schedule(&self, job: Job);

    /// Enqueue a job to run once `delay` has elapsed on this scheduler's clock
    fn schedule_after(&self, delay: Duration, job: Job);
}

/// Wait until `after` has elapsed on the given scheduler's clock
///
/// This is the delay building block handlers use to defer their response:
/// against [`TokioScheduler`] it behaves like `tokio::time::sleep`, against
/// [`TestScheduler`] it resolves only once the test has advanced the virtual
/// clock past the deadline. If the scheduler is dropped with the timer still
/// queued, the future resolves immediately rather than hanging forever.
pub fn delay(scheduler: &dyn Scheduler, after: Duration) -> impl std::future::Future<Output = ()> {
    let (tx, rx) = oneshot::channel::<()>();
    scheduler.schedule_after(
        after,
        Box::new(move || {
            let _ = tx.send(());
        }),
    );
    async move {
        let _ = rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn delay_should_resolve_only_after_clock_advances() {
        let scheduler = TestScheduler::new();
        let mut fut = Box::pin(delay(&scheduler, Duration::from_millis(100)));

        assert!((&mut fut).now_or_never().is_none());

        scheduler.advance_by(Duration::from_millis(50));
        assert!((&mut fut).now_or_never().is_none());

        scheduler.advance_by(Duration::from_millis(50));
        assert!((&mut fut).now_or_never().is_some());
    }

    #[test]
    fn delay_should_not_hang_when_scheduler_is_dropped() {
        let scheduler = TestScheduler::new();
        let mut fut = Box::pin(delay(&scheduler, Duration::from_secs(5)));

        assert!((&mut fut).now_or_never().is_none());
        drop(scheduler);

        assert!((&mut fut).now_or_never().is_some());
    }
}
