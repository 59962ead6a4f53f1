//! Tokio-backed Scheduler
//!
//! Production scheduler implementation that dispatches jobs onto the current
//! tokio runtime. This is the default choice for applications that already
//! run their event loop on tokio.

use std::time::Duration;

use super::{Job, Scheduler};

/// Scheduler that spawns jobs onto the ambient tokio runtime
///
/// Requires a runtime to be active when jobs are scheduled (the usual state
/// of affairs inside `#[tokio::main]` / `#[tokio::test]`). Delayed jobs are
/// backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, job: Job) {
        tokio::spawn(async move {
            job();
        });
    }

    fn schedule_after(&self, delay: Duration, job: Job) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    #[tokio::test]
    async fn schedule_should_run_job_on_runtime() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let scheduler = TokioScheduler::new();
        scheduler.schedule(Box::new(move || {
            ran_clone.store(true, Ordering::SeqCst);
        }));

        tokio::task::yield_now().await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_after_should_respect_delay() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let scheduler = TokioScheduler::new();
        scheduler.schedule_after(
            Duration::from_secs(1),
            Box::new(move || {
                ran_clone.store(true, Ordering::SeqCst);
            }),
        );
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert!(!ran.load(Ordering::SeqCst));

        tokio::time::advance(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
