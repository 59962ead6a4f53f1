//! Test Scheduler Implementation
//!
//! Deterministic scheduler backed by a virtual clock, allowing tests to
//! control exactly when (and whether) scheduled work runs. Nothing executes
//! until the test pumps the queue or advances the clock, which is what makes
//! the mediator's scheduler-affinity contract testable: a `handle` call can
//! be polled to "pending", the clock advanced, and the result observed — all
//! on one thread, with no real time involved.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{Job, Scheduler};

struct Timer {
    due: Duration,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct Inner {
    now: Duration,
    seq: u64,
    ready: VecDeque<Job>,
    timers: Vec<Timer>,
}

/// Scheduler driven manually by the test
///
/// Immediate jobs queue until [`run_until_idle`](Self::run_until_idle) (or any
/// clock advance) pumps them. Delayed jobs fire in `(due, scheduling order)`
/// order once [`advance_by`](Self::advance_by) moves the virtual clock past
/// their deadline. Jobs still queued when the scheduler is dropped never run.
#[derive(Default)]
pub struct TestScheduler {
    inner: Mutex<Inner>,
}

impl TestScheduler {
    /// Create a scheduler with an empty queue and the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.inner.lock().unwrap().now
    }

    /// Number of jobs waiting, immediate and delayed combined
    pub fn pending_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.ready.len() + inner.timers.len()
    }

    /// Run queued immediate jobs until none remain
    ///
    /// Jobs scheduled by a running job are picked up in the same pump, so a
    /// chain of immediate reschedules drains completely. Delayed jobs are not
    /// touched.
    pub fn run_until_idle(&self) {
        loop {
            let job = self.inner.lock().unwrap().ready.pop_front();
            match job {
                Some(job) => job(),
                None => break,
            }
        }
    }

    /// Advance the virtual clock, firing due timers, then pump the queue
    pub fn advance_by(&self, duration: Duration) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.now += duration;
            let now = inner.now;

            let (mut due, remaining): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut inner.timers)
                .into_iter()
                .partition(|timer| timer.due <= now);
            inner.timers = remaining;

            due.sort_by_key(|timer| (timer.due, timer.seq));
            for timer in due {
                inner.ready.push_back(timer.job);
            }
        }
        self.run_until_idle();
    }
}

impl Scheduler for TestScheduler {
    fn schedule(&self, job: Job) {
        self.inner.lock().unwrap().ready.push_back(job);
    }

    fn schedule_after(&self, delay: Duration, job: Job) {
        let mut inner = self.inner.lock().unwrap();
        if delay.is_zero() {
            inner.ready.push_back(job);
            return;
        }
        let due = inner.now + delay;
        let seq = inner.seq;
        inner.seq += 1;
        inner.timers.push(Timer { due, seq, job });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn record(log: &Arc<Mutex<Vec<&'static str>>>, entry: &'static str) -> Job {
        let log = log.clone();
        Box::new(move || log.lock().unwrap().push(entry))
    }

    #[test]
    fn jobs_should_not_run_until_pumped() {
        let scheduler = TestScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule(record(&log, "a"));
        scheduler.schedule(record(&log, "b"));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(scheduler.pending_count(), 2);

        scheduler.run_until_idle();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn jobs_scheduled_by_jobs_should_run_in_same_pump() {
        let scheduler = Arc::new(TestScheduler::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_job = record(&log, "inner");
        let scheduler_clone = scheduler.clone();
        let log_clone = log.clone();
        scheduler.schedule(Box::new(move || {
            log_clone.lock().unwrap().push("outer");
            scheduler_clone.schedule(inner_job);
        }));

        scheduler.run_until_idle();
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn timers_should_fire_in_due_then_scheduling_order() {
        let scheduler = TestScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule_after(Duration::from_millis(20), record(&log, "late"));
        scheduler.schedule_after(Duration::from_millis(10), record(&log, "early-1"));
        scheduler.schedule_after(Duration::from_millis(10), record(&log, "early-2"));

        scheduler.advance_by(Duration::from_millis(5));
        assert!(log.lock().unwrap().is_empty());

        scheduler.advance_by(Duration::from_millis(30));
        assert_eq!(*log.lock().unwrap(), vec!["early-1", "early-2", "late"]);
    }

    #[test]
    fn zero_delay_should_behave_like_immediate() {
        let scheduler = TestScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule_after(Duration::ZERO, record(&log, "now"));
        scheduler.run_until_idle();
        assert_eq!(*log.lock().unwrap(), vec!["now"]);
    }

    #[test]
    fn clock_should_accumulate_across_advances() {
        let scheduler = TestScheduler::new();
        scheduler.advance_by(Duration::from_millis(40));
        scheduler.advance_by(Duration::from_millis(60));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
    }
}
