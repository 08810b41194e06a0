//! Join tracking for asynchronous destruction tasks.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of the destruction tasks tracked by a pool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimSummary {
    /// Destructor invocations that returned normally
    pub destroyed: usize,

    /// Destructor invocations that panicked
    pub panicked: usize,
}

impl ReclaimSummary {
    /// Total destructor invocations that have finished
    pub fn total(&self) -> usize {
        self.destroyed + self.panicked
    }
}

#[derive(Debug, Default)]
struct GroupState {
    pending: usize,
    summary: ReclaimSummary,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<GroupState>,
    settled: Condvar,
}

/// Counts in-flight destruction tasks for one pool
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskGroup {
    shared: Arc<Shared>,
}

impl TaskGroup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a task. The task counts as pending until the guard finishes or drops.
    pub(crate) fn enter(&self) -> TaskGuard {
        self.shared.state.lock().pending += 1;
        TaskGuard {
            shared: Some(Arc::clone(&self.shared)),
        }
    }

    /// Outcome of the finished tasks and the number still pending, read
    /// under one lock so the two always describe the same moment
    pub(crate) fn snapshot(&self) -> (ReclaimSummary, usize) {
        let state = self.shared.state.lock();
        (state.summary, state.pending)
    }

    /// Handle that waits for every task of this group
    pub(crate) fn handle(&self) -> JoinHandle {
        JoinHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Membership of a single task in a [`TaskGroup`]
#[derive(Debug)]
pub(crate) struct TaskGuard {
    shared: Option<Arc<Shared>>,
}

impl TaskGuard {
    /// Mark the task finished, recording whether it panicked
    pub(crate) fn finish(mut self, panicked: bool) {
        self.settle(Some(panicked));
    }

    fn settle(&mut self, outcome: Option<bool>) {
        let Some(shared) = self.shared.take() else {
            return;
        };

        let mut state = shared.state.lock();
        state.pending -= 1;
        match outcome {
            Some(true) => state.summary.panicked += 1,
            Some(false) => state.summary.destroyed += 1,
            None => {}
        }
        if state.pending == 0 {
            shared.settled.notify_all();
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        // A task dropped without running still has to release waiters
        self.settle(None);
    }
}

/// Handle returned by `close`, used to wait for outstanding destructions.
///
/// Waiting covers every destruction the pool has scheduled, including ones
/// scheduled after the handle was created.
#[derive(Debug, Clone)]
pub struct JoinHandle {
    shared: Arc<Shared>,
}

impl JoinHandle {
    /// Block until no destruction task is pending
    pub fn wait(&self) -> ReclaimSummary {
        let mut state = self.shared.state.lock();
        while state.pending > 0 {
            self.shared.settled.wait(&mut state);
        }
        state.summary
    }

    /// Block until no destruction task is pending or the timeout elapses.
    ///
    /// Returns `None` on timeout. A timeout too large to represent as an
    /// `Instant` waits without a deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<ReclaimSummary> {
        let mut state = self.shared.state.lock();
        if state.pending == 0 {
            return Some(state.summary);
        }

        let Some(deadline) = Instant::now().checked_add(timeout) else {
            drop(state);
            return Some(self.wait());
        };

        while state.pending > 0 {
            if self
                .shared
                .settled
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return if state.pending == 0 {
                    Some(state.summary)
                } else {
                    None
                };
            }
        }
        Some(state.summary)
    }

    /// Whether every scheduled destruction has finished
    pub fn is_finished(&self) -> bool {
        self.shared.state.lock().pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_with_no_tasks() {
        let group = TaskGroup::new();
        let handle = group.handle();
        assert!(handle.is_finished());
        assert_eq!(handle.wait(), ReclaimSummary::default());
    }

    #[test]
    fn test_wait_blocks_until_tasks_finish() {
        let group = TaskGroup::new();
        let guards: Vec<_> = (0..4).map(|_| group.enter()).collect();
        assert_eq!(group.snapshot().1, 4);

        let handle = group.handle();
        assert!(!handle.is_finished());

        let worker = thread::spawn(move || {
            for (i, guard) in guards.into_iter().enumerate() {
                thread::sleep(Duration::from_millis(5));
                guard.finish(i == 0);
            }
        });

        let summary = handle.wait();
        assert_eq!(summary.destroyed, 3);
        assert_eq!(summary.panicked, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(group.snapshot().1, 0);

        worker.join().unwrap();
    }

    #[test]
    fn test_dropped_guard_releases_waiters() {
        let group = TaskGroup::new();
        let guard = group.enter();
        drop(guard);

        assert!(group.handle().is_finished());
        assert_eq!(group.snapshot().0.total(), 0);
    }

    #[test]
    fn test_wait_timeout() {
        let group = TaskGroup::new();
        let guard = group.enter();
        let handle = group.handle();

        assert!(handle.wait_timeout(Duration::from_millis(20)).is_none());

        guard.finish(false);
        let summary = handle.wait_timeout(Duration::from_millis(20)).unwrap();
        assert_eq!(summary.destroyed, 1);
    }

    #[test]
    fn test_wait_timeout_max_duration() {
        let group = TaskGroup::new();
        let handle = group.handle();
        assert_eq!(
            handle.wait_timeout(Duration::MAX),
            Some(ReclaimSummary::default())
        );

        let guard = group.enter();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            guard.finish(false);
        });

        let summary = handle.wait_timeout(Duration::MAX).unwrap();
        assert_eq!(summary.destroyed, 1);
        worker.join().unwrap();
    }

    #[test]
    fn test_snapshot_is_consistent() {
        const TASKS: usize = 2000;

        let group = TaskGroup::new();
        let guards: Vec<_> = (0..TASKS).map(|_| group.enter()).collect();

        let worker = thread::spawn(move || {
            for (i, guard) in guards.into_iter().enumerate() {
                guard.finish(i % 3 == 0);
            }
        });

        // Every task is either pending or counted, never both or neither
        loop {
            let (summary, pending) = group.snapshot();
            assert_eq!(summary.total() + pending, TASKS);
            if pending == 0 {
                break;
            }
        }

        worker.join().unwrap();
    }
}
