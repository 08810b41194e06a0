//! Destruction tasks for discarded instances.
//!
//! Every discard runs on its own named thread, so a destructor that blocks
//! (or waits on another destruction) never holds up the rest, and scheduling
//! never blocks the caller of `put` or `close`.

use super::group::{TaskGroup, TaskGuard};
use crate::config::{Destructor, PoolConfig};
use log::{error, trace};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// A discarded instance waiting for its destructor
struct Discard<T> {
    /// The instance to destroy
    instance: T,

    /// Membership in the pool's task group
    guard: TaskGuard,

    /// When the discard was scheduled
    scheduled_at: Instant,
}

/// Spawns one destruction task per discarded instance of a pool
pub(crate) struct Reclaimer<T: Send + 'static> {
    destructor: Destructor<T>,

    /// Join tracking shared with the pool
    group: TaskGroup,

    /// Name prefix for task threads
    prefix: String,

    /// Tasks spawned so far, used to number thread names
    spawned: AtomicUsize,
}

impl<T: Send + 'static> Reclaimer<T> {
    pub(crate) fn new(config: &PoolConfig, destructor: Destructor<T>, group: TaskGroup) -> Self {
        Self {
            destructor,
            group,
            prefix: config.thread_name_prefix.clone(),
            spawned: AtomicUsize::new(0),
        }
    }

    /// Start destroying `instance` in a task of its own
    pub(crate) fn schedule(&self, instance: T) {
        let discard = Discard {
            instance,
            guard: self.group.enter(),
            scheduled_at: Instant::now(),
        };

        // Kept outside the closure so a failed spawn can still reach it
        let slot = Arc::new(Mutex::new(Some(discard)));
        let task = Arc::clone(&slot);
        let destructor = Arc::clone(&self.destructor);

        let id = self.spawned.fetch_add(1, Ordering::Relaxed);
        let spawned = thread::Builder::new()
            .name(format!("{}-{}", self.prefix, id))
            .spawn(move || {
                let discard = task.lock().take();
                if let Some(discard) = discard {
                    trace!(
                        "Reclaim task {}: destroying instance (scheduled {:.2}ms ago)",
                        id,
                        discard.scheduled_at.elapsed().as_micros() as f64 / 1000.0
                    );
                    Self::destroy(&destructor, discard);
                }
            });

        if let Err(e) = spawned {
            error!("Failed to spawn reclaim task {}: {}, destroying inline", id, e);
            let discard = slot.lock().take();
            if let Some(discard) = discard {
                Self::destroy(&self.destructor, discard);
            }
        }
    }

    /// Run the destructor, containing any panic to this task
    fn destroy(destructor: &Destructor<T>, discard: Discard<T>) {
        let Discard {
            instance, guard, ..
        } = discard;

        let result = panic::catch_unwind(AssertUnwindSafe(|| destructor(instance)));

        if let Err(e) = &result {
            let message = e
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| e.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<unknown panic>");
            error!("Destructor panicked: {}", message);
        }

        guard.finish(result.is_err());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::time::Duration;

    fn reclaimer<T: Send + 'static>(
        prefix: &str,
        destructor: Destructor<T>,
        group: &TaskGroup,
    ) -> Reclaimer<T> {
        let config = PoolConfig {
            capacity: 0,
            thread_name_prefix: prefix.to_string(),
        };
        Reclaimer::new(&config, destructor, group.clone())
    }

    #[test]
    fn test_destructor_runs_on_named_thread() {
        let names = Arc::new(Mutex::new(Vec::new()));
        let names_clone = Arc::clone(&names);
        let destructor: Destructor<u32> = Arc::new(move |_: u32| {
            let name = thread::current().name().unwrap_or_default().to_string();
            names_clone.lock().push(name);
        });

        let group = TaskGroup::new();
        let reclaimer = reclaimer("test-reclaim", destructor, &group);

        for i in 0..10 {
            reclaimer.schedule(i);
        }

        let summary = group.handle().wait();
        assert_eq!(summary.destroyed, 10);

        let mut names = names.lock().clone();
        assert!(names.iter().all(|n| n.starts_with("test-reclaim-")));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_destructor_panic_is_contained() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let destroyed_clone = Arc::clone(&destroyed);
        let destructor: Destructor<u32> = Arc::new(move |v: u32| {
            if v % 2 == 0 {
                panic!("cannot destroy {}", v);
            }
            destroyed_clone.fetch_add(1, Ordering::SeqCst);
        });

        let group = TaskGroup::new();
        let reclaimer = reclaimer("test-panic", destructor, &group);

        for i in 0..6 {
            reclaimer.schedule(i);
        }

        let summary = group.handle().wait();
        assert_eq!(summary.panicked, 3);
        assert_eq!(summary.destroyed, 3);
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_destructions_run_concurrently() {
        // Each destruction blocks until the other one has started
        let barrier = Arc::new(Barrier::new(2));
        let destructor: Destructor<u32> = Arc::new(move |_: u32| {
            barrier.wait();
        });

        let group = TaskGroup::new();
        let reclaimer = reclaimer("test-rendezvous", destructor, &group);
        reclaimer.schedule(1);
        reclaimer.schedule(2);

        let summary = group.handle().wait_timeout(Duration::from_secs(5));
        assert_eq!(summary.map(|s| s.destroyed), Some(2));
    }

    #[test]
    fn test_tasks_finish_after_reclaimer_drop() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let destroyed_clone = Arc::clone(&destroyed);
        let destructor: Destructor<u32> = Arc::new(move |_: u32| {
            thread::sleep(Duration::from_millis(1));
            destroyed_clone.fetch_add(1, Ordering::SeqCst);
        });

        let group = TaskGroup::new();
        let reclaimer = reclaimer("test-drop", destructor, &group);
        for i in 0..20 {
            reclaimer.schedule(i);
        }
        drop(reclaimer);

        group.handle().wait();
        assert_eq!(destroyed.load(Ordering::SeqCst), 20);
    }
}
