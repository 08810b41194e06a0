//! Fixed-capacity pool with a constructor and an optional destructor.

use super::Pool;
use crate::config::{Constructor, PoolConfig, PoolOptions};
use crate::error::Result;
use crate::reclaim::group::TaskGroup;
use crate::reclaim::worker::Reclaimer;
use crate::reclaim::JoinHandle;
use crate::stats::{PoolCounters, PoolStats};
use crate::store::BoundedStore;
use log::{debug, info, trace};
use std::fmt;

/// A pool holding at most `capacity` idle instances.
///
/// Instances that do not fit are discarded. If the pool was built with a
/// destructor, each discarded instance is destroyed on a reclaim thread of
/// its own; otherwise it is dropped.
///
/// `put` after `close` discards the instance the same way. `get` after
/// `close` always constructs.
///
/// Dropping a pool that was never closed closes it without waiting.
pub struct FixedPool<T: Send + 'static> {
    /// Idle instances
    store: BoundedStore<T>,

    /// Called by `get` on an empty pool
    constructor: Constructor<T>,

    /// Present only when a destructor was supplied
    reclaimer: Option<Reclaimer<T>>,

    /// In-flight destructions
    group: TaskGroup,

    /// Operation counters
    counters: PoolCounters,
}

impl<T: Send + 'static> FixedPool<T> {
    /// Create a pool that can hold `capacity` idle instances
    pub fn new(capacity: usize, options: PoolOptions<T>) -> Result<Self> {
        Self::with_config(PoolConfig::with_capacity(capacity), options)
    }

    /// Create a pool with the specified configuration
    pub fn with_config(config: PoolConfig, options: PoolOptions<T>) -> Result<Self> {
        config.validate()?;

        let group = TaskGroup::new();
        let reclaimer = options
            .destructor
            .map(|destructor| Reclaimer::new(&config, destructor, group.clone()));

        info!(
            "Creating pool with capacity {} (destructor: {})",
            config.capacity,
            reclaimer.is_some()
        );

        Ok(Self {
            store: BoundedStore::new(config.capacity),
            constructor: options.constructor,
            reclaimer,
            group,
            counters: PoolCounters::default(),
        })
    }

    /// Destroy an instance that left the pool
    fn discard(&self, instance: T) {
        match &self.reclaimer {
            Some(reclaimer) => reclaimer.schedule(instance),
            None => drop(instance),
        }
    }

    /// Maximum number of idle instances
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of idle instances currently held
    pub fn idle_count(&self) -> usize {
        self.store.len()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Get the current statistics for this pool
    pub fn stats(&self) -> PoolStats {
        let (summary, pending) = self.group.snapshot();
        let mut stats = PoolStats {
            capacity: self.store.capacity(),
            idle: self.store.len(),
            destroyed: summary.destroyed,
            panicked: summary.panicked,
            pending,
            ..Default::default()
        };
        self.counters.fill(&mut stats);
        stats
    }
}

impl<T: Send + 'static> Pool for FixedPool<T> {
    type Item = T;

    fn get(&self) -> T {
        if let Some(instance) = self.store.try_pop() {
            PoolCounters::bump(&self.counters.hits);
            return instance;
        }

        PoolCounters::bump(&self.counters.misses);
        (self.constructor)()
    }

    fn put(&self, instance: T) {
        match self.store.try_push(instance) {
            Ok(()) => PoolCounters::bump(&self.counters.stored),
            Err(instance) => {
                trace!("Pool full or closed, discarding instance");
                PoolCounters::bump(&self.counters.discarded);
                self.discard(instance);
            }
        }
    }

    fn close(&self) -> JoinHandle {
        match self.store.close() {
            Some(drained) => {
                info!("Closing pool, discarding {} idle instances", drained.len());
                for instance in drained {
                    PoolCounters::bump(&self.counters.drained);
                    self.discard(instance);
                }
            }
            None => debug!("Pool already closed"),
        }

        self.group.handle()
    }
}

impl<T: Send + 'static> Drop for FixedPool<T> {
    fn drop(&mut self) {
        if !self.store.is_closed() {
            self.close();
        }
    }
}

impl<T: Send + 'static> fmt::Debug for FixedPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedPool")
            .field("capacity", &self.store.capacity())
            .field("idle", &self.store.len())
            .field("closed", &self.store.is_closed())
            .field("destructor", &self.reclaimer.is_some())
            .finish()
    }
}
