//! Pool statistics.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of a pool's counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Maximum number of idle instances
    pub capacity: usize,

    /// Idle instances currently held
    pub idle: usize,

    /// `get` calls served from the pool
    pub hits: usize,

    /// `get` calls that had to construct an instance
    pub misses: usize,

    /// `put` calls that stored the instance
    pub stored: usize,

    /// `put` calls that discarded the instance (pool full or closed)
    pub discarded: usize,

    /// Instances taken out of the pool by `close`
    pub drained: usize,

    /// Destructor invocations that completed
    pub destroyed: usize,

    /// Destructor invocations that panicked
    pub panicked: usize,

    /// Destructions scheduled but not yet finished
    pub pending: usize,
}

impl PoolStats {
    /// Fraction of `get` calls served from the pool (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Live counters updated by pool operations
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub(crate) hits: AtomicUsize,
    pub(crate) misses: AtomicUsize,
    pub(crate) stored: AtomicUsize,
    pub(crate) discarded: AtomicUsize,
    pub(crate) drained: AtomicUsize,
}

impl PoolCounters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the operation counters into a stats snapshot
    pub(crate) fn fill(&self, stats: &mut PoolStats) {
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats.stored = self.stored.load(Ordering::Relaxed);
        stats.discarded = self.discarded.load(Ordering::Relaxed);
        stats.drained = self.drained.load(Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = PoolStats {
            hits: 75,
            misses: 25,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < 0.001);
        assert_eq!(PoolStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_counters_fill() {
        let counters = PoolCounters::default();
        PoolCounters::bump(&counters.hits);
        PoolCounters::bump(&counters.hits);
        PoolCounters::bump(&counters.discarded);

        let mut stats = PoolStats::default();
        counters.fill(&mut stats);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.misses, 0);
    }
}
