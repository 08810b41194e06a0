//! Pool decorator that resets instances before they re-enter the pool.

use super::{FixedPool, Pool};
use crate::config::{PoolConfig, PoolOptions};
use crate::error::Result;
use crate::reclaim::JoinHandle;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Types that can be restored to a clean logical state.
///
/// Implementations should clear content while keeping allocated capacity,
/// so that a reused instance does not have to grow again.
pub trait Reset {
    /// Restore the instance to its initial logical state
    fn reset(&mut self);
}

impl<T> Reset for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl Reset for String {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V, S: BuildHasher> Reset for HashMap<K, V, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<R: Reset + ?Sized> Reset for Box<R> {
    fn reset(&mut self) {
        (**self).reset();
    }
}

/// A pool that calls [`Reset::reset`] on every instance passed to `put`.
///
/// The reset runs on the caller's thread before the instance is handed to
/// the wrapped pool, whether it ends up stored or discarded. `get` and
/// `close` are passed through unchanged.
#[derive(Debug)]
pub struct ResettingPool<P> {
    inner: P,
}

impl<T> ResettingPool<FixedPool<T>>
where
    T: Reset + Send + 'static,
{
    /// Create a resetting [`FixedPool`] that can hold `capacity` idle instances
    pub fn new(capacity: usize, options: PoolOptions<T>) -> Result<Self> {
        Ok(Self::wrap(FixedPool::new(capacity, options)?))
    }

    /// Create a resetting [`FixedPool`] with the specified configuration
    pub fn with_config(config: PoolConfig, options: PoolOptions<T>) -> Result<Self> {
        Ok(Self::wrap(FixedPool::with_config(config, options)?))
    }
}

impl<P> ResettingPool<P>
where
    P: Pool,
    P::Item: Reset,
{
    /// Wrap an existing pool
    pub fn wrap(inner: P) -> Self {
        Self { inner }
    }

    /// The wrapped pool
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwrap into the wrapped pool
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P> Pool for ResettingPool<P>
where
    P: Pool,
    P::Item: Reset,
{
    type Item = P::Item;

    fn get(&self) -> Self::Item {
        self.inner.get()
    }

    fn put(&self, mut instance: Self::Item) {
        instance.reset();
        self.inner.put(instance);
    }

    fn close(&self) -> JoinHandle {
        self.inner.close()
    }
}
