//! Object pools.
//!
//! - [`FixedPool`]: a fixed-capacity pool with a constructor and optional destructor
//! - [`ResettingPool`]: a decorator that resets every instance on `put`
//!
//! Both implement the [`Pool`] trait, so decorators can be stacked over any
//! pool implementation.

pub mod fixed;
pub mod resetting;

use crate::reclaim::JoinHandle;
use std::fmt;
use std::ops::{Deref, DerefMut};

pub use fixed::FixedPool;
pub use resetting::{Reset, ResettingPool};

/// A concurrent pool of reusable instances.
///
/// `get` and `put` never block. `close` drains the pool and returns a handle
/// to wait for the destruction of every discarded instance.
pub trait Pool: Send + Sync {
    /// Type of the pooled instances
    type Item: Send + 'static;

    /// Take an instance from the pool.
    ///
    /// Falls back to the pool's constructor when the pool is empty.
    fn get(&self) -> Self::Item;

    /// Return an instance to the pool.
    ///
    /// If the pool is full or closed the instance is discarded, and destroyed
    /// asynchronously if the pool has a destructor.
    fn put(&self, instance: Self::Item);

    /// Close the pool and discard every idle instance.
    ///
    /// Closing twice is a no-op that returns another handle on the same
    /// destructions.
    fn close(&self) -> JoinHandle;

    /// Take an instance wrapped in a guard that puts it back on drop
    fn checkout(&self) -> Pooled<'_, Self>
    where
        Self: Sized,
    {
        Pooled::new(self.get(), self)
    }
}

/// A handle to a pooled instance that returns it to the pool when dropped
pub struct Pooled<'a, P: Pool> {
    /// The pooled instance
    instance: Option<P::Item>,

    /// The pool this instance goes back to
    pool: &'a P,
}

impl<'a, P: Pool> Pooled<'a, P> {
    fn new(instance: P::Item, pool: &'a P) -> Self {
        Self {
            instance: Some(instance),
            pool,
        }
    }

    /// Take the instance out without returning it to the pool
    pub fn detach(mut self) -> P::Item {
        self.instance.take().expect("Instance missing")
    }
}

impl<P: Pool> Deref for Pooled<'_, P> {
    type Target = P::Item;

    fn deref(&self) -> &Self::Target {
        self.instance.as_ref().expect("Instance missing")
    }
}

impl<P: Pool> DerefMut for Pooled<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance.as_mut().expect("Instance missing")
    }
}

impl<P: Pool> Drop for Pooled<'_, P> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.pool.put(instance);
        }
    }
}

impl<P: Pool> fmt::Debug for Pooled<'_, P>
where
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "Pooled({:?})", instance),
            None => write!(f, "Pooled(returned)"),
        }
    }
}
