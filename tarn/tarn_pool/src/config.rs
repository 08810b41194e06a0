//! Pool configuration.
//!
//! [`PoolConfig`] holds the plain, serializable settings of a pool.
//! [`PoolOptions`] holds the constructor and optional destructor closures,
//! which cannot be serialized and are supplied in code.

use crate::error::{PoolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default number of idle instances a pool holds
pub const DEFAULT_CAPACITY: usize = 64;

/// Default name prefix for reclaim task threads
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "tarn-reclaim";

/// Shared constructor invoked by `get` on an empty pool
pub type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Shared destructor invoked on a reclaim task for every discarded instance
pub type Destructor<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Configuration for a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle instances kept in the pool
    pub capacity: usize,

    /// Name prefix for reclaim task threads, which are numbered per pool
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Check that the configuration can be used to build a pool
    pub fn validate(&self) -> Result<()> {
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::InvalidConfig(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }

        // std::thread::Builder panics on interior NUL bytes
        if self.thread_name_prefix.contains('\0') {
            return Err(PoolError::InvalidConfig(
                "thread_name_prefix must not contain NUL bytes".to_string(),
            ));
        }

        Ok(())
    }
}

/// Callbacks controlling how instances are created and destroyed.
///
/// [`PoolOptions::new`] builds instances with `T::default()`.
/// [`PoolOptions::with_constructor`] accepts any `T`, including resource
/// handles that have no default value.
pub struct PoolOptions<T> {
    /// Called by `get` when the pool is empty
    pub(crate) constructor: Constructor<T>,

    /// Called for every discarded instance, on a reclaim task.
    /// Without it discarded instances are simply dropped.
    pub(crate) destructor: Option<Destructor<T>>,
}

impl<T: Default + 'static> PoolOptions<T> {
    /// Options constructing with `T::default()` and without a destructor
    pub fn new() -> Self {
        Self {
            constructor: Arc::new(T::default),
            destructor: None,
        }
    }
}

impl<T> PoolOptions<T> {
    /// Options constructing with `f` and without a destructor
    pub fn with_constructor<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            constructor: Arc::new(f),
            destructor: None,
        }
    }

    /// Replace the constructor used when the pool has no idle instance
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Arc::new(f);
        self
    }

    /// Set the destructor run for every discarded instance.
    ///
    /// Each discard is destroyed on a thread of its own, possibly several at
    /// once, so it must be safe to call concurrently with itself and with
    /// pool traffic.
    pub fn destructor<F>(mut self, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.destructor = Some(Arc::new(f));
        self
    }

    /// Whether a destructor is set
    pub fn has_destructor(&self) -> bool {
        self.destructor.is_some()
    }
}

impl<T: Default + 'static> Default for PoolOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PoolOptions<T> {
    fn clone(&self) -> Self {
        Self {
            constructor: Arc::clone(&self.constructor),
            destructor: self.destructor.clone(),
        }
    }
}

impl<T> fmt::Debug for PoolOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolOptions")
            .field("destructor", &self.has_destructor())
            .finish_non_exhaustive()
    }
}
