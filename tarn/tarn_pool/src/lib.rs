#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Tarn Pool
//!
//! A fixed-capacity object pool for reusing short-lived instances across
//! concurrent workers.
//!
//! - `get` and `put` never block. An empty pool constructs a new instance
//!   (with `T::default()` unless a constructor is given); a full pool
//!   discards the instance.
//! - When a destructor is configured, every discarded instance is destroyed
//!   asynchronously in a task of its own.
//! - `close` drains the pool and returns a [`JoinHandle`] whose `wait`
//!   blocks until every destruction has finished.
//!
//! ```
//! use tarn_pool::{FixedPool, Pool, PoolOptions};
//!
//! let pool =
//!     FixedPool::new(16, PoolOptions::with_constructor(|| Vec::<u8>::with_capacity(1024))).unwrap();
//!
//! let mut buf = pool.get();
//! buf.extend_from_slice(b"payload");
//! pool.put(buf);
//!
//! pool.close().wait();
//! ```

/// Pool configuration and callbacks
pub mod config;

/// Construction errors
pub mod error;

/// The pool trait and its implementations
pub mod pool;

/// Asynchronous destruction of discarded instances
pub mod reclaim;

/// Pool statistics
pub mod stats;

/// Bounded concurrent storage for idle instances
pub mod store;

pub use config::{Constructor, Destructor, PoolConfig, PoolOptions};
pub use error::{PoolError, Result};
pub use pool::{FixedPool, Pool, Pooled, Reset, ResettingPool};
pub use reclaim::{JoinHandle, ReclaimSummary};
pub use stats::PoolStats;
pub use store::BoundedStore;
