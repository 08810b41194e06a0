//! Asynchronous reclamation of discarded instances.
//!
//! Instances that do not fit in a pool, or that are drained by `close`, are
//! handed to a [`worker`] that runs the pool's destructor on a thread of its
//! own. Every such task is tracked by a [`group`] so that `close` can
//! return a [`JoinHandle`] that waits for all of them.

pub mod group;
pub(crate) mod worker;

pub use group::{JoinHandle, ReclaimSummary};
