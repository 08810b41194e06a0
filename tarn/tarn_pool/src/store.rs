//! Fixed-capacity concurrent storage for idle instances.
//!
//! Backed by a bounded crossbeam channel. Neither insertion nor removal ever
//! blocks: a full store hands the instance back, an empty store yields `None`.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;

/// A bounded, closable multiset of idle instances
pub struct BoundedStore<T> {
    /// Intake side. `None` once the store is closed.
    intake: RwLock<Option<Sender<T>>>,

    /// Idle instances waiting to be handed out
    idle: Receiver<T>,

    /// Maximum number of idle instances
    capacity: usize,
}

impl<T> BoundedStore<T> {
    /// Create an empty store holding at most `capacity` instances
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            intake: RwLock::new(Some(sender)),
            idle: receiver,
            capacity,
        }
    }

    /// Insert an instance without blocking.
    ///
    /// The instance is handed back if the store is full or closed.
    pub fn try_push(&self, instance: T) -> Result<(), T> {
        let intake = self.intake.read();
        match intake.as_ref() {
            Some(sender) => sender.try_send(instance).map_err(TrySendError::into_inner),
            None => Err(instance),
        }
    }

    /// Remove an arbitrary idle instance without blocking
    pub fn try_pop(&self) -> Option<T> {
        self.idle.try_recv().ok()
    }

    /// Close the store to further intake and take every idle instance.
    ///
    /// Returns `None` if the store was already closed.
    pub fn close(&self) -> Option<Vec<T>> {
        // Dropping the sender under the write lock orders the close after
        // every in-flight push, so nothing can land in the store afterwards.
        let sender = self.intake.write().take()?;
        drop(sender);

        Some(self.idle.try_iter().collect())
    }

    /// Whether the store has been closed
    pub fn is_closed(&self) -> bool {
        self.intake.read().is_none()
    }

    /// Number of idle instances currently held
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    /// Whether the store holds no idle instance
    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    /// Maximum number of idle instances
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
