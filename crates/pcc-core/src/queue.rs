use crossbeam::queue::ArrayQueue;

/// A bounded, lock-free, multi-producer multi-consumer queue of owned
/// items.
///
/// This wraps `crossbeam::queue::ArrayQueue`: linearizable, non-blocking
/// `push`/`pop`, no ordering guarantee across distinct producers.
/// `offer`/`poll` hand back ownership of the item on failure (`Err(item)`
/// / `None`) rather than an out-parameter that gets nulled on success.
pub struct BoundedQueue<T> {
    inner: ArrayQueue<T>,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedQueue {
            inner: ArrayQueue::new(capacity),
        }
    }

    /// Attempt to enqueue `item`. Returns `Ok(())` on success; on failure
    /// (queue full) the item is handed back via `Err`.
    pub fn offer(&self, item: T) -> Result<(), T> {
        self.inner.push(item)
    }

    /// Attempt to dequeue one item. `None` if the queue was empty.
    pub fn poll(&self) -> Option<T> {
        self.inner.pop()
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }
}
