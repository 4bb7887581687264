use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::chunk::ChunkBuffer;
use crate::queue::BoundedQueue;
use crate::scalar::Scalar;

/// A lot of rows are expected to flow through; the queue is sized
/// generously so back-pressure is the exception, not the norm.
pub const DEFAULT_ROW_CAPACITY: usize = 100_000;
/// Chunks are big; the chunk queue is not expected to grow much.
pub const DEFAULT_CHUNK_CAPACITY: usize = 100;
pub const DEFAULT_ROWS_PER_CHUNK: usize = 100;

/// The object shared by every worker and the orchestrator for the
/// duration of a run: the two pipeline queues, plus the phase-transition
/// atomics that let workers agree when input, parsing, and accumulation
/// are each complete without ever blocking on a condition variable.
pub struct QueueHub<T> {
    pub rows: BoundedQueue<Vec<String>>,
    pub chunks: BoundedQueue<ChunkBuffer<T>>,
    rows_per_chunk: usize,
    worker_count: usize,
    end_of_input: AtomicBool,
    finished_parsers: AtomicUsize,
    finished_accumulators: AtomicUsize,
}

impl<T: Scalar> QueueHub<T> {
    pub fn new(worker_count: usize, rows_per_chunk: Option<usize>) -> Self {
        Self::with_capacities(
            worker_count,
            rows_per_chunk,
            DEFAULT_ROW_CAPACITY,
            DEFAULT_CHUNK_CAPACITY,
        )
    }

    /// Used by tests exercising back-pressure liveness with a tiny chunk
    /// queue.
    pub fn with_capacities(
        worker_count: usize,
        rows_per_chunk: Option<usize>,
        row_capacity: usize,
        chunk_capacity: usize,
    ) -> Self {
        QueueHub {
            rows: BoundedQueue::new(row_capacity),
            chunks: BoundedQueue::new(chunk_capacity),
            rows_per_chunk: rows_per_chunk.unwrap_or(DEFAULT_ROWS_PER_CHUNK),
            worker_count,
            end_of_input: AtomicBool::new(false),
            finished_parsers: AtomicUsize::new(0),
            finished_accumulators: AtomicUsize::new(0),
        }
    }

    pub fn rows_per_chunk(&self) -> usize {
        self.rows_per_chunk
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// The reader has produced every row; set once, monotonically.
    pub fn set_end_of_input(&self) {
        self.end_of_input.store(true, Ordering::Release);
    }

    pub fn is_end_of_input(&self) -> bool {
        self.end_of_input.load(Ordering::Acquire)
    }

    /// Called once by a worker after it observes end-of-input, drains the
    /// row queue, and offers any partial chunk.
    pub fn mark_parser_finished(&self) {
        self.finished_parsers.fetch_add(1, Ordering::AcqRel);
    }

    /// True once every worker has latched its parse guard — the only safe
    /// condition under which a worker may latch its compute guard on an
    /// empty chunk queue.
    pub fn all_parsers_finished(&self) -> bool {
        self.finished_parsers.load(Ordering::Acquire) == self.worker_count
    }

    pub fn mark_accumulator_finished(&self) {
        self.finished_accumulators.fetch_add(1, Ordering::AcqRel);
    }

    pub fn all_accumulators_finished(&self) -> bool {
        self.finished_accumulators.load(Ordering::Acquire) == self.worker_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_parsers_latches_at_worker_count() {
        let hub: QueueHub<f64> = QueueHub::new(3, None);
        assert!(!hub.all_parsers_finished());
        hub.mark_parser_finished();
        hub.mark_parser_finished();
        assert!(!hub.all_parsers_finished());
        hub.mark_parser_finished();
        assert!(hub.all_parsers_finished());
    }

    #[test]
    fn end_of_input_is_monotonic_once_set() {
        let hub: QueueHub<f64> = QueueHub::new(1, None);
        assert!(!hub.is_end_of_input());
        hub.set_end_of_input();
        assert!(hub.is_end_of_input());
    }

    #[test]
    fn rows_per_chunk_defaults_when_unset() {
        let hub: QueueHub<f64> = QueueHub::new(1, None);
        assert_eq!(hub.rows_per_chunk(), DEFAULT_ROWS_PER_CHUNK);
        let hub: QueueHub<f64> = QueueHub::new(1, Some(7));
        assert_eq!(hub.rows_per_chunk(), 7);
    }
}
