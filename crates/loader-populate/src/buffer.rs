//! Fixed-capacity row buffer.

use loader_core::Row;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Default number of rows per batch write.
pub const DEFAULT_BATCH_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => panic!("default batch capacity must be non-zero"),
};

/// Returned by [`BatchBuffer::push`] when the buffer is already full.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Batch buffer is full (capacity {capacity})")]
pub struct BufferFull {
    pub capacity: usize,
}

/// Accumulates rows for one container until a batch is ready.
///
/// The buffer never holds more than `capacity` rows. Draining hands the
/// pending rows to the caller and leaves the buffer empty.
#[derive(Debug)]
pub struct BatchBuffer {
    capacity: NonZeroUsize,
    rows: Vec<Row>,
}

impl BatchBuffer {
    /// Create an empty buffer.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            rows: Vec::new(),
        }
    }

    /// Add a row. Rejected without storing it when the buffer is full.
    pub fn push(&mut self, row: Row) -> Result<(), BufferFull> {
        if self.is_full() {
            return Err(BufferFull {
                capacity: self.capacity.get(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// True iff the buffer holds exactly `capacity` rows.
    pub fn is_full(&self) -> bool {
        self.rows.len() == self.capacity.get()
    }

    /// Take every pending row, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    /// Number of pending rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are pending.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum number of pending rows.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for BatchBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_CAPACITY)
    }
}
