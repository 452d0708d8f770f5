//! Read-ahead staging buffer for Parquet cursors.

use crate::error::DecodeError;
use arrow_array::RecordBatch;

/// A bounded block holding one decoded batch of rows.
///
/// Rows are handed out in order. Once the last row has been taken the buffer
/// flags `needs_refill`; it never pulls the next batch itself, so at most one
/// batch is resident at a time.
#[derive(Debug)]
pub struct StagingBuffer {
    batch: Option<RecordBatch>,
    capacity: usize,
    position: usize,
    need_refill: bool,
    refills: usize,
}

impl StagingBuffer {
    /// Create an empty buffer that needs its first refill.
    pub fn new(capacity: usize) -> Self {
        Self {
            batch: None,
            capacity,
            position: 0,
            need_refill: true,
            refills: 0,
        }
    }

    /// Maximum rows held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn needs_refill(&self) -> bool {
        self.need_refill
    }

    /// Number of batches loaded so far. Borrowed views belong to one generation.
    pub fn refills(&self) -> usize {
        self.refills
    }

    /// Rows in the current batch.
    pub fn len(&self) -> usize {
        self.batch.as_ref().map_or(0, RecordBatch::num_rows)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows not yet taken from the current batch.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position)
    }

    /// Replace the contents with a freshly decoded batch.
    ///
    /// # Errors
    /// Returns `DecodeError::SchemaMismatch` if the batch exceeds the capacity
    pub fn load(&mut self, batch: RecordBatch) -> Result<(), DecodeError> {
        if batch.num_rows() > self.capacity {
            return Err(DecodeError::SchemaMismatch(format!(
                "batch of {} rows exceeds staging capacity {}",
                batch.num_rows(),
                self.capacity
            )));
        }
        self.need_refill = batch.num_rows() == 0;
        self.batch = Some(batch);
        self.position = 0;
        self.refills += 1;
        Ok(())
    }

    /// Take the index of the next row, flagging a refill once the batch is consumed.
    pub fn take_row(&mut self) -> Option<usize> {
        if self.position >= self.len() {
            self.need_refill = true;
            return None;
        }
        let row = self.position;
        self.position += 1;
        if self.position == self.len() {
            self.need_refill = true;
        }
        Some(row)
    }

    /// The batch rows are taken from.
    pub fn batch(&self) -> Option<&RecordBatch> {
        self.batch.as_ref()
    }

    /// Drop the current batch.
    pub fn clear(&mut self) {
        self.batch = None;
        self.position = 0;
    }
}
