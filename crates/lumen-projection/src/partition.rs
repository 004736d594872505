//! Static partitioning of a collection across workers.
//!
//! The `[0, len)` domain is cut into `workers` contiguous chunks of
//! `ceil(len / workers)` objects. Trailing workers get empty ranges when
//! `len` does not fill every chunk. There is no rebalancing.

use std::ops::Range;

use lumen_core::{ProjectionError, WorkerId};

/// A fixed split of `[0, len)` into one contiguous range per worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    len: usize,
    workers: usize,
    chunk_size: usize,
}

impl ChunkPlan {
    /// Plan a split of `len` objects over `workers` workers.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::NoWorkers`] if `workers == 0`.
    pub fn new(len: usize, workers: usize) -> Result<Self, ProjectionError> {
        if workers == 0 {
            return Err(ProjectionError::NoWorkers);
        }
        Ok(Self {
            len,
            workers,
            chunk_size: len.div_ceil(workers),
        })
    }

    /// Objects being split.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there is nothing to split.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// `ceil(len / workers)`.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The `[start, end)` range owned by `worker`.
    ///
    /// # Panics
    ///
    /// If `worker >= workers()`.
    pub fn range_for(&self, worker: usize) -> Range<usize> {
        assert!(
            worker < self.workers,
            "worker {worker} out of range for a plan of {} workers",
            self.workers
        );
        let start = (worker * self.chunk_size).min(self.len);
        let end = (start + self.chunk_size).min(self.len);
        start..end
    }

    /// Every worker's range, in worker order.
    pub fn ranges(&self) -> impl Iterator<Item = (WorkerId, Range<usize>)> + '_ {
        (0..self.workers).map(|w| (WorkerId(w as u32), self.range_for(w)))
    }

    /// The worker whose range contains `index`, if `index < len`.
    pub fn worker_of(&self, index: usize) -> Option<usize> {
        (index < self.len).then(|| index / self.chunk_size)
    }
}
