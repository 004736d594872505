//! Cache mode: lazy fill, memoized until the next refresh.
//!
//! Each slot carries the generation it was filled in. A refresh bumps the
//! current generation, which invalidates every slot at once without
//! touching the buffer. A miss reads the live value, stores it, and stamps
//! the slot with the current generation.

use lumen_core::{AttributeAccessor, ProjectionGeneration, Scalar, SourceCollection};

use super::reserve_with_headroom;
use crate::buffer::ProjectionStats;
use crate::resolve::SlotResolver;

/// Dense owned buffer with per-slot validity stamps.
#[derive(Debug)]
pub(crate) struct CacheStage<T> {
    values: Vec<T>,
    stamps: Vec<ProjectionGeneration>,
    current: ProjectionGeneration,
}

impl<T: Scalar> CacheStage<T> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            stamps: Vec::new(),
            current: ProjectionGeneration::NEVER,
        }
    }

    pub(crate) fn generation(&self) -> ProjectionGeneration {
        self.current
    }

    /// Start a new generation sized for `len` slots. Performs no reads.
    pub(crate) fn refresh(&mut self, len: usize) {
        self.current = match self.current.next() {
            Some(next) => next,
            None => {
                // Counter exhausted: clear stamps so no old slot can alias.
                self.stamps.fill(ProjectionGeneration::NEVER);
                ProjectionGeneration(1)
            }
        };
        reserve_with_headroom(&mut self.values, len);
        reserve_with_headroom(&mut self.stamps, len);
        self.values.resize(len, T::ZERO);
        self.stamps.resize(len, ProjectionGeneration::NEVER);
    }

    #[inline]
    pub(crate) fn value<A, C>(
        &mut self,
        resolver: &SlotResolver<'_, A, C>,
        idx: usize,
        stats: &mut ProjectionStats,
    ) -> T
    where
        A: AttributeAccessor<Scalar = T>,
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        if self.stamps[idx] == self.current {
            stats.cache_hits += 1;
            return self.values[idx];
        }
        stats.accessor_reads += 1;
        let value = resolver.value(idx);
        self.values[idx] = value;
        self.stamps[idx] = self.current;
        value
    }

    pub(crate) fn memory_bytes(&self) -> usize {
        self.values.capacity() * std::mem::size_of::<T>()
            + self.stamps.capacity() * std::mem::size_of::<ProjectionGeneration>()
    }

    #[cfg(test)]
    pub(crate) fn force_generation(&mut self, generation: ProjectionGeneration) {
        self.current = generation;
    }
}
