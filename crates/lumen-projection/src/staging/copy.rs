//! Copy mode: eager snapshot of the whole range on every refresh.

use lumen_core::{AttributeAccessor, Scalar, SourceCollection};

use super::reserve_with_headroom;
use crate::buffer::ProjectionStats;
use crate::resolve::SlotResolver;

/// Dense owned copy of the projected range.
#[derive(Debug)]
pub(crate) struct CopyStage<T> {
    values: Vec<T>,
}

impl<T: Scalar> CopyStage<T> {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Re-read every component of every tuple, changed or not.
    pub(crate) fn refresh<A, C>(
        &mut self,
        resolver: &SlotResolver<'_, A, C>,
        tuples: usize,
        components: usize,
        stats: &mut ProjectionStats,
    ) where
        A: AttributeAccessor<Scalar = T>,
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        self.values.clear();
        reserve_with_headroom(&mut self.values, tuples * components);
        for tuple in 0..tuples {
            self.values.extend_from_slice(resolver.tuple(tuple));
        }
        stats.accessor_reads += tuples as u64;
    }

    #[inline]
    pub(crate) fn value(&self, idx: usize) -> T {
        self.values[idx]
    }

    pub(crate) fn memory_bytes(&self) -> usize {
        self.values.capacity() * std::mem::size_of::<T>()
    }
}
