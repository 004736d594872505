//! Zero-copy mode: forward every read to the source.

use lumen_core::{AttributeAccessor, SourceCollection};

use crate::buffer::ProjectionStats;
use crate::resolve::SlotResolver;

/// Zero-copy staging holds no storage.
#[derive(Debug, Default)]
pub(crate) struct ZeroCopyStage;

impl ZeroCopyStage {
    #[inline]
    pub(crate) fn value<A, C>(
        &self,
        resolver: &SlotResolver<'_, A, C>,
        idx: usize,
        stats: &mut ProjectionStats,
    ) -> A::Scalar
    where
        A: AttributeAccessor,
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        stats.accessor_reads += 1;
        resolver.value(idx)
    }
}
