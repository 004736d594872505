//! Logical index to source value resolution.

use lumen_core::{AttributeAccessor, SourceCollection};

/// Resolves logical indices of a projection against a borrowed collection.
pub(crate) struct SlotResolver<'a, A, C: ?Sized> {
    accessor: &'a A,
    collection: &'a C,
    start: usize,
    components: usize,
}

impl<'a, A, C> SlotResolver<'a, A, C>
where
    A: AttributeAccessor,
    C: SourceCollection<Object = A::Object> + ?Sized,
{
    pub(crate) fn new(accessor: &'a A, collection: &'a C, start: usize, components: usize) -> Self {
        Self {
            accessor,
            collection,
            start,
            components,
        }
    }

    /// All components of tuple `tuple`, live from the source object.
    #[inline]
    pub(crate) fn tuple(&self, tuple: usize) -> &'a [A::Scalar] {
        let object = self.collection.object(self.start + tuple);
        let data = self.accessor.read(object);
        debug_assert!(
            data.len() >= self.components,
            "accessor returned {} components, expected {}",
            data.len(),
            self.components
        );
        &data[..self.components]
    }

    /// The live value behind logical index `idx`.
    #[inline]
    pub(crate) fn value(&self, idx: usize) -> A::Scalar {
        if self.components == 1 {
            return self.tuple(idx)[0];
        }
        self.tuple(idx / self.components)[idx % self.components]
    }
}
