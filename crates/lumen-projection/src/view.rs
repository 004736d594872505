//! Read passes over a refreshed projection.

use std::ops::RangeInclusive;

use lumen_core::{
    AttributeAccessor, ProjectionError, RandomAccessScalarView, Scalar, SourceCollection, Tuple,
};

use crate::buffer::ProjectionBuffer;

/// A [`ProjectionBuffer`] bound to its source collection for one read pass.
///
/// Holds the buffer mutably (Cache mode memoizes on read) and the
/// collection shared. Drop the view to let the simulation mutate the
/// collection again.
pub struct ProjectionView<'a, A: AttributeAccessor, C: ?Sized> {
    buffer: &'a mut ProjectionBuffer<A>,
    collection: &'a C,
}

impl<'a, A, C> ProjectionView<'a, A, C>
where
    A: AttributeAccessor,
    C: SourceCollection<Object = A::Object> + ?Sized,
{
    pub(crate) fn new(buffer: &'a mut ProjectionBuffer<A>, collection: &'a C) -> Self {
        Self { buffer, collection }
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &ProjectionBuffer<A> {
        self.buffer
    }

    /// Checked read: `None` if `idx` is outside `[0, len)`.
    pub fn get(&mut self, idx: usize) -> Option<A::Scalar> {
        self.try_value_at(idx).ok()
    }

    /// Checked form of [`value_at`](RandomAccessScalarView::value_at).
    pub fn try_value_at(&mut self, idx: usize) -> Result<A::Scalar, ProjectionError> {
        let len = self.buffer.len();
        if idx >= len {
            return Err(ProjectionError::IndexOutOfRange { index: idx, len });
        }
        Ok(self.buffer.read_slot(self.collection, idx))
    }

    /// Checked tuple read.
    pub fn try_tuple_at(&mut self, tuple: usize) -> Result<Tuple<A::Scalar>, ProjectionError> {
        let tuples = self.buffer.tuple_count();
        if tuple >= tuples {
            return Err(ProjectionError::TupleOutOfRange { tuple, tuples });
        }
        Ok(self.tuple_at(tuple))
    }

    /// Tuple `tuple` widened to `f64`, for double-precision consumers.
    pub fn tuple_f64(&mut self, tuple: usize) -> Tuple<f64> {
        self.tuple_at(tuple).into_iter().map(Scalar::to_f64).collect()
    }

    /// First logical index `>= start` whose value equals `value`.
    ///
    /// A plain sequential scan through [`value_at`](RandomAccessScalarView::value_at);
    /// there is no lookup acceleration. Returns `None` when nothing matches.
    pub fn linear_search(&mut self, value: A::Scalar, start: usize) -> Option<usize> {
        (start..self.buffer.len()).find(|&idx| self.buffer.read_slot(self.collection, idx) == value)
    }

    /// Every logical index whose value equals `value`, ascending.
    pub fn lookup_all(&mut self, value: A::Scalar) -> Vec<usize> {
        let mut hits = Vec::new();
        let mut from = 0;
        while let Some(idx) = self.linear_search(value, from) {
            hits.push(idx);
            from = idx + 1;
        }
        hits
    }

    /// Copy the tuples listed in `tuple_ids` into `out`, back to back.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::OutputTooSmall`] if `out` cannot hold
    ///   `tuple_ids.len() * component_count` scalars.
    /// - [`ProjectionError::TupleOutOfRange`] for the first invalid id;
    ///   tuples before it have already been written.
    pub fn gather_tuples(
        &mut self,
        tuple_ids: &[usize],
        out: &mut [A::Scalar],
    ) -> Result<(), ProjectionError> {
        let n = self.buffer.component_count();
        let required = tuple_ids.len() * n;
        if out.len() < required {
            return Err(ProjectionError::OutputTooSmall {
                required,
                available: out.len(),
            });
        }
        let tuples = self.buffer.tuple_count();
        for (slot, &tuple) in tuple_ids.iter().enumerate() {
            if tuple >= tuples {
                return Err(ProjectionError::TupleOutOfRange { tuple, tuples });
            }
            for c in 0..n {
                out[slot * n + c] = self.buffer.read_slot(self.collection, tuple * n + c);
            }
        }
        Ok(())
    }

    /// Copy the inclusive tuple range `tuples` into `out`, which is laid
    /// out with `out_components` scalars per tuple.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::ComponentMismatch`] if `out_components` differs
    ///   from the projection's component count.
    /// - [`ProjectionError::TupleOutOfRange`] if the range ends past the
    ///   last tuple.
    /// - [`ProjectionError::OutputTooSmall`] if `out` is too short.
    pub fn copy_tuple_range(
        &mut self,
        tuples: RangeInclusive<usize>,
        out: &mut [A::Scalar],
        out_components: usize,
    ) -> Result<usize, ProjectionError> {
        let n = self.buffer.component_count();
        if out_components != n {
            return Err(ProjectionError::ComponentMismatch {
                expected: n,
                actual: out_components,
            });
        }
        if tuples.is_empty() {
            return Ok(0);
        }
        let (first, last) = tuples.into_inner();
        let tuple_count = self.buffer.tuple_count();
        if last >= tuple_count {
            return Err(ProjectionError::TupleOutOfRange {
                tuple: last,
                tuples: tuple_count,
            });
        }
        let copied = last - first + 1;
        let required = copied * n;
        if out.len() < required {
            return Err(ProjectionError::OutputTooSmall {
                required,
                available: out.len(),
            });
        }
        for (slot, idx) in (first * n..=last * n + n - 1).enumerate() {
            out[slot] = self.buffer.read_slot(self.collection, idx);
        }
        Ok(copied)
    }

    /// Append every value, widened to `f64`, to `out`.
    pub fn append_f64(&mut self, out: &mut Vec<f64>) {
        let len = self.buffer.len();
        out.reserve(len);
        for idx in 0..len {
            out.push(self.buffer.read_slot(self.collection, idx).to_f64());
        }
    }

    /// Collect every value in logical order.
    pub fn to_vec(&mut self) -> Vec<A::Scalar> {
        (0..self.buffer.len())
            .map(|idx| self.buffer.read_slot(self.collection, idx))
            .collect()
    }
}

impl<A, C> RandomAccessScalarView for ProjectionView<'_, A, C>
where
    A: AttributeAccessor,
    C: SourceCollection<Object = A::Object> + ?Sized,
{
    type Scalar = A::Scalar;

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn component_count(&self) -> usize {
        self.buffer.component_count()
    }

    fn tuple_count(&self) -> usize {
        self.buffer.tuple_count()
    }

    /// # Panics
    ///
    /// If `idx >= len()`. Out-of-range reads are caller bugs; no default
    /// value is ever substituted.
    #[inline]
    fn value_at(&mut self, idx: usize) -> A::Scalar {
        let len = self.buffer.len();
        assert!(
            idx < len,
            "projection '{}': index {idx} out of range for {len} values",
            self.buffer.name()
        );
        self.buffer.read_slot(self.collection, idx)
    }
}
