//! Object-safe face of a projection, for grids with mixed scalar types.

use lumen_core::{AttributeAccessor, ProjectionError, Scalar};

use crate::buffer::{ProjectionBuffer, ProjectionStats};
use crate::mode::ProjectionMode;

/// A projection over objects of type `O`, with its scalar type erased.
///
/// An export grid holds one boxed column per attribute. Values leave the
/// column widened to `f64`.
pub trait ColumnProjection<O>: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Scalars per tuple.
    fn component_count(&self) -> usize;

    /// Name of the underlying scalar type (`"f64"`, `"u32"`, ...).
    fn scalar_type(&self) -> &'static str;

    /// Projection mode.
    fn mode(&self) -> ProjectionMode;

    /// Logical size of the current range.
    fn len(&self) -> usize;

    /// Returns `true` if the current range is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access counters.
    fn stats(&self) -> &ProjectionStats;

    /// Rebind to `objects[start..end]`. See [`ProjectionBuffer::refresh`].
    fn refresh(&mut self, objects: &[O], start: usize, end: usize) -> Result<(), ProjectionError>;

    /// Append every value in the current range, widened to `f64`.
    ///
    /// # Panics
    ///
    /// If `objects` is shorter than the refreshed range.
    fn append_f64(&mut self, objects: &[O], out: &mut Vec<f64>);

    /// A fresh, unrefreshed column with the same configuration.
    fn fork_boxed(&self) -> Box<dyn ColumnProjection<O>>;
}

impl<O, A> ColumnProjection<O> for ProjectionBuffer<A>
where
    A: AttributeAccessor<Object = O> + Clone + Send + 'static,
    O: 'static,
{
    fn name(&self) -> &str {
        ProjectionBuffer::name(self)
    }

    fn component_count(&self) -> usize {
        ProjectionBuffer::component_count(self)
    }

    fn scalar_type(&self) -> &'static str {
        <A::Scalar as Scalar>::TYPE_NAME
    }

    fn mode(&self) -> ProjectionMode {
        ProjectionBuffer::mode(self)
    }

    fn len(&self) -> usize {
        ProjectionBuffer::len(self)
    }

    fn stats(&self) -> &ProjectionStats {
        ProjectionBuffer::stats(self)
    }

    fn refresh(&mut self, objects: &[O], start: usize, end: usize) -> Result<(), ProjectionError> {
        ProjectionBuffer::refresh(self, objects, start, end)
    }

    fn append_f64(&mut self, objects: &[O], out: &mut Vec<f64>) {
        self.view(objects).append_f64(out);
    }

    fn fork_boxed(&self) -> Box<dyn ColumnProjection<O>> {
        Box::new(self.fork())
    }
}
