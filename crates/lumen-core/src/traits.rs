//! Core abstraction traits for reaching simulation data and exposing it.

use std::fmt;
use std::marker::PhantomData;

use crate::id::Tuple;
use crate::scalar::Scalar;

/// An ordered, indexable sequence of simulation objects owned elsewhere.
///
/// Projections never own or mutate the collection; they borrow it for the
/// duration of a refresh or a read pass.
pub trait SourceCollection {
    /// The object (or object handle) type stored in the collection.
    type Object;

    /// Number of objects in the collection.
    fn len(&self) -> usize;

    /// Returns `true` if the collection holds no objects.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The object at `index`. Panics if `index >= len()`.
    fn object(&self, index: usize) -> &Self::Object;
}

impl<O> SourceCollection for [O] {
    type Object = O;

    fn len(&self) -> usize {
        <[O]>::len(self)
    }

    fn object(&self, index: usize) -> &O {
        &self[index]
    }
}

impl<O> SourceCollection for Vec<O> {
    type Object = O;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn object(&self, index: usize) -> &O {
        &self[index]
    }
}

/// Reads one fixed-width attribute out of a simulation object.
///
/// Bound once per attribute. Implementations perform no bounds checking;
/// the returned slice must hold at least [`component_count`](Self::component_count)
/// scalars for as long as the object is borrowed.
pub trait AttributeAccessor {
    /// Object type the accessor reads from.
    type Object;
    /// Element type of the attribute.
    type Scalar: Scalar;

    /// Number of scalars per object.
    fn component_count(&self) -> usize;

    /// The attribute's components for `object`.
    fn read<'a>(&self, object: &'a Self::Object) -> &'a [Self::Scalar];
}

/// An [`AttributeAccessor`] backed by a plain function pointer.
///
/// This is how an attribute's location inside the object layout is bound:
/// the function projects the object onto the member's storage.
///
/// ```
/// use lumen_core::{AttributeAccessor, MemberAccessor};
///
/// struct Cell {
///     position: [f64; 3],
/// }
///
/// fn position(cell: &Cell) -> &[f64] {
///     &cell.position
/// }
///
/// let position = MemberAccessor::new(3, position);
/// let cell = Cell { position: [1.0, 2.0, 3.0] };
/// assert_eq!(position.component_count(), 3);
/// assert_eq!(position.read(&cell), &[1.0, 2.0, 3.0]);
/// ```
pub struct MemberAccessor<O, T> {
    component_count: usize,
    read: fn(&O) -> &[T],
    _object: PhantomData<fn(&O)>,
}

impl<O, T> MemberAccessor<O, T> {
    /// Bind an accessor reading `component_count` scalars via `read`.
    pub fn new(component_count: usize, read: fn(&O) -> &[T]) -> Self {
        Self {
            component_count,
            read,
            _object: PhantomData,
        }
    }
}

impl<O, T> Clone for MemberAccessor<O, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, T> Copy for MemberAccessor<O, T> {}

impl<O, T> fmt::Debug for MemberAccessor<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccessor")
            .field("component_count", &self.component_count)
            .finish_non_exhaustive()
    }
}

impl<O, T: Scalar> AttributeAccessor for MemberAccessor<O, T> {
    type Object = O;
    type Scalar = T;

    fn component_count(&self) -> usize {
        self.component_count
    }

    #[inline]
    fn read<'a>(&self, object: &'a O) -> &'a [T] {
        (self.read)(object)
    }
}

/// A flat, 0-indexed, read-only sequence of scalars with a tuple shape.
///
/// This is the narrow capability a columnar consumer needs. Adapters to a
/// specific consumer library are written against this trait only.
/// Reads take `&mut self` because some implementations memoize.
pub trait RandomAccessScalarView {
    /// Element type of the view.
    type Scalar: Scalar;

    /// Logical number of scalars (`component_count * tuple_count`).
    fn len(&self) -> usize;

    /// Returns `true` if the view exposes no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalars per tuple.
    fn component_count(&self) -> usize;

    /// Number of tuples.
    fn tuple_count(&self) -> usize {
        self.len() / self.component_count()
    }

    /// Value at logical index `idx`. Panics if `idx >= len()`.
    fn value_at(&mut self, idx: usize) -> Self::Scalar;

    /// All components of tuple `tuple`, in component order.
    fn tuple_at(&mut self, tuple: usize) -> Tuple<Self::Scalar> {
        let n = self.component_count();
        (0..n).map(|c| self.value_at(tuple * n + c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Agent {
        mass: f32,
        velocity: [f32; 2],
    }

    #[test]
    fn slice_and_vec_collections_agree() {
        let v = vec![1u32, 2, 3];
        assert_eq!(SourceCollection::len(&v), 3);
        assert_eq!(*SourceCollection::object(&v[..], 2), 3);
        assert!(!SourceCollection::is_empty(&v));
        let empty: Vec<u32> = Vec::new();
        assert!(SourceCollection::is_empty(&empty));
    }

    #[test]
    fn member_accessor_reads_members() {
        fn mass_of(a: &Agent) -> &[f32] {
            std::slice::from_ref(&a.mass)
        }
        fn velocity_of(a: &Agent) -> &[f32] {
            &a.velocity
        }
        let mass = MemberAccessor::new(1, mass_of);
        let velocity = MemberAccessor::new(2, velocity_of);
        let agent = Agent {
            mass: 2.5,
            velocity: [0.5, -1.0],
        };
        assert_eq!(mass.read(&agent), &[2.5]);
        assert_eq!(velocity.read(&agent), &[0.5, -1.0]);
        let copy = velocity;
        assert_eq!(copy.component_count(), 2);
    }
}
