//! The write half of the array surface, rejected wholesale.
//!
//! Columnar consumers expect a full array interface. A projection is a
//! view over data the simulation owns, so every write-style operation
//! reports [`ProjectionError::ReadOnly`], leaves the buffer untouched and
//! logs a warning. `squeeze` and `clear_lookup` have nothing to release and
//! succeed silently.

use lumen_core::{AttributeAccessor, ProjectionError};
use tracing::warn;

use crate::buffer::ProjectionBuffer;

impl<A: AttributeAccessor> ProjectionBuffer<A> {
    fn reject(&self, operation: &'static str) -> ProjectionError {
        warn!(projection = %self.name(), operation, "read only container");
        ProjectionError::ReadOnly { operation }
    }

    /// Rejected: overwrite the value at `idx`.
    pub fn set_value(&self, _idx: usize, _value: A::Scalar) -> Result<(), ProjectionError> {
        Err(self.reject("set_value"))
    }

    /// Rejected: insert a value at `idx`, growing the array if needed.
    pub fn insert_value(&self, _idx: usize, _value: A::Scalar) -> Result<(), ProjectionError> {
        Err(self.reject("insert_value"))
    }

    /// Rejected: append a value, returning its index.
    pub fn insert_next_value(&self, _value: A::Scalar) -> Result<usize, ProjectionError> {
        Err(self.reject("insert_next_value"))
    }

    /// Rejected: overwrite tuple `tuple`.
    pub fn set_tuple(&self, _tuple: usize, _values: &[A::Scalar]) -> Result<(), ProjectionError> {
        Err(self.reject("set_tuple"))
    }

    /// Rejected: insert a tuple at `tuple`.
    pub fn insert_tuple(
        &self,
        _tuple: usize,
        _values: &[A::Scalar],
    ) -> Result<(), ProjectionError> {
        Err(self.reject("insert_tuple"))
    }

    /// Rejected: append a tuple, returning its tuple index.
    pub fn insert_next_tuple(&self, _values: &[A::Scalar]) -> Result<usize, ProjectionError> {
        Err(self.reject("insert_next_tuple"))
    }

    /// Rejected.
    pub fn remove_tuple(&self, _tuple: usize) -> Result<(), ProjectionError> {
        Err(self.reject("remove_tuple"))
    }

    /// Rejected.
    pub fn remove_first_tuple(&self) -> Result<(), ProjectionError> {
        Err(self.reject("remove_first_tuple"))
    }

    /// Rejected.
    pub fn remove_last_tuple(&self) -> Result<(), ProjectionError> {
        Err(self.reject("remove_last_tuple"))
    }

    /// Rejected: change the tuple count. The range only moves on refresh.
    pub fn resize(&self, _tuples: usize) -> Result<(), ProjectionError> {
        Err(self.reject("resize"))
    }

    /// Rejected.
    pub fn set_tuple_count(&self, _tuples: usize) -> Result<(), ProjectionError> {
        Err(self.reject("set_tuple_count"))
    }

    /// Rejected: preallocate `size` scalars.
    pub fn allocate(&self, _size: usize) -> Result<(), ProjectionError> {
        Err(self.reject("allocate"))
    }

    /// Rejected: replace contents with `values`.
    pub fn deep_copy_from(&self, _values: &[A::Scalar]) -> Result<(), ProjectionError> {
        Err(self.reject("deep_copy_from"))
    }

    /// Rejected: write a weighted blend of `sources` into tuple `dst`.
    pub fn interpolate_tuple(
        &self,
        _dst: usize,
        _sources: &[usize],
        _weights: &[f64],
    ) -> Result<(), ProjectionError> {
        Err(self.reject("interpolate_tuple"))
    }

    /// No-op. Owned storage is sized by refresh.
    pub fn squeeze(&self) {}

    /// No-op. There is no lookup structure to clear.
    pub fn clear_lookup(&self) {}
}
