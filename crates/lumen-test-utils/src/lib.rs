//! Test utilities and mock types for Lumen development.
//!
//! Provides a [`MockCell`] simulation object, ready-made accessors for its
//! attributes, and a [`CountingCollection`] that records how often the
//! projection under test touches the source.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::CountingCollection;

use lumen_core::MemberAccessor;

/// Accessor type for `f64` attributes of [`MockCell`].
pub type CellAccessor = MemberAccessor<MockCell, f64>;

/// A minimal agent with one attribute of each shape the projections see.
#[derive(Clone, Debug, PartialEq)]
pub struct MockCell {
    pub id: u64,
    pub position: [f64; 3],
    pub diameter: f64,
    pub cell_type: u32,
}

impl MockCell {
    pub fn new(id: u64, position: [f64; 3], diameter: f64) -> Self {
        Self {
            id,
            position,
            diameter,
            cell_type: 0,
        }
    }

    /// One cell per diameter, ids `0..n`, all at the origin.
    pub fn with_diameters(diameters: &[f64]) -> Vec<Self> {
        diameters
            .iter()
            .enumerate()
            .map(|(i, &d)| Self::new(i as u64, [0.0; 3], d))
            .collect()
    }

    /// `n` unit cells spaced along the x axis: cell `i` sits at `[i, 0, 0]`.
    pub fn grid_line(n: usize) -> Vec<Self> {
        (0..n)
            .map(|i| Self::new(i as u64, [i as f64, 0.0, 0.0], 1.0))
            .collect()
    }

    pub fn with_type(mut self, cell_type: u32) -> Self {
        self.cell_type = cell_type;
        self
    }
}

fn read_diameter(cell: &MockCell) -> &[f64] {
    std::slice::from_ref(&cell.diameter)
}

fn read_position(cell: &MockCell) -> &[f64] {
    &cell.position
}

fn read_id(cell: &MockCell) -> &[u64] {
    std::slice::from_ref(&cell.id)
}

fn read_cell_type(cell: &MockCell) -> &[u32] {
    std::slice::from_ref(&cell.cell_type)
}

/// Scalar accessor for [`MockCell::diameter`].
pub fn diameter_accessor() -> CellAccessor {
    MemberAccessor::new(1, read_diameter)
}

/// Three-component accessor for [`MockCell::position`].
pub fn position_accessor() -> CellAccessor {
    MemberAccessor::new(3, read_position)
}

/// Scalar accessor for [`MockCell::id`].
pub fn id_accessor() -> MemberAccessor<MockCell, u64> {
    MemberAccessor::new(1, read_id)
}

/// Scalar accessor for [`MockCell::cell_type`].
pub fn cell_type_accessor() -> MemberAccessor<MockCell, u32> {
    MemberAccessor::new(1, read_cell_type)
}
