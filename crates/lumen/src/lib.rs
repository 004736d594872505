//! Lumen: read-only attribute projections of simulation objects.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Lumen sub-crates. For most users, adding `lumen` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lumen::prelude::*;
//!
//! struct Cell {
//!     position: [f64; 3],
//! }
//!
//! fn position(cell: &Cell) -> &[f64] {
//!     &cell.position
//! }
//!
//! let mut cells: Vec<Cell> = (0..4)
//!     .map(|i| Cell { position: [i as f64, 0.0, 0.0] })
//!     .collect();
//!
//! let mut projection =
//!     ProjectionBuffer::new("position", ProjectionMode::Cache, MemberAccessor::new(3, position))
//!         .unwrap();
//!
//! // One refresh per visualization pass; reads bind the collection.
//! projection.refresh(&cells, 1, 3).unwrap();
//! assert_eq!(projection.view(&cells).tuple_at(1).as_slice(), &[2.0, 0.0, 0.0]);
//!
//! // Between passes the simulation owns its objects again.
//! cells[2].position[0] = 9.0;
//! projection.refresh(&cells, 1, 3).unwrap();
//! assert_eq!(projection.view(&cells).value_at(3), 9.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lumen-core` | IDs, scalars, attribute descriptors, errors, core traits |
//! | [`projection`] | `lumen-projection` | `ProjectionBuffer`, modes, views, partitioning |
//! | [`export`] | `lumen-export` | Grids, pieces, metadata sidecar, in-situ hand-off |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`lumen-core`).
///
/// Contains the [`types::SourceCollection`], [`types::AttributeAccessor`]
/// and [`types::RandomAccessScalarView`] traits that decouple projections
/// from the simulation.
pub use lumen_core as types;

/// Projection buffers (`lumen-projection`).
///
/// [`projection::ProjectionBuffer`] in one of three
/// [`projection::ProjectionMode`]s, read through a
/// [`projection::ProjectionView`].
pub use lumen_projection as projection;

/// Visualization export (`lumen-export`).
///
/// [`export::VisualizationAdaptor`] drives per-step export of
/// [`export::ObjectGrid`]s.
pub use lumen_export as export;

/// Common imports for typical Lumen usage.
///
/// ```rust
/// use lumen::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use lumen_core::{
        AttributeAccessor, AttributeDef, AttributeId, AttributeSet, AttributeType,
        MemberAccessor, RandomAccessScalarView, Scalar, SourceCollection, StepId,
    };

    // Errors
    pub use lumen_core::ProjectionError;
    pub use lumen_export::{ConfigError, ExportError};

    // Projection
    pub use lumen_projection::{ChunkPlan, ColumnProjection, ProjectionBuffer, ProjectionMode};

    // Export
    pub use lumen_export::{
        ExportConfig, ExportMetrics, InsituProcessor, ObjectGrid, ObjectSource, ProcessorHandle,
        StateCommand, VisualizationAdaptor,
    };
}
