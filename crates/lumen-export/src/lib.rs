//! Visualization export built on Lumen projections.
//!
//! A [`VisualizationAdaptor`] owns one [`ObjectGrid`] per simulation
//! object type. On every export step it refreshes each grid's projections
//! across a fixed set of workers, optionally hands the assembled frame to
//! a shared [`InsituProcessor`], and writes one piece file per worker plus
//! a piece index. At the end of the run it writes a
//! [`SimulationInfo`] sidecar and can invoke an external state generator.
//!
//! # Output layout
//!
//! ```text
//! {output_dir}/
//! ├── {grid}-{step}_{worker}.json   one piece per worker
//! ├── {grid}-{step}.pindex          piece list for the step
//! └── simulation_info.json          written by finish()
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adaptor;
pub mod config;
pub mod error;
pub mod grid;
pub mod metadata;
pub mod metrics;
pub mod piece;
pub mod processor;
mod state;

pub use adaptor::{ObjectSource, VisualizationAdaptor};
pub use config::{ConfigError, ExportConfig, StateCommand};
pub use error::ExportError;
pub use grid::ObjectGrid;
pub use metadata::{AttributeInfo, GridInfo, SimulationInfo, SIMULATION_INFO_FILE};
pub use metrics::ExportMetrics;
pub use piece::{expand_piece_list, Piece, PieceColumn};
pub use processor::{Frame, FrameGrid, InsituProcessor, ProcessorHandle};
