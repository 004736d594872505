//! Read-only, mode-switchable projections of simulation object attributes.
//!
//! A [`ProjectionBuffer`] exposes one attribute of an externally owned
//! object collection as a flat, randomly indexable run of scalars, for
//! consumption by columnar tooling (visualization, export).
//!
//! # Architecture
//!
//! ```text
//! ProjectionBuffer<A: AttributeAccessor>
//! ├── accessor (object -> &[scalar; N])
//! ├── range [start, end) into the source collection
//! └── Staging (one strategy per mode)
//!     ├── ZeroCopy: every read goes to the accessor
//!     ├── Copy:     dense buffer repopulated on refresh
//!     └── Cache:    dense buffer + per-slot generation stamps, lazy fill
//!
//! ProjectionView<'a> = buffer bound to a collection for one read pass
//! ChunkPlan          = static [start, end) split across P workers
//! ColumnProjection   = object-safe face for heterogeneous columns
//! ```
//!
//! Index mapping is shared by all modes: logical index `idx` is component
//! `idx % N` of tuple `idx / N`, and tuple `t` is object `start + t`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod column;
pub mod mode;
pub mod partition;
mod readonly;
mod resolve;
mod staging;
pub mod view;

pub use buffer::{ProjectionBuffer, ProjectionStats};
pub use column::ColumnProjection;
pub use mode::ProjectionMode;
pub use partition::ChunkPlan;
pub use view::ProjectionView;
