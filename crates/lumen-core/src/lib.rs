//! Core types and traits for the Lumen attribute projection framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Lumen workspace:
//! identifiers, scalar and attribute descriptors, error types, and the
//! traits that decouple projections from the simulation that owns the data.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod error;
pub mod id;
pub mod scalar;
pub mod traits;

pub use attribute::{AttributeDef, AttributeSet, AttributeSetIter, AttributeType};
pub use error::ProjectionError;
pub use id::{AttributeId, ProjectionGeneration, StepId, Tuple, WorkerId};
pub use scalar::Scalar;
pub use traits::{AttributeAccessor, MemberAccessor, RandomAccessScalarView, SourceCollection};
