//! Error types for projection buffers.
//!
//! Precondition violations on the hot read path panic; this enum covers
//! the checked entry points, configuration-time failures, and the
//! read-only rejections of the mutation surface.

use std::error::Error;
use std::fmt;

/// Errors from constructing, refreshing, or reading a projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    /// An accessor declared fewer than one component per tuple.
    InvalidComponentCount {
        /// Display name of the projection being built.
        name: String,
        /// The declared component count.
        count: usize,
    },
    /// A refresh range does not satisfy `start <= end <= len`.
    RangeOutOfBounds {
        /// Requested range start.
        start: usize,
        /// Requested range end (exclusive).
        end: usize,
        /// Length of the source collection.
        len: usize,
    },
    /// A logical index is outside `[0, logical_size)`.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Logical size of the projection.
        len: usize,
    },
    /// A tuple index is outside `[0, tuple_count)`.
    TupleOutOfRange {
        /// The offending tuple index.
        tuple: usize,
        /// Number of tuples in the projection.
        tuples: usize,
    },
    /// A destination's component count differs from the projection's.
    ComponentMismatch {
        /// Components per tuple in the projection.
        expected: usize,
        /// Components per tuple in the destination.
        actual: usize,
    },
    /// A caller-provided output buffer is too small.
    OutputTooSmall {
        /// Number of scalars required.
        required: usize,
        /// Number of scalars available.
        available: usize,
    },
    /// A write-style operation was attempted on the read-only view.
    ReadOnly {
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// A partition was requested with zero workers.
    NoWorkers,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidComponentCount { name, count } => {
                write!(f, "projection '{name}': component count must be >= 1, got {count}")
            }
            Self::RangeOutOfBounds { start, end, len } => {
                write!(f, "range [{start}, {end}) out of bounds for collection of {len}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for projection of {len} values")
            }
            Self::TupleOutOfRange { tuple, tuples } => {
                write!(f, "tuple {tuple} out of range for projection of {tuples} tuples")
            }
            Self::ComponentMismatch { expected, actual } => {
                write!(f, "component mismatch: projection has {expected}, destination has {actual}")
            }
            Self::OutputTooSmall {
                required,
                available,
            } => {
                write!(f, "output buffer too small: {available} < {required}")
            }
            Self::ReadOnly { operation } => {
                write!(f, "read only container: {operation} is not supported")
            }
            Self::NoWorkers => write!(f, "partition requires at least one worker"),
        }
    }
}

impl Error for ProjectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_message_names_operation() {
        let err = ProjectionError::ReadOnly {
            operation: "insert_value",
        };
        let msg = err.to_string();
        assert!(msg.contains("read only container"), "got: {msg}");
        assert!(msg.contains("insert_value"), "got: {msg}");
    }

    #[test]
    fn range_message_is_half_open() {
        let err = ProjectionError::RangeOutOfBounds {
            start: 2,
            end: 9,
            len: 5,
        };
        assert_eq!(err.to_string(), "range [2, 9) out of bounds for collection of 5");
    }
}
