//! Value-access modes.

use std::fmt;

/// How a projection trades memory for staleness tolerance.
///
/// Fixed when the buffer is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProjectionMode {
    /// Every read is forwarded to the accessor. No buffering, no
    /// memoization; suited to consumers that touch each slot once.
    #[default]
    ZeroCopy,
    /// Every refresh eagerly copies the whole range into an owned buffer.
    /// Reads never reach the source until the next refresh.
    Copy,
    /// Values are pulled lazily on first read after a refresh and memoized
    /// until the next refresh.
    Cache,
}

impl ProjectionMode {
    /// Whether the mode keeps an owned buffer proportional to the range.
    pub fn owns_storage(self) -> bool {
        !matches!(self, Self::ZeroCopy)
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCopy => write!(f, "zero-copy"),
            Self::Copy => write!(f, "copy"),
            Self::Cache => write!(f, "cache"),
        }
    }
}
