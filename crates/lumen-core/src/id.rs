//! Strongly-typed identifiers and the [`Tuple`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies an attribute registered for an object type.
///
/// `AttributeId(n)` corresponds to the n-th attribute in the registry
/// handed to the exporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub u32);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AttributeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Simulation step counter as seen by the visualization layer.
///
/// One step that triggers a visualization pass is one refresh cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Index of a worker in a fork-join fan-out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Refresh generation of a projection buffer.
///
/// Incremented on every refresh. Cached slots stamped with an older
/// generation are treated as invalid, which invalidates a whole cache
/// in O(1). Generation 0 is never current, so freshly grown slots
/// stamped with 0 are always invalid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectionGeneration(pub u64);

impl ProjectionGeneration {
    /// The stamp carried by slots that have never been filled.
    pub const NEVER: Self = Self(0);

    /// The generation following this one, or `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ProjectionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The components of one tuple.
///
/// Uses `SmallVec<[T; 4]>` so scalars and 3-vectors (positions,
/// velocities) never touch the heap. Wider attributes spill transparently.
pub type Tuple<T> = SmallVec<[T; 4]>;
