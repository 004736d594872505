//! Per-mode staging strategies.
//!
//! Each mode owns its storage and its refresh/read contract. The buffer
//! dispatches on [`Staging`] once per call; the strategies never fall
//! through into each other.

mod cache;
mod copy;
mod zero_copy;

pub(crate) use cache::CacheStage;
pub(crate) use copy::CopyStage;
pub(crate) use zero_copy::ZeroCopyStage;

use lumen_core::{ProjectionGeneration, Scalar};

use crate::mode::ProjectionMode;

/// Storage and policy for one projection mode.
#[derive(Debug)]
pub(crate) enum Staging<T> {
    ZeroCopy(ZeroCopyStage),
    Copy(CopyStage<T>),
    Cache(CacheStage<T>),
}

impl<T: Scalar> Staging<T> {
    pub(crate) fn for_mode(mode: ProjectionMode) -> Self {
        match mode {
            ProjectionMode::ZeroCopy => Self::ZeroCopy(ZeroCopyStage),
            ProjectionMode::Copy => Self::Copy(CopyStage::new()),
            ProjectionMode::Cache => Self::Cache(CacheStage::new()),
        }
    }

    pub(crate) fn mode(&self) -> ProjectionMode {
        match self {
            Self::ZeroCopy(_) => ProjectionMode::ZeroCopy,
            Self::Copy(_) => ProjectionMode::Copy,
            Self::Cache(_) => ProjectionMode::Cache,
        }
    }

    /// Current cache generation; `NEVER` for modes without one.
    pub(crate) fn generation(&self) -> ProjectionGeneration {
        match self {
            Self::Cache(stage) => stage.generation(),
            _ => ProjectionGeneration::NEVER,
        }
    }

    /// Bytes held by owned storage.
    pub(crate) fn memory_bytes(&self) -> usize {
        match self {
            Self::ZeroCopy(_) => 0,
            Self::Copy(stage) => stage.memory_bytes(),
            Self::Cache(stage) => stage.memory_bytes(),
        }
    }
}

/// Grow `buf` so it can hold `len` elements, with 50% headroom.
///
/// Ranges fluctuate a little from step to step as objects divide and die;
/// the headroom keeps most refreshes allocation-free.
pub(crate) fn reserve_with_headroom<T>(buf: &mut Vec<T>, len: usize) {
    if buf.capacity() < len {
        let target = len + len / 2;
        buf.reserve(target - buf.len());
    }
}
