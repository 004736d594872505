//! In-situ hand-off of exported frames to a live consumer.
//!
//! Several adaptors in one process may feed the same processor. It is
//! shared through a [`ProcessorHandle`]; the processor is finalized
//! exactly once, when the last handle is dropped or when
//! [`ProcessorHandle::shutdown`] is called, whichever comes first.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lumen_core::StepId;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::piece::PieceColumn;

/// One grid of a frame: every worker's tuples, concatenated in object order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGrid {
    /// Grid name.
    pub name: String,
    /// Number of objects.
    pub tuples: usize,
    /// Columns in registration order.
    pub columns: Vec<PieceColumn>,
}

/// Everything a processor sees for one export step.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
    /// Simulation step.
    pub step: StepId,
    /// Simulated time at `step`.
    pub time: f64,
    /// Sidecar JSON describing the export.
    pub metadata: &'a str,
    /// Grid contents.
    pub grids: &'a [FrameGrid],
}

/// A live consumer of frames (a co-processing pipeline, a viewer, a probe).
///
/// A [`ProcessorHandle`] holds its lock for the whole of
/// [`co_process`](Self::co_process) and [`finalize`](Self::finalize).
/// Implementations must not call [`ProcessorHandle::co_process`] or
/// [`ProcessorHandle::shutdown`] on a handle to the same processor from
/// those methods; the call would deadlock. The lock-free queries
/// ([`ProcessorHandle::is_active`], `handle_count`, `Debug`) are safe.
pub trait InsituProcessor: Send {
    /// Process one frame.
    fn co_process(&mut self, frame: &Frame<'_>) -> Result<(), ExportError>;

    /// Release resources. Called exactly once.
    fn finalize(&mut self);
}

struct Shared {
    processor: Mutex<Option<Box<dyn InsituProcessor>>>,
    active: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn InsituProcessor>>> {
        self.processor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finalize(&self) -> bool {
        let mut guard = self.lock();
        self.active.store(false, Ordering::Release);
        match guard.take() {
            Some(mut processor) => {
                processor.finalize();
                true
            }
            None => false,
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if self.finalize() {
            info!("in-situ processor finalized on last handle drop");
        }
    }
}

/// Reference-counted handle to a shared [`InsituProcessor`].
#[derive(Clone)]
pub struct ProcessorHandle {
    shared: Arc<Shared>,
}

impl ProcessorHandle {
    /// Take ownership of `processor`.
    pub fn new(processor: impl InsituProcessor + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                processor: Mutex::new(Some(Box::new(processor))),
                active: AtomicBool::new(true),
            }),
        }
    }

    /// Hand `frame` to the processor. Calls are serialized across handles,
    /// and the lock is held while the processor runs.
    ///
    /// # Errors
    ///
    /// [`ExportError::ProcessorShutDown`] after [`shutdown`](Self::shutdown),
    /// or whatever the processor reports.
    pub fn co_process(&self, frame: &Frame<'_>) -> Result<(), ExportError> {
        let mut guard = self.shared.lock();
        let processor = guard.as_mut().ok_or(ExportError::ProcessorShutDown)?;
        debug!(step = %frame.step, grids = frame.grids.len(), "co-processing frame");
        processor.co_process(frame)
    }

    /// Finalize the processor now, for every handle.
    ///
    /// Returns `false` if it was already finalized.
    pub fn shutdown(&self) -> bool {
        let finalized = self.shared.finalize();
        if finalized {
            info!("in-situ processor shut down");
        }
        finalized
    }

    /// Whether the processor is still accepting frames.
    ///
    /// Does not take the processor lock.
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Number of live handles.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.shared)
    }
}

impl fmt::Debug for ProcessorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorHandle")
            .field("active", &self.is_active())
            .field("handles", &self.handle_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        frames: AtomicUsize,
        finalized: AtomicUsize,
    }

    struct Probe(Arc<Counters>);

    impl InsituProcessor for Probe {
        fn co_process(&mut self, _frame: &Frame<'_>) -> Result<(), ExportError> {
            self.0.frames.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn finalize(&mut self) {
            self.0.finalized.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn frame() -> Frame<'static> {
        Frame {
            step: StepId(3),
            time: 0.3,
            metadata: "{}",
            grids: &[],
        }
    }

    #[test]
    fn finalized_once_when_last_handle_drops() {
        let counters = Arc::new(Counters::default());
        let a = ProcessorHandle::new(Probe(counters.clone()));
        let b = a.clone();
        assert_eq!(a.handle_count(), 2);

        a.co_process(&frame()).unwrap();
        b.co_process(&frame()).unwrap();
        drop(a);
        assert_eq!(counters.finalized.load(Ordering::SeqCst), 0);
        assert!(b.is_active());
        drop(b);
        assert_eq!(counters.finalized.load(Ordering::SeqCst), 1);
        assert_eq!(counters.frames.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn explicit_shutdown_finalizes_for_every_handle() {
        let counters = Arc::new(Counters::default());
        let a = ProcessorHandle::new(Probe(counters.clone()));
        let b = a.clone();
        assert!(a.shutdown());
        assert!(!b.shutdown());
        assert!(!b.is_active());
        assert!(matches!(
            b.co_process(&frame()),
            Err(ExportError::ProcessorShutDown)
        ));
        drop(a);
        drop(b);
        assert_eq!(counters.finalized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handles_cross_threads() {
        let counters = Arc::new(Counters::default());
        let handle = ProcessorHandle::new(Probe(counters.clone()));
        std::thread::scope(|s| {
            for _ in 0..4 {
                let h = handle.clone();
                s.spawn(move || h.co_process(&frame()).unwrap());
            }
        });
        assert_eq!(counters.frames.load(Ordering::SeqCst), 4);
        assert_eq!(handle.handle_count(), 1);
    }

    struct Introspecting {
        slot: Arc<std::sync::OnceLock<ProcessorHandle>>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl InsituProcessor for Introspecting {
        fn co_process(&mut self, _frame: &Frame<'_>) -> Result<(), ExportError> {
            if let Some(handle) = self.slot.get() {
                assert!(handle.is_active());
                self.seen.lock().unwrap().push(format!("{handle:?}"));
            }
            Ok(())
        }

        fn finalize(&mut self) {}
    }

    #[test]
    fn status_queries_from_inside_the_processor_do_not_block() {
        let slot = Arc::new(std::sync::OnceLock::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = ProcessorHandle::new(Introspecting {
            slot: slot.clone(),
            seen: seen.clone(),
        });
        slot.set(handle.clone()).unwrap();

        handle.co_process(&frame()).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(seen.lock().unwrap()[0].contains("active: true"));
        assert!(handle.shutdown());
        assert!(!handle.is_active());
    }
}
