//! Per-frame export metrics.
//!
//! [`ExportMetrics`] is returned by every exported
//! [`visualize`](crate::VisualizationAdaptor::visualize) call.

use lumen_core::StepId;

/// Timing and volume of one exported frame.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportMetrics {
    /// Step exported.
    pub step: StepId,
    /// Simulated time of the step.
    pub time: f64,
    /// Time spent refreshing every grid's projections, in microseconds.
    pub refresh_us: u64,
    /// Time spent assembling and handing frames to the in-situ processor.
    pub processor_us: u64,
    /// Time spent writing pieces and indices, in microseconds.
    pub write_us: u64,
    /// Piece files written, summed over grids.
    pub pieces_written: usize,
    /// Objects exported, summed over grids.
    pub tuples_exported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = ExportMetrics::default();
        assert_eq!(m.step, StepId(0));
        assert_eq!(m.time, 0.0);
        assert_eq!(m.refresh_us, 0);
        assert_eq!(m.processor_us, 0);
        assert_eq!(m.write_us, 0);
        assert_eq!(m.pieces_written, 0);
        assert_eq!(m.tuples_exported, 0);
    }
}
