//! The visualization adaptor: the simulation-facing entry point.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use indexmap::IndexMap;
use lumen_core::StepId;
use tracing::{error, info, warn};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::grid::ObjectGrid;
use crate::metadata::SimulationInfo;
use crate::metrics::ExportMetrics;
use crate::processor::{Frame, ProcessorHandle};

/// Where the adaptor finds the objects of each grid at export time.
pub trait ObjectSource<O> {
    /// Objects backing the grid named `grid`, or `None` if there are none.
    fn objects(&self, grid: &str) -> Option<&[O]>;
}

impl<O> ObjectSource<O> for HashMap<String, Vec<O>> {
    fn objects(&self, grid: &str) -> Option<&[O]> {
        self.get(grid).map(Vec::as_slice)
    }
}

impl<O> ObjectSource<O> for IndexMap<String, Vec<O>> {
    fn objects(&self, grid: &str) -> Option<&[O]> {
        self.get(grid).map(Vec::as_slice)
    }
}

/// Exports grids of simulation objects every few steps.
///
/// Call [`visualize`](Self::visualize) once per simulation step and
/// [`finish`](Self::finish) once at the end of the run.
pub struct VisualizationAdaptor<O> {
    config: ExportConfig,
    workers: usize,
    grids: IndexMap<String, ObjectGrid<O>>,
    processor: Option<ProcessorHandle>,
    steps: Vec<StepId>,
    finished: bool,
}

impl<O: Sync + 'static> VisualizationAdaptor<O> {
    /// Validate `config` and prepare the output directory.
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        config.validate()?;
        if config.export_files {
            fs::create_dir_all(&config.output_dir)
                .map_err(|e| ExportError::io(&config.output_dir, e))?;
        }
        let workers = config.resolved_worker_count();
        info!(
            simulation = %config.simulation_name,
            output_dir = %config.output_dir.display(),
            workers,
            interval = config.export_interval,
            "visualization adaptor ready"
        );
        Ok(Self {
            config,
            workers,
            grids: IndexMap::new(),
            processor: None,
            steps: Vec::new(),
            finished: false,
        })
    }

    /// Attach an in-situ processor that receives every exported frame.
    pub fn with_processor(mut self, processor: ProcessorHandle) -> Self {
        self.processor = Some(processor);
        self
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Workers per grid.
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Register a grid sized to this adaptor's workers and mode, and
    /// return it for column registration.
    pub fn add_grid(&mut self, name: impl Into<String>) -> Result<&mut ObjectGrid<O>, ExportError> {
        let name = name.into();
        if self.grids.contains_key(&name) {
            return Err(ExportError::DuplicateGrid { name });
        }
        let grid = ObjectGrid::new(name.clone(), self.workers, self.config.mode);
        Ok(self.grids.entry(name).or_insert(grid))
    }

    /// A registered grid.
    pub fn grid(&self, name: &str) -> Option<&ObjectGrid<O>> {
        self.grids.get(name)
    }

    /// A registered grid, mutably.
    pub fn grid_mut(&mut self, name: &str) -> Option<&mut ObjectGrid<O>> {
        self.grids.get_mut(name)
    }

    /// Steps exported so far.
    pub fn exported_steps(&self) -> &[StepId] {
        &self.steps
    }

    /// Export `step` if it falls on the export interval.
    ///
    /// Refreshes every grid from `source`, hands the frame to the in-situ
    /// processor if one is attached, and writes pieces and indices when
    /// file export is on. Returns `None` for skipped steps.
    pub fn visualize(
        &mut self,
        step: u64,
        source: &impl ObjectSource<O>,
    ) -> Result<Option<ExportMetrics>, ExportError> {
        if !self.config.is_export_step(step) {
            return Ok(None);
        }
        let time = self.config.time_at(step);
        let mut metrics = ExportMetrics {
            step: StepId(step),
            time,
            ..ExportMetrics::default()
        };

        let started = Instant::now();
        for grid in self.grids.values_mut() {
            let objects = source.objects(grid.name()).unwrap_or(&[]);
            metrics.tuples_exported += grid.update(objects)?;
        }
        metrics.refresh_us = started.elapsed().as_micros() as u64;

        if let Some(processor) = &self.processor {
            let started = Instant::now();
            let mut info = self.info();
            info.steps.push(step);
            let metadata = info.to_json().map_err(|source| ExportError::Json {
                path: PathBuf::from("<frame metadata>"),
                source,
            })?;
            let grids: Vec<_> = self
                .grids
                .values_mut()
                .map(|grid| grid.frame(source.objects(grid.name()).unwrap_or(&[])))
                .collect();
            let frame = Frame {
                step: StepId(step),
                time,
                metadata: &metadata,
                grids: &grids,
            };
            processor.co_process(&frame)?;
            metrics.processor_us = started.elapsed().as_micros() as u64;
        }

        if self.config.export_files {
            let started = Instant::now();
            for grid in self.grids.values_mut() {
                let objects = source.objects(grid.name()).unwrap_or(&[]);
                metrics.pieces_written += grid
                    .write_pieces(objects, &self.config.output_dir, step, time)
                    .inspect_err(|e| error!(grid = grid.name(), step, error = %e, "export failed"))?;
            }
            metrics.write_us = started.elapsed().as_micros() as u64;
        }

        self.steps.push(StepId(step));
        info!(
            step,
            time,
            tuples = metrics.tuples_exported,
            pieces = metrics.pieces_written,
            "exported frame"
        );
        Ok(Some(metrics))
    }

    /// Sidecar contents for the current registration and exported steps.
    pub fn info(&self) -> SimulationInfo {
        Self::simulation_info(&self.config, self.workers, &self.grids, &self.steps)
    }

    fn simulation_info(
        config: &ExportConfig,
        workers: usize,
        grids: &IndexMap<String, ObjectGrid<O>>,
        steps: &[StepId],
    ) -> SimulationInfo {
        SimulationInfo {
            simulation: config.simulation_name.clone(),
            output_dir: config.output_dir.clone(),
            export_interval: config.export_interval,
            time_step: config.time_step,
            workers,
            grids: grids.values().map(ObjectGrid::info).collect(),
            steps: steps.iter().map(|s| s.0).collect(),
        }
    }

    /// End the run: write the metadata sidecar and, if configured, run
    /// the state generator. Releases this adaptor's processor handle.
    ///
    /// Returns the sidecar path when files are exported.
    pub fn finish(mut self) -> Result<Option<PathBuf>, ExportError> {
        self.finished = true;
        self.processor = None;
        if !self.config.export_files {
            return Ok(None);
        }
        let sidecar = self
            .info()
            .write_to(&self.config.output_dir)
            .inspect_err(|e| error!(error = %e, "writing simulation info failed"))?;
        if self.config.generate_state {
            if let Some(command) = &self.config.state_command {
                command.run(&sidecar)?;
            }
        }
        info!(steps = self.steps.len(), sidecar = %sidecar.display(), "export finished");
        Ok(Some(sidecar))
    }
}

impl<O> Drop for VisualizationAdaptor<O> {
    fn drop(&mut self) {
        if !self.finished && !self.steps.is_empty() {
            warn!(
                steps = self.steps.len(),
                "visualization adaptor dropped without finish; no simulation info written"
            );
        }
    }
}
