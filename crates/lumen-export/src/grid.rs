//! Per-object-type grids: a set of columns replicated across workers.

use std::path::Path;

use indexmap::IndexMap;
use lumen_core::{AttributeAccessor, AttributeDef, AttributeId, AttributeSet, ProjectionError};
use lumen_projection::{ChunkPlan, ColumnProjection, ProjectionBuffer, ProjectionMode};
use tracing::debug;

use crate::error::ExportError;
use crate::metadata::{AttributeInfo, GridInfo};
use crate::piece::{write_index, write_piece, Piece, PieceColumn};
use crate::processor::FrameGrid;

/// One worker's copy of every column and the range it was last refreshed to.
struct WorkerColumns<O> {
    columns: Vec<Box<dyn ColumnProjection<O>>>,
    start: usize,
    end: usize,
}

impl<O> WorkerColumns<O> {
    /// Every column is refreshed, selected or not, so a later selection
    /// change never exposes a range refreshed against older objects.
    fn refresh(&mut self, objects: &[O], start: usize, end: usize) -> Result<(), ProjectionError> {
        for column in &mut self.columns {
            column.refresh(objects, start, end)?;
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    fn collect(&mut self, objects: &[O], selected: &[bool]) -> Vec<PieceColumn> {
        self.columns
            .iter_mut()
            .zip(selected)
            .filter(|(_, &on)| on)
            .map(|(column, _)| {
                let mut values = Vec::with_capacity(column.len());
                column.append_f64(objects, &mut values);
                PieceColumn {
                    name: column.name().to_string(),
                    components: column.component_count(),
                    scalar_type: column.scalar_type().to_string(),
                    values,
                }
            })
            .collect()
    }
}

/// A named grid over one object type.
///
/// Columns are registered once; each is forked so that every worker owns
/// an independent projection. [`update`](Self::update) refreshes all
/// workers over a static partition of the objects in a fork-join pass.
pub struct ObjectGrid<O> {
    name: String,
    mode: ProjectionMode,
    defs: IndexMap<String, AttributeDef>,
    scalar_types: Vec<&'static str>,
    workers: Vec<WorkerColumns<O>>,
    selection: Option<AttributeSet>,
    selected: Vec<bool>,
    tuples: usize,
}

impl<O: Sync + 'static> ObjectGrid<O> {
    /// An empty grid with `workers` workers (at least one).
    pub fn new(name: impl Into<String>, workers: usize, mode: ProjectionMode) -> Self {
        let workers = workers.max(1);
        Self {
            name: name.into(),
            mode,
            defs: IndexMap::new(),
            scalar_types: Vec::new(),
            workers: (0..workers)
                .map(|_| WorkerColumns {
                    columns: Vec::new(),
                    start: 0,
                    end: 0,
                })
                .collect(),
            selection: None,
            selected: Vec::new(),
            tuples: 0,
        }
    }

    /// Grid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Projection mode used by [`add_attribute`](Self::add_attribute).
    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Number of workers (and pieces per step).
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of registered columns.
    pub fn column_count(&self) -> usize {
        self.defs.len()
    }

    /// Objects covered by the last [`update`](Self::update).
    pub fn tuples(&self) -> usize {
        self.tuples
    }

    /// Definition of a registered column.
    pub fn attribute(&self, id: AttributeId) -> Option<&AttributeDef> {
        self.defs.get_index(id.0 as usize).map(|(_, def)| def)
    }

    /// ID of the column named `name`.
    pub fn attribute_id(&self, name: &str) -> Option<AttributeId> {
        self.defs.get_index_of(name).map(|i| AttributeId(i as u32))
    }

    /// Register an attribute read through `accessor`, projected in the
    /// grid's mode.
    ///
    /// # Errors
    ///
    /// - [`ExportError::DuplicateColumn`] if the name is taken.
    /// - [`ExportError::Projection`] if the accessor's component count
    ///   is zero or disagrees with `def`.
    pub fn add_attribute<A>(&mut self, def: AttributeDef, accessor: A) -> Result<AttributeId, ExportError>
    where
        A: AttributeAccessor<Object = O> + Clone + Send + 'static,
    {
        let column = ProjectionBuffer::new(def.name.clone(), self.mode, accessor)?;
        self.add_column(def, Box::new(column))
    }

    /// Register a prebuilt column. It is forked once per extra worker.
    pub fn add_column(
        &mut self,
        def: AttributeDef,
        column: Box<dyn ColumnProjection<O>>,
    ) -> Result<AttributeId, ExportError> {
        if self.defs.contains_key(&def.name) {
            return Err(ExportError::DuplicateColumn {
                grid: self.name.clone(),
                column: def.name,
            });
        }
        let expected = def.attribute_type.components() as usize;
        if column.component_count() != expected {
            return Err(ProjectionError::ComponentMismatch {
                expected,
                actual: column.component_count(),
            }
            .into());
        }
        let id = AttributeId(self.defs.len() as u32);
        self.scalar_types.push(column.scalar_type());
        for worker in self.workers.iter_mut().skip(1) {
            worker.columns.push(column.fork_boxed());
        }
        self.workers[0].columns.push(column);
        self.defs.insert(def.name.clone(), def);
        self.refresh_selected();
        Ok(id)
    }

    /// Restrict output (pieces, frames, sidecar) to the attributes in
    /// `selection`. `None` selects every column.
    ///
    /// # Errors
    ///
    /// [`ExportError::UnknownAttribute`] if `selection` names an ID with
    /// no registered column; the previous selection stays in effect.
    pub fn select(&mut self, selection: Option<AttributeSet>) -> Result<(), ExportError> {
        if let Some(set) = &selection {
            let registered = AttributeSet::first(self.defs.len());
            if let Some(attribute) = set.difference(&registered).iter().next() {
                return Err(ExportError::UnknownAttribute {
                    grid: self.name.clone(),
                    attribute,
                });
            }
        }
        self.selection = selection;
        self.refresh_selected();
        Ok(())
    }

    fn refresh_selected(&mut self) {
        self.selected = (0..self.defs.len())
            .map(|i| {
                self.selection
                    .as_ref()
                    .is_none_or(|set| set.contains(AttributeId(i as u32)))
            })
            .collect();
    }

    /// Refresh every worker's columns over its share of `objects`.
    ///
    /// Single-worker grids refresh inline; otherwise each worker runs on
    /// a scoped thread and the call returns after all have joined.
    pub fn update(&mut self, objects: &[O]) -> Result<usize, ExportError> {
        let plan = ChunkPlan::new(objects.len(), self.workers.len())?;
        debug!(
            grid = %self.name,
            objects = objects.len(),
            workers = plan.workers(),
            chunk = plan.chunk_size(),
            "updating grid"
        );
        if let [worker] = self.workers.as_mut_slice() {
            worker.refresh(objects, 0, objects.len())?;
        } else {
            let grid = &self.name;
            std::thread::scope(|s| {
                let handles: Vec<_> = self
                    .workers
                    .iter_mut()
                    .zip(plan.ranges())
                    .map(|(worker, (_, range))| {
                        s.spawn(move || worker.refresh(objects, range.start, range.end))
                    })
                    .collect();
                for handle in handles {
                    handle
                        .join()
                        .map_err(|_| ExportError::WorkerPanicked { grid: grid.clone() })??;
                }
                Ok::<_, ExportError>(())
            })?;
        }
        self.tuples = objects.len();
        Ok(self.tuples)
    }

    /// Build the piece for `worker`.
    ///
    /// # Panics
    ///
    /// If `objects` is shorter than the range refreshed by the last
    /// [`update`](Self::update).
    pub fn piece(&mut self, worker: usize, objects: &[O], step: u64, time: f64) -> Piece {
        let columns = self.workers[worker].collect(objects, &self.selected);
        let w = &self.workers[worker];
        Piece {
            grid: self.name.clone(),
            step,
            time,
            worker: worker as u32,
            start: w.start,
            end: w.end,
            columns,
        }
    }

    /// Write one piece per worker in parallel, then the piece index.
    ///
    /// Returns the number of pieces written.
    pub fn write_pieces(
        &mut self,
        objects: &[O],
        dir: &Path,
        step: u64,
        time: f64,
    ) -> Result<usize, ExportError> {
        let pieces = self.workers.len();
        let name = &self.name;
        let selected = &self.selected;
        std::thread::scope(|s| {
            let handles: Vec<_> = self
                .workers
                .iter_mut()
                .enumerate()
                .map(|(i, worker)| {
                    s.spawn(move || {
                        let piece = Piece {
                            grid: name.clone(),
                            step,
                            time,
                            worker: i as u32,
                            start: worker.start,
                            end: worker.end,
                            columns: worker.collect(objects, selected),
                        };
                        write_piece(dir, &piece)
                    })
                })
                .collect();
            for handle in handles {
                handle
                    .join()
                    .map_err(|_| ExportError::WorkerPanicked { grid: name.clone() })??;
            }
            Ok::<_, ExportError>(())
        })?;
        write_index(dir, &self.name, step, time, pieces as u32)?;
        Ok(pieces)
    }

    /// Every worker's columns concatenated in object order.
    pub fn frame(&mut self, objects: &[O]) -> FrameGrid {
        let mut columns: Vec<PieceColumn> = Vec::new();
        for worker in &mut self.workers {
            let part = worker.collect(objects, &self.selected);
            if columns.is_empty() {
                columns = part;
            } else {
                for (all, more) in columns.iter_mut().zip(part) {
                    all.values.extend(more.values);
                }
            }
        }
        FrameGrid {
            name: self.name.clone(),
            tuples: self.tuples,
            columns,
        }
    }

    /// Sidecar description of the selected columns.
    pub fn info(&self) -> GridInfo {
        let attributes = self
            .defs
            .values()
            .zip(&self.scalar_types)
            .zip(&self.selected)
            .filter(|(_, &on)| on)
            .map(|((def, scalar_type), _)| AttributeInfo {
                name: def.name.clone(),
                components: def.attribute_type.components() as usize,
                scalar_type: scalar_type.to_string(),
                kind: AttributeInfo::kind_label(&def.attribute_type).to_string(),
                units: def.units.clone(),
            })
            .collect();
        GridInfo {
            name: self.name.clone(),
            pieces: self.workers.len(),
            attributes,
        }
    }
}
