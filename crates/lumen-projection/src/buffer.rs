//! The projection buffer: construction, refresh, and binding for reads.

use std::ops::Range;

use lumen_core::{AttributeAccessor, ProjectionError, ProjectionGeneration, SourceCollection};
use tracing::debug;

use crate::mode::ProjectionMode;
use crate::resolve::SlotResolver;
use crate::staging::Staging;
use crate::view::ProjectionView;

/// Counters describing how a projection has been exercised.
///
/// Cumulative over the buffer's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    /// Number of completed refreshes.
    pub refreshes: u64,
    /// Number of accessor invocations (one per tuple for Copy refreshes,
    /// one per read for ZeroCopy, one per miss for Cache).
    pub accessor_reads: u64,
    /// Number of Cache reads served from the owned buffer.
    pub cache_hits: u64,
}

/// A read-only projection of one attribute over a slice of a collection.
///
/// Built once per attribute per output target. Each refresh cycle rebinds
/// the `[start, end)` range; reads happen through a [`ProjectionView`]
/// that borrows the collection for the duration of the pass.
///
/// # Example
///
/// ```
/// use lumen_core::{MemberAccessor, RandomAccessScalarView};
/// use lumen_projection::{ProjectionBuffer, ProjectionMode};
///
/// struct Cell {
///     diameter: f64,
/// }
///
/// fn diameter(cell: &Cell) -> &[f64] {
///     std::slice::from_ref(&cell.diameter)
/// }
///
/// let cells: Vec<Cell> = [10.0, 20.0, 30.0, 40.0, 50.0]
///     .into_iter()
///     .map(|diameter| Cell { diameter })
///     .collect();
///
/// let mut buffer =
///     ProjectionBuffer::new("diameter", ProjectionMode::Copy, MemberAccessor::new(1, diameter))
///         .unwrap();
/// buffer.refresh(&cells, 1, 4).unwrap();
///
/// let mut view = buffer.view(&cells);
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.value_at(0), 20.0);
/// assert_eq!(view.tuple_at(1).as_slice(), &[30.0]);
/// ```
#[derive(Debug)]
pub struct ProjectionBuffer<A: AttributeAccessor> {
    name: String,
    accessor: A,
    components: usize,
    start: usize,
    end: usize,
    staging: Staging<A::Scalar>,
    stats: ProjectionStats,
}

impl<A: AttributeAccessor> ProjectionBuffer<A> {
    /// Build a projection named `name` reading through `accessor`.
    ///
    /// The buffer starts with an empty range and does not touch any
    /// collection until the first [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// [`ProjectionError::InvalidComponentCount`] if the accessor declares
    /// zero components.
    pub fn new(
        name: impl Into<String>,
        mode: ProjectionMode,
        accessor: A,
    ) -> Result<Self, ProjectionError> {
        let name = name.into();
        let components = accessor.component_count();
        if components < 1 {
            return Err(ProjectionError::InvalidComponentCount {
                name,
                count: components,
            });
        }
        Ok(Self {
            name,
            accessor,
            components,
            start: 0,
            end: 0,
            staging: Staging::for_mode(mode),
            stats: ProjectionStats::default(),
        })
    }

    /// A fresh, unrefreshed buffer with the same name, mode and accessor.
    ///
    /// Used to give each worker of a fan-out its own instance.
    pub fn fork(&self) -> Self
    where
        A: Clone,
    {
        Self {
            name: self.name.clone(),
            accessor: self.accessor.clone(),
            components: self.components,
            start: 0,
            end: 0,
            staging: Staging::for_mode(self.mode()),
            stats: ProjectionStats::default(),
        }
    }

    /// Display name, opaque to the projection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mode fixed at construction.
    pub fn mode(&self) -> ProjectionMode {
        self.staging.mode()
    }

    /// Scalars per tuple.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// The `[start, end)` range bound by the last refresh.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of tuples in the current range.
    pub fn tuple_count(&self) -> usize {
        self.end - self.start
    }

    /// Logical size: `component_count * tuple_count`.
    pub fn len(&self) -> usize {
        self.components * self.tuple_count()
    }

    /// Returns `true` if the current range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Current cache generation. Always `NEVER` outside Cache mode.
    pub fn generation(&self) -> ProjectionGeneration {
        self.staging.generation()
    }

    /// Cumulative access counters.
    pub fn stats(&self) -> &ProjectionStats {
        &self.stats
    }

    /// Bytes held by owned storage (zero in ZeroCopy mode).
    pub fn memory_bytes(&self) -> usize {
        self.staging.memory_bytes()
    }

    /// The accessor bound at construction.
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Rebind to `collection[start..end]` for a new refresh cycle.
    ///
    /// - **ZeroCopy:** no work beyond rebinding.
    /// - **Copy:** reads every component of every tuple into the owned buffer.
    /// - **Cache:** starts a new generation; no reads happen until accessed.
    ///
    /// After this returns, every mode reflects the collection as of the call.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::RangeOutOfBounds`] unless `start <= end <= len`.
    /// The buffer is left untouched on error.
    pub fn refresh<C>(
        &mut self,
        collection: &C,
        start: usize,
        end: usize,
    ) -> Result<(), ProjectionError>
    where
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        let len = collection.len();
        if start > end || end > len {
            return Err(ProjectionError::RangeOutOfBounds { start, end, len });
        }
        self.start = start;
        self.end = end;
        let tuples = end - start;
        match &mut self.staging {
            Staging::ZeroCopy(_) => {}
            Staging::Copy(stage) => {
                let resolver = SlotResolver::new(&self.accessor, collection, start, self.components);
                stage.refresh(&resolver, tuples, self.components, &mut self.stats);
            }
            Staging::Cache(stage) => stage.refresh(tuples * self.components),
        }
        self.stats.refreshes += 1;
        debug!(
            projection = %self.name,
            mode = %self.mode(),
            start,
            end,
            "projection refreshed"
        );
        Ok(())
    }

    /// Refresh over the whole collection.
    pub fn refresh_all<C>(&mut self, collection: &C) -> Result<(), ProjectionError>
    where
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        self.refresh(collection, 0, collection.len())
    }

    /// Bind to `collection` for a read pass.
    ///
    /// `collection` must be the one passed to the last refresh (or one at
    /// least as long with the same objects in range).
    ///
    /// # Panics
    ///
    /// If the collection is shorter than the refreshed range.
    pub fn view<'a, C>(&'a mut self, collection: &'a C) -> ProjectionView<'a, A, C>
    where
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        if let Err(err) = self.check_covers(collection.len()) {
            panic!("projection '{}': {err}", self.name);
        }
        ProjectionView::new(self, collection)
    }

    /// Checked form of [`view`](Self::view).
    pub fn try_view<'a, C>(
        &'a mut self,
        collection: &'a C,
    ) -> Result<ProjectionView<'a, A, C>, ProjectionError>
    where
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        self.check_covers(collection.len())?;
        Ok(ProjectionView::new(self, collection))
    }

    fn check_covers(&self, len: usize) -> Result<(), ProjectionError> {
        if self.end > len {
            return Err(ProjectionError::RangeOutOfBounds {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }

    /// Read one value. Shared by the view; `idx` is already bounds-checked.
    #[inline]
    pub(crate) fn read_slot<C>(&mut self, collection: &C, idx: usize) -> A::Scalar
    where
        C: SourceCollection<Object = A::Object> + ?Sized,
    {
        let resolver = SlotResolver::new(&self.accessor, collection, self.start, self.components);
        match &mut self.staging {
            Staging::ZeroCopy(stage) => stage.value(&resolver, idx, &mut self.stats),
            Staging::Copy(stage) => stage.value(idx),
            Staging::Cache(stage) => stage.value(&resolver, idx, &mut self.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::MemberAccessor;
    use lumen_test_utils::{diameter_accessor, position_accessor, MockCell};

    fn cells() -> Vec<MockCell> {
        MockCell::with_diameters(&[10.0, 20.0, 30.0, 40.0, 50.0])
    }

    #[test]
    fn zero_components_rejected() {
        fn nothing(_: &MockCell) -> &[f64] {
            &[]
        }
        let err = ProjectionBuffer::new("none", ProjectionMode::Copy, MemberAccessor::new(0, nothing))
            .unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InvalidComponentCount {
                name: "none".into(),
                count: 0
            }
        );
    }

    #[test]
    fn new_buffer_is_empty_and_untouched() {
        let buffer =
            ProjectionBuffer::new("diameter", ProjectionMode::Cache, diameter_accessor()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.range(), 0..0);
        assert_eq!(buffer.generation(), ProjectionGeneration::NEVER);
        assert_eq!(buffer.stats(), &ProjectionStats::default());
    }

    #[test]
    fn refresh_sets_range_and_logical_size() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("position", ProjectionMode::ZeroCopy, position_accessor()).unwrap();
        buffer.refresh(&cells, 1, 4).unwrap();
        assert_eq!(buffer.range(), 1..4);
        assert_eq!(buffer.tuple_count(), 3);
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn refresh_rejects_bad_ranges_without_side_effects() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("diameter", ProjectionMode::Copy, diameter_accessor()).unwrap();
        buffer.refresh(&cells, 0, 2).unwrap();

        let err = buffer.refresh(&cells, 3, 2).unwrap_err();
        assert!(matches!(err, ProjectionError::RangeOutOfBounds { .. }));
        let err = buffer.refresh(&cells, 0, 6).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::RangeOutOfBounds {
                start: 0,
                end: 6,
                len: 5
            }
        );
        assert_eq!(buffer.range(), 0..2);
        assert_eq!(buffer.stats().refreshes, 1);
    }

    #[test]
    fn copy_refresh_reads_each_tuple_once() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("position", ProjectionMode::Copy, position_accessor()).unwrap();
        buffer.refresh(&cells, 0, 5).unwrap();
        assert_eq!(buffer.stats().accessor_reads, 5);
        assert!(buffer.memory_bytes() >= 15 * std::mem::size_of::<f64>());
    }

    #[test]
    fn cache_refresh_performs_no_reads() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("position", ProjectionMode::Cache, position_accessor()).unwrap();
        buffer.refresh(&cells, 0, 5).unwrap();
        buffer.refresh(&cells, 0, 5).unwrap();
        assert_eq!(buffer.stats().accessor_reads, 0);
        assert_eq!(buffer.generation(), ProjectionGeneration(2));
    }

    #[test]
    fn fork_keeps_configuration_but_not_state() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("diameter", ProjectionMode::Cache, diameter_accessor()).unwrap();
        buffer.refresh(&cells, 2, 5).unwrap();
        let fork = buffer.fork();
        assert_eq!(fork.name(), "diameter");
        assert_eq!(fork.mode(), ProjectionMode::Cache);
        assert_eq!(fork.component_count(), 1);
        assert!(fork.is_empty());
        assert_eq!(fork.generation(), ProjectionGeneration::NEVER);
    }

    #[test]
    fn try_view_rejects_shorter_collection() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("diameter", ProjectionMode::ZeroCopy, diameter_accessor()).unwrap();
        buffer.refresh(&cells, 0, 5).unwrap();
        let short = &cells[..3];
        assert!(matches!(
            buffer.try_view(short),
            Err(ProjectionError::RangeOutOfBounds { end: 5, len: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn view_panics_on_shorter_collection() {
        let cells = cells();
        let mut buffer =
            ProjectionBuffer::new("diameter", ProjectionMode::ZeroCopy, diameter_accessor()).unwrap();
        buffer.refresh(&cells, 0, 5).unwrap();
        let _ = buffer.view(&cells[..2]);
    }
}
