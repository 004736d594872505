//! Freshness and staleness contracts of the three projection modes.
//!
//! The simulation mutates its objects between refresh and read passes.
//! These tests pin down what each mode observes:
//!
//! - **ZeroCopy** always reads live values.
//! - **Copy** returns the values captured at the last refresh.
//! - **Cache** captures each slot on first read after a refresh.

use std::io;
use std::sync::{Arc, Mutex};

use lumen_core::{ProjectionGeneration, RandomAccessScalarView};
use lumen_projection::{ProjectionBuffer, ProjectionMode};
use lumen_test_utils::{diameter_accessor, position_accessor, CountingCollection, MockCell};
use proptest::prelude::*;

fn cells() -> Vec<MockCell> {
    MockCell::with_diameters(&[10.0, 20.0, 30.0, 40.0, 50.0])
}

fn buffer(mode: ProjectionMode) -> ProjectionBuffer<lumen_test_utils::CellAccessor> {
    ProjectionBuffer::new("diameter", mode, diameter_accessor()).unwrap()
}

#[test]
fn every_mode_is_fresh_right_after_refresh() {
    let mut cells = cells();
    let mut buffers: Vec<_> = [
        ProjectionMode::ZeroCopy,
        ProjectionMode::Copy,
        ProjectionMode::Cache,
    ]
    .into_iter()
    .map(buffer)
    .collect();

    for step in 1..=3 {
        for cell in &mut cells {
            cell.diameter += 1.0;
        }
        for b in &mut buffers {
            let mode = b.mode();
            b.refresh(&cells, 0, cells.len()).unwrap();
            let expected: Vec<f64> = cells.iter().map(|c| c.diameter).collect();
            assert_eq!(b.view(&cells).to_vec(), expected, "{mode} at step {step}");
        }
    }
}

#[test]
fn copy_is_stale_until_next_refresh() {
    let mut cells = cells();
    let mut b = buffer(ProjectionMode::Copy);
    b.refresh(&cells, 1, 4).unwrap();

    cells[2].diameter = 99.0;
    assert_eq!(b.view(&cells).value_at(1), 30.0);

    b.refresh(&cells, 1, 4).unwrap();
    assert_eq!(b.view(&cells).value_at(1), 99.0);
}

#[test]
fn zero_copy_sees_mutation_without_refresh() {
    let mut cells = cells();
    let mut b = buffer(ProjectionMode::ZeroCopy);
    b.refresh(&cells, 1, 4).unwrap();
    assert_eq!(b.view(&cells).value_at(1), 30.0);

    cells[2].diameter = 99.0;
    assert_eq!(b.view(&cells).value_at(1), 99.0);
}

#[test]
fn cache_memoizes_then_invalidates_on_refresh() {
    let mut cells = cells();
    let mut b = buffer(ProjectionMode::Cache);
    b.refresh(&cells, 0, 5).unwrap();
    assert_eq!(b.view(&cells).value_at(2), 30.0);

    cells[2].diameter = 99.0;
    assert_eq!(b.view(&cells).value_at(2), 30.0, "memoized within the cycle");

    // A slot never read in this cycle still fills lazily from the live object.
    cells[3].diameter = 77.0;
    assert_eq!(b.view(&cells).value_at(3), 77.0);

    b.refresh(&cells, 0, 5).unwrap();
    assert_eq!(b.view(&cells).value_at(2), 99.0);
}

#[test]
fn cache_two_refreshes_without_reads_do_not_resurrect_stale_slots() {
    let mut cells = cells();
    let mut b = buffer(ProjectionMode::Cache);

    b.refresh(&cells, 0, 5).unwrap();
    assert_eq!(b.view(&cells).value_at(0), 10.0);

    cells[0].diameter = 11.0;
    b.refresh(&cells, 0, 5).unwrap();
    cells[0].diameter = 12.0;
    b.refresh(&cells, 0, 5).unwrap();

    assert_eq!(b.generation(), ProjectionGeneration(3));
    assert_eq!(b.view(&cells).value_at(0), 12.0);
}

#[test]
fn zero_copy_reinvokes_accessor_on_every_read() {
    let source = CountingCollection::new(cells());
    let mut b = buffer(ProjectionMode::ZeroCopy);
    b.refresh(&source, 0, 5).unwrap();
    assert_eq!(source.lookups(), 0);

    let mut view = b.view(&source);
    for _ in 0..4 {
        view.value_at(3);
    }
    assert_eq!(source.lookups(), 4);
    assert_eq!(b.stats().accessor_reads, 4);
}

#[test]
fn cache_reads_each_slot_once_per_cycle() {
    let source = CountingCollection::new(cells());
    let mut b = buffer(ProjectionMode::Cache);
    b.refresh(&source, 0, 5).unwrap();
    assert_eq!(source.lookups(), 0, "no eager reads");

    {
        let mut view = b.view(&source);
        for _ in 0..3 {
            view.value_at(1);
            view.value_at(4);
        }
    }
    assert_eq!(source.lookups(), 2);
    assert_eq!(b.stats().cache_hits, 4);

    b.refresh(&source, 0, 5).unwrap();
    b.view(&source).value_at(1);
    assert_eq!(source.lookups(), 3);
}

#[test]
fn copy_reads_everything_at_refresh_and_nothing_after() {
    let source = CountingCollection::new(cells());
    let mut b = buffer(ProjectionMode::Copy);
    b.refresh(&source, 1, 5).unwrap();
    assert_eq!(source.lookups(), 4);
    source.reset();

    let mut view = b.view(&source);
    assert_eq!(view.to_vec(), vec![20.0, 30.0, 40.0, 50.0]);
    assert_eq!(source.lookups(), 0);
}

#[test]
fn vector_attribute_tracks_mutation_per_mode() {
    let mut cells = MockCell::grid_line(3);
    let mut copy = ProjectionBuffer::new("p", ProjectionMode::Copy, position_accessor()).unwrap();
    let mut live = ProjectionBuffer::new("p", ProjectionMode::ZeroCopy, position_accessor()).unwrap();
    copy.refresh(&cells, 0, 3).unwrap();
    live.refresh(&cells, 0, 3).unwrap();

    cells[1].position = [5.0, 6.0, 7.0];
    assert_eq!(copy.view(&cells).tuple_at(1).as_slice(), &[1.0, 0.0, 0.0]);
    assert_eq!(live.view(&cells).tuple_at(1).as_slice(), &[5.0, 6.0, 7.0]);
}

#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn mutation_rejection_is_logged() {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let cells = cells();
    let mut b = buffer(ProjectionMode::Cache);
    b.refresh(&cells, 0, 5).unwrap();
    tracing::subscriber::with_default(subscriber, || {
        assert!(b.resize(2).is_err());
        assert!(b.insert_next_value(1.0).is_err());
    });
    assert_eq!(b.len(), 5);

    let logged = capture.text();
    let warnings: Vec<&str> = logged.lines().filter(|l| l.contains("read only container")).collect();
    assert_eq!(warnings.len(), 2, "{logged}");
    assert!(warnings[0].contains("WARN") && warnings[0].contains("resize"), "{logged}");
    assert!(warnings[1].contains("insert_next_value"), "{logged}");
    assert!(warnings.iter().all(|l| l.contains("diameter")), "{logged}");
}

proptest! {
    #[test]
    fn all_modes_agree_after_refresh(
        values in prop::collection::vec(-1e6f64..1e6, 0..64),
        bounds in (0usize..64, 0usize..64),
        mutate in prop::collection::vec(-1e6f64..1e6, 0..64),
    ) {
        let mut cells = MockCell::with_diameters(&values);
        for (cell, v) in cells.iter_mut().zip(&mutate) {
            cell.diameter = *v;
        }
        let (a, b) = bounds;
        let start = a.min(b).min(cells.len());
        let end = a.max(b).min(cells.len());

        let mut reference: Option<Vec<f64>> = None;
        for mode in [ProjectionMode::ZeroCopy, ProjectionMode::Copy, ProjectionMode::Cache] {
            let mut p = buffer(mode);
            p.refresh(&cells, start, end).unwrap();
            let got = p.view(&cells).to_vec();
            prop_assert_eq!(got.len(), end - start);
            match &reference {
                None => reference = Some(got),
                Some(r) => prop_assert_eq!(&got, r),
            }
        }
        let expected: Vec<f64> = cells[start..end].iter().map(|c| c.diameter).collect();
        prop_assert_eq!(reference.unwrap(), expected);
    }
}
