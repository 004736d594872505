//! Criterion micro-benchmarks for projection refresh and read passes.

use criterion::{criterion_group, criterion_main, Criterion};
use lumen_bench::{
    cell_population, diameter_accessor, position_accessor, radial_concentration, InhibitionRule,
};
use lumen_core::RandomAccessScalarView;
use lumen_projection::{ChunkPlan, ProjectionBuffer, ProjectionMode};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const CELLS: usize = 100_000;

const MODES: [ProjectionMode; 3] = [
    ProjectionMode::ZeroCopy,
    ProjectionMode::Copy,
    ProjectionMode::Cache,
];

/// Benchmark: refresh plus one full read pass of a vector attribute.
fn bench_refresh_and_read(c: &mut Criterion) {
    let cells = cell_population(CELLS, 42);
    for mode in MODES {
        let mut buffer = ProjectionBuffer::new("position", mode, position_accessor()).unwrap();
        c.bench_function(&format!("position_refresh_read_100k_{mode}"), |b| {
            b.iter(|| {
                buffer.refresh_all(&cells).unwrap();
                let mut view = buffer.view(&cells);
                let mut sum = 0.0;
                for idx in 0..view.len() {
                    sum += view.value_at(idx);
                }
                std::hint::black_box(sum);
            });
        });
    }
}

/// Benchmark: three consumers reading the same refreshed range, where
/// Cache mode amortizes the repeated reads.
fn bench_repeated_reads(c: &mut Criterion) {
    let cells = cell_population(CELLS, 42);
    for mode in MODES {
        let mut buffer = ProjectionBuffer::new("diameter", mode, diameter_accessor()).unwrap();
        c.bench_function(&format!("diameter_three_readers_100k_{mode}"), |b| {
            b.iter(|| {
                buffer.refresh_all(&cells).unwrap();
                let mut view = buffer.view(&cells);
                for _ in 0..3 {
                    let mut out = Vec::with_capacity(CELLS);
                    view.append_f64(&mut out);
                    std::hint::black_box(&out);
                }
            });
        });
    }
}

/// Benchmark: linear search for a value near the end of the range.
fn bench_linear_search(c: &mut Criterion) {
    let cells = cell_population(CELLS, 42);
    let target = cells[CELLS - 10].diameter;
    let mut buffer =
        ProjectionBuffer::new("diameter", ProjectionMode::Copy, diameter_accessor()).unwrap();
    buffer.refresh_all(&cells).unwrap();
    c.bench_function("diameter_linear_search_100k", |b| {
        b.iter(|| {
            let found = buffer.view(&cells).linear_search(target, 0);
            std::hint::black_box(found);
        });
    });
}

/// Benchmark: fork-join refresh across eight per-worker buffers.
fn bench_partitioned_refresh(c: &mut Criterion) {
    let cells = cell_population(CELLS, 42);
    let plan = ChunkPlan::new(CELLS, 8).unwrap();
    let prototype =
        ProjectionBuffer::new("position", ProjectionMode::Copy, position_accessor()).unwrap();
    let mut buffers: Vec<_> = (0..8).map(|_| prototype.fork()).collect();
    c.bench_function("position_partitioned_refresh_100k_8w", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for (buffer, (_, range)) in buffers.iter_mut().zip(plan.ranges()) {
                    let cells = &cells;
                    s.spawn(move || buffer.refresh(cells, range.start, range.end).unwrap());
                }
            });
        });
    });
}

/// Benchmark: one simulation step of the inhibition rule.
fn bench_inhibition_step(c: &mut Criterion) {
    let rule = InhibitionRule::default();
    let mut cells = cell_population(CELLS, 42);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    c.bench_function("inhibition_step_100k", |b| {
        b.iter(|| {
            let n = rule.step(&mut cells, radial_concentration, &mut rng);
            std::hint::black_box(n);
        });
    });
}

criterion_group!(
    benches,
    bench_refresh_and_read,
    bench_repeated_reads,
    bench_linear_search,
    bench_partitioned_refresh,
    bench_inhibition_step
);
criterion_main!(benches);
