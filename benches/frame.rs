//! Benchmarks for geometry computation and frame painting.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datagrid::{compute_geometry, CellValue, Dataset, GridConfig, GridView, RecordingSurface, Row};
use datagrid::render::DirtyFlags;
use std::collections::HashMap;

const COLUMNS: [&str; 8] = [
    "PassengerId",
    "Survived",
    "Pclass",
    "Name",
    "Sex",
    "Age",
    "Ticket",
    "Fare",
];

fn headers() -> Vec<String> {
    COLUMNS.iter().map(|c| (*c).to_string()).collect()
}

fn widths() -> HashMap<String, f64> {
    COLUMNS.iter().map(|c| ((*c).to_string(), 120.0)).collect()
}

fn dataset(rows: usize) -> Dataset {
    let rows: Vec<Row> = (0..rows)
        .map(|i| {
            COLUMNS
                .iter()
                .map(|c| ((*c).to_string(), CellValue::Number(i as f64)))
                .collect()
        })
        .collect();
    Dataset::new(headers(), rows).expect("unique headers")
}

/// Geometry recomputation cost grows with the row count
fn bench_geometry(c: &mut Criterion) {
    let headers = headers();
    let widths = widths();
    let mut group = c.benchmark_group("compute_geometry");
    for rows in [1_000usize, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                compute_geometry(black_box(&headers), &widths, rows, 30.0, 40.0)
                    .expect("widths configured")
            });
        });
    }
    group.finish();
}

/// Painting cost should stay flat as the dataset grows (vertical culling)
fn bench_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint_frame");
    for rows in [1_000usize, 100_000] {
        let mut config = GridConfig::default();
        config.widths = widths();
        let mut view = GridView::new(config).expect("valid config");
        view.set_dataset(dataset(rows));
        view.resize(1280.0, 720.0, 2.0);
        view.set_scroll(0.0, 15.0 * rows as f64);
        let mut surface = RecordingSurface::new();
        view.run_frame(&mut surface).expect("first frame");

        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                surface.take_ops();
                view.request_render(DirtyFlags::PAINT);
                view.run_frame(black_box(&mut surface)).expect("frame")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_geometry, bench_paint);
criterion_main!(benches);
