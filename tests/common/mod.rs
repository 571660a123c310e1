//! Common test fixtures for the integration tests.
//!
//! Provides a small passenger-list dataset, matching configurations and a
//! helper that returns a `GridView` ready to paint.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use datagrid::{CellValue, Dataset, DrawOp, GridConfig, GridView, RecordingSurface, Row};

/// Headers of the passenger fixture, in display order
pub const HEADERS: [&str; 5] = ["PassengerId", "Survived", "Name", "Age", "Fare"];

/// Widths matching [`HEADERS`]; total 500
pub const WIDTHS: [f64; 5] = [100.0, 80.0, 200.0, 60.0, 60.0];

/// Build a row from `(header, value)` pairs
pub fn row(pairs: &[(&str, CellValue)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// `count` passengers; passenger `i` survived when `i` is odd
pub fn passengers(count: usize) -> Dataset {
    let rows = (0..count)
        .map(|i| {
            row(&[
                ("PassengerId", CellValue::Number((i + 1) as f64)),
                ("Survived", CellValue::Number((i % 2) as f64)),
                ("Name", CellValue::Text(format!("Passenger {i}"))),
                ("Age", CellValue::Number(20.0 + (i % 50) as f64)),
                ("Fare", CellValue::Number(7.25)),
            ])
        })
        .collect();
    Dataset::new(HEADERS.iter().map(|h| (*h).to_string()).collect(), rows).unwrap()
}

/// Default configuration with a width for every passenger column
pub fn config() -> GridConfig {
    HEADERS
        .iter()
        .zip(WIDTHS)
        .fold(GridConfig::default(), |config, (header, width)| {
            config.with_width(*header, width)
        })
}

/// A view over `rows` passengers, attached at `width` x `height` CSS px, dpr 1
pub fn view(rows: usize, width: f64, height: f64) -> GridView {
    view_with(config(), rows, width, height)
}

pub fn view_with(config: GridConfig, rows: usize, width: f64, height: f64) -> GridView {
    let mut view = GridView::new(config).unwrap();
    view.set_dataset(passengers(rows));
    view.resize(width, height, 1.0);
    view
}

/// Run the pending frame onto a fresh recording surface
pub fn frame(view: &mut GridView) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    view.run_frame(&mut surface).unwrap();
    surface
}

/// Position of the first op matching `pred`
pub fn position(surface: &RecordingSurface, pred: impl Fn(&DrawOp) -> bool) -> Option<usize> {
    surface.ops().iter().position(pred)
}
