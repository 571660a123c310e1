//! Layout tests: column/row boundaries, hit lookups and surface sizing.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{HEADERS, WIDTHS};
use datagrid::layout::{backing_extent, lowest_fraction, Viewport};
use datagrid::{compute_geometry, GridError};
use std::collections::HashMap;
use test_case::test_case;

fn headers() -> Vec<String> {
    HEADERS.iter().map(|h| (*h).to_string()).collect()
}

fn widths() -> HashMap<String, f64> {
    HEADERS
        .iter()
        .zip(WIDTHS)
        .map(|(h, w)| ((*h).to_string(), w))
        .collect()
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[test]
fn test_column_boundaries_follow_header_order() {
    let info = compute_geometry(&headers(), &widths(), 3, 30.0, 40.0).unwrap();
    assert_eq!(info.x_coords, vec![0.0, 100.0, 180.0, 380.0, 440.0, 500.0]);
    assert_eq!(info.widths, WIDTHS.to_vec());
}

#[test]
fn test_header_band_is_row_zero() {
    let info = compute_geometry(&headers(), &widths(), 3, 30.0, 40.0).unwrap();
    assert_eq!(info.heights, vec![40.0, 30.0, 30.0, 30.0]);
    assert_eq!(info.y_coords, vec![0.0, 40.0, 70.0, 100.0, 130.0]);
    assert_eq!(info.header_height, 40.0);
    assert_eq!(info.total_height(), 130.0);
}

#[test]
fn test_width_lookup_ignores_extra_entries() {
    let mut widths = widths();
    widths.insert("Cabin".to_string(), 999.0);
    let info = compute_geometry(&headers(), &widths, 1, 30.0, 40.0).unwrap();
    assert_eq!(info.total_width(), 500.0);
}

#[test]
fn test_missing_width_is_fatal() {
    let mut widths = widths();
    widths.remove("Age");
    let err = compute_geometry(&headers(), &widths, 1, 30.0, 40.0).unwrap_err();
    assert!(matches!(err, GridError::MissingWidth(ref h) if h == "Age"));
}

#[test_case(0.0, Some(0) ; "left edge")]
#[test_case(179.9, Some(1) ; "inside second")]
#[test_case(180.0, Some(2) ; "boundary belongs to the right cell")]
#[test_case(499.0, Some(4) ; "last column")]
#[test_case(500.0, None ; "right edge")]
#[test_case(-3.0, None ; "before grid")]
fn test_col_at_x(x: f64, expected: Option<usize>) {
    let info = compute_geometry(&headers(), &widths(), 3, 30.0, 40.0).unwrap();
    assert_eq!(info.col_at_x(x), expected);
}

#[test]
fn test_rows_in_window_culls_vertically() {
    let info = compute_geometry(&headers(), &widths(), 10_000, 30.0, 40.0).unwrap();
    // window 100 rows down, 200 tall
    let rows = info.rows_in(3040.0, 3240.0);
    assert_eq!(rows, 101..108);
    assert!(rows.len() < 10);
}

// =============================================================================
// SURFACE SIZING
// =============================================================================

#[test_case(1.0, (1, 1))]
#[test_case(1.5, (3, 2))]
#[test_case(2.0, (2, 1))]
#[test_case(1.75, (7, 4))]
#[test_case(2.5, (5, 2))]
fn test_lowest_fraction(ratio: f64, expected: (u32, u32)) {
    assert_eq!(lowest_fraction(ratio), expected);
}

#[test]
fn test_backing_extent_uses_whole_fraction_steps() {
    // 801 css px at 1.5: ceil(801 / 2) * 3 device px, shown at 802 css px
    assert_eq!(backing_extent(801.0, (3, 2)), (1203, 802.0));
    assert_eq!(backing_extent(800.0, (3, 2)), (1200, 800.0));
    assert_eq!(backing_extent(333.0, (1, 1)), (333, 333.0));
}

#[test]
fn test_repeated_resizes_do_not_drift() {
    let mut viewport = Viewport::new();
    let first = viewport.resize(801.0, 601.0, 1.25);
    for _ in 0..20 {
        viewport.resize(801.0, 601.0, 2.0);
        viewport.resize(801.0, 601.0, 1.25);
    }
    assert_eq!(viewport.surface, first);
}
