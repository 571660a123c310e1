//! Pre-computed cell geometry for a grid.
//!
//! Turns configured column widths and the uniform row height into cumulative
//! boundary arrays once per invalidation, so painting and hit testing are
//! lookups and O(log n) binary searches.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{GridError, Result};

/// Cached layout of every column and row.
///
/// Row index 0 is the header band; data row `r` lives at row index `r + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellInfo {
    /// Column widths in header order
    pub widths: Vec<f64>,
    /// Row heights, header band first
    pub heights: Vec<f64>,
    /// Cumulative column boundaries (`x_coords[i]` = left edge of column i), length `columns + 1`
    pub x_coords: Vec<f64>,
    /// Cumulative row boundaries (`y_coords[i]` = top edge of row i), length `rows + 1`
    pub y_coords: Vec<f64>,
    /// Height of the header band
    pub header_height: f64,
}

/// Rectangle representing a cell's bounds in content space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    /// Width of the cell
    pub width: f64,
    /// Height of the cell
    pub height: f64,
}

impl CellRect {
    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Derive the grid geometry from its configuration.
///
/// Every header must have an entry in `widths`; a missing entry is a
/// configuration error rather than a zero-width column.
///
/// # Errors
/// Returns [`GridError::MissingWidth`] naming the first header without a width.
pub fn compute_geometry(
    headers: &[String],
    widths: &HashMap<String, f64>,
    row_count: usize,
    row_height: f64,
    header_height: f64,
) -> Result<CellInfo> {
    let widths = headers
        .iter()
        .map(|header| {
            widths
                .get(header)
                .copied()
                .ok_or_else(|| GridError::MissingWidth(header.clone()))
        })
        .collect::<Result<Vec<f64>>>()?;

    let mut heights = Vec::with_capacity(row_count + 1);
    heights.push(header_height);
    heights.resize(row_count + 1, row_height);

    let x_coords = prefix_sums(&widths);
    let y_coords = prefix_sums(&heights);

    Ok(CellInfo {
        widths,
        heights,
        x_coords,
        y_coords,
        header_height,
    })
}

/// Cumulative boundaries starting at 0, one longer than `sizes`.
pub fn prefix_sums(sizes: &[f64]) -> Vec<f64> {
    let mut coords = Vec::with_capacity(sizes.len() + 1);
    let mut acc = 0.0;
    coords.push(acc);
    for size in sizes {
        acc += size;
        coords.push(acc);
    }
    coords
}

impl CellInfo {
    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    /// Number of data rows (excluding the header band)
    pub fn data_row_count(&self) -> usize {
        self.heights.len().saturating_sub(1)
    }

    /// True when there is nothing to paint
    pub fn is_degenerate(&self) -> bool {
        self.column_count() == 0 || self.data_row_count() == 0
    }

    /// Get total width of the grid (last x boundary)
    pub fn total_width(&self) -> f64 {
        self.x_coords.last().copied().unwrap_or(0.0)
    }

    /// Get total height of the grid including the header band (last y boundary)
    pub fn total_height(&self) -> f64 {
        self.y_coords.last().copied().unwrap_or(0.0)
    }

    /// Bounds of the cell at a row index (0 = header band) and column.
    pub fn cell_rect(&self, row: usize, col: usize) -> Option<CellRect> {
        Some(CellRect {
            x: *self.x_coords.get(col)?,
            y: *self.y_coords.get(row)?,
            width: *self.widths.get(col)?,
            height: *self.heights.get(row)?,
        })
    }

    /// Find column at x position (binary search). `None` outside the grid.
    pub fn col_at_x(&self, x: f64) -> Option<usize> {
        index_at(&self.x_coords, x)
    }

    /// Find row index at y position (binary search). `None` outside the grid.
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        index_at(&self.y_coords, y)
    }

    /// Row indices whose extent intersects `[top, bottom]`.
    ///
    /// A row touching the window only at an edge is excluded.
    pub fn rows_in(&self, top: f64, bottom: f64) -> Range<usize> {
        span_in(&self.y_coords, top, bottom)
    }

    /// Column indices whose extent intersects `[left, right]`.
    pub fn cols_in(&self, left: f64, right: f64) -> Range<usize> {
        span_in(&self.x_coords, left, right)
    }

    /// Column whose right boundary lies within `tolerance` of `x`.
    ///
    /// The left edge of the grid (boundary 0) is not a resize handle. When two
    /// boundaries are in range the nearer one wins.
    pub fn resize_handle_at(&self, x: f64, tolerance: f64) -> Option<usize> {
        let boundaries = self.x_coords.get(1..)?;
        let split = boundaries.partition_point(|b| *b < x);
        let candidates = [split.checked_sub(1), Some(split)];
        candidates
            .into_iter()
            .flatten()
            .filter_map(|i| boundaries.get(i).map(|b| (i, (b - x).abs())))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

fn index_at(coords: &[f64], pos: f64) -> Option<usize> {
    let first = *coords.first()?;
    let last = *coords.last()?;
    if pos < first || pos >= last {
        return None;
    }
    // partition_point gives the first boundary strictly greater than pos
    let upper = coords.partition_point(|c| *c <= pos);
    upper.checked_sub(1)
}

fn span_in(coords: &[f64], start: f64, end: f64) -> Range<usize> {
    let count = coords.len().saturating_sub(1);
    // first cell whose far edge is past `start`
    let first = coords
        .get(1..)
        .map_or(0, |ends| ends.partition_point(|c| *c <= start));
    // first cell whose near edge is at or past `end`
    let last = coords
        .get(..count)
        .map_or(0, |starts| starts.partition_point(|c| *c < end));
    first.min(last)..last
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn widths(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    fn sample() -> CellInfo {
        compute_geometry(
            &headers(&["A", "B", "C"]),
            &widths(&[("A", 100.0), ("B", 200.0), ("C", 50.0)]),
            4,
            30.0,
            40.0,
        )
        .unwrap()
    }

    #[test]
    fn test_boundaries() {
        let info = sample();
        assert_eq!(info.x_coords, vec![0.0, 100.0, 300.0, 350.0]);
        assert_eq!(info.y_coords, vec![0.0, 40.0, 70.0, 100.0, 130.0, 160.0]);
        assert_eq!(info.total_width(), 350.0);
        assert_eq!(info.total_height(), 160.0);
        assert_eq!(info.data_row_count(), 4);
    }

    #[test]
    fn test_missing_width_is_an_error() {
        let err = compute_geometry(
            &headers(&["A", "Fare"]),
            &widths(&[("A", 100.0)]),
            1,
            30.0,
            40.0,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::MissingWidth(ref h) if h == "Fare"));
    }

    #[test]
    fn test_degenerate() {
        let empty = compute_geometry(&[], &HashMap::new(), 10, 30.0, 40.0).unwrap();
        assert!(empty.is_degenerate());
        let no_rows =
            compute_geometry(&headers(&["A"]), &widths(&[("A", 10.0)]), 0, 30.0, 40.0).unwrap();
        assert!(no_rows.is_degenerate());
        assert_eq!(no_rows.y_coords, vec![0.0, 40.0]);
    }

    #[test]
    fn test_col_at_x() {
        let info = sample();
        assert_eq!(info.col_at_x(0.0), Some(0));
        assert_eq!(info.col_at_x(99.9), Some(0));
        assert_eq!(info.col_at_x(100.0), Some(1));
        assert_eq!(info.col_at_x(349.0), Some(2));
        assert_eq!(info.col_at_x(350.0), None);
        assert_eq!(info.col_at_x(-1.0), None);
    }

    #[test]
    fn test_row_at_y() {
        let info = sample();
        assert_eq!(info.row_at_y(10.0), Some(0));
        assert_eq!(info.row_at_y(40.0), Some(1));
        assert_eq!(info.row_at_y(159.0), Some(4));
    }

    #[test]
    fn test_rows_in_window() {
        let info = sample();
        assert_eq!(info.rows_in(0.0, 160.0), 0..5);
        assert_eq!(info.rows_in(45.0, 75.0), 1..3);
        // touching only at the edge does not count
        assert_eq!(info.rows_in(70.0, 100.0), 2..3);
        assert_eq!(info.rows_in(500.0, 900.0), 5..5);
    }

    #[test]
    fn test_resize_handle_at() {
        let info = sample();
        assert_eq!(info.resize_handle_at(0.0, 5.0), None);
        assert_eq!(info.resize_handle_at(97.0, 5.0), Some(0));
        assert_eq!(info.resize_handle_at(104.0, 5.0), Some(0));
        assert_eq!(info.resize_handle_at(150.0, 5.0), None);
        assert_eq!(info.resize_handle_at(302.0, 5.0), Some(1));
        assert_eq!(info.resize_handle_at(353.0, 5.0), Some(2));
    }

    #[test]
    fn test_cell_rect() {
        let info = sample();
        let rect = info.cell_rect(2, 1).unwrap();
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.y, 70.0);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 30.0);
        assert!(info.cell_rect(9, 0).is_none());
    }
}
