//! Frame painting.
//!
//! Draws one full frame in a fixed order, in content space with the viewport
//! transform already applied:
//!
//! 1. clear the grid extent and the visible window
//! 2. row backgrounds (visible rows only)
//! 3. grid lines
//! 4. cell text, culled against the visible window and clipped to the cell
//! 5. header band, pinned vertically
//! 6. scrollbars, pinned to the viewport

use serde::Serialize;

use super::backend::{Surface, TextStyle};
use super::colors::{darken_css, palette, RowColors};
use crate::error::Result;
use crate::layout::{Axis, CellInfo, CellRect, ContentRect, Viewport};
use crate::types::{Dataset, GridConfig};

/// Everything a frame reads
#[derive(Debug, Clone, Copy)]
pub struct PaintParams<'a> {
    pub dataset: &'a Dataset,
    pub cell_info: &'a CellInfo,
    pub viewport: &'a Viewport,
    pub config: &'a GridConfig,
    pub row_colors: &'a RowColors,
    /// Scrollbar currently hovered or dragged, drawn highlighted
    pub active_scrollbar: Option<Axis>,
}

/// Counters for one painted frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    /// Data cells submitted to `fill_text`
    pub cells_drawn: usize,
    /// Data cells in visible rows skipped as outside the window
    pub cells_culled: usize,
    /// First visible data row
    pub first_row: usize,
    /// One past the last visible data row
    pub end_row: usize,
}

/// Result of running a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FrameOutcome {
    /// A full frame was drawn
    Painted(FrameStats),
    /// Nothing to draw (no columns or no rows); the surface was left untouched
    Skipped,
    /// No frame was pending
    Idle,
}

/// True when `rect` lies entirely outside `window`.
///
/// A cell that only touches the window edge counts as outside.
pub fn is_culled(rect: &CellRect, window: &ContentRect) -> bool {
    rect.right() <= window.left
        || rect.x >= window.right
        || rect.bottom() <= window.top
        || rect.y >= window.bottom
}

/// Paint one frame onto `surface`.
///
/// # Errors
/// Propagates surface failures.
pub fn paint_frame<S: Surface + ?Sized>(
    surface: &mut S,
    params: &PaintParams<'_>,
) -> Result<FrameOutcome> {
    let info = params.cell_info;
    if info.is_degenerate() {
        tracing::debug!(
            columns = info.column_count(),
            rows = info.data_row_count(),
            "degenerate grid, skipping frame"
        );
        return Ok(FrameOutcome::Skipped);
    }

    let window = params.viewport.visible_content_rect();
    let total_width = info.total_width();
    let total_height = info.total_height();

    // 1. clear
    let left = window.left.min(0.0);
    let top = window.top.min(0.0);
    surface.clear_rect(
        left,
        top,
        window.right.max(total_width) - left,
        window.bottom.max(total_height) - top,
    );

    // row index 0 is the header band, painted last
    let visible = info.rows_in(window.top, window.bottom);
    let data_rows = visible.start.max(1)..visible.end.max(1);

    // 2. row backgrounds
    for row in data_rows.clone() {
        let (Some(&y), Some(&height), Some(record)) = (
            info.y_coords.get(row),
            info.heights.get(row),
            params.dataset.rows().get(row - 1),
        ) else {
            continue;
        };
        let color = params.row_colors.resolve(row - 1, record);
        surface.fill_rect(0.0, y, total_width, height, color);
    }

    // 3. grid lines
    for &x in &info.x_coords {
        surface.stroke_line(x, 0.0, x, total_height, palette::GRID_LINE);
    }
    let line_rows = visible.start..(visible.end + 1).min(info.y_coords.len());
    for &y in info.y_coords.get(line_rows).unwrap_or_default() {
        surface.stroke_line(0.0, y, total_width, y, palette::GRID_LINE);
    }

    // 4. cell text
    let cell_font = params.config.cell_font();
    let cell_style = TextStyle {
        font: &cell_font,
        color: palette::TEXT,
    };
    let mut stats = FrameStats {
        first_row: data_rows.start - 1,
        end_row: data_rows.end - 1,
        ..FrameStats::default()
    };
    for row in data_rows {
        for (col, header) in params.dataset.headers().iter().enumerate() {
            let Some(rect) = info.cell_rect(row, col) else {
                continue;
            };
            if is_culled(&rect, &window) {
                stats.cells_culled += 1;
                continue;
            }
            let text = params.dataset.value(row - 1, header).display_text();
            if text.is_empty() {
                continue;
            }
            draw_clipped_text(surface, &rect, &text, &cell_style)?;
            stats.cells_drawn += 1;
        }
    }

    // 5. header band
    paint_header(surface, params, &window)?;

    // 6. scrollbars
    paint_scrollbars(surface, params)?;

    tracing::debug!(
        drawn = stats.cells_drawn,
        culled = stats.cells_culled,
        first_row = stats.first_row,
        end_row = stats.end_row,
        "frame painted"
    );
    Ok(FrameOutcome::Painted(stats))
}

fn draw_clipped_text<S: Surface + ?Sized>(
    surface: &mut S,
    rect: &CellRect,
    text: &str,
    style: &TextStyle<'_>,
) -> Result<()> {
    surface.save();
    surface.clip_rect(rect.x, rect.y, rect.width, rect.height);
    let drawn = surface.fill_text(
        text,
        rect.x + rect.width / 2.0,
        rect.y + rect.height / 2.0,
        style,
    );
    surface.restore();
    drawn
}

/// Header band at content y = `offset_y`, so it stays put while rows scroll
/// under it but pans horizontally with the data.
fn paint_header<S: Surface + ?Sized>(
    surface: &mut S,
    params: &PaintParams<'_>,
    window: &ContentRect,
) -> Result<()> {
    let info = params.cell_info;
    let offset_y = params.viewport.offset_y;
    let total_width = info.total_width();
    let header_height = info.header_height;

    surface.save();
    surface.translate(0.0, offset_y)?;
    surface.fill_rect(
        0.0,
        0.0,
        total_width,
        header_height,
        palette::HEADER_BACKGROUND,
    );

    let header_font = params.config.header_font();
    let style = TextStyle {
        font: &header_font,
        color: palette::TEXT,
    };
    // the band sits at the top of the window, only horizontal culling applies
    let pinned = ContentRect {
        top: 0.0,
        bottom: header_height,
        ..*window
    };
    let mut result = Ok(());
    for (col, header) in params.dataset.headers().iter().enumerate() {
        let Some(rect) = info.cell_rect(0, col) else {
            continue;
        };
        if is_culled(&rect, &pinned) {
            continue;
        }
        result = draw_clipped_text(surface, &rect, header, &style);
        if result.is_err() {
            break;
        }
    }

    if result.is_ok() {
        for &x in &info.x_coords {
            surface.stroke_line(x, 0.0, x, header_height, palette::GRID_LINE);
        }
        surface.stroke_line(0.0, 0.0, total_width, 0.0, palette::GRID_LINE);
        surface.stroke_line(
            0.0,
            header_height,
            total_width,
            header_height,
            palette::GRID_LINE,
        );
    }
    surface.restore();
    result
}

/// Track and thumb for every overflowing axis, in viewport-fixed content space.
fn paint_scrollbars<S: Surface + ?Sized>(surface: &mut S, params: &PaintParams<'_>) -> Result<()> {
    let viewport = params.viewport;
    let info = params.cell_info;
    let thickness = params.config.scrollbar_thickness;
    let view_width = viewport.viewport_width();
    let view_height = viewport.viewport_height();

    surface.save();
    if let Err(err) = surface.translate(viewport.offset_x, viewport.offset_y) {
        surface.restore();
        return Err(err);
    }
    for axis in [Axis::Vertical, Axis::Horizontal] {
        let Some(thumb) = viewport.thumb(info, axis) else {
            continue;
        };
        let thumb_color = if params.active_scrollbar == Some(axis) {
            darken_css(palette::SCROLLBAR_THUMB, palette::SCROLLBAR_THUMB_ACTIVE_DARKEN)
        } else {
            palette::SCROLLBAR_THUMB.to_string()
        };
        match axis {
            Axis::Vertical => {
                let x = view_width - thickness;
                surface.fill_rect(x, 0.0, thickness, view_height, palette::SCROLLBAR_TRACK);
                surface.fill_rect(x, thumb.position, thickness, thumb.length, &thumb_color);
            }
            Axis::Horizontal => {
                let y = view_height - thickness;
                surface.fill_rect(0.0, y, view_width, thickness, palette::SCROLLBAR_TRACK);
                surface.fill_rect(thumb.position, y, thumb.length, thickness, &thumb_color);
            }
        }
    }
    surface.restore();
    Ok(())
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

    fn window() -> ContentRect {
        ContentRect {
            left: 100.0,
            top: 0.0,
            right: 500.0,
            bottom: 300.0,
        }
    }

    fn rect(x: f64, width: f64) -> CellRect {
        CellRect {
            x,
            y: 50.0,
            width,
            height: 30.0,
        }
    }

    #[test]
    fn test_culling_edges() {
        let window = window();
        assert!(is_culled(&rect(0.0, 50.0), &window));
        assert!(is_culled(&rect(0.0, 100.0), &window));
        assert!(!is_culled(&rect(80.0, 40.0), &window));
        assert!(!is_culled(&rect(480.0, 40.0), &window));
        assert!(is_culled(&rect(500.0, 40.0), &window));
        assert!(is_culled(&rect(600.0, 40.0), &window));
    }
}
