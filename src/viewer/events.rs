//! Pointer and wheel handling for [`GridView`].
//!
//! At most one gesture is active at a time. Drag bookkeeping lives inside the
//! [`Interaction`] variants, so returning to `Idle` discards it.

use serde::Serialize;

use super::GridView;
use crate::layout::{Axis, CellInfo, Viewport};
use crate::render::DirtyFlags;

/// Distance (content px) from a column boundary that still grabs it
pub const RESIZE_TOLERANCE: f64 = 5.0;

/// Current gesture or hover target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Pointer is within [`RESIZE_TOLERANCE`] of the right edge of `col`
    HoverNearBoundary(usize),
    /// Dragging the right edge of `col`
    ResizingColumn {
        col: usize,
        initial_width: f64,
        initial_content_x: f64,
    },
    /// Pointer is over a scrollbar thumb
    HoverScrollbar(Axis),
    /// Dragging a scrollbar thumb; `last_screen` is the previous pointer
    /// position along the axis, in screen pixels
    DraggingScrollbar { axis: Axis, last_screen: f64 },
}

impl Interaction {
    /// True while a button is held down on a handle
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::ResizingColumn { .. } | Self::DraggingScrollbar { .. }
        )
    }

    /// Scrollbar drawn highlighted, if any
    pub fn active_scrollbar(&self) -> Option<Axis> {
        match self {
            Self::HoverScrollbar(axis) | Self::DraggingScrollbar { axis, .. } => Some(*axis),
            _ => None,
        }
    }
}

/// Pointer cursor the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    Default,
    ColResize,
    Grab,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ColResize => "col-resize",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// What lies under a screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellHit {
    /// A header cell
    Header { col: usize },
    /// A data cell; `row` indexes the dataset rows
    Cell { row: usize, col: usize },
}

fn along(axis: Axis, x: f64, y: f64) -> f64 {
    match axis {
        Axis::Horizontal => x,
        Axis::Vertical => y,
    }
}

/// Scrollbar whose thumb contains the viewport-fixed content point `(x, y)`
fn thumb_at(
    viewport: &Viewport,
    info: &CellInfo,
    thickness: f64,
    x: f64,
    y: f64,
) -> Option<Axis> {
    let width = viewport.viewport_width();
    let height = viewport.viewport_height();
    [Axis::Vertical, Axis::Horizontal]
        .into_iter()
        .find(|&axis| {
            let Some(thumb) = viewport.thumb(info, axis) else {
                return false;
            };
            match axis {
                Axis::Vertical => x >= width - thickness && x <= width && thumb.contains(y),
                Axis::Horizontal => y >= height - thickness && y <= height && thumb.contains(x),
            }
        })
}

impl GridView {
    /// Handle a pointer move immediately (screen pixels).
    ///
    /// Hosts that receive moves faster than they paint should prefer
    /// [`queue_pointer_move`](Self::queue_pointer_move).
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let dirty = match self.interaction {
            Interaction::ResizingColumn {
                col,
                initial_width,
                initial_content_x,
            } => {
                let (content_x, _) = self.viewport.screen_to_content(x, y);
                self.resize_column(col, initial_width + (content_x - initial_content_x))
            }
            Interaction::DraggingScrollbar { axis, last_screen } => {
                let pos = along(axis, x, y);
                self.interaction = Interaction::DraggingScrollbar {
                    axis,
                    last_screen: pos,
                };
                self.drag_scrollbar(axis, pos - last_screen)
            }
            _ => self.hover(x, y),
        };
        if !dirty.is_empty() {
            self.request_render(dirty);
        }
    }

    /// Queue a pointer move for the next frame; only the last position queued
    /// before the frame runs is processed.
    ///
    /// Returns true when the host has to schedule a frame.
    pub fn queue_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.scheduler.queue_pointer(x, y)
    }

    /// Handle a button press. Returns true if a gesture started.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        // the press may arrive without a preceding move
        let dirty = self.hover(x, y);
        let next = match self.interaction {
            Interaction::HoverScrollbar(axis) => Interaction::DraggingScrollbar {
                axis,
                last_screen: along(axis, x, y),
            },
            Interaction::HoverNearBoundary(col) => {
                let Some(initial_width) = self
                    .cell_info
                    .as_ref()
                    .and_then(|info| info.widths.get(col).copied())
                else {
                    return false;
                };
                let (initial_content_x, _) = self.viewport.screen_to_content(x, y);
                Interaction::ResizingColumn {
                    col,
                    initial_width,
                    initial_content_x,
                }
            }
            _ => {
                if !dirty.is_empty() {
                    self.request_render(dirty);
                }
                return false;
            }
        };
        tracing::debug!(?next, "gesture started");
        self.interaction = next;
        self.request_render(dirty | DirtyFlags::PAINT);
        true
    }

    /// Handle a button release anywhere. Always returns to `Idle`.
    ///
    /// Returns true if a gesture was in progress.
    pub fn pointer_up(&mut self) -> bool {
        // a move queued for the next frame is the gesture's last sample
        if self.interaction.is_dragging() {
            if let Some((x, y)) = self.scheduler.take_pointer() {
                self.pointer_move(x, y);
            }
        }
        let previous = std::mem::take(&mut self.interaction);
        if previous.is_dragging() {
            tracing::debug!(?previous, "gesture ended");
        }
        if previous.active_scrollbar().is_some() {
            self.request_render(DirtyFlags::PAINT);
        }
        previous.is_dragging()
    }

    /// Scroll by wheel deltas (content units).
    ///
    /// With `swap_axes` (shift held) the vertical delta drives horizontal
    /// scrolling and vice versa. Returns true only if an offset changed, so the
    /// host can let the page scroll once the grid hits a boundary.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, swap_axes: bool) -> bool {
        let (dx, dy) = if swap_axes {
            (delta_y, delta_x)
        } else {
            (delta_x, delta_y)
        };
        self.scroll_by(dx, dy)
    }

    /// Cursor for the current interaction state
    pub fn cursor(&self) -> Cursor {
        match self.interaction {
            Interaction::Idle => Cursor::Default,
            Interaction::HoverNearBoundary(_) | Interaction::ResizingColumn { .. } => {
                Cursor::ColResize
            }
            Interaction::HoverScrollbar(_) => Cursor::Grab,
            Interaction::DraggingScrollbar { .. } => Cursor::Grabbing,
        }
    }

    /// Header or data cell under a screen position
    pub fn cell_at(&mut self, x: f64, y: f64) -> Option<CellHit> {
        if !self.layout_ready() {
            return None;
        }
        let info = self.cell_info.as_ref()?;
        let (_, fixed_y) = self.viewport.screen_to_content_absolute(x, y);
        let (content_x, content_y) = self.viewport.screen_to_content(x, y);
        let col = info.col_at_x(content_x)?;
        // the header band is pinned over the first rows
        if (0.0..info.header_height).contains(&fixed_y) {
            return Some(CellHit::Header { col });
        }
        match info.row_at_y(content_y)? {
            0 => None,
            row => Some(CellHit::Cell { row: row - 1, col }),
        }
    }

    /// Re-evaluate the hover target at a screen position
    pub(super) fn hover(&mut self, x: f64, y: f64) -> DirtyFlags {
        if self.interaction.is_dragging() || !self.layout_ready() {
            return DirtyFlags::NONE;
        }
        let Some(info) = self.cell_info.as_ref() else {
            return DirtyFlags::NONE;
        };
        let (fixed_x, fixed_y) = self.viewport.screen_to_content_absolute(x, y);
        let next = match thumb_at(
            &self.viewport,
            info,
            self.config.scrollbar_thickness,
            fixed_x,
            fixed_y,
        ) {
            Some(axis) => Interaction::HoverScrollbar(axis),
            None => {
                let (content_x, _) = self.viewport.screen_to_content(x, y);
                info.resize_handle_at(content_x, RESIZE_TOLERANCE)
                    .map_or(Interaction::Idle, Interaction::HoverNearBoundary)
            }
        };
        let repaint = next.active_scrollbar() != self.interaction.active_scrollbar();
        self.interaction = next;
        if repaint {
            DirtyFlags::PAINT
        } else {
            DirtyFlags::NONE
        }
    }

    fn resize_column(&mut self, col: usize, width: f64) -> DirtyFlags {
        let Some(header) = self.dataset.headers().get(col).cloned() else {
            return DirtyFlags::NONE;
        };
        if self.set_column_width(&header, width) {
            DirtyFlags::GEOMETRY
        } else {
            DirtyFlags::NONE
        }
    }

    /// Scroll along one axis by a thumb movement of `delta_screen` pixels
    fn drag_scrollbar(&mut self, axis: Axis, delta_screen: f64) -> DirtyFlags {
        if !self.layout_ready() {
            return DirtyFlags::NONE;
        }
        let Some(info) = self.cell_info.as_ref() else {
            return DirtyFlags::NONE;
        };
        let view = self.viewport.viewport_extent(axis);
        if view <= 0.0 {
            return DirtyFlags::NONE;
        }
        let delta = delta_screen
            * self.viewport.screen_to_content_scale()
            * (Viewport::content_extent(info, axis) / view);
        let (dx, dy) = match axis {
            Axis::Horizontal => (delta, 0.0),
            Axis::Vertical => (0.0, delta),
        };
        // scroll_by requests the frame itself
        self.scroll_by(dx, dy);
        DirtyFlags::NONE
    }
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

    #[test]
    fn test_cursor_css() {
        assert_eq!(Cursor::ColResize.as_css(), "col-resize");
        assert_eq!(Cursor::Grabbing.as_css(), "grabbing");
    }

    #[test]
    fn test_idle_is_default() {
        let idle = Interaction::default();
        assert_eq!(idle, Interaction::Idle);
        assert!(!idle.is_dragging());
        assert_eq!(idle.active_scrollbar(), None);
    }

    #[test]
    fn test_active_scrollbar() {
        let drag = Interaction::DraggingScrollbar {
            axis: Axis::Vertical,
            last_screen: 10.0,
        };
        assert!(drag.is_dragging());
        assert_eq!(drag.active_scrollbar(), Some(Axis::Vertical));
        assert_eq!(
            Interaction::HoverScrollbar(Axis::Horizontal).active_scrollbar(),
            Some(Axis::Horizontal)
        );
    }
}
