//! Scroll offset changes and the notifications they produce.

use serde::Serialize;

use super::GridView;
use crate::render::DirtyFlags;

/// Emitted after every committed scroll offset change
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollChanged {
    /// Horizontal offset in content units
    pub scroll_x: f64,
    /// Vertical offset in content units
    pub scroll_y: f64,
    /// Backing surface width in device pixels
    pub surface_width: u32,
    /// Backing surface height in device pixels
    pub surface_height: u32,
    /// Device pixel ratio in effect
    pub pixel_ratio: f64,
}

impl GridView {
    /// Scroll by a delta in content units, clamped per axis.
    ///
    /// Returns true if either offset changed. Does nothing (and returns false)
    /// while the geometry cannot be computed.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64) -> bool {
        if !self.layout_ready() {
            return false;
        }
        let Some(info) = self.cell_info.as_ref() else {
            return false;
        };
        let changed = self
            .viewport
            .scroll_by(delta_x, delta_y, info, self.config.scrollbar_thickness);
        if changed {
            self.commit_scroll();
        }
        changed
    }

    /// Scroll to an absolute position in content units, clamped per axis.
    ///
    /// Returns true if either offset changed.
    pub fn set_scroll(&mut self, x: f64, y: f64) -> bool {
        if !self.layout_ready() {
            return false;
        }
        let Some(info) = self.cell_info.as_ref() else {
            return false;
        };
        let changed = self
            .viewport
            .set_scroll(x, y, info, self.config.scrollbar_thickness);
        if changed {
            self.commit_scroll();
        }
        changed
    }

    /// Current `(offset_x, offset_y)`
    pub fn scroll_offset(&self) -> (f64, f64) {
        (self.viewport.offset_x, self.viewport.offset_y)
    }

    /// Drain the notifications queued since the last call
    pub fn take_scroll_events(&mut self) -> Vec<ScrollChanged> {
        std::mem::take(&mut self.scroll_events)
    }

    /// Re-clamp both offsets against the current geometry, committing any change
    pub(super) fn reclamp_scroll(&mut self) {
        let Some(info) = self.cell_info.as_ref() else {
            return;
        };
        let before = self.scroll_offset();
        self.viewport
            .clamp_scroll(info, self.config.scrollbar_thickness);
        let (x, y) = self.scroll_offset();
        if (x - before.0).abs() > f64::EPSILON || (y - before.1).abs() > f64::EPSILON {
            self.commit_scroll();
        }
    }

    /// Record a committed offset change and request a transform rebuild
    fn commit_scroll(&mut self) {
        let event = ScrollChanged {
            scroll_x: self.viewport.offset_x,
            scroll_y: self.viewport.offset_y,
            surface_width: self.viewport.surface.width,
            surface_height: self.viewport.surface.height,
            pixel_ratio: self.viewport.pixel_ratio,
        };
        tracing::debug!(x = event.scroll_x, y = event.scroll_y, "scroll committed");
        self.scroll_events.push(event);
        self.request_render(DirtyFlags::TRANSFORM);
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
    fn test_scroll_changed_json_shape() {
        let event = ScrollChanged {
            scroll_x: 10.0,
            scroll_y: 20.0,
            surface_width: 800,
            surface_height: 600,
            pixel_ratio: 2.0,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "scrollX": 10.0,
                "scrollY": 20.0,
                "surfaceWidth": 800,
                "surfaceHeight": 600,
                "pixelRatio": 2.0
            })
        );
    }
}
