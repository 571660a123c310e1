//! Viewport state: pixel density, scroll offsets and coordinate transforms.
//!
//! Four coordinate spaces meet here:
//! - screen: CSS pixels relative to the surface's top-left corner (pointer events)
//! - device: physical pixels of the backing surface
//! - content: the unscrolled grid, in units of the baseline density
//! - scrolled content: content shifted by the scroll offset (what is drawn)
//!
//! Content maps to device pixels through `scale = ratio / baseline`, after a
//! half-pixel shift that puts 1px strokes on the pixel grid.

use super::fraction::{backing_extent, lowest_fraction};
use super::CellInfo;
use crate::error::Result;
use crate::render::Surface;

/// Half-pixel alignment shift applied before scrolling.
pub const PIXEL_ALIGN: f64 = 0.5;

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Left/right scrolling, scrollbar along the bottom edge
    Horizontal,
    /// Up/down scrolling, scrollbar along the right edge
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Backing-surface dimensions derived from the viewport size and pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    /// Displayed width in CSS pixels
    pub css_width: f64,
    /// Displayed height in CSS pixels
    pub css_height: f64,
}

/// Axis-aligned rectangle in content space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Position and length of a scrollbar thumb along its track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thumb {
    /// Offset of the thumb from the start of the track
    pub position: f64,
    /// Thumb length along the track
    pub length: f64,
}

impl Thumb {
    /// True if `pos` (along the track) falls on the thumb
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.position && pos <= self.position + self.length
    }
}

/// Viewport state - represents the visible window onto the grid
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal scroll offset in content coordinates
    pub offset_x: f64,
    /// Vertical scroll offset in content coordinates
    pub offset_y: f64,
    /// Device pixel ratio currently in effect
    pub pixel_ratio: f64,
    /// Requested viewport width in CSS pixels
    pub css_width: f64,
    /// Requested viewport height in CSS pixels
    pub css_height: f64,
    /// Backing surface derived at the last resize
    pub surface: SurfaceSize,
    /// Skip density scaling of the drawing transform
    pub freeze_density: bool,
    /// Explicit baseline ratio, takes precedence over the one captured on attach
    pub baseline_override: Option<f64>,
    baseline: Option<f64>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create an unattached viewport (no baseline captured yet)
    pub fn new() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            pixel_ratio: 1.0,
            css_width: 0.0,
            css_height: 0.0,
            surface: SurfaceSize {
                width: 0,
                height: 0,
                css_width: 0.0,
                css_height: 0.0,
            },
            freeze_density: false,
            baseline_override: None,
            baseline: None,
        }
    }

    /// True once a baseline pixel ratio has been fixed
    pub fn is_attached(&self) -> bool {
        self.baseline.is_some() || self.baseline_override.is_some()
    }

    /// Baseline pixel ratio used to normalise content coordinates
    pub fn baseline_ratio(&self) -> f64 {
        self.baseline_override
            .filter(|r| r.is_finite() && *r > 0.0)
            .or(self.baseline)
            .unwrap_or(self.pixel_ratio)
    }

    /// Device pixels per content unit
    pub fn scale(&self) -> f64 {
        if self.freeze_density {
            1.0
        } else {
            self.pixel_ratio / self.baseline_ratio()
        }
    }

    /// Resize the backing surface for a new viewport size or pixel ratio.
    ///
    /// The first call fixes the baseline ratio. Safe to call before any other
    /// setup: everything is re-derived from the arguments.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> SurfaceSize {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        if self.baseline.is_none() {
            self.baseline = Some(pixel_ratio);
        }
        self.pixel_ratio = pixel_ratio;
        self.css_width = css_width.max(0.0);
        self.css_height = css_height.max(0.0);

        let ratio = lowest_fraction(pixel_ratio);
        let (width, display_width) = backing_extent(self.css_width, ratio);
        let (height, display_height) = backing_extent(self.css_height, ratio);
        self.surface = SurfaceSize {
            width,
            height,
            css_width: display_width,
            css_height: display_height,
        };
        self.surface
    }

    /// Visible width in content units
    pub fn viewport_width(&self) -> f64 {
        f64::from(self.surface.width) / self.scale()
    }

    /// Visible height in content units
    pub fn viewport_height(&self) -> f64 {
        f64::from(self.surface.height) / self.scale()
    }

    /// Visible extent along an axis in content units
    pub fn viewport_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.viewport_width(),
            Axis::Vertical => self.viewport_height(),
        }
    }

    /// Current scroll offset along an axis
    pub fn offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.offset_x,
            Axis::Vertical => self.offset_y,
        }
    }

    /// Content units per screen (CSS) pixel
    pub fn screen_to_content_scale(&self) -> f64 {
        self.pixel_ratio / self.scale()
    }

    /// Convert screen coordinates to content coordinates
    pub fn screen_to_content(&self, x: f64, y: f64) -> (f64, f64) {
        let (ax, ay) = self.screen_to_content_absolute(x, y);
        (ax + self.offset_x, ay + self.offset_y)
    }

    /// Convert screen coordinates to viewport-fixed content coordinates (no scroll)
    pub fn screen_to_content_absolute(&self, x: f64, y: f64) -> (f64, f64) {
        let k = self.screen_to_content_scale();
        (x * k - PIXEL_ALIGN, y * k - PIXEL_ALIGN)
    }

    /// Convert content coordinates to screen coordinates
    pub fn content_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let k = self.screen_to_content_scale();
        (
            (x - self.offset_x + PIXEL_ALIGN) / k,
            (y - self.offset_y + PIXEL_ALIGN) / k,
        )
    }

    /// Convert device pixel coordinates to content coordinates
    pub fn device_to_content(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = self.scale();
        (
            x / scale - PIXEL_ALIGN + self.offset_x,
            y / scale - PIXEL_ALIGN + self.offset_y,
        )
    }

    /// The content window currently shown on the surface
    pub fn visible_content_rect(&self) -> ContentRect {
        let (left, top) = self.device_to_content(0.0, 0.0);
        let (right, bottom) =
            self.device_to_content(f64::from(self.surface.width), f64::from(self.surface.height));
        ContentRect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rebuild the drawing transform from scratch.
    ///
    /// # Errors
    /// Propagates surface failures.
    pub fn apply_transform<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        surface.reset_transform()?;
        if !self.freeze_density {
            let scale = self.scale();
            surface.scale(scale, scale)?;
        }
        surface.translate(PIXEL_ALIGN, PIXEL_ALIGN)?;
        surface.translate(-self.offset_x, -self.offset_y)
    }

    /// Total content extent along an axis
    pub fn content_extent(info: &CellInfo, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => info.total_width(),
            Axis::Vertical => info.total_height(),
        }
    }

    /// True if content overflows the viewport along `axis` (a scrollbar is shown)
    pub fn scrollbar_visible(&self, info: &CellInfo, axis: Axis) -> bool {
        Self::content_extent(info, axis) > self.viewport_extent(axis)
    }

    /// Largest valid offset along `axis`.
    ///
    /// When the other axis shows a scrollbar the range grows by its thickness
    /// so the last row/column can be scrolled clear of it.
    pub fn max_offset(&self, info: &CellInfo, axis: Axis, scrollbar_thickness: f64) -> f64 {
        let reserve = if self.scrollbar_visible(info, axis.other()) {
            scrollbar_thickness
        } else {
            0.0
        };
        (Self::content_extent(info, axis) - self.viewport_extent(axis) + reserve).max(0.0)
    }

    /// Clamp both offsets to their valid range
    pub fn clamp_scroll(&mut self, info: &CellInfo, scrollbar_thickness: f64) {
        self.offset_x = clamp_offset(
            self.offset_x,
            self.max_offset(info, Axis::Horizontal, scrollbar_thickness),
        );
        self.offset_y = clamp_offset(
            self.offset_y,
            self.max_offset(info, Axis::Vertical, scrollbar_thickness),
        );
    }

    /// Scroll by delta amounts. Returns true if either offset changed.
    pub fn scroll_by(
        &mut self,
        delta_x: f64,
        delta_y: f64,
        info: &CellInfo,
        scrollbar_thickness: f64,
    ) -> bool {
        self.set_scroll(
            self.offset_x + delta_x,
            self.offset_y + delta_y,
            info,
            scrollbar_thickness,
        )
    }

    /// Set absolute scroll position. Returns true if either offset changed.
    pub fn set_scroll(&mut self, x: f64, y: f64, info: &CellInfo, scrollbar_thickness: f64) -> bool {
        let new_x = clamp_offset(x, self.max_offset(info, Axis::Horizontal, scrollbar_thickness));
        let new_y = clamp_offset(y, self.max_offset(info, Axis::Vertical, scrollbar_thickness));
        let changed = (new_x - self.offset_x).abs() > f64::EPSILON
            || (new_y - self.offset_y).abs() > f64::EPSILON;
        self.offset_x = new_x;
        self.offset_y = new_y;
        changed
    }

    /// Thumb geometry for an overflowing axis, in viewport-fixed content units
    pub fn thumb(&self, info: &CellInfo, axis: Axis) -> Option<Thumb> {
        if !self.scrollbar_visible(info, axis) {
            return None;
        }
        let content = Self::content_extent(info, axis);
        let view = self.viewport_extent(axis);
        Some(Thumb {
            position: (self.offset(axis) / content) * view,
            length: (view / content) * view,
        })
    }
}

fn clamp_offset(offset: f64, max: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.max(0.0).min(max.max(0.0))
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
    use crate::layout::compute_geometry;
    use crate::render::{DrawOp, RecordingSurface};
    use std::collections::HashMap;

    fn grid(cols: usize, rows: usize) -> CellInfo {
        let headers: Vec<String> = (0..cols).map(|c| format!("c{c}")).collect();
        let widths: HashMap<String, f64> = headers.iter().map(|h| (h.clone(), 100.0)).collect();
        compute_geometry(&headers, &widths, rows, 30.0, 40.0).unwrap()
    }

    #[test]
    fn test_resize_fixes_baseline_once() {
        let mut viewport = Viewport::new();
        assert!(!viewport.is_attached());
        let size = viewport.resize(800.0, 600.0, 2.0);
        assert_eq!((size.width, size.height), (1600, 1200));
        assert_eq!(viewport.baseline_ratio(), 2.0);
        assert_eq!(viewport.scale(), 1.0);

        viewport.resize(800.0, 600.0, 1.0);
        assert_eq!(viewport.baseline_ratio(), 2.0);
        assert_eq!(viewport.scale(), 0.5);
        assert_eq!(viewport.surface.width, 800);
    }

    #[test]
    fn test_baseline_override() {
        let mut viewport = Viewport::new();
        viewport.baseline_override = Some(1.0);
        viewport.resize(100.0, 100.0, 2.0);
        assert_eq!(viewport.scale(), 2.0);
        assert_eq!(viewport.viewport_width(), 100.0);
    }

    #[test]
    fn test_screen_to_content_round_trip() {
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0, 1.5);
        viewport.offset_x = 120.0;
        viewport.offset_y = 45.0;
        let (cx, cy) = viewport.screen_to_content(10.0, 20.0);
        assert!((cx - (10.0 * 1.5 - 0.5 + 120.0)).abs() < 1e-9);
        assert!((cy - (20.0 * 1.5 - 0.5 + 45.0)).abs() < 1e-9);
        let (sx, sy) = viewport.content_to_screen(cx, cy);
        assert!((sx - 10.0).abs() < 1e-9);
        assert!((sy - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_ignores_offset() {
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0, 1.0);
        viewport.offset_x = 300.0;
        assert_eq!(viewport.screen_to_content_absolute(10.0, 10.0), (9.5, 9.5));
        assert_eq!(viewport.screen_to_content(10.0, 10.0), (309.5, 9.5));
    }

    #[test]
    fn test_clamp_without_scrollbars() {
        let info = grid(2, 2);
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0, 1.0);
        assert!(!viewport.scroll_by(50.0, 50.0, &info, 20.0));
        assert_eq!((viewport.offset_x, viewport.offset_y), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_reserves_opposite_scrollbar() {
        // 10 columns x 100 = 1000 wide, 40 + 50 * 30 = 1540 tall
        let info = grid(10, 50);
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0, 1.0);
        viewport.scroll_by(10_000.0, 10_000.0, &info, 20.0);
        assert_eq!(viewport.offset_x, 1000.0 - 800.0 + 20.0);
        assert_eq!(viewport.offset_y, 1540.0 - 600.0 + 20.0);
        viewport.scroll_by(-99_999.0, -99_999.0, &info, 20.0);
        assert_eq!((viewport.offset_x, viewport.offset_y), (0.0, 0.0));
    }

    #[test]
    fn test_thumb_geometry() {
        let info = grid(2, 100); // 40 + 3000 = 3040 tall
        let mut viewport = Viewport::new();
        viewport.resize(400.0, 760.0, 1.0);
        assert!(viewport.thumb(&info, Axis::Horizontal).is_none());
        viewport.offset_y = 1520.0;
        let thumb = viewport.thumb(&info, Axis::Vertical).unwrap();
        assert_eq!(thumb.position, 380.0);
        assert_eq!(thumb.length, 190.0);
        assert!(thumb.contains(400.0));
        assert!(!thumb.contains(100.0));
    }

    #[test]
    fn test_apply_transform_sequence() {
        let mut viewport = Viewport::new();
        viewport.baseline_override = Some(1.0);
        viewport.resize(100.0, 100.0, 2.0);
        viewport.offset_x = 30.0;
        viewport.offset_y = 10.0;
        let mut surface = RecordingSurface::new();
        viewport.apply_transform(&mut surface).unwrap();
        assert_eq!(
            surface.ops(),
            &[
                DrawOp::ResetTransform,
                DrawOp::Scale(2.0, 2.0),
                DrawOp::Translate(0.5, 0.5),
                DrawOp::Translate(-30.0, -10.0),
            ]
        );
    }

    #[test]
    fn test_frozen_density_skips_scale() {
        let mut viewport = Viewport::new();
        viewport.freeze_density = true;
        viewport.baseline_override = Some(1.0);
        viewport.resize(100.0, 100.0, 2.0);
        let mut surface = RecordingSurface::new();
        viewport.apply_transform(&mut surface).unwrap();
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::Scale(..))));
        assert_eq!(viewport.viewport_width(), 200.0);
    }

    #[test]
    fn test_visible_content_rect() {
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0, 1.0);
        viewport.offset_x = 100.0;
        let rect = viewport.visible_content_rect();
        assert_eq!(rect.left, 99.5);
        assert_eq!(rect.right, 899.5);
        assert_eq!(rect.top, -0.5);
        assert_eq!(rect.bottom, 599.5);
    }
}
