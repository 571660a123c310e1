//! Drawing surface trait for pluggable rendering targets.
//!
//! The paint pipeline only talks to [`Surface`], so the same frame can be
//! drawn onto an HTML canvas (see `render::canvas`) or captured by
//! [`RecordingSurface`](super::RecordingSurface) for tests and the CLI.

use crate::error::Result;
use crate::layout::SurfaceSize;

/// Font and color used for one `fill_text` call.
///
/// Text is always centered horizontally and vertically on the given point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    /// CSS font shorthand, e.g. `"bold 12px Arial"`
    pub font: &'a str,
    /// CSS color
    pub color: &'a str,
}

/// Canvas-2D-like immediate mode drawing target
///
/// Coordinates passed to the drawing calls are in the space set up by the
/// transform calls; the transform persists across frames until reset.
pub trait Surface {
    /// Resize the backing store. Implementations may reset their transform.
    fn resize(&mut self, size: &SurfaceSize);

    /// Replace the current transform with identity
    fn reset_transform(&mut self) -> Result<()>;

    /// Post-multiply the transform by a scale
    fn scale(&mut self, x: f64, y: f64) -> Result<()>;

    /// Post-multiply the transform by a translation
    fn translate(&mut self, x: f64, y: f64) -> Result<()>;

    /// Push transform and clip state
    fn save(&mut self);

    /// Pop transform and clip state
    fn restore(&mut self);

    /// Clear a rectangle to transparent
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    /// Stroke a 1px line
    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str);

    /// Intersect the clip region with a rectangle
    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Draw text centered on `(x, y)`
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) -> Result<()>;
}
