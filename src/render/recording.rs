//! In-memory surface that records every drawing call.
//!
//! Used by the test suite to assert paint order, culling and transforms, and
//! by the CLI to dump a frame as JSON.

use serde::Serialize;

use super::backend::{Surface, TextStyle};
use crate::error::Result;
use crate::layout::SurfaceSize;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "camelCase")]
pub enum DrawOp {
    Resize {
        width: u32,
        height: u32,
    },
    ResetTransform,
    Scale(f64, f64),
    Translate(f64, f64),
    Save,
    Restore,
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        color: String,
    },
    Clip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
    },
}

/// Surface that appends each call to a list
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    size: Option<SurfaceSize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the surface empty
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Last size passed to `resize`
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    /// Text of every `fill_text` call, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls matching a predicate
    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: &SurfaceSize) {
        self.size = Some(*size);
        self.ops.push(DrawOp::Resize {
            width: size.width,
            height: size.height,
        });
    }

    fn reset_transform(&mut self) -> Result<()> {
        self.ops.push(DrawOp::ResetTransform);
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.ops.push(DrawOp::Scale(x, y));
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.ops.push(DrawOp::Translate(x, y));
        Ok(())
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str) {
        self.ops.push(DrawOp::Line {
            x0,
            y0,
            x1,
            y1,
            color: color.to_string(),
        });
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Clip {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: style.font.to_string(),
            color: style.color.to_string(),
        });
        Ok(())
    }
}
