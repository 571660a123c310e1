//! Canvas 2D surface.
//!
//! Wraps an `HtmlCanvasElement` and its 2D context. Fill, stroke and font
//! state is cached so repeated calls with the same style skip the JS setter.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::{Surface, TextStyle};
use crate::error::{GridError, Result};
use crate::layout::SurfaceSize;

fn js_err(op: &str, err: &JsValue) -> GridError {
    GridError::Render(format!("{op}: {err:?}"))
}

/// [`Surface`] backed by a browser canvas
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    fill: String,
    stroke: String,
    font: String,
}

impl CanvasSurface {
    /// Create a surface from a canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| js_err("getContext", &e))?
            .ok_or_else(|| GridError::Render("No 2d context available".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("Failed to cast to CanvasRenderingContext2d".to_string()))?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_line_width(1.0);

        Ok(Self {
            canvas,
            ctx,
            fill: String::new(),
            stroke: String::new(),
            font: String::new(),
        })
    }

    /// The bound canvas element
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_fill(&mut self, color: &str) {
        if self.fill != color {
            self.ctx.set_fill_style_str(color);
            color.clone_into(&mut self.fill);
        }
    }

    fn set_stroke(&mut self, color: &str) {
        if self.stroke != color {
            self.ctx.set_stroke_style_str(color);
            color.clone_into(&mut self.stroke);
        }
    }

    fn set_font(&mut self, font: &str) {
        if self.font != font {
            self.ctx.set_font(font);
            font.clone_into(&mut self.font);
        }
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, size: &SurfaceSize) {
        // Setting the buffer size resets all context state
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.css_width));
        let _ = style.set_property("height", &format!("{}px", size.css_height));

        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_line_width(1.0);
        self.fill.clear();
        self.stroke.clear();
        self.font.clear();
    }

    fn reset_transform(&mut self) -> Result<()> {
        self.ctx
            .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .map_err(|e| js_err("setTransform", &e))
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.scale(x, y).map_err(|e| js_err("scale", &e))
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.translate(x, y).map_err(|e| js_err("translate", &e))
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
        // restore() may bring back any earlier style
        self.fill.clear();
        self.stroke.clear();
        self.font.clear();
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_fill(color);
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str) {
        self.set_stroke(color);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.stroke();
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.begin_path();
        self.ctx.rect(x, y, width, height);
        self.ctx.clip();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) -> Result<()> {
        self.set_font(style.font);
        self.set_fill(style.color);
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| js_err("fillText", &e))
    }
}
