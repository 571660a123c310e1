//! Rendering engine with pluggable surfaces.
//!
//! This module provides:
//! - The [`Surface`] drawing trait and its Canvas 2D and recording implementations
//! - Frame coalescing via dirty flags ([`RenderScheduler`])
//! - The fixed-order frame painter ([`paint_frame`])
//! - Row color policies and the color palette

pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod paint;
pub mod recording;
pub mod scheduler;

pub use backend::{Surface, TextStyle};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::{palette, CssColor, RowColors};
pub use paint::{is_culled, paint_frame, FrameOutcome, FrameStats, PaintParams};
pub use recording::{DrawOp, RecordingSurface};
pub use scheduler::{DirtyFlags, Frame, RenderScheduler};
