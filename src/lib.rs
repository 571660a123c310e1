//! datagrid - canvas data grid for the web
//!
//! Lays out, scrolls and paints large tabular datasets on a 2D canvas via
//! WebAssembly, without one DOM node per cell:
//! - Column/row geometry from configured widths and a uniform row height
//! - Pixel-density aware surface sizing and coordinate transforms
//! - Frame-coalesced repaints with vertical culling
//! - Column resizing and scrollbar dragging, pinned header band
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DataTable } from 'datagrid';
//! await init();
//! const table = new DataTable(canvas, 800, 600, devicePixelRatio, {
//!   widths: { Name: 200, Age: 80 },
//! });
//! table.setData({ headers: ['Name', 'Age'], rows });
//! canvas.addEventListener('scroll-changed', (e) => console.log(e.detail));
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use datagrid::{Dataset, GridConfig, GridView, RecordingSurface};
//!
//! let config = GridConfig::default().with_width("Name", 200.0);
//! let mut view = GridView::new(config)?;
//! view.set_dataset(Dataset::from_json(r#"{"headers":["Name"],"rows":[{"Name":"Ada"}]}"#)?);
//! view.resize(800.0, 600.0, 1.0);
//! let mut surface = RecordingSurface::new();
//! view.run_frame(&mut surface)?;
//! assert!(surface.texts().contains(&"Ada"));
//! # Ok::<(), datagrid::GridError>(())
//! ```

pub mod error;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use layout::{compute_geometry, lowest_fraction, Axis, CellInfo, Viewport};
pub use render::{DirtyFlags, DrawOp, FrameOutcome, RecordingSurface, RowColors, Surface};
pub use types::*;
pub use viewer::{CellHit, Cursor, GridView, Interaction, ScrollChanged};

#[cfg(target_arch = "wasm32")]
pub use viewer::DataTable;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
