//! The grid engine and its browser host.
//!
//! [`GridView`] owns the dataset, configuration, geometry, viewport, gesture
//! state and frame scheduler. It is platform independent: hosts feed it
//! pointer/wheel/resize input, schedule a display frame whenever it asks for
//! one, and call [`GridView::run_frame`] with their drawing surface.
//!
//! On wasm32 the `DataTable` export in `host` binds a `GridView` to a canvas.

mod events;
#[cfg(target_arch = "wasm32")]
mod host;
mod scroll;

pub use events::{CellHit, Cursor, Interaction, RESIZE_TOLERANCE};
#[cfg(target_arch = "wasm32")]
pub use host::DataTable;
pub use scroll::ScrollChanged;

use crate::error::{GridError, Result};
use crate::layout::{compute_geometry, CellInfo, SurfaceSize, Viewport};
use crate::render::{
    paint_frame, DirtyFlags, FrameOutcome, PaintParams, RenderScheduler, RowColors, Surface,
};
use crate::types::{Dataset, GridConfig};

/// Grid engine state
#[derive(Debug)]
pub struct GridView {
    dataset: Dataset,
    config: GridConfig,
    row_colors: RowColors,
    /// `None` whenever an input of the geometry changed
    cell_info: Option<CellInfo>,
    viewport: Viewport,
    interaction: Interaction,
    scheduler: RenderScheduler,
    /// Surface size last pushed to the drawing surface
    applied_surface: Option<SurfaceSize>,
    scroll_events: Vec<ScrollChanged>,
}

impl GridView {
    /// Create an engine with an empty dataset.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`] for out-of-range settings.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let mut view = Self {
            dataset: Dataset::default(),
            row_colors: RowColors::from_config(config.row_colors.as_ref()),
            viewport: Viewport::new(),
            config,
            cell_info: None,
            interaction: Interaction::Idle,
            scheduler: RenderScheduler::new(),
            applied_surface: None,
            scroll_events: Vec::new(),
        };
        view.apply_density_options();
        view.request_render(DirtyFlags::GEOMETRY);
        Ok(view)
    }

    /// Replace the dataset. Geometry is invalidated and gestures are dropped.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        tracing::debug!(
            columns = dataset.column_count(),
            rows = dataset.row_count(),
            "dataset replaced"
        );
        self.dataset = dataset;
        self.interaction = Interaction::Idle;
        self.invalidate_geometry();
    }

    /// Replace the configuration.
    ///
    /// Row colors are resolved here; geometry, transform and paint are all
    /// marked dirty.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`] and keeps the previous configuration.
    pub fn reconfigure(&mut self, config: GridConfig) -> Result<()> {
        config.validate()?;
        self.row_colors = RowColors::from_config(config.row_colors.as_ref());
        self.config = config;
        self.apply_density_options();
        self.invalidate_geometry();
        Ok(())
    }

    /// Set the viewport size (CSS pixels) and device pixel ratio.
    ///
    /// The first call fixes the baseline ratio. Returns the new surface size;
    /// it is pushed to the drawing surface on the next frame.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> SurfaceSize {
        let size = self.viewport.resize(css_width, css_height, pixel_ratio);
        tracing::debug!(
            width = size.width,
            height = size.height,
            pixel_ratio,
            "viewport resized"
        );
        self.request_render(DirtyFlags::TRANSFORM);
        size
    }

    /// Set one column's width, clamped to the configured bounds.
    ///
    /// Returns true if the stored width changed.
    pub fn set_column_width(&mut self, header: &str, width: f64) -> bool {
        let width = self.config.clamp_width(width);
        let previous = self.config.widths.insert(header.to_string(), width);
        let changed = previous.map_or(true, |p| (p - width).abs() > f64::EPSILON);
        if changed {
            self.invalidate_geometry();
        }
        changed
    }

    /// Merge `dirty` into the pending frame.
    ///
    /// Returns true when no frame was pending and the host has to schedule one.
    pub fn request_render(&mut self, dirty: DirtyFlags) -> bool {
        if dirty.geometry {
            self.cell_info = None;
        }
        self.scheduler.request_render(dirty)
    }

    /// True while a frame is waiting to run
    pub fn frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Geometry for the current dataset and configuration, recomputed if stale.
    ///
    /// # Errors
    /// Returns [`GridError::MissingWidth`] if a header has no configured width.
    pub fn ensure_geometry(&mut self) -> Result<&CellInfo> {
        let info = match self.cell_info.take() {
            Some(info) => info,
            None => compute_geometry(
                self.dataset.headers(),
                &self.config.widths,
                self.dataset.row_count(),
                self.config.row_height,
                self.config.header_height,
            )?,
        };
        Ok(self.cell_info.insert(info))
    }

    /// Run the pending frame, if any.
    ///
    /// Processes the last queued pointer position, recomputes stale geometry,
    /// re-clamps the scroll offsets, pushes size and transform changes to the
    /// surface and repaints everything.
    ///
    /// # Errors
    /// Returns [`GridError::MissingWidth`] when the geometry cannot be computed
    /// (nothing is drawn), or a surface error.
    pub fn run_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<FrameOutcome> {
        let Some(frame) = self.scheduler.take_frame() else {
            return Ok(FrameOutcome::Idle);
        };
        let mut dirty = frame.dirty;
        if let Some((x, y)) = frame.pointer {
            self.pointer_move(x, y);
            // a move during a gesture requests a follow-up frame; fold it in
            if let Some(follow_up) = self.scheduler.take_frame() {
                dirty |= follow_up.dirty;
            }
        }
        if dirty.is_empty() {
            return Ok(FrameOutcome::Idle);
        }
        self.paint(surface, dirty)
    }

    /// Paint a full frame right away, bypassing the scheduler.
    ///
    /// # Errors
    /// As [`run_frame`](Self::run_frame).
    pub fn paint_now<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<FrameOutcome> {
        // a queued pointer stays pending for the next run_frame
        let pending = self.scheduler.dirty();
        self.paint(surface, pending | DirtyFlags::TRANSFORM)
    }

    fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S, dirty: DirtyFlags) -> Result<FrameOutcome> {
        if dirty.geometry {
            self.cell_info = None;
        }
        if let Err(err) = self.ensure_geometry() {
            tracing::error!(error = %err, "cannot lay out grid, skipping frame");
            return Err(err);
        }
        if dirty.geometry || dirty.transform {
            self.reclamp_scroll();
            // clamping may have requested a transform; this frame covers it
            self.scheduler.discharge(DirtyFlags::GEOMETRY);
        }

        let mut rebuild_transform = dirty.transform;
        if self.applied_surface != Some(self.viewport.surface) {
            surface.resize(&self.viewport.surface);
            self.applied_surface = Some(self.viewport.surface);
            rebuild_transform = true;
        }
        if rebuild_transform {
            self.viewport.apply_transform(surface)?;
        }

        let Some(cell_info) = self.cell_info.as_ref() else {
            return Err(GridError::Render("geometry unavailable".to_string()));
        };
        paint_frame(
            surface,
            &PaintParams {
                dataset: &self.dataset,
                cell_info,
                viewport: &self.viewport,
                config: &self.config,
                row_colors: &self.row_colors,
                active_scrollbar: self.interaction.active_scrollbar(),
            },
        )
    }

    /// Compute geometry if needed; logs and returns false when it cannot be.
    fn layout_ready(&mut self) -> bool {
        match self.ensure_geometry() {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "cannot lay out grid");
                false
            }
        }
    }

    fn invalidate_geometry(&mut self) {
        self.request_render(DirtyFlags::GEOMETRY);
    }

    fn apply_density_options(&mut self) {
        self.viewport.freeze_density = self.config.ignore_dpr;
        self.viewport.baseline_override = self.config.default_dpr;
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn row_colors(&self) -> &RowColors {
        &self.row_colors
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Cached geometry; `None` while stale
    pub fn cell_info(&self) -> Option<&CellInfo> {
        self.cell_info.as_ref()
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
    use crate::render::RecordingSurface;
    use crate::types::{CellValue, Row};

    fn view() -> GridView {
        let config = GridConfig::default()
            .with_width("Name", 200.0)
            .with_width("Age", 100.0);
        let mut view = GridView::new(config).unwrap();
        let rows: Vec<Row> = (0..50)
            .map(|i| {
                let mut row = Row::new();
                row.insert("Name".into(), CellValue::Text(format!("p{i}")));
                row.insert("Age".into(), CellValue::Number(f64::from(i)));
                row
            })
            .collect();
        view.set_dataset(Dataset::new(vec!["Name".into(), "Age".into()], rows).unwrap());
        view.resize(250.0, 300.0, 1.0);
        view
    }

    #[test]
    fn test_first_frame_paints() {
        let mut view = view();
        assert!(view.frame_pending());
        let mut surface = RecordingSurface::new();
        let outcome = view.run_frame(&mut surface).unwrap();
        assert!(matches!(outcome, FrameOutcome::Painted(_)));
        assert!(!view.frame_pending());
        assert_eq!(view.run_frame(&mut surface).unwrap(), FrameOutcome::Idle);
    }

    #[test]
    fn test_set_dataset_invalidates_geometry() {
        let mut view = view();
        view.ensure_geometry().unwrap();
        assert!(view.cell_info().is_some());
        view.set_dataset(Dataset::default());
        assert!(view.cell_info().is_none());
        assert!(view.frame_pending());
    }

    #[test]
    fn test_missing_width_fails_frame() {
        let mut view = view();
        view.reconfigure(GridConfig::default().with_width("Name", 10.0))
            .unwrap();
        let mut surface = RecordingSurface::new();
        let err = view.run_frame(&mut surface).unwrap_err();
        assert!(matches!(err, GridError::MissingWidth(ref h) if h == "Age"));
        assert!(surface.ops().is_empty());
        // interaction does not panic without geometry
        assert!(!view.scroll_by(0.0, 10.0));
        assert!(!view.pointer_down(10.0, 10.0));
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let mut view = view();
        let bad = GridConfig {
            row_height: -1.0,
            ..GridConfig::default()
        };
        assert!(view.reconfigure(bad).is_err());
        assert_eq!(view.config().row_height, 30.0);
    }

    #[test]
    fn test_set_column_width_clamps() {
        let mut view = view();
        assert!(view.set_column_width("Age", 5.0));
        assert_eq!(view.config().widths["Age"], view.config().min_col_width);
        assert!(!view.set_column_width("Age", 1.0));
    }
}
