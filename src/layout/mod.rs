//! Layout engine for computing cell positions and viewport management.
//!
//! This module handles:
//! - Pre-computing column/row boundaries from widths and heights
//! - Managing viewport state (pixel density, scroll offsets, clamping)
//! - Transforming between screen, device and content coordinates
//! - Sizing the backing surface with lowest-terms pixel ratios

mod cell_info;
mod fraction;
mod viewport;

pub use cell_info::{compute_geometry, prefix_sums, CellInfo, CellRect};
pub use fraction::{backing_extent, lowest_fraction, FRACTION_EPSILON, MAX_DENOMINATOR};
pub use viewport::{Axis, ContentRect, SurfaceSize, Thumb, Viewport, PIXEL_ALIGN};
