//! Property-based tests for geometry and scrolling.
//!
//! Properties under test:
//! - every boundary is the sum of the sizes before it
//! - scroll offsets stay within `[0, max]` whatever the input sequence
//! - painted text never comes from a row outside the visible window

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use common::{frame, view};
use datagrid::layout::prefix_sums;
use datagrid::{compute_geometry, Axis};
use proptest::prelude::*;
use std::collections::HashMap;

// ===== Arbitrary Strategies =====

/// One input a user can produce
#[derive(Debug, Clone)]
enum Input {
    Wheel { dx: f64, dy: f64, shift: bool },
    Drag { x: f64, y: f64, to_x: f64, to_y: f64 },
    Resize { width: f64, height: f64 },
    ColumnWidth { col: usize, width: f64 },
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        (-2000.0..2000.0f64, -2000.0..2000.0f64, any::<bool>())
            .prop_map(|(dx, dy, shift)| Input::Wheel { dx, dy, shift }),
        (0.0..300.0f64, 0.0..200.0f64, -500.0..500.0f64, -500.0..500.0f64)
            .prop_map(|(x, y, to_x, to_y)| Input::Drag { x, y, to_x, to_y }),
        (50.0..1200.0f64, 50.0..900.0f64)
            .prop_map(|(width, height)| Input::Resize { width, height }),
        (0usize..5, 1.0..1500.0f64).prop_map(|(col, width)| Input::ColumnWidth { col, width }),
    ]
}

fn arb_sizes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0f64, 0..50)
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_boundaries_are_prefix_sums(sizes in arb_sizes()) {
        let coords = prefix_sums(&sizes);
        prop_assert_eq!(coords.len(), sizes.len() + 1);
        prop_assert_eq!(coords[0], 0.0);
        for (i, size) in sizes.iter().enumerate() {
            prop_assert!(coords[i + 1] >= coords[i]);
            prop_assert!((coords[i + 1] - coords[i] - size).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_geometry_matches_widths(sizes in arb_sizes(), rows in 0usize..200) {
        let headers: Vec<String> = (0..sizes.len()).map(|i| format!("c{i}")).collect();
        let widths: HashMap<String, f64> =
            headers.iter().cloned().zip(sizes.iter().copied()).collect();
        let info = compute_geometry(&headers, &widths, rows, 30.0, 40.0).unwrap();
        prop_assert_eq!(info.x_coords.len(), sizes.len() + 1);
        prop_assert_eq!(info.y_coords.len(), rows + 2);
        prop_assert!((info.total_height() - (40.0 + 30.0 * rows as f64)).abs() < 1e-6);
        for x in &info.x_coords[..sizes.len()] {
            prop_assert_eq!(info.col_at_x(*x).map(|c| info.x_coords[c]), Some(*x));
        }
    }

    #[test]
    fn prop_scroll_stays_in_range(inputs in prop::collection::vec(arb_input(), 1..30)) {
        let mut view = view(100, 300.0, 200.0);
        for input in inputs {
            match input {
                Input::Wheel { dx, dy, shift } => {
                    view.wheel(dx, dy, shift);
                }
                Input::Drag { x, y, to_x, to_y } => {
                    view.pointer_down(x, y);
                    view.pointer_move(to_x, to_y);
                    view.pointer_up();
                }
                Input::Resize { width, height } => {
                    view.resize(width, height, 1.0);
                }
                Input::ColumnWidth { col, width } => {
                    let header = view.dataset().headers()[col].clone();
                    view.set_column_width(&header, width);
                }
            }
            // a frame re-clamps after geometry or size changes
            frame(&mut view);

            let info = view.cell_info().unwrap().clone();
            let thickness = view.config().scrollbar_thickness;
            let viewport = view.viewport();
            let (x, y) = view.scroll_offset();
            prop_assert!(x >= 0.0 && y >= 0.0);
            prop_assert!(x <= viewport.max_offset(&info, Axis::Horizontal, thickness) + 1e-9);
            prop_assert!(y <= viewport.max_offset(&info, Axis::Vertical, thickness) + 1e-9);
            for width in view.config().widths.values() {
                prop_assert!((20.0..=1000.0).contains(width));
            }
        }
    }

    #[test]
    fn prop_painted_rows_are_visible(offset in 0.0..3000.0f64) {
        let mut view = view(100, 300.0, 200.0);
        view.set_scroll(0.0, offset);
        let surface = frame(&mut view);
        let (_, y) = view.scroll_offset();
        // data row r spans 40 + 30r .. 70 + 30r; the window is y - 0.5 .. y + 199.5
        for text in surface.texts() {
            if let Some(index) = text.strip_prefix("Passenger ") {
                let r: f64 = index.parse().unwrap();
                prop_assert!(70.0 + 30.0 * r > y - 0.5);
                prop_assert!(40.0 + 30.0 * r < y + 199.5);
            }
        }
    }
}
