//! Pointer, wheel and hit-test behavior of the grid engine.
//!
//! Fixture: 300 x 200 window at dpr 1; column boundaries at
//! 0, 100, 180, 380, 440, 500; both scrollbars shown. Screen x maps to
//! content x - 0.5 at offset 0.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{frame, view};
use datagrid::{Axis, CellHit, Cursor, Interaction};
use test_case::test_case;

fn width(view: &datagrid::GridView, header: &str) -> f64 {
    view.config().widths[header]
}

// =============================================================================
// COLUMN RESIZING
// =============================================================================

#[test]
fn test_hover_near_boundary() {
    let mut view = view(100, 300.0, 200.0);
    view.pointer_move(103.0, 20.0);
    assert_eq!(view.interaction(), &Interaction::HoverNearBoundary(0));
    assert_eq!(view.cursor(), Cursor::ColResize);

    view.pointer_move(140.0, 20.0);
    assert_eq!(view.interaction(), &Interaction::Idle);
    assert_eq!(view.cursor(), Cursor::Default);
}

#[test]
fn test_left_grid_edge_is_not_a_handle() {
    let mut view = view(100, 300.0, 200.0);
    view.pointer_move(1.0, 20.0);
    assert_eq!(view.interaction(), &Interaction::Idle);
}

#[test]
fn test_drag_resizes_column() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    assert!(view.pointer_down(100.5, 20.0));
    assert_eq!(
        view.interaction(),
        &Interaction::ResizingColumn {
            col: 0,
            initial_width: 100.0,
            initial_content_x: 100.0,
        }
    );

    view.pointer_move(130.5, 20.0);
    assert_eq!(width(&view, "PassengerId"), 130.0);
    assert!(view.frame_pending());
    frame(&mut view);
    assert_eq!(
        view.cell_info().unwrap().x_coords,
        vec![0.0, 130.0, 210.0, 410.0, 470.0, 530.0]
    );

    assert!(view.pointer_up());
    assert_eq!(view.interaction(), &Interaction::Idle);
}

#[test_case(0.5, 20.0 ; "clamped to minimum")]
#[test_case(2000.0, 1000.0 ; "clamped to maximum")]
fn test_resize_is_clamped(to_x: f64, expected: f64) {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.pointer_down(100.5, 20.0));
    view.pointer_move(to_x, 20.0);
    assert_eq!(width(&view, "PassengerId"), expected);
}

#[test]
fn test_resize_follows_scrolled_content() {
    let mut view = view(100, 300.0, 200.0);
    view.set_scroll(100.0, 0.0);
    // boundary at content 180 is at screen 80.5
    assert!(view.pointer_down(80.5, 20.0));
    assert!(matches!(
        view.interaction(),
        Interaction::ResizingColumn { col: 1, .. }
    ));
    view.pointer_move(100.5, 20.0);
    assert_eq!(width(&view, "Survived"), 100.0);
}

#[test]
fn test_release_outside_ends_gesture() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.pointer_down(100.5, 20.0));
    view.pointer_move(150.5, 20.0);
    // button released off the surface: the host forwards it anyway
    assert!(view.pointer_up());
    assert_eq!(view.interaction(), &Interaction::Idle);

    // later moves hover again instead of resizing
    view.pointer_move(60.0, 60.0);
    assert_eq!(width(&view, "PassengerId"), 150.0);
    assert_eq!(view.interaction(), &Interaction::Idle);
    assert!(!view.pointer_up());
}

#[test]
fn test_release_applies_queued_resize() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    assert!(view.pointer_down(100.5, 20.0));
    // the move is still waiting for the next frame when the button is released
    view.queue_pointer_move(130.5, 20.0);
    assert!(view.pointer_up());
    assert_eq!(width(&view, "PassengerId"), 130.0);

    frame(&mut view);
    assert_eq!(view.interaction(), &Interaction::Idle);
    assert_eq!(view.cell_info().unwrap().x_coords[1], 130.0);
}

#[test]
fn test_press_away_from_handles_is_ignored() {
    let mut view = view(100, 300.0, 200.0);
    assert!(!view.pointer_down(50.0, 60.0));
    assert_eq!(view.interaction(), &Interaction::Idle);
}

// =============================================================================
// SCROLLBAR DRAGGING
// =============================================================================

#[test]
fn test_hover_scrollbar_thumb() {
    let mut view = view(100, 300.0, 200.0);
    view.pointer_move(290.0, 5.0);
    assert_eq!(view.interaction(), &Interaction::HoverScrollbar(Axis::Vertical));
    assert_eq!(view.cursor(), Cursor::Grab);

    // on the track but off the thumb
    view.pointer_move(290.0, 100.0);
    assert_eq!(view.interaction(), &Interaction::Idle);
}

#[test]
fn test_drag_vertical_thumb_scrolls_proportionally() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.pointer_down(290.0, 5.0));
    assert_eq!(view.cursor(), Cursor::Grabbing);

    // 10 px of thumb travel is 10 * 3040 / 200 content units
    view.pointer_move(290.0, 15.0);
    assert_eq!(view.scroll_offset(), (0.0, 152.0));
    view.pointer_move(290.0, 10.0);
    assert_eq!(view.scroll_offset(), (0.0, 76.0));

    assert!(view.pointer_up());
    assert_eq!(view.cursor(), Cursor::Default);
}

#[test]
fn test_release_applies_queued_thumb_drag() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    assert!(view.pointer_down(290.0, 5.0));
    view.queue_pointer_move(290.0, 15.0);
    assert!(view.pointer_up());
    frame(&mut view);
    assert_eq!(view.scroll_offset(), (0.0, 152.0));
    assert_eq!(view.interaction(), &Interaction::Idle);
}

#[test]
fn test_drag_horizontal_thumb() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.pointer_down(50.0, 190.0));
    assert!(matches!(
        view.interaction(),
        Interaction::DraggingScrollbar {
            axis: Axis::Horizontal,
            ..
        }
    ));
    // 30 px of thumb travel is 30 * 500 / 300 content units
    view.pointer_move(80.0, 150.0);
    assert_eq!(view.scroll_offset(), (50.0, 0.0));
}

#[test]
fn test_thumb_drag_is_clamped() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.pointer_down(290.0, 5.0));
    view.pointer_move(290.0, 5000.0);
    assert_eq!(view.scroll_offset().1, 2860.0);
    view.pointer_move(290.0, -5000.0);
    assert_eq!(view.scroll_offset().1, 0.0);
}

// =============================================================================
// WHEEL
// =============================================================================

#[test]
fn test_wheel_scrolls_vertically() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.wheel(0.0, 50.0, false));
    assert_eq!(view.scroll_offset(), (0.0, 50.0));
}

#[test]
fn test_shift_wheel_scrolls_horizontally() {
    let mut view = view(100, 300.0, 200.0);
    assert!(view.wheel(0.0, 50.0, true));
    assert_eq!(view.scroll_offset(), (50.0, 0.0));
}

#[test]
fn test_wheel_at_boundary_is_not_consumed() {
    let mut view = view(100, 300.0, 200.0);
    assert!(!view.wheel(0.0, -10.0, false));
    assert!(!view.wheel(-10.0, 0.0, false));
    view.set_scroll(1.0e6, 1.0e6);
    assert!(!view.wheel(10.0, 10.0, false));
    // partially movable still counts
    assert!(view.wheel(-10.0, 10.0, false));
}

// =============================================================================
// HIT TESTING
// =============================================================================

#[test_case(10.0, 10.0, Some(CellHit::Header { col: 0 }) ; "header band")]
#[test_case(150.0, 50.0, Some(CellHit::Cell { row: 0, col: 1 }) ; "first data row")]
#[test_case(200.0, 101.0, Some(CellHit::Cell { row: 2, col: 2 }) ; "third data row")]
fn test_cell_at(x: f64, y: f64, expected: Option<CellHit>) {
    let mut view = view(100, 300.0, 200.0);
    assert_eq!(view.cell_at(x, y), expected);
}

#[test]
fn test_cell_at_accounts_for_scroll() {
    let mut view = view(100, 300.0, 200.0);
    view.set_scroll(0.0, 300.0);
    // header stays pinned at the top
    assert_eq!(view.cell_at(10.0, 10.0), Some(CellHit::Header { col: 0 }));
    // content y 349.5 falls in data row 10
    assert_eq!(view.cell_at(10.0, 50.0), Some(CellHit::Cell { row: 10, col: 0 }));
}

#[test]
fn test_cell_at_outside_grid() {
    let mut view = view(2, 800.0, 600.0);
    assert_eq!(view.cell_at(700.0, 50.0), None);
    assert_eq!(view.cell_at(50.0, 500.0), None);
}
