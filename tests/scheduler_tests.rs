//! Frame coalescing as seen by a host driving a `GridView`.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{frame, passengers, view};
use datagrid::{Axis, DirtyFlags, FrameOutcome, Interaction, RecordingSurface};

#[test]
fn test_requests_coalesce_into_one_frame() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);

    assert!(view.request_render(DirtyFlags::PAINT));
    assert!(!view.request_render(DirtyFlags::PAINT));
    assert!(!view.request_render(DirtyFlags::TRANSFORM));

    let mut surface = RecordingSurface::new();
    assert!(matches!(
        view.run_frame(&mut surface).unwrap(),
        FrameOutcome::Painted(_)
    ));
    // one clear per painted frame
    assert_eq!(
        surface.count(|op| matches!(op, datagrid::DrawOp::ClearRect { .. })),
        1
    );
    assert_eq!(view.run_frame(&mut surface).unwrap(), FrameOutcome::Idle);
}

#[test]
fn test_scrolls_between_frames_share_a_frame() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    view.scroll_by(0.0, 10.0);
    view.scroll_by(0.0, 10.0);
    view.scroll_by(0.0, 10.0);
    let surface = frame(&mut view);
    assert_eq!(
        surface.count(|op| matches!(op, datagrid::DrawOp::ResetTransform)),
        1
    );
    assert!(surface
        .ops()
        .contains(&datagrid::DrawOp::Translate(-0.0, -30.0)));
    assert_eq!(view.take_scroll_events().len(), 3);
}

#[test]
fn test_only_last_queued_pointer_is_processed() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);

    assert!(view.queue_pointer_move(103.0, 20.0));
    assert!(!view.queue_pointer_move(150.0, 60.0));
    assert!(!view.queue_pointer_move(290.0, 5.0));
    // nothing is evaluated before the frame runs
    assert_eq!(view.interaction(), &Interaction::Idle);

    frame(&mut view);
    assert_eq!(view.interaction(), &Interaction::HoverScrollbar(Axis::Vertical));
}

#[test]
fn test_hover_without_change_does_not_paint() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    assert!(view.queue_pointer_move(50.0, 60.0));
    let mut surface = RecordingSurface::new();
    assert_eq!(view.run_frame(&mut surface).unwrap(), FrameOutcome::Idle);
    assert!(surface.ops().is_empty());
    assert!(!view.frame_pending());
}

#[test]
fn test_queued_drag_move_paints_in_same_frame() {
    let mut view = view(100, 300.0, 200.0);
    frame(&mut view);
    assert!(view.pointer_down(290.0, 5.0));
    frame(&mut view);

    view.queue_pointer_move(290.0, 15.0);
    let mut surface = RecordingSurface::new();
    assert!(matches!(
        view.run_frame(&mut surface).unwrap(),
        FrameOutcome::Painted(_)
    ));
    assert_eq!(view.scroll_offset(), (0.0, 152.0));
    assert!(surface
        .ops()
        .contains(&datagrid::DrawOp::Translate(-0.0, -152.0)));
    assert!(!view.frame_pending());
}

#[test]
fn test_immediate_paint_keeps_queued_pointer() {
    let mut view = view(100, 300.0, 200.0);
    view.set_scroll(0.0, 2000.0);
    frame(&mut view);

    // shrinking re-clamps the offset during the paint
    view.set_dataset(passengers(3));
    view.queue_pointer_move(103.0, 20.0);
    let mut surface = RecordingSurface::new();
    assert!(matches!(
        view.paint_now(&mut surface).unwrap(),
        FrameOutcome::Painted(_)
    ));
    assert_eq!(view.scroll_offset(), (0.0, 0.0));
    assert!(view.frame_pending());
    assert_eq!(view.interaction(), &Interaction::Idle);

    assert_eq!(view.run_frame(&mut surface).unwrap(), FrameOutcome::Idle);
    assert_eq!(view.interaction(), &Interaction::HoverNearBoundary(0));
    assert!(!view.frame_pending());
}
