//! Frame coalescing.
//!
//! Any number of render requests between two display frames collapse into one
//! pending frame. The frame carries only *what* became stale; painting always
//! reads the state current when the frame runs.

use std::ops::{BitOr, BitOrAssign};

/// Invalidation classes, consumed once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    /// Column/row geometry must be recomputed
    pub geometry: bool,
    /// Drawing transform must be rebuilt (scroll or density change)
    pub transform: bool,
    /// Surface must be repainted
    pub paint: bool,
}

impl DirtyFlags {
    pub const NONE: Self = Self {
        geometry: false,
        transform: false,
        paint: false,
    };
    pub const PAINT: Self = Self {
        geometry: false,
        transform: false,
        paint: true,
    };
    /// Scroll offset or density changed
    pub const TRANSFORM: Self = Self {
        geometry: false,
        transform: true,
        paint: true,
    };
    /// Headers, row count, widths or heights changed
    pub const GEOMETRY: Self = Self {
        geometry: true,
        transform: true,
        paint: true,
    };

    pub fn is_empty(self) -> bool {
        !(self.geometry || self.transform || self.paint)
    }

    /// Flags in `self` that are not in `other`
    #[must_use]
    pub fn without(self, other: Self) -> Self {
        Self {
            geometry: self.geometry && !other.geometry,
            transform: self.transform && !other.transform,
            paint: self.paint && !other.paint,
        }
    }
}

impl BitOr for DirtyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            geometry: self.geometry || rhs.geometry,
            transform: self.transform || rhs.transform,
            paint: self.paint || rhs.paint,
        }
    }
}

impl BitOrAssign for DirtyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// A frame taken from the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Everything invalidated since the previous frame
    pub dirty: DirtyFlags,
    /// Last pointer position queued for hover processing, in screen pixels
    pub pointer: Option<(f64, f64)>,
}

/// Holds at most one pending frame
#[derive(Debug, Default)]
pub struct RenderScheduler {
    dirty: DirtyFlags,
    pointer: Option<(f64, f64)>,
    pending: bool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `dirty` into the pending frame.
    ///
    /// Returns true only when no frame was pending, i.e. when the caller has to
    /// schedule one display frame. Later calls before that frame runs return
    /// false.
    pub fn request_render(&mut self, dirty: DirtyFlags) -> bool {
        self.dirty |= dirty;
        let first = !self.pending;
        self.pending = true;
        first
    }

    /// Queue a pointer position, replacing any queued earlier in this frame.
    ///
    /// Returns true when a frame has to be scheduled, like
    /// [`request_render`](Self::request_render).
    pub fn queue_pointer(&mut self, x: f64, y: f64) -> bool {
        self.pointer = Some((x, y));
        self.request_render(DirtyFlags::NONE)
    }

    /// Take the queued pointer position out of the pending frame
    pub fn take_pointer(&mut self) -> Option<(f64, f64)> {
        self.pointer.take()
    }

    /// Drop `covered` from the pending frame.
    ///
    /// The frame stays pending only while other flags or a queued pointer
    /// remain.
    pub fn discharge(&mut self, covered: DirtyFlags) {
        self.dirty = self.dirty.without(covered);
        self.pending = self.pending && (!self.dirty.is_empty() || self.pointer.is_some());
    }

    /// True while a frame is pending
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Flags accumulated so far, without consuming them
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Consume the pending frame, if any
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(Frame {
            dirty: std::mem::take(&mut self.dirty),
            pointer: self.pointer.take(),
        })
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

    #[test]
    fn test_requests_coalesce() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.request_render(DirtyFlags::PAINT));
        assert!(!scheduler.request_render(DirtyFlags::TRANSFORM));
        assert!(!scheduler.request_render(DirtyFlags::PAINT));
        let frame = scheduler.take_frame().unwrap();
        assert_eq!(frame.dirty, DirtyFlags::TRANSFORM);
        assert!(scheduler.take_frame().is_none());
        assert!(scheduler.request_render(DirtyFlags::PAINT));
    }

    #[test]
    fn test_geometry_implies_everything() {
        let flags = DirtyFlags::NONE | DirtyFlags::GEOMETRY;
        assert!(flags.geometry && flags.transform && flags.paint);
        assert!(DirtyFlags::NONE.is_empty());
    }

    #[test]
    fn test_pointer_keeps_last_position() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.queue_pointer(1.0, 1.0));
        assert!(!scheduler.queue_pointer(2.0, 3.0));
        let frame = scheduler.take_frame().unwrap();
        assert_eq!(frame.pointer, Some((2.0, 3.0)));
        assert!(frame.dirty.is_empty());
    }

    #[test]
    fn test_take_pointer_keeps_flags() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request_render(DirtyFlags::PAINT);
        scheduler.queue_pointer(4.0, 5.0);
        assert_eq!(scheduler.take_pointer(), Some((4.0, 5.0)));
        assert_eq!(scheduler.take_pointer(), None);
        let frame = scheduler.take_frame().unwrap();
        assert_eq!(frame.dirty, DirtyFlags::PAINT);
        assert_eq!(frame.pointer, None);
    }

    #[test]
    fn test_discharge_keeps_queued_pointer() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request_render(DirtyFlags::TRANSFORM);
        scheduler.discharge(DirtyFlags::GEOMETRY);
        assert!(!scheduler.is_pending());

        scheduler.request_render(DirtyFlags::TRANSFORM);
        scheduler.queue_pointer(1.0, 2.0);
        scheduler.discharge(DirtyFlags::GEOMETRY);
        assert!(scheduler.is_pending());
        let frame = scheduler.take_frame().unwrap();
        assert!(frame.dirty.is_empty());
        assert_eq!(frame.pointer, Some((1.0, 2.0)));
    }

    #[test]
    fn test_without() {
        assert!(DirtyFlags::GEOMETRY.without(DirtyFlags::TRANSFORM).geometry);
        assert!(DirtyFlags::TRANSFORM.without(DirtyFlags::TRANSFORM).is_empty());
        assert_eq!(
            DirtyFlags::TRANSFORM.without(DirtyFlags::PAINT),
            DirtyFlags {
                transform: true,
                ..DirtyFlags::NONE
            }
        );
    }
}
