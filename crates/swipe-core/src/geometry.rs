#![forbid(unsafe_code)]

//! Panel measurements and pixel rectangles.
//!
//! [`Geometry`] is the per-layout snapshot of the two panels. It is replaced
//! wholesale whenever the host reports a size change and never mutated in
//! between.
//!
//! # Invariants
//!
//! 1. `drag_range() == rear_width()`: full travel exposes exactly the rear
//!    panel.
//! 2. All stored measurements are `>= 0`. Negative inputs are a host bug and
//!    saturate to zero instead of panicking.

use serde::{Deserialize, Serialize};

use crate::clamp::PanelRole;
use crate::event::SizeChanged;

/// A pixel rectangle in container coordinates.
///
/// Coordinates are signed: an open front panel sits partly left of the
/// container origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Final placement of both panels for one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelLayout {
    pub front: Rect,
    pub rear: Rect,
}

/// Measurements of the front and rear panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Geometry {
    front_width: i32,
    rear_width: i32,
    container_height: i32,
}

impl Geometry {
    /// Build a geometry snapshot. Negative measurements saturate to zero.
    #[must_use]
    pub fn new(front_width: i32, rear_width: i32, container_height: i32) -> Self {
        Self {
            front_width: front_width.max(0),
            rear_width: rear_width.max(0),
            container_height: container_height.max(0),
        }
    }

    /// Replace every stored measurement.
    pub fn recompute(&mut self, front_width: i32, rear_width: i32, container_height: i32) {
        *self = Self::new(front_width, rear_width, container_height);
    }

    #[inline]
    #[must_use]
    pub const fn front_width(&self) -> i32 {
        self.front_width
    }

    #[inline]
    #[must_use]
    pub const fn rear_width(&self) -> i32 {
        self.rear_width
    }

    #[inline]
    #[must_use]
    pub const fn container_height(&self) -> i32 {
        self.container_height
    }

    /// Maximum horizontal travel of the front panel.
    #[inline]
    #[must_use]
    pub const fn drag_range(&self) -> i32 {
        self.rear_width
    }

    /// Front panel rectangle for the given front offset.
    #[must_use]
    pub const fn front_rect(&self, front_left: i32) -> Rect {
        Rect::new(front_left, 0, self.front_width, self.container_height)
    }

    /// Rear panel rectangle for the given front offset.
    ///
    /// The rear panel's left edge always sits on the front panel's right edge.
    #[must_use]
    pub const fn rear_rect(&self, front_left: i32) -> Rect {
        Rect::new(
            front_left.saturating_add(self.front_width),
            0,
            self.rear_width,
            self.container_height,
        )
    }

    /// Both panel rectangles for the given front offset.
    #[must_use]
    pub const fn layout(&self, front_left: i32) -> PanelLayout {
        PanelLayout {
            front: self.front_rect(front_left),
            rear: self.rear_rect(front_left),
        }
    }

    /// Which panel receives a pointer at `(x, y)`.
    ///
    /// The front panel is topmost, so it wins wherever the two overlap.
    #[must_use]
    pub fn hit_test(&self, front_left: i32, x: i32, y: i32) -> Option<PanelRole> {
        if self.front_rect(front_left).contains(x, y) {
            Some(PanelRole::Front)
        } else if self.rear_rect(front_left).contains(x, y) {
            Some(PanelRole::Rear)
        } else {
            None
        }
    }
}

impl From<SizeChanged> for Geometry {
    fn from(size: SizeChanged) -> Self {
        Self::new(size.front_width, size.rear_width, size.container_height)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
