#![forbid(unsafe_code)]

//! Coupled position of the two panels.
//!
//! Only the front panel's offset is stored. The rear panel's left edge is
//! recomputed from it on every read, so the panels move as one rigid unit and
//! cannot drift apart.
//!
//! # Invariants
//!
//! 1. `-drag_range <= front_left() <= 0` after every mutation.
//! 2. `rear_left() == front_left() + front_width` on every read.

use crate::clamp::{PanelRole, clamp};
use crate::geometry::{Geometry, PanelLayout};

/// Front offset plus the geometry it is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoupledOffsetModel {
    front_left: i32,
    geometry: Geometry,
}

impl CoupledOffsetModel {
    /// A closed model (`front_left == 0`).
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            front_left: 0,
            geometry,
        }
    }

    #[inline]
    #[must_use]
    pub const fn front_left(&self) -> i32 {
        self.front_left
    }

    /// Rear panel left edge, derived from the front offset.
    #[inline]
    #[must_use]
    pub const fn rear_left(&self) -> i32 {
        self.front_left.saturating_add(self.geometry.front_width())
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Current placement of both panels.
    #[must_use]
    pub const fn layout(&self) -> PanelLayout {
        self.geometry.layout(self.front_left)
    }

    /// Store a new front offset.
    ///
    /// Callers pass values already run through the clamp policy; the model
    /// still saturates so the range bound holds for any input.
    pub fn apply_front_offset(&mut self, new_front_left: i32) {
        self.front_left = clamp(PanelRole::Front, new_front_left, &self.geometry);
    }

    /// Move whichever panel is captured by `dx` and re-derive the other.
    ///
    /// A rear delta is the same rigid motion as a front delta, so the clamp
    /// is evaluated in the dragged panel's own coordinates and converted back
    /// to a front offset.
    pub fn apply_delta(&mut self, dx: i32, dragged: PanelRole) {
        let front_width = self.geometry.front_width();
        let new_front_left = match dragged {
            PanelRole::Front => clamp(
                PanelRole::Front,
                self.front_left.saturating_add(dx),
                &self.geometry,
            ),
            PanelRole::Rear => {
                let rear = clamp(
                    PanelRole::Rear,
                    self.rear_left().saturating_add(dx),
                    &self.geometry,
                );
                rear - front_width
            }
        };
        self.apply_front_offset(new_front_left);
    }

    /// Adopt new measurements, re-clamping the offset into the new range.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.apply_front_offset(self.front_left);
    }
}
