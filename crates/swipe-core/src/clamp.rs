#![forbid(unsafe_code)]

//! Legal horizontal range for each panel.
//!
//! Either panel may be the one that captured the pointer, so the policy
//! answers for both:
//!
//! - **Front**: `[-drag_range, 0]`. Zero is closed; `-drag_range` is fully
//!   open.
//! - **Rear**: `[front_width - drag_range, front_width]`. At rest the rear
//!   panel is flush against the container's right edge; fully dragged it sits
//!   immediately right of the open front panel.
//!
//! Both ranges describe the same rigid motion shifted by `front_width`.

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;

/// Which of the two panels an offset refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelRole {
    /// Topmost panel, fully covering the track when closed.
    Front,
    /// Panel revealed as the front panel moves left.
    Rear,
}

/// Inclusive `(min, max)` bounds for the left edge of `role`.
#[must_use]
pub fn legal_range(role: PanelRole, geometry: &Geometry) -> (i32, i32) {
    let range = geometry.drag_range();
    match role {
        PanelRole::Front => (-range, 0),
        PanelRole::Rear => {
            let width = geometry.front_width();
            (width.saturating_sub(range), width)
        }
    }
}

/// Saturate a proposed left edge for `role` into its legal range.
#[must_use]
pub fn clamp(role: PanelRole, proposed_left: i32, geometry: &Geometry) -> i32 {
    let (min, max) = legal_range(role, geometry);
    proposed_left.clamp(min, max)
}
