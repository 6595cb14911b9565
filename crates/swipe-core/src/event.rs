#![forbid(unsafe_code)]

//! Host input types.
//!
//! Pointer coordinates are container-relative pixels. Timestamps are
//! monotonic offsets from an epoch chosen by the host; only differences
//! between them matter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The host aborted the gesture (e.g. a parent stole the touch stream).
    Cancel,
}

/// One pointer sample delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub id: u32,
    pub phase: PointerPhase,
    pub x: i32,
    pub y: i32,
    pub timestamp: Duration,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(id: u32, phase: PointerPhase, x: i32, y: i32, timestamp: Duration) -> Self {
        Self {
            id,
            phase,
            x,
            y,
            timestamp,
        }
    }

    #[must_use]
    pub const fn down(id: u32, x: i32, y: i32, timestamp: Duration) -> Self {
        Self::new(id, PointerPhase::Down, x, y, timestamp)
    }

    #[must_use]
    pub const fn moved(id: u32, x: i32, y: i32, timestamp: Duration) -> Self {
        Self::new(id, PointerPhase::Move, x, y, timestamp)
    }

    #[must_use]
    pub const fn up(id: u32, x: i32, y: i32, timestamp: Duration) -> Self {
        Self::new(id, PointerPhase::Up, x, y, timestamp)
    }

    #[must_use]
    pub const fn cancel(id: u32, x: i32, y: i32, timestamp: Duration) -> Self {
        Self::new(id, PointerPhase::Cancel, x, y, timestamp)
    }
}

/// Container size change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeChanged {
    pub front_width: i32,
    pub rear_width: i32,
    pub container_height: i32,
}

impl SizeChanged {
    #[must_use]
    pub const fn new(front_width: i32, rear_width: i32, container_height: i32) -> Self {
        Self {
            front_width,
            rear_width,
            container_height,
        }
    }
}
