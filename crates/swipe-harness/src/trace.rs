#![forbid(unsafe_code)]

//! JSON pointer trace format.
//!
//! ```json
//! {
//!   "size": { "front_width": 300, "rear_width": 100, "container_height": 60 },
//!   "steps": [
//!     { "pointer": { "id": 1, "phase": "down", "x": 250, "y": 30, "t_ms": 0 } },
//!     { "pointer": { "id": 1, "phase": "move", "x": 210, "t_ms": 16 } },
//!     { "pointer": { "id": 1, "phase": "up", "x": 210, "t_ms": 32 } },
//!     { "settle": {} }
//!   ]
//! }
//! ```
//!
//! Pointer timestamps are absolute milliseconds. Frame steps advance the
//! replay clock by `interval_ms` per frame.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use swipe_core::{PointerEvent, PointerPhase, SizeChanged, SwipeConfig};

use crate::error::{HarnessError, Result};

pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

const fn default_interval() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

const fn default_pointer_y() -> i32 {
    0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Initial container size. Omit to exercise input before geometry.
    #[serde(default)]
    pub size: Option<SizeChanged>,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStep {
    Pointer(PointerStep),
    Resize(SizeChanged),
    Open {
        #[serde(default)]
        smooth: bool,
    },
    Close {
        #[serde(default)]
        smooth: bool,
    },
    /// Deliver exactly `count` pending frames (fewer if the settle ends).
    Frames {
        count: usize,
        #[serde(default = "default_interval")]
        interval_ms: u64,
    },
    /// Deliver frames until nothing is pending.
    Settle {
        #[serde(default = "default_interval")]
        interval_ms: u64,
    },
}

impl TraceStep {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Pointer(step) => match step.phase {
                PointerPhase::Down => "pointer_down",
                PointerPhase::Move => "pointer_move",
                PointerPhase::Up => "pointer_up",
                PointerPhase::Cancel => "pointer_cancel",
            },
            Self::Resize(_) => "resize",
            Self::Open { .. } => "open",
            Self::Close { .. } => "close",
            Self::Frames { .. } => "frames",
            Self::Settle { .. } => "settle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerStep {
    pub id: u32,
    pub phase: PointerPhase,
    pub x: i32,
    #[serde(default = "default_pointer_y")]
    pub y: i32,
    pub t_ms: u64,
}

impl PointerStep {
    #[must_use]
    pub const fn timestamp(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    #[must_use]
    pub const fn event(&self) -> PointerEvent {
        PointerEvent::new(self.id, self.phase, self.x, self.y, self.timestamp())
    }
}

impl Trace {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Load and validate a [`SwipeConfig`]; missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<SwipeConfig> {
    let config: SwipeConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| HarnessError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
