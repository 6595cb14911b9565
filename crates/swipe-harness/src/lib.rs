#![forbid(unsafe_code)]

//! Trace replay harness for `swipe-core`.
//!
//! Reads a JSON pointer trace, drives a [`swipe_core::SwipeView`] over a
//! [`swipe_core::RecordingHost`], and reports every transition plus the
//! final panel placement.

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;
pub mod trace;

pub use cli::{Cli, run, run_from_env};
pub use error::{HarnessError, Result};
pub use replay::{ReplayReport, StepRecord, render_text, run_trace};
pub use trace::{PointerStep, Trace, TraceStep, load_config};
