#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]
// Log-only bindings go unread when the logging macros compile away.
#![cfg_attr(not(feature = "tracing"), allow(unused_variables))]

//! Core: drag, clamp and settle for two-panel swipe-to-reveal layouts.
//!
//! # Role in swipereveal
//! `swipe-core` owns the interaction logic for a container holding a full-width
//! front panel and a fixed-width rear panel to its right. Dragging slides both
//! panels together; releasing settles them open (rear fully shown) or closed.
//!
//! # Primary responsibilities
//! - **Geometry / clamp / offset**: panel measurements, legal offset ranges
//!   and the coupled front/rear offset model.
//! - **DragSession**: pointer capture, release decision and settle lifecycle,
//!   reported as explicit transitions.
//! - **Settle**: timed quintic ease-out or critically damped spring slides.
//! - **SwipeController / SwipeView**: the public entry point and the adapter
//!   that forwards effects into a host view.
//!
//! # How it fits in the system
//! Hosts feed pointer events, size changes and frame callbacks in, and apply
//! the returned [`SwipeEffect`]s. Nothing here reads a clock or touches a
//! view, so the whole machine runs deterministically under test.

pub mod clamp;
pub mod config;
pub mod controller;
pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod offset;
pub mod session;
pub mod settle;
pub mod velocity;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};

pub use clamp::PanelRole;
pub use config::{ConfigError, SettleStyle, SwipeConfig};
pub use controller::SwipeController;
pub use event::{PointerEvent, PointerPhase, SizeChanged};
pub use geometry::{Geometry, PanelLayout, Rect};
pub use host::{RecordingHost, SwipeHost, SwipeView, dispatch};
pub use offset::CoupledOffsetModel;
pub use session::{
    DragSession, FrameToken, NoopReason, SessionState, SessionTransition, SwipeEffect,
    SwipeTarget, TransitionOutcome,
};
pub use settle::{Slide, SlideStep, SpringSlide, TimedSlide};
