#![forbid(unsafe_code)]

//! Drag session lifecycle: pointer capture, release decision, settle.
//!
//! ```text
//! Idle ──down──▶ Dragging ──up/cancel──▶ Settling ──arrived──▶ Idle
//!                   ▲                        │
//!                   └─────────down───────────┘  (interrupts without snapping)
//! ```
//!
//! Every entry point returns a [`SessionTransition`] carrying the state before
//! and after plus either the effects the host must apply or the reason the
//! input was ignored. Nothing here touches a host directly, so the whole
//! machine can be driven from tests with synthetic events and clocks.
//!
//! # Invariants
//!
//! 1. Only the captured pointer id moves the panels; every other pointer is
//!    a [`NoopReason::PointerMismatch`] or [`NoopReason::AlreadyDragging`].
//! 2. Each settle gets a fresh [`FrameToken`]. Frames carrying any other
//!    token are [`NoopReason::StaleFrame`] and never touch the model.
//! 3. Interrupting a settle leaves `front_left` where the last frame put it.
//! 4. Ignored input never mutates the model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clamp::PanelRole;
use crate::config::SwipeConfig;
use crate::event::{PointerEvent, PointerPhase};
use crate::geometry::{Geometry, PanelLayout};
use crate::offset::CoupledOffsetModel;
use crate::settle::{SettleAnimator, SettleTick, Slide};
use crate::velocity::{VelocityTracker, clamp_magnitude};
use crate::{debug, info};

/// Resting position a settle or jump converges on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeTarget {
    /// Rear panel fully exposed (`front_left == -drag_range`).
    Open,
    /// Front panel fully covering the track (`front_left == 0`).
    Closed,
}

impl SwipeTarget {
    /// Front offset for this target under `geometry`.
    #[must_use]
    pub const fn front_left(self, geometry: &Geometry) -> i32 {
        match self {
            Self::Open => -geometry.drag_range(),
            Self::Closed => 0,
        }
    }
}

/// Decide where a released drag settles.
///
/// 1. Zero velocity past the midpoint toward open: open.
/// 2. Any leftward velocity: open.
/// 3. Otherwise: close.
///
/// The midpoint test is `front_left < -drag_range / 2` evaluated exactly
/// (as `2 * front_left < -drag_range` in `i64`), so odd ranges behave as the
/// fractional midpoint would and the exact midpoint closes.
#[must_use]
pub fn decide_release(xvel: f64, front_left: i32, drag_range: i32) -> SwipeTarget {
    let past_midpoint = 2 * i64::from(front_left) < -i64::from(drag_range);
    if xvel == 0.0 && past_midpoint {
        SwipeTarget::Open
    } else if xvel < 0.0 {
        SwipeTarget::Open
    } else {
        SwipeTarget::Closed
    }
}

/// Generation stamp carried by a next-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameToken(pub u64);

/// Side effect the host must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum SwipeEffect {
    /// Place both panels at these rectangles.
    Layout(PanelLayout),
    /// Repaint the container.
    RequestRedraw,
    /// Call back into the controller on the next frame with this token.
    RequestNextFrame(FrameToken),
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Dragging {
        pointer_id: u32,
        role: PanelRole,
    },
    Settling {
        target: SwipeTarget,
        token: FrameToken,
    },
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// No geometry has been reported yet.
    NoGeometry,
    /// Pointer-down landed outside both panels.
    MissedPanels,
    /// Event from a pointer other than the captured one.
    PointerMismatch,
    /// Pointer-down while a drag already holds the capture.
    AlreadyDragging,
    /// Move/up/cancel with no drag in progress.
    NotDragging,
    /// Frame callback for a settle that is no longer current.
    StaleFrame,
    /// Programmatic open/close toward the position already held at rest.
    AlreadyAtTarget,
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(Vec<SwipeEffect>),
    Noop(NoopReason),
}

/// One state-machine step with the effects it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    pub from: SessionState,
    pub to: SessionState,
    pub outcome: TransitionOutcome,
}

impl SessionTransition {
    /// Effects to hand to the host (empty for no-ops).
    #[must_use]
    pub fn effects(&self) -> &[SwipeEffect] {
        match &self.outcome {
            TransitionOutcome::Applied(effects) => effects,
            TransitionOutcome::Noop(_) => &[],
        }
    }

    #[must_use]
    pub fn noop_reason(&self) -> Option<NoopReason> {
        match self.outcome {
            TransitionOutcome::Noop(reason) => Some(reason),
            TransitionOutcome::Applied(_) => None,
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.noop_reason().is_some()
    }

    /// Whether any effect asks the host for another frame.
    #[must_use]
    pub fn requested_frame(&self) -> Option<FrameToken> {
        self.effects().iter().find_map(|effect| match effect {
            SwipeEffect::RequestNextFrame(token) => Some(*token),
            _ => None,
        })
    }
}

/// The drag/settle state machine for one widget.
#[derive(Debug, Default)]
pub struct DragSession {
    state: SessionState,
    velocity: VelocityTracker,
    /// Last accepted pointer x of the drag, whatever its timestamp.
    pointer_x: i32,
    animator: SettleAnimator,
    generation: u64,
}

impl DragSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        matches!(self.state, SessionState::Settling { .. })
    }

    /// Feed one pointer event.
    pub fn pointer(
        &mut self,
        event: &PointerEvent,
        model: &mut CoupledOffsetModel,
        config: &SwipeConfig,
    ) -> SessionTransition {
        let from = self.state;
        let outcome = match (self.state, event.phase) {
            (SessionState::Idle | SessionState::Settling { .. }, PointerPhase::Down) => {
                self.capture(event, model)
            }
            (SessionState::Dragging { .. }, PointerPhase::Down) => {
                TransitionOutcome::Noop(NoopReason::AlreadyDragging)
            }
            (SessionState::Dragging { pointer_id, .. }, _) if pointer_id != event.id => {
                TransitionOutcome::Noop(NoopReason::PointerMismatch)
            }
            (SessionState::Dragging { role, .. }, PointerPhase::Move) => {
                self.drag_to(event, role, model)
            }
            (SessionState::Dragging { .. }, PointerPhase::Up) => {
                if self.velocity.last_x() != Some(event.x) {
                    self.velocity.record(event.x, event.timestamp);
                }
                let xvel = clamp_magnitude(
                    self.velocity
                        .release_velocity(event.timestamp, config.velocity_horizon()),
                    config.min_fling_velocity,
                    config.max_fling_velocity,
                );
                self.release(xvel, model, config)
            }
            (SessionState::Dragging { .. }, PointerPhase::Cancel) => {
                self.release(0.0, model, config)
            }
            (
                SessionState::Idle | SessionState::Settling { .. },
                PointerPhase::Move | PointerPhase::Up | PointerPhase::Cancel,
            ) => TransitionOutcome::Noop(NoopReason::NotDragging),
        };
        self.finish(from, outcome)
    }

    /// Advance the in-flight settle by one frame.
    pub fn frame(
        &mut self,
        token: FrameToken,
        now: Duration,
        model: &mut CoupledOffsetModel,
        config: &SwipeConfig,
    ) -> SessionTransition {
        let from = self.state;
        let outcome = match self.state {
            SessionState::Settling {
                token: current,
                target,
            } if current == token => {
                let before = model.front_left();
                match self.animator.tick(now, model, config.settle_epsilon) {
                    Some(SettleTick::Moving { front_left }) => {
                        let mut effects = Vec::with_capacity(3);
                        if front_left != before {
                            effects.push(SwipeEffect::Layout(model.layout()));
                        }
                        effects.push(SwipeEffect::RequestRedraw);
                        effects.push(SwipeEffect::RequestNextFrame(token));
                        TransitionOutcome::Applied(effects)
                    }
                    Some(SettleTick::Arrived { .. }) | None => {
                        self.state = SessionState::Idle;
                        info!(
                            target: "swipe.session",
                            resting = ?target,
                            front_left = model.front_left(),
                            "settled"
                        );
                        TransitionOutcome::Applied(vec![
                            SwipeEffect::Layout(model.layout()),
                            SwipeEffect::RequestRedraw,
                        ])
                    }
                }
            }
            _ => TransitionOutcome::Noop(NoopReason::StaleFrame),
        };
        self.finish(from, outcome)
    }

    /// Animate toward `target` from whatever state the session is in.
    ///
    /// A drag in progress loses its capture; a settle in progress is
    /// replaced.
    pub fn settle_to(
        &mut self,
        target: SwipeTarget,
        model: &mut CoupledOffsetModel,
        config: &SwipeConfig,
    ) -> SessionTransition {
        let from = self.state;
        let was_idle = matches!(from, SessionState::Idle);
        self.abort();
        let target_left = target.front_left(model.geometry());
        let outcome = if model.front_left() == target_left {
            self.state = SessionState::Idle;
            if was_idle {
                TransitionOutcome::Noop(NoopReason::AlreadyAtTarget)
            } else {
                TransitionOutcome::Applied(vec![SwipeEffect::RequestRedraw])
            }
        } else {
            let slide = config.settle.slide(
                model.front_left(),
                target_left,
                model.geometry().drag_range(),
                config.settle_epsilon,
            );
            TransitionOutcome::Applied(self.begin_settle(target, target_left, slide))
        };
        self.finish(from, outcome)
    }

    /// Animate toward `target` with a caller-built slide primitive.
    pub fn settle_with(
        &mut self,
        target: SwipeTarget,
        slide: Box<dyn Slide>,
        model: &mut CoupledOffsetModel,
    ) -> SessionTransition {
        let from = self.state;
        self.abort();
        let target_left = target.front_left(model.geometry());
        let effects = self.begin_settle(target, target_left, slide);
        self.finish(from, TransitionOutcome::Applied(effects))
    }

    /// Place the panels at `target` immediately, with no animation frames.
    pub fn jump_to(
        &mut self,
        target: SwipeTarget,
        model: &mut CoupledOffsetModel,
    ) -> SessionTransition {
        let from = self.state;
        self.abort();
        model.apply_front_offset(target.front_left(model.geometry()));
        self.state = SessionState::Idle;
        let outcome = TransitionOutcome::Applied(vec![
            SwipeEffect::Layout(model.layout()),
            SwipeEffect::RequestRedraw,
        ]);
        self.finish(from, outcome)
    }

    /// Adopt new geometry.
    ///
    /// - Idle and resting open: stays open at the new range.
    /// - Idle otherwise, or Dragging: the offset is re-clamped; a drag keeps
    ///   its capture.
    /// - Settling: the settle is cancelled and the panels snap to its target
    ///   under the new geometry.
    pub fn resize(
        &mut self,
        geometry: Geometry,
        model: &mut CoupledOffsetModel,
    ) -> SessionTransition {
        let from = self.state;
        let old_range = model.geometry().drag_range();
        let resting_open = old_range > 0 && model.front_left() == -old_range;
        model.set_geometry(geometry);
        match self.state {
            SessionState::Settling { target, .. } => {
                self.animator.cancel();
                self.state = SessionState::Idle;
                model.apply_front_offset(target.front_left(&geometry));
            }
            SessionState::Idle if resting_open => {
                model.apply_front_offset(SwipeTarget::Open.front_left(&geometry));
            }
            SessionState::Idle | SessionState::Dragging { .. } => {}
        }
        let outcome = TransitionOutcome::Applied(vec![
            SwipeEffect::Layout(model.layout()),
            SwipeEffect::RequestRedraw,
        ]);
        self.finish(from, outcome)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn capture(&mut self, event: &PointerEvent, model: &CoupledOffsetModel) -> TransitionOutcome {
        let Some(role) = model
            .geometry()
            .hit_test(model.front_left(), event.x, event.y)
        else {
            return TransitionOutcome::Noop(NoopReason::MissedPanels);
        };
        debug!(
            target: "swipe.session",
            pointer_id = event.id,
            role = ?role,
            interrupted = self.is_settling(),
            front_left = model.front_left(),
            "drag captured"
        );
        self.animator.cancel();
        self.velocity.seed(event.x, event.timestamp);
        self.pointer_x = event.x;
        self.state = SessionState::Dragging {
            pointer_id: event.id,
            role,
        };
        TransitionOutcome::Applied(Vec::new())
    }

    fn drag_to(
        &mut self,
        event: &PointerEvent,
        role: PanelRole,
        model: &mut CoupledOffsetModel,
    ) -> TransitionOutcome {
        let dx = event.x.saturating_sub(self.pointer_x);
        self.pointer_x = event.x;
        self.velocity.record(event.x, event.timestamp);
        model.apply_delta(dx, role);
        TransitionOutcome::Applied(vec![
            SwipeEffect::Layout(model.layout()),
            SwipeEffect::RequestRedraw,
        ])
    }

    fn release(
        &mut self,
        xvel: f64,
        model: &mut CoupledOffsetModel,
        config: &SwipeConfig,
    ) -> TransitionOutcome {
        let geometry = *model.geometry();
        let target = decide_release(xvel, model.front_left(), geometry.drag_range());
        debug!(
            target: "swipe.session",
            xvel,
            front_left = model.front_left(),
            drag_range = geometry.drag_range(),
            decision = ?target,
            "drag released"
        );
        self.velocity.reset();
        let target_left = target.front_left(&geometry);
        if model.front_left() == target_left {
            self.state = SessionState::Idle;
            return TransitionOutcome::Applied(vec![SwipeEffect::RequestRedraw]);
        }
        let slide = config.settle.slide(
            model.front_left(),
            target_left,
            geometry.drag_range(),
            config.settle_epsilon,
        );
        TransitionOutcome::Applied(self.begin_settle(target, target_left, slide))
    }

    fn begin_settle(
        &mut self,
        target: SwipeTarget,
        target_left: i32,
        slide: Box<dyn Slide>,
    ) -> Vec<SwipeEffect> {
        self.generation = self.generation.wrapping_add(1);
        let token = FrameToken(self.generation);
        self.animator.start(target_left, slide);
        self.state = SessionState::Settling { target, token };
        vec![
            SwipeEffect::RequestRedraw,
            SwipeEffect::RequestNextFrame(token),
        ]
    }

    /// Drop any capture or settle without touching the model.
    fn abort(&mut self) {
        self.animator.cancel();
        self.velocity.reset();
        self.state = SessionState::Idle;
    }

    fn finish(&self, from: SessionState, outcome: TransitionOutcome) -> SessionTransition {
        if let TransitionOutcome::Noop(reason) = outcome {
            debug!(target: "swipe.session", from = ?from, reason = ?reason, "input ignored");
        }
        SessionTransition {
            from,
            to: self.state,
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
