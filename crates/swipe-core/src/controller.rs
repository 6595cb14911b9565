#![forbid(unsafe_code)]

//! Public entry point owning geometry, offsets and the drag session.
//!
//! [`SwipeController`] is what a host widget holds. It routes pointer events,
//! size changes, frame callbacks and programmatic `open`/`close` into the
//! [`DragSession`], and reports each step as a [`SessionTransition`] whose
//! effects the host applies.
//!
//! # Failure Modes
//!
//! - Pointer input before the first size change is ignored
//!   ([`NoopReason::NoGeometry`]).
//! - `open`/`close` before the first size change are remembered and applied
//!   without animation once geometry arrives.

use std::time::Duration;

use crate::config::{ConfigError, SwipeConfig};
use crate::event::{PointerEvent, SizeChanged};
use crate::geometry::{Geometry, PanelLayout};
use crate::offset::CoupledOffsetModel;
use crate::session::{
    DragSession, FrameToken, NoopReason, SessionState, SessionTransition, SwipeTarget,
    TransitionOutcome,
};
use crate::settle::Slide;
use crate::{debug, info};

/// Two-panel swipe controller.
#[derive(Debug)]
pub struct SwipeController {
    config: SwipeConfig,
    model: CoupledOffsetModel,
    session: DragSession,
    established: bool,
    pending: Option<SwipeTarget>,
}

impl Default for SwipeController {
    fn default() -> Self {
        Self::with_valid_config(SwipeConfig::default())
    }
}

impl SwipeController {
    /// Create a closed controller, rejecting invalid configuration.
    pub fn new(config: SwipeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    /// Create a controller with geometry already known.
    pub fn with_geometry(config: SwipeConfig, geometry: Geometry) -> Result<Self, ConfigError> {
        let mut controller = Self::new(config)?;
        controller.model.set_geometry(geometry);
        controller.established = true;
        Ok(controller)
    }

    fn with_valid_config(config: SwipeConfig) -> Self {
        Self {
            config,
            model: CoupledOffsetModel::default(),
            session: DragSession::new(),
            established: false,
            pending: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.session.state()
    }

    #[inline]
    #[must_use]
    pub const fn front_left(&self) -> i32 {
        self.model.front_left()
    }

    #[inline]
    #[must_use]
    pub const fn rear_left(&self) -> i32 {
        self.model.rear_left()
    }

    /// Geometry, once the host has reported a size.
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        self.established.then(|| self.model.geometry())
    }

    /// Current placement of both panels, once geometry is known.
    #[must_use]
    pub fn layout(&self) -> Option<PanelLayout> {
        self.established.then(|| self.model.layout())
    }

    /// Resting position currently held, if the panels are at rest on one.
    #[must_use]
    pub fn resting(&self) -> Option<SwipeTarget> {
        if !self.established || !matches!(self.state(), SessionState::Idle) {
            return None;
        }
        let range = self.model.geometry().drag_range();
        match self.front_left() {
            0 => Some(SwipeTarget::Closed),
            left if left == -range => Some(SwipeTarget::Open),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.resting() == Some(SwipeTarget::Open)
    }

    // -----------------------------------------------------------------------
    // Host input
    // -----------------------------------------------------------------------

    /// Feed one pointer event from the host.
    pub fn pointer(&mut self, event: &PointerEvent) -> SessionTransition {
        if !self.established {
            return self.noop(NoopReason::NoGeometry);
        }
        self.session.pointer(event, &mut self.model, &self.config)
    }

    /// Adopt a new container size.
    pub fn resize(&mut self, size: SizeChanged) -> SessionTransition {
        let geometry = Geometry::from(size);
        debug!(
            target: "swipe.controller",
            front_width = geometry.front_width(),
            rear_width = geometry.rear_width(),
            container_height = geometry.container_height(),
            "geometry changed"
        );
        let first = !self.established;
        self.established = true;
        let transition = self.session.resize(geometry, &mut self.model);
        match self.pending.take() {
            Some(target) if first => self.session.jump_to(target, &mut self.model),
            _ => transition,
        }
    }

    /// Frame callback for a previously requested [`FrameToken`].
    pub fn frame(&mut self, token: FrameToken, now: Duration) -> SessionTransition {
        self.session
            .frame(token, now, &mut self.model, &self.config)
    }

    // -----------------------------------------------------------------------
    // Programmatic control
    // -----------------------------------------------------------------------

    /// Move to fully open, animated when `smooth`.
    pub fn open(&mut self, smooth: bool) -> SessionTransition {
        self.move_to(SwipeTarget::Open, smooth)
    }

    /// Move to fully closed, animated when `smooth`.
    pub fn close(&mut self, smooth: bool) -> SessionTransition {
        self.move_to(SwipeTarget::Closed, smooth)
    }

    /// Animated [`open`](Self::open).
    pub fn open_smooth(&mut self) -> SessionTransition {
        self.open(true)
    }

    /// Animated [`close`](Self::close).
    pub fn close_smooth(&mut self) -> SessionTransition {
        self.close(true)
    }

    /// Animate toward `target` using a caller-supplied slide primitive.
    pub fn settle_with(&mut self, target: SwipeTarget, slide: Box<dyn Slide>) -> SessionTransition {
        if !self.established {
            self.pending = Some(target);
            return self.noop(NoopReason::NoGeometry);
        }
        self.session.settle_with(target, slide, &mut self.model)
    }

    fn move_to(&mut self, target: SwipeTarget, smooth: bool) -> SessionTransition {
        if !self.established {
            self.pending = Some(target);
            return self.noop(NoopReason::NoGeometry);
        }
        info!(target: "swipe.controller", target = ?target, smooth, "programmatic move");
        if smooth {
            self.session
                .settle_to(target, &mut self.model, &self.config)
        } else {
            self.session.jump_to(target, &mut self.model)
        }
    }

    fn noop(&self, reason: NoopReason) -> SessionTransition {
        debug!(target: "swipe.controller", reason = ?reason, "input ignored");
        let state = self.state();
        SessionTransition {
            from: state,
            to: state,
            outcome: TransitionOutcome::Noop(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettleStyle;
    use crate::session::SwipeEffect;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> SwipeController {
        let mut c = SwipeController::default();
        c.resize(SizeChanged::new(300, 100, 60));
        c
    }

    /// Pump frames until no more are requested, returning how many ran.
    fn pump(c: &mut SwipeController, mut pending: Option<FrameToken>) -> usize {
        let mut now = ms(0);
        let mut frames = 0;
        while let Some(token) = pending {
            pending = c.frame(token, now).requested_frame();
            now += ms(16);
            frames += 1;
            assert!(frames < 500, "settle never terminated");
        }
        frames
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SwipeConfig::default().with_settle_epsilon(f64::NAN);
        assert!(SwipeController::new(config).is_err());
    }

    #[test]
    fn pointer_before_geometry_is_ignored() {
        let mut c = SwipeController::default();
        let t = c.pointer(&PointerEvent::down(1, 10, 10, ms(0)));
        assert_eq!(t.noop_reason(), Some(NoopReason::NoGeometry));
        assert_eq!(c.layout(), None);
    }

    #[test]
    fn open_before_geometry_applies_on_first_resize() {
        let mut c = SwipeController::default();
        assert!(c.open(true).is_noop());
        let t = c.resize(SizeChanged::new(300, 100, 60));
        assert_eq!(c.front_left(), -100);
        assert_eq!(t.requested_frame(), None);
        assert!(c.is_open());
    }

    #[test]
    fn end_to_end_drag_and_flick_opens() {
        let mut c = controller();
        c.pointer(&PointerEvent::down(1, 250, 30, ms(0)));
        c.pointer(&PointerEvent::moved(1, 211, 30, ms(10)));
        c.pointer(&PointerEvent::moved(1, 210, 30, ms(510)));
        assert_eq!(c.front_left(), -40);

        // Last sample pair: -1px over 500ms = -2 px/s.
        let up = c.pointer(&PointerEvent::up(1, 210, 30, ms(520)));
        assert!(matches!(
            up.to,
            SessionState::Settling {
                target: SwipeTarget::Open,
                ..
            }
        ));

        pump(&mut c, up.requested_frame());
        assert_eq!(c.front_left(), -100);
        assert_eq!(c.rear_left(), 200);
        assert_eq!(c.resting(), Some(SwipeTarget::Open));
    }

    #[test]
    fn close_when_closed_is_idempotent() {
        let mut c = controller();
        let t = c.close(true);
        assert_eq!(t.requested_frame(), None);
        assert_eq!(c.front_left(), 0);
        let t = c.close_smooth();
        assert_eq!(t.requested_frame(), None);
        assert_eq!(c.resting(), Some(SwipeTarget::Closed));
    }

    #[test]
    fn non_animated_open_and_close() {
        let mut c = controller();
        let t = c.open(false);
        assert_eq!(c.front_left(), -100);
        assert_eq!(t.requested_frame(), None);
        assert!(t.effects().contains(&SwipeEffect::RequestRedraw));
        c.close(false);
        assert_eq!(c.front_left(), 0);
        assert_eq!(c.rear_left(), 300);
    }

    #[test]
    fn smooth_open_then_close_converges() {
        let mut c = controller();
        let t = c.open_smooth();
        assert!(pump(&mut c, t.requested_frame()) > 1);
        assert!(c.is_open());
        let t = c.close_smooth();
        pump(&mut c, t.requested_frame());
        assert_eq!(c.resting(), Some(SwipeTarget::Closed));
    }

    #[test]
    fn spring_style_converges() {
        let config = SwipeConfig::default().with_settle(SettleStyle::Spring { stiffness: 200.0 });
        let mut c = SwipeController::with_geometry(config, Geometry::new(300, 100, 60))
            .expect("valid config");
        let t = c.open(true);
        pump(&mut c, t.requested_frame());
        assert_eq!(c.front_left(), -100);
    }

    #[test]
    fn open_mid_settle_retargets() {
        let mut c = controller();
        let first = c.open(true);
        let old = first.requested_frame().expect("frame");
        c.frame(old, ms(0));
        c.frame(old, ms(80));
        let t = c.close(true);
        let new = t.requested_frame().expect("frame");
        assert_ne!(old, new);
        assert!(c.frame(old, ms(96)).is_noop());
        pump(&mut c, Some(new));
        assert_eq!(c.front_left(), 0);
    }

    #[test]
    fn resting_is_none_mid_drag() {
        let mut c = controller();
        c.pointer(&PointerEvent::down(1, 250, 30, ms(0)));
        c.pointer(&PointerEvent::moved(1, 230, 30, ms(16)));
        assert_eq!(c.resting(), None);
        assert!(!c.is_open());
    }
}
