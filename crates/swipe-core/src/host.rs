#![forbid(unsafe_code)]

//! Host boundary: applying controller effects to a real view.
//!
//! The controller never calls into a host. Instead each transition carries
//! [`SwipeEffect`]s, and [`dispatch`] replays them onto any [`SwipeHost`].
//! [`SwipeView`] bundles a controller with its host so integrations only
//! forward raw input.

use std::time::Duration;

use crate::controller::SwipeController;
use crate::event::{PointerEvent, SizeChanged};
use crate::geometry::PanelLayout;
use crate::session::{FrameToken, SessionTransition, SwipeEffect};

/// What a view system must provide to display the two panels.
pub trait SwipeHost {
    /// Place both panels. Called with the full layout every time either moves.
    fn layout(&mut self, layout: PanelLayout);

    /// Schedule a repaint.
    fn request_redraw(&mut self);

    /// Call back into [`SwipeController::frame`] with `token` on the next
    /// display frame.
    fn request_next_frame(&mut self, token: FrameToken);
}

/// Apply `effects` to `host` in order.
pub fn dispatch<H: SwipeHost + ?Sized>(host: &mut H, effects: &[SwipeEffect]) {
    for effect in effects {
        match *effect {
            SwipeEffect::Layout(layout) => host.layout(layout),
            SwipeEffect::RequestRedraw => host.request_redraw(),
            SwipeEffect::RequestNextFrame(token) => host.request_next_frame(token),
        }
    }
}

/// A controller wired to the host that displays it.
#[derive(Debug)]
pub struct SwipeView<H> {
    controller: SwipeController,
    host: H,
}

impl<H: SwipeHost> SwipeView<H> {
    #[must_use]
    pub fn new(controller: SwipeController, host: H) -> Self {
        Self { controller, host }
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> SessionTransition {
        let transition = self.controller.pointer(event);
        self.apply(transition)
    }

    pub fn resize(&mut self, size: SizeChanged) -> SessionTransition {
        let transition = self.controller.resize(size);
        self.apply(transition)
    }

    pub fn frame(&mut self, token: FrameToken, now: Duration) -> SessionTransition {
        let transition = self.controller.frame(token, now);
        self.apply(transition)
    }

    pub fn open(&mut self, smooth: bool) -> SessionTransition {
        let transition = self.controller.open(smooth);
        self.apply(transition)
    }

    pub fn close(&mut self, smooth: bool) -> SessionTransition {
        let transition = self.controller.close(smooth);
        self.apply(transition)
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &SwipeController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_parts(self) -> (SwipeController, H) {
        (self.controller, self.host)
    }

    fn apply(&mut self, transition: SessionTransition) -> SessionTransition {
        dispatch(&mut self.host, transition.effects());
        transition
    }
}

/// In-memory host that records what it was asked to do.
///
/// Useful for tests and trace replay. Only the most recent frame request is
/// kept pending; earlier ones are superseded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingHost {
    pub layouts: Vec<PanelLayout>,
    pub redraws: usize,
    pub frame_requests: usize,
    pending_frame: Option<FrameToken>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent layout applied, if any.
    #[must_use]
    pub fn last_layout(&self) -> Option<PanelLayout> {
        self.layouts.last().copied()
    }

    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Consume the pending frame request.
    pub fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending_frame.take()
    }
}

impl SwipeHost for RecordingHost {
    fn layout(&mut self, layout: PanelLayout) {
        self.layouts.push(layout);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn request_next_frame(&mut self, token: FrameToken) {
        self.frame_requests += 1;
        self.pending_frame = Some(token);
    }
}

impl<H: SwipeHost + ?Sized> SwipeHost for &mut H {
    fn layout(&mut self, layout: PanelLayout) {
        (**self).layout(layout);
    }

    fn request_redraw(&mut self) {
        (**self).request_redraw();
    }

    fn request_next_frame(&mut self, token: FrameToken) {
        (**self).request_next_frame(token);
    }
}
