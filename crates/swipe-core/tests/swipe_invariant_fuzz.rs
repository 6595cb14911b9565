//! Property/fuzz-style invariants for the swipe controller.
//!
//! Random streams of pointer input, frames, resizes and programmatic moves
//! are driven through the public API. After every step the panels must stay
//! inside their legal range, stay rigidly coupled, and ignored input must
//! leave them exactly where they were.

use std::time::Duration;

use proptest::prelude::*;
use swipe_core::clamp::{clamp, legal_range};
use swipe_core::{
    CoupledOffsetModel, FrameToken, Geometry, NoopReason, PanelRole, PointerEvent, SessionState,
    SizeChanged, SwipeController, SwipeTarget,
};

#[derive(Debug, Clone)]
enum Op {
    Down { id: u32, x: i32, y: i32 },
    Move { id: u32, x: i32 },
    Up { id: u32, x: i32 },
    Cancel { id: u32 },
    Advance { ms: u64 },
    Frame,
    StaleFrame,
    Resize { front: i32, rear: i32 },
    Open { smooth: bool },
    Close { smooth: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u32..3, -50i32..450, -10i32..70).prop_map(|(id, x, y)| Op::Down { id, x, y }),
        6 => (0u32..3, -100i32..500).prop_map(|(id, x)| Op::Move { id, x }),
        2 => (0u32..3, -100i32..500).prop_map(|(id, x)| Op::Up { id, x }),
        1 => (0u32..3).prop_map(|id| Op::Cancel { id }),
        3 => (0u64..200).prop_map(|ms| Op::Advance { ms }),
        6 => Just(Op::Frame),
        1 => Just(Op::StaleFrame),
        1 => (0i32..400, 0i32..200).prop_map(|(front, rear)| Op::Resize { front, rear }),
        1 => any::<bool>().prop_map(|smooth| Op::Open { smooth }),
        1 => any::<bool>().prop_map(|smooth| Op::Close { smooth }),
    ]
}

struct Driver {
    controller: SwipeController,
    now: Duration,
    last_x: i32,
    pending: Option<FrameToken>,
}

impl Driver {
    fn new() -> Self {
        let mut controller = SwipeController::default();
        controller.resize(SizeChanged::new(300, 100, 60));
        Self {
            controller,
            now: Duration::ZERO,
            last_x: 0,
            pending: None,
        }
    }

    fn step(&mut self, op: &Op) {
        let before = self.controller.front_left();
        let t = match *op {
            Op::Down { id, x, y } => {
                self.last_x = x;
                self.controller
                    .pointer(&PointerEvent::down(id, x, y, self.now))
            }
            Op::Move { id, x } => {
                self.last_x = x;
                self.controller
                    .pointer(&PointerEvent::moved(id, x, 30, self.now))
            }
            Op::Up { id, x } => self.controller.pointer(&PointerEvent::up(id, x, 30, self.now)),
            Op::Cancel { id } => {
                self.controller
                    .pointer(&PointerEvent::cancel(id, self.last_x, 30, self.now))
            }
            Op::Advance { ms } => {
                self.now += Duration::from_millis(ms);
                return;
            }
            Op::Frame => match self.pending {
                Some(token) => self.controller.frame(token, self.now),
                None => return,
            },
            Op::StaleFrame => {
                let live = match self.controller.state() {
                    SessionState::Settling { token, .. } => token.0,
                    _ => 0,
                };
                let t = self
                    .controller
                    .frame(FrameToken(live.wrapping_add(1_000)), self.now);
                assert_eq!(t.noop_reason(), Some(NoopReason::StaleFrame));
                t
            }
            Op::Resize { front, rear } => self.controller.resize(SizeChanged::new(front, rear, 60)),
            Op::Open { smooth } => self.controller.open(smooth),
            Op::Close { smooth } => self.controller.close(smooth),
        };

        if t.is_noop() {
            assert_eq!(self.controller.front_left(), before, "ignored input moved panels");
        }
        if let Some(token) = t.requested_frame() {
            self.pending = Some(token);
        }
        self.check();
    }

    fn check(&self) {
        let c = &self.controller;
        let geometry = c.geometry().expect("geometry set at start");
        let range = geometry.drag_range();
        assert!(
            (-range..=0).contains(&c.front_left()),
            "front_left {} outside [-{range}, 0]",
            c.front_left()
        );
        assert_eq!(c.rear_left(), c.front_left() + geometry.front_width());
        if let Some(layout) = c.layout() {
            assert_eq!(layout.front.right(), layout.rear.left());
        }
    }

    /// Run the in-flight settle, if any, to completion.
    fn drain(&mut self) {
        let mut frames = 0;
        while let SessionState::Settling { token, target } = self.controller.state() {
            let t = self.controller.frame(token, self.now);
            self.check();
            self.now += Duration::from_millis(16);
            frames += 1;
            assert!(frames < 1_000, "settle toward {target:?} never terminated");
            if t.requested_frame().is_none() {
                assert!(matches!(self.controller.state(), SessionState::Idle));
                assert_eq!(self.controller.resting(), Some(target));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_streams_preserve_invariants(ops in prop::collection::vec(op(), 1..120)) {
        let mut driver = Driver::new();
        for op in &ops {
            driver.step(op);
        }
        driver.drain();
    }

    #[test]
    fn clamp_stays_in_range(
        front in 0i32..2_000,
        rear in 0i32..2_000,
        proposed in any::<i32>(),
    ) {
        let g = Geometry::new(front, rear, 50);
        for role in [PanelRole::Front, PanelRole::Rear] {
            let (min, max) = legal_range(role, &g);
            let clamped = clamp(role, proposed, &g);
            prop_assert!(min <= clamped && clamped <= max);
            if (min..=max).contains(&proposed) {
                prop_assert_eq!(clamped, proposed);
            }
        }
    }

    #[test]
    fn delta_sequences_keep_panels_coupled(
        front in 1i32..1_000,
        rear in 0i32..500,
        deltas in prop::collection::vec((any::<bool>(), -600i32..600), 0..64),
    ) {
        let mut m = CoupledOffsetModel::new(Geometry::new(front, rear, 40));
        for (on_rear, dx) in deltas {
            let role = if on_rear { PanelRole::Rear } else { PanelRole::Front };
            let before = m.front_left();
            m.apply_delta(dx, role);
            prop_assert!((-rear..=0).contains(&m.front_left()));
            prop_assert_eq!(m.rear_left(), m.front_left() + front);
            // Either panel moves the pair by the same clamped amount.
            let expected = (before + dx).clamp(-rear, 0);
            prop_assert_eq!(m.front_left(), expected);
        }
    }

    #[test]
    fn interrupted_settle_never_applies_stale_frames(
        interrupt_after in 0usize..20,
        grab_x in 0i32..300,
    ) {
        let mut c = SwipeController::default();
        c.resize(SizeChanged::new(300, 100, 60));
        let old = c.open(true).requested_frame().expect("settle frame");
        let mut now = Duration::ZERO;
        for _ in 0..interrupt_after {
            if c.frame(old, now).requested_frame().is_none() {
                break;
            }
            now += Duration::from_millis(16);
        }
        let held = c.front_left();
        let t = c.pointer(&PointerEvent::down(1, grab_x, 30, now));
        if matches!(t.to, SessionState::Dragging { .. }) {
            // Capture leaves the panels exactly where the last frame put them.
            prop_assert_eq!(c.front_left(), held);
            let late = c.frame(old, now + Duration::from_millis(16));
            prop_assert_eq!(late.noop_reason(), Some(NoopReason::StaleFrame));
            prop_assert_eq!(c.front_left(), held);
        }
    }

    #[test]
    fn release_rule_matches_velocity_and_midpoint(
        front_left in -100i32..=0,
        xvel in prop_oneof![Just(0.0f64), -5_000.0f64..5_000.0],
    ) {
        let target = swipe_core::session::decide_release(xvel, front_left, 100);
        let expected = if xvel == 0.0 {
            if 2 * front_left < -100 { SwipeTarget::Open } else { SwipeTarget::Closed }
        } else if xvel < 0.0 {
            SwipeTarget::Open
        } else {
            SwipeTarget::Closed
        };
        prop_assert_eq!(target, expected);
    }
}
