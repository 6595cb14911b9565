#![forbid(unsafe_code)]

//! Animated convergence of the front offset toward a resting position.
//!
//! A [`SettleAnimator`] owns at most one in-flight [`Slide`]. Each frame the
//! slide reports where the front panel should be at `now` and whether it is
//! still moving; the animator writes that into the [`CoupledOffsetModel`].
//!
//! Slides anchor their clock on the first frame they see, so a settle can be
//! started from a context with no timestamp (programmatic `open()`).
//!
//! # Invariants
//!
//! 1. Every slide is monotonic: it never moves away from its target.
//! 2. Every slide terminates: the timed slide at its deadline, the spring once
//!    within the rest thresholds.
//! 3. On arrival the offset is snapped exactly to the target.
//! 4. `cancel()` leaves the model untouched.

use std::fmt;
use std::time::Duration;

use crate::config::SettleStyle;
use crate::offset::CoupledOffsetModel;
use crate::trace;

/// Maximum dt per spring integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Longest gap between frames integrated in one advance. Longer pauses
/// resume from where the spring was instead of replaying the whole gap.
const MAX_FRAME_GAP_SECS: f64 = 0.1;

/// Velocity (px/s) below which a spring near its target counts as still.
const SPRING_VELOCITY_THRESHOLD: f64 = 5.0;

/// Position and motion flag reported by a slide for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStep {
    pub offset: f64,
    pub moving: bool,
}

/// An incremental "slide toward target" primitive.
pub trait Slide: fmt::Debug {
    /// Resting offset this slide converges on.
    fn target(&self) -> f64;

    /// Offset at `now`. The first call anchors the slide's clock.
    fn advance(&mut self, now: Duration) -> SlideStep;
}

/// Quintic ease-out: fast start, gentle landing.
#[inline]
#[must_use]
pub fn ease_out_quint(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t * t * t + 1.0
}

// ---------------------------------------------------------------------------
// TimedSlide
// ---------------------------------------------------------------------------

/// Fixed-duration slide along [`ease_out_quint`].
#[derive(Debug, Clone)]
pub struct TimedSlide {
    from: f64,
    to: f64,
    duration: Duration,
    started: Option<Duration>,
}

impl TimedSlide {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            started: None,
        }
    }

    /// Slide whose duration scales with the share of `drag_range` left to
    /// travel: `base * (1 + distance / drag_range)`, capped at `max`.
    #[must_use]
    pub fn for_distance(from: f64, to: f64, drag_range: i32, base: Duration, max: Duration) -> Self {
        let range = f64::from(drag_range.max(1));
        let fraction = ((to - from).abs() / range).min(1.0);
        let millis = (base.as_secs_f64() * 1_000.0 * (1.0 + fraction)).round();
        let duration = Duration::from_millis(millis as u64).min(max);
        Self::new(from, to, duration)
    }

    #[inline]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl Slide for TimedSlide {
    fn target(&self) -> f64 {
        self.to
    }

    fn advance(&mut self, now: Duration) -> SlideStep {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_sub(started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return SlideStep {
                offset: self.to,
                moving: false,
            };
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        SlideStep {
            offset: self.from + (self.to - self.from) * ease_out_quint(t),
            moving: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SpringSlide
// ---------------------------------------------------------------------------

/// Critically damped spring from `from` toward `to`.
///
/// Uses semi-implicit Euler with sub-stepping. A step that would cross the
/// target lands on it instead and zeroes velocity, which keeps the motion
/// monotonic even when integration error would overshoot.
#[derive(Debug, Clone)]
pub struct SpringSlide {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    last: Option<Duration>,
    at_rest: bool,
}

impl SpringSlide {
    #[must_use]
    pub fn new(from: f64, to: f64, stiffness: f64, rest_threshold: f64) -> Self {
        let stiffness = stiffness.max(0.1);
        Self {
            position: from,
            velocity: 0.0,
            target: to,
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
            rest_threshold: rest_threshold.abs(),
            last: None,
            at_rest: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        let next = self.position + self.velocity * dt;
        if (next - self.target).signum() != displacement.signum() && displacement != 0.0 {
            self.position = self.target;
            self.velocity = 0.0;
        } else {
            self.position = next;
        }
    }
}

impl Slide for SpringSlide {
    fn target(&self) -> f64 {
        self.target
    }

    fn advance(&mut self, now: Duration) -> SlideStep {
        let last = *self.last.get_or_insert(now);
        self.last = Some(now);

        if !self.at_rest {
            let mut remaining = now
                .saturating_sub(last)
                .as_secs_f64()
                .min(MAX_FRAME_GAP_SECS);
            while remaining > 0.0 {
                let dt = remaining.min(MAX_STEP_SECS);
                self.step(dt);
                remaining -= dt;
            }
            let near = (self.position - self.target).abs() <= self.rest_threshold;
            if near && self.velocity.abs() < SPRING_VELOCITY_THRESHOLD {
                self.position = self.target;
                self.velocity = 0.0;
                self.at_rest = true;
            }
        }

        SlideStep {
            offset: self.position,
            moving: !self.at_rest,
        }
    }
}

impl SettleStyle {
    /// Build the slide this style describes for one settle.
    #[must_use]
    pub fn slide(&self, from: i32, to: i32, drag_range: i32, epsilon: f64) -> Box<dyn Slide> {
        match *self {
            Self::Timed {
                base_duration_ms,
                max_duration_ms,
            } => Box::new(TimedSlide::for_distance(
                f64::from(from),
                f64::from(to),
                drag_range,
                Duration::from_millis(base_duration_ms),
                Duration::from_millis(max_duration_ms),
            )),
            Self::Spring { stiffness } => Box::new(SpringSlide::new(
                f64::from(from),
                f64::from(to),
                stiffness,
                epsilon,
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// SettleAnimator
// ---------------------------------------------------------------------------

/// Result of one animator frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleTick {
    /// Still travelling; another frame is needed.
    Moving { front_left: i32 },
    /// Snapped onto the target; the animator is now idle.
    Arrived { front_left: i32 },
}

/// Drives the model toward a target one frame at a time.
#[derive(Debug, Default)]
pub struct SettleAnimator {
    active: Option<ActiveSettle>,
}

#[derive(Debug)]
struct ActiveSettle {
    target: i32,
    slide: Box<dyn Slide>,
}

impl SettleAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin settling toward `target` with a caller-supplied slide.
    ///
    /// Any in-flight settle is replaced.
    pub fn start(&mut self, target: i32, slide: Box<dyn Slide>) {
        self.active = Some(ActiveSettle { target, slide });
    }

    /// Abort the in-flight settle; the model keeps its current offset.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the in-flight settle.
    #[must_use]
    pub fn target(&self) -> Option<i32> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Advance one frame, writing the new offset into `model`.
    ///
    /// Returns `None` when no settle is in flight.
    pub fn tick(
        &mut self,
        now: Duration,
        model: &mut CoupledOffsetModel,
        epsilon: f64,
    ) -> Option<SettleTick> {
        let active = self.active.as_mut()?;
        let step = active.slide.advance(now);
        let target = active.target;

        if !step.moving || (step.offset - f64::from(target)).abs() <= epsilon {
            model.apply_front_offset(target);
            self.active = None;
            trace!(target: "swipe.settle", front_left = target, "settle arrived");
            return Some(SettleTick::Arrived {
                front_left: model.front_left(),
            });
        }

        model.apply_front_offset(round_to_i32(step.offset));
        trace!(
            target: "swipe.settle",
            front_left = model.front_left(),
            target_left = target,
            "settle step"
        );
        Some(SettleTick::Moving {
            front_left: model.front_left(),
        })
    }
}

fn round_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    if value >= f64::from(i32::MAX) {
        return i32::MAX;
    }
    if value <= f64::from(i32::MIN) {
        return i32::MIN;
    }
    value.round() as i32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
