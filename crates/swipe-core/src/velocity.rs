#![forbid(unsafe_code)]

//! Release velocity estimation from the two most recent motion samples.
//!
//! Velocity is horizontal only, in pixels per second, positive rightward.
//!
//! # Failure Modes
//!
//! - Samples with a timestamp earlier than the latest one are dropped
//!   (hosts occasionally deliver out-of-order batches).
//! - A sample sharing the latest timestamp (hosts coalescing motion) replaces
//!   the latest position and extends the last segment. With no earlier
//!   sample to measure against, the estimate reads as zero.
//! - A release that arrives long after the last motion (beyond the horizon)
//!   means the pointer was held still, so the estimate reads as zero.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    x: i32,
    at: Duration,
}

/// Two-sample window over pointer motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VelocityTracker {
    previous: Option<Sample>,
    latest: Option<Sample>,
}

impl VelocityTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: None,
            latest: None,
        }
    }

    /// Start a fresh window at the pointer-down position.
    pub fn seed(&mut self, x: i32, at: Duration) {
        self.previous = None;
        self.latest = Some(Sample { x, at });
    }

    /// Push a motion sample, shifting the window.
    pub fn record(&mut self, x: i32, at: Duration) {
        match self.latest {
            Some(latest) if at < latest.at => {}
            Some(latest) if at == latest.at => self.latest = Some(Sample { x, at }),
            _ => {
                self.previous = self.latest;
                self.latest = Some(Sample { x, at });
            }
        }
    }

    /// Horizontal position of the most recent sample.
    #[inline]
    #[must_use]
    pub fn last_x(&self) -> Option<i32> {
        self.latest.map(|s| s.x)
    }

    /// Velocity between the last two samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let (Some(previous), Some(latest)) = (self.previous, self.latest) else {
            return 0.0;
        };
        let dt = latest.at.saturating_sub(previous.at).as_secs_f64();
        if dt <= 0.0 {
            return 0.0;
        }
        (f64::from(latest.x) - f64::from(previous.x)) / dt
    }

    /// Velocity as seen at release time `released_at`.
    ///
    /// Returns zero when the last sample is older than `horizon`.
    #[must_use]
    pub fn release_velocity(&self, released_at: Duration, horizon: Duration) -> f64 {
        match self.latest {
            Some(latest) if released_at.saturating_sub(latest.at) <= horizon => self.velocity(),
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Clamp a velocity's magnitude into `[min, max]`, preserving sign.
///
/// Magnitudes below `min` read as zero (too slow to count as a fling);
/// magnitudes above `max` are capped. Non-finite input reads as zero.
#[must_use]
pub fn clamp_magnitude(velocity: f64, min: f64, max: f64) -> f64 {
    if !velocity.is_finite() {
        return 0.0;
    }
    let magnitude = velocity.abs();
    if magnitude < min {
        0.0
    } else if magnitude > max {
        max.copysign(velocity)
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    const HORIZON: Duration = Duration::from_millis(100);

    #[test]
    fn seeded_window_has_no_velocity() {
        let mut v = VelocityTracker::new();
        v.seed(100, ms(0));
        assert_eq!(v.velocity(), 0.0);
        assert_eq!(v.last_x(), Some(100));
    }

    #[test]
    fn velocity_uses_last_two_samples() {
        let mut v = VelocityTracker::new();
        v.seed(100, ms(0));
        v.record(90, ms(10));
        v.record(70, ms(20));
        assert!((v.velocity() - -2_000.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_order_sample_is_dropped() {
        let mut v = VelocityTracker::new();
        v.seed(100, ms(50));
        v.record(80, ms(60));
        v.record(10, ms(40));
        assert_eq!(v.last_x(), Some(80));
        assert!((v.velocity() - -2_000.0).abs() < 1e-9);
    }

    #[test]
    fn same_timestamp_reads_zero() {
        let mut v = VelocityTracker::new();
        v.seed(100, ms(5));
        v.record(60, ms(5));
        assert_eq!(v.velocity(), 0.0);
    }

    #[test]
    fn coalesced_sample_extends_last_segment() {
        let mut v = VelocityTracker::new();
        v.seed(250, ms(0));
        v.record(240, ms(16));
        v.record(230, ms(16));
        assert_eq!(v.last_x(), Some(230));
        assert!((v.velocity() - -1_250.0).abs() < 1e-9);
    }

    #[test]
    fn stale_release_reads_zero() {
        let mut v = VelocityTracker::new();
        v.seed(100, ms(0));
        v.record(50, ms(10));
        assert!(v.release_velocity(ms(60), HORIZON) < 0.0);
        assert_eq!(v.release_velocity(ms(500), HORIZON), 0.0);
    }

    #[test]
    fn clamp_magnitude_dead_zone_and_cap() {
        assert_eq!(clamp_magnitude(-20.0, 50.0, 8_000.0), 0.0);
        assert_eq!(clamp_magnitude(-9_000.0, 50.0, 8_000.0), -8_000.0);
        assert_eq!(clamp_magnitude(9_000.0, 50.0, 8_000.0), 8_000.0);
        assert_eq!(clamp_magnitude(-2.0, 0.0, 8_000.0), -2.0);
        assert_eq!(clamp_magnitude(f64::NAN, 0.0, 8_000.0), 0.0);
    }
}
