#![forbid(unsafe_code)]

//! Tuning knobs for release detection and settling.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default base settle duration, scaled up with travel distance.
pub const DEFAULT_BASE_SETTLE_MS: u64 = 256;

/// Default cap on any single settle.
pub const DEFAULT_MAX_SETTLE_MS: u64 = 600;

/// Default spring stiffness for [`SettleStyle::Spring`].
pub const DEFAULT_SPRING_STIFFNESS: f64 = 170.0;

/// Which slide primitive drives a settle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettleStyle {
    /// Fixed-duration quintic ease-out. Duration grows with the distance
    /// left to travel, capped at `max_duration_ms`.
    Timed {
        base_duration_ms: u64,
        max_duration_ms: u64,
    },
    /// Critically damped spring that never crosses its target.
    Spring { stiffness: f64 },
}

impl Default for SettleStyle {
    fn default() -> Self {
        Self::Timed {
            base_duration_ms: DEFAULT_BASE_SETTLE_MS,
            max_duration_ms: DEFAULT_MAX_SETTLE_MS,
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub settle: SettleStyle,
    /// Distance (px) from the target at which a settle snaps and stops.
    pub settle_epsilon: f64,
    /// Release speeds below this (px/s) count as zero velocity.
    pub min_fling_velocity: f64,
    /// Release speeds above this (px/s) are capped.
    pub max_fling_velocity: f64,
    /// A release later than this after the last motion sample counts as
    /// zero velocity.
    pub velocity_horizon_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            settle: SettleStyle::default(),
            settle_epsilon: 0.5,
            min_fling_velocity: 0.0,
            max_fling_velocity: 8_000.0,
            velocity_horizon_ms: 100,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("settle epsilon must be finite and >= 0 (got {value})")]
    InvalidEpsilon { value: f64 },
    #[error("settle durations must be > 0 (base {base_ms}ms, max {max_ms}ms)")]
    ZeroDuration { base_ms: u64, max_ms: u64 },
    #[error("base settle duration {base_ms}ms exceeds max {max_ms}ms")]
    BaseExceedsMax { base_ms: u64, max_ms: u64 },
    #[error("spring stiffness must be finite and > 0 (got {value})")]
    InvalidStiffness { value: f64 },
    #[error("fling velocity bounds must satisfy 0 <= min <= max (got min {min}, max {max})")]
    InvalidVelocityBounds { min: f64, max: f64 },
}

impl SwipeConfig {
    #[must_use]
    pub fn with_settle(mut self, settle: SettleStyle) -> Self {
        self.settle = settle;
        self
    }

    #[must_use]
    pub fn with_settle_epsilon(mut self, epsilon: f64) -> Self {
        self.settle_epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_fling_velocity(mut self, min: f64, max: f64) -> Self {
        self.min_fling_velocity = min;
        self.max_fling_velocity = max;
        self
    }

    #[must_use]
    pub fn with_velocity_horizon(mut self, horizon: Duration) -> Self {
        self.velocity_horizon_ms = u64::try_from(horizon.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[inline]
    #[must_use]
    pub const fn velocity_horizon(&self) -> Duration {
        Duration::from_millis(self.velocity_horizon_ms)
    }

    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.settle_epsilon.is_finite() || self.settle_epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon {
                value: self.settle_epsilon,
            });
        }
        match self.settle {
            SettleStyle::Timed {
                base_duration_ms,
                max_duration_ms,
            } => {
                if base_duration_ms == 0 || max_duration_ms == 0 {
                    return Err(ConfigError::ZeroDuration {
                        base_ms: base_duration_ms,
                        max_ms: max_duration_ms,
                    });
                }
                if base_duration_ms > max_duration_ms {
                    return Err(ConfigError::BaseExceedsMax {
                        base_ms: base_duration_ms,
                        max_ms: max_duration_ms,
                    });
                }
            }
            SettleStyle::Spring { stiffness } => {
                if !stiffness.is_finite() || stiffness <= 0.0 {
                    return Err(ConfigError::InvalidStiffness { value: stiffness });
                }
            }
        }
        let (min, max) = (self.min_fling_velocity, self.max_fling_velocity);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ConfigError::InvalidVelocityBounds { min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SwipeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_epsilon() {
        let config = SwipeConfig::default().with_settle_epsilon(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEpsilon { .. })
        ));
    }

    #[test]
    fn rejects_inverted_durations() {
        let config = SwipeConfig::default().with_settle(SettleStyle::Timed {
            base_duration_ms: 700,
            max_duration_ms: 600,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::BaseExceedsMax {
                base_ms: 700,
                max_ms: 600
            })
        );
    }

    #[test]
    fn rejects_zero_duration() {
        let config = SwipeConfig::default().with_settle(SettleStyle::Timed {
            base_duration_ms: 0,
            max_duration_ms: 600,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration { .. })
        ));
    }

    #[test]
    fn rejects_bad_spring() {
        let config = SwipeConfig::default().with_settle(SettleStyle::Spring { stiffness: 0.0 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStiffness { .. })
        ));
    }

    #[test]
    fn rejects_inverted_fling_bounds() {
        let config = SwipeConfig::default().with_fling_velocity(500.0, 100.0);
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "fling velocity bounds must satisfy 0 <= min <= max (got min 500, max 100)"
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SwipeConfig =
            serde_json::from_str(r#"{"settle":{"kind":"spring","stiffness":220.0}}"#)
                .expect("config should parse");
        assert_eq!(config.settle, SettleStyle::Spring { stiffness: 220.0 });
        assert_eq!(config.velocity_horizon(), Duration::from_millis(100));
        assert_eq!(config.settle_epsilon, 0.5);
    }
}
