use std::f64::consts::PI;

use chrono::{DateTime, Utc};

use crate::domain::error::SimulationError;

/// Cosine decay of the learning rate with periodic warm restarts.
///
/// `lr(t) = base * (0.55 + 0.45 * cos(((t mod period) / period) * pi))`,
/// with `t` in wall-clock seconds. The value restarts at `base` at the start
/// of each period, passes `0.55 * base` half-way through and approaches
/// `0.1 * base` just before the next restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineSchedule {
    base: f64,
    period_secs: f64,
}

impl CosineSchedule {
    pub const DEFAULT_BASE: f64 = 1e-3;
    pub const DEFAULT_PERIOD_SECS: f64 = 120.0;

    /// # Errors
    ///
    /// Returns `SimulationError` if `base` is not finite or `period_secs` is
    /// not a positive finite number.
    pub fn new(base: f64, period_secs: f64) -> Result<Self, SimulationError> {
        if !base.is_finite() {
            return Err(SimulationError::NonFiniteParameter("base"));
        }
        if !period_secs.is_finite() || period_secs <= 0.0 {
            return Err(SimulationError::InvalidPeriod(period_secs));
        }
        Ok(Self { base, period_secs })
    }

    #[must_use]
    pub const fn base(&self) -> f64 {
        self.base
    }

    #[must_use]
    pub const fn period_secs(&self) -> f64 {
        self.period_secs
    }

    #[must_use]
    pub fn value_at(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() { seconds } else { 0.0 };
        let phase = seconds.rem_euclid(self.period_secs) / self.period_secs;
        self.base * 0.45_f64.mul_add((phase * PI).cos(), 0.55)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value_at_time(&self, at: DateTime<Utc>) -> f64 {
        self.value_at(at.timestamp_millis() as f64 / 1000.0)
    }
}

impl Default for CosineSchedule {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            period_secs: Self::DEFAULT_PERIOD_SECS,
        }
    }
}
