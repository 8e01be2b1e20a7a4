use serde::{Deserialize, Serialize};

use crate::domain::error::SimulationError;

/// Parameters of a bounded random walk: starting point, per-tick drift,
/// perturbation scale and inclusive clamp bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkerParams {
    pub start: f64,
    pub drift: f64,
    pub volatility: f64,
    pub min: f64,
    pub max: f64,
}

impl WalkerParams {
    #[must_use]
    pub const fn new(start: f64, drift: f64, volatility: f64, min: f64, max: f64) -> Self {
        Self {
            start,
            drift,
            volatility,
            min,
            max,
        }
    }

    /// Check that every parameter is finite and that `min <= max`.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::NonFiniteParameter` for NaN or infinite
    /// values and `SimulationError::InvalidBounds` for inverted bounds.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("start", self.start),
            ("drift", self.drift),
            ("volatility", self.volatility),
            ("min", self.min),
            ("max", self.max),
        ];
        if let Some((name, _)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(SimulationError::NonFiniteParameter(name));
        }
        if self.min > self.max {
            return Err(SimulationError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}
