use crate::domain::error::SimulationError;
use crate::domain::ports::random::RandomSource;
use crate::domain::value_objects::walker_params::WalkerParams;

/// Bounded random walk with drift.
///
/// Each step adds `(u - 0.5 + bias) * volatility + drift` for a uniform draw
/// `u` and clamps the result into `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    value: f64,
    params: WalkerParams,
}

impl Walker {
    /// Build a walker, clamping the start value into its bounds.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError` if the parameters are non-finite or the
    /// bounds are inverted.
    pub fn new(params: WalkerParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self {
            value: params.start.clamp(params.min, params.max),
            params,
        })
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&mut self, rng: &mut dyn RandomSource) -> f64 {
        self.step_biased(rng, 0.0)
    }

    /// Advance one step with an extra additive `bias` on the centered draw.
    pub fn step_biased(&mut self, rng: &mut dyn RandomSource, bias: f64) -> f64 {
        let centered = rng.next_unit() - 0.5 + bias;
        let delta = centered.mul_add(self.params.volatility, self.params.drift);
        // A misbehaving source must not push NaN into the series.
        if delta.is_finite() {
            self.value = (self.value + delta).clamp(self.params.min, self.params.max);
        }
        self.value
    }
}
