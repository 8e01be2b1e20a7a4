use thiserror::Error;

/// Construction-time validation failures for the simulation pipeline.
///
/// Nothing on the tick path can fail; these only surface while a pipeline
/// or one of its parts is being built from configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: f64, max: f64 },
    #[error("parameter `{0}` must be a finite number")]
    NonFiniteParameter(&'static str),
    #[error("smoothing window must be at least 1")]
    ZeroWindow,
    #[error("buffer capacity must be at least 1")]
    ZeroCapacity,
    #[error("unsupported tick interval: {0} ms (expected 500, 1000, 2000 or 5000)")]
    UnsupportedInterval(u64),
    #[error("schedule period must be positive, got {0}")]
    InvalidPeriod(f64),
}
