use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything that can live in a series buffer: a timestamp and one primary value.
pub trait SeriesPoint {
    fn timestamp(&self) -> DateTime<Utc>;

    /// The value used for smoothing and charting.
    fn value(&self) -> f64;
}

/// A single scalar observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl SeriesPoint for Sample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// Paired used/free observation for device memory, in GB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub timestamp: DateTime<Utc>,
    pub used: f64,
    pub free: f64,
}

impl MemorySample {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, used: f64, free: f64) -> Self {
        Self {
            timestamp,
            used,
            free,
        }
    }
}

impl SeriesPoint for MemorySample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn value(&self) -> f64 {
        self.used
    }
}
