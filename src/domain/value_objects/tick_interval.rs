use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::SimulationError;

/// Period between two scheduler ticks.
///
/// Only the four refresh rates offered by the dashboard are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum TickInterval {
    HalfSecond,
    #[default]
    OneSecond,
    TwoSeconds,
    FiveSeconds,
}

impl TickInterval {
    pub const ALL: [Self; 4] = [
        Self::HalfSecond,
        Self::OneSecond,
        Self::TwoSeconds,
        Self::FiveSeconds,
    ];

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        match self {
            Self::HalfSecond => 500,
            Self::OneSecond => 1000,
            Self::TwoSeconds => 2000,
            Self::FiveSeconds => 5000,
        }
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    /// Cycle to the next slower rate, wrapping back to the fastest.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::HalfSecond => Self::OneSecond,
            Self::OneSecond => Self::TwoSeconds,
            Self::TwoSeconds => Self::FiveSeconds,
            Self::FiveSeconds => Self::HalfSecond,
        }
    }
}

impl TryFrom<u64> for TickInterval {
    type Error = SimulationError;

    fn try_from(millis: u64) -> Result<Self, Self::Error> {
        match millis {
            500 => Ok(Self::HalfSecond),
            1000 => Ok(Self::OneSecond),
            2000 => Ok(Self::TwoSeconds),
            5000 => Ok(Self::FiveSeconds),
            other => Err(SimulationError::UnsupportedInterval(other)),
        }
    }
}

impl From<TickInterval> for u64 {
    fn from(interval: TickInterval) -> Self {
        interval.as_millis()
    }
}

impl fmt::Display for TickInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HalfSecond => write!(f, "0.5s"),
            Self::OneSecond => write!(f, "1s"),
            Self::TwoSeconds => write!(f, "2s"),
            Self::FiveSeconds => write!(f, "5s"),
        }
    }
}
