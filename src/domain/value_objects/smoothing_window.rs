use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::SimulationError;

/// Number of most recent samples averaged into one smoothed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SmoothingWindow(usize);

impl SmoothingWindow {
    /// Windows offered by the dashboard selector.
    pub const PRESETS: [usize; 4] = [1, 3, 4, 8];

    pub const IDENTITY: Self = Self(1);

    /// # Errors
    ///
    /// Returns `SimulationError::ZeroWindow` when `size` is zero.
    pub const fn new(size: usize) -> Result<Self, SimulationError> {
        if size == 0 {
            Err(SimulationError::ZeroWindow)
        } else {
            Ok(Self(size))
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Next larger preset, wrapping to the smallest one.
    #[must_use]
    pub fn next(self) -> Self {
        Self::PRESETS
            .iter()
            .copied()
            .find(|&size| size > self.0)
            .map_or(Self(Self::PRESETS[0]), Self)
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<usize> for SmoothingWindow {
    type Error = SimulationError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<SmoothingWindow> for usize {
    fn from(window: SmoothingWindow) -> Self {
        window.0
    }
}

impl fmt::Display for SmoothingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
