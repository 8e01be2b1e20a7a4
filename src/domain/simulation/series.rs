use std::collections::VecDeque;

use crate::domain::entities::sample::SeriesPoint;
use crate::domain::error::SimulationError;

/// Fixed-capacity sample history, oldest first.
///
/// Appending at capacity silently evicts the oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuffer<S> {
    samples: VecDeque<S>,
    capacity: usize,
}

impl<S> SeriesBuffer<S> {
    pub const DEFAULT_CAPACITY: usize = 180;

    /// # Errors
    ///
    /// Returns `SimulationError::ZeroCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn push(&mut self, sample: S) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest sample, or `None` before the first tick.
    #[must_use]
    pub fn latest(&self) -> Option<&S> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &S> + ExactSizeIterator + '_ {
        self.samples.iter()
    }
}

impl<S: Clone> SeriesBuffer<S> {
    #[must_use]
    pub fn to_vec(&self) -> Vec<S> {
        self.samples.iter().cloned().collect()
    }
}

impl<S: SeriesPoint> SeriesBuffer<S> {
    /// Primary values in chronological order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(SeriesPoint::value).collect()
    }
}
