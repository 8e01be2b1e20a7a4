use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log_entry::LogEntry;
use super::sample::{MemorySample, Sample};
use crate::domain::value_objects::SmoothingWindow;

/// Read-only copy of every series at one tick boundary.
///
/// Smoothed series are derived from the raw buffers at the moment the
/// snapshot is taken, using `window`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub taken_at: DateTime<Utc>,
    /// Number of ticks applied so far.
    pub step: u64,
    pub window: SmoothingWindow,
    pub loss: Vec<Sample>,
    pub loss_smoothed: Vec<Sample>,
    pub accuracy: Vec<Sample>,
    pub accuracy_smoothed: Vec<Sample>,
    pub throughput: Vec<Sample>,
    pub throughput_smoothed: Vec<Sample>,
    pub memory: Vec<MemorySample>,
    pub latency: Vec<Sample>,
    pub grad_norm: Vec<Sample>,
    pub learning_rate: Vec<Sample>,
    /// Latest GPU utilization as a fraction in `[0, 1]`.
    pub gpu_util: f64,
    /// Event log, newest first.
    pub logs: Vec<LogEntry>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn latest_loss(&self) -> Option<f64> {
        self.loss.last().map(|s| s.value)
    }

    #[must_use]
    pub fn latest_accuracy(&self) -> Option<f64> {
        self.accuracy.last().map(|s| s.value)
    }

    #[must_use]
    pub fn latest_throughput(&self) -> Option<f64> {
        self.throughput.last().map(|s| s.value)
    }

    #[must_use]
    pub fn latest_latency(&self) -> Option<f64> {
        self.latency.last().map(|s| s.value)
    }

    #[must_use]
    pub fn latest_learning_rate(&self) -> Option<f64> {
        self.learning_rate.last().map(|s| s.value)
    }

    #[must_use]
    pub fn latest_memory(&self) -> Option<MemorySample> {
        self.memory.last().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.step == 0
    }
}
