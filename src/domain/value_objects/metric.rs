use std::fmt;

use serde::{Deserialize, Serialize};

use super::walker_params::WalkerParams;

/// Every simulated metric shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Loss,
    Accuracy,
    Throughput,
    Memory,
    Latency,
    GradNorm,
    GpuUtil,
}

impl MetricKind {
    /// Walker stepping order within one tick.
    pub const ALL: [Self; 7] = [
        Self::Loss,
        Self::Accuracy,
        Self::Throughput,
        Self::Memory,
        Self::Latency,
        Self::GradNorm,
        Self::GpuUtil,
    ];

    /// Reference walker parameters for this metric.
    #[must_use]
    pub const fn default_params(self) -> WalkerParams {
        match self {
            Self::Loss => WalkerParams::new(2.4, -0.015, 0.08, 0.05, 5.0),
            Self::Accuracy => WalkerParams::new(40.0, 0.4, 2.0, 0.0, 100.0),
            Self::Throughput => WalkerParams::new(2000.0, 50.0, 300.0, 200.0, 6000.0),
            Self::Memory => WalkerParams::new(34.0, 0.1, 0.6, 20.0, 80.0),
            Self::Latency => WalkerParams::new(120.0, -0.5, 10.0, 30.0, 300.0),
            Self::GradNorm => WalkerParams::new(1.5, -0.01, 0.05, 0.2, 5.0),
            Self::GpuUtil => WalkerParams::new(0.65, 0.0, 0.02, 0.2, 0.98),
        }
    }

    /// Floor or ceiling applied to a walker output before it is recorded.
    #[must_use]
    pub fn display_guard(self, value: f64) -> f64 {
        match self {
            Self::Loss => value.max(0.02),
            Self::Accuracy => value.min(100.0),
            Self::Throughput | Self::Memory | Self::Latency => value.max(0.0),
            Self::GradNorm => value.max(0.01),
            Self::GpuUtil => value,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loss => "Training loss",
            Self::Accuracy => "Accuracy",
            Self::Throughput => "Tokens per sec",
            Self::Memory => "VRAM usage",
            Self::Latency => "Latency",
            Self::GradNorm => "Gradient norm",
            Self::GpuUtil => "GPU utilization",
        }
    }

    /// Identifier used in configuration tables and JSON output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Loss => "loss",
            Self::Accuracy => "accuracy",
            Self::Throughput => "throughput",
            Self::Memory => "memory",
            Self::Latency => "latency",
            Self::GradNorm => "grad_norm",
            Self::GpuUtil => "gpu_util",
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Loss | Self::GradNorm => "",
            Self::Accuracy | Self::GpuUtil => "%",
            Self::Throughput => "t/s",
            Self::Memory => "GB",
            Self::Latency => "ms",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
