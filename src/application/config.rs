use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::services::pipeline::PipelineSettings;
use crate::domain::entities::sample::Sample;
use crate::domain::simulation::event_log::EventLog;
use crate::domain::simulation::schedule::CosineSchedule;
use crate::domain::simulation::series::SeriesBuffer;
use crate::domain::value_objects::{MetricKind, SmoothingWindow, TickInterval, WalkerParams};

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub buffers: BuffersConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub walkers: WalkersConfig,
}

/// Tick rate, smoothing window, initial run flag and optional seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(rename = "interval_ms", default)]
    pub interval: TickInterval,
    #[serde(default)]
    pub smoothing: SmoothingWindow,
    #[serde(default = "default_true")]
    pub running: bool,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Display-only labels for the simulated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
}

/// Sizes of the in-memory history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffersConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

/// Learning-rate cosine schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_period")]
    pub period_secs: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Resume on refocus if the pause was caused by losing focus.
    #[serde(default)]
    pub resume_on_visible: bool,
}

/// Per-metric walker overrides; a missing table keeps the built-in parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkersConfig {
    #[serde(default)]
    pub loss: Option<WalkerParams>,
    #[serde(default)]
    pub accuracy: Option<WalkerParams>,
    #[serde(default)]
    pub throughput: Option<WalkerParams>,
    #[serde(default)]
    pub memory: Option<WalkerParams>,
    #[serde(default)]
    pub latency: Option<WalkerParams>,
    #[serde(default)]
    pub grad_norm: Option<WalkerParams>,
    #[serde(default)]
    pub gpu_util: Option<WalkerParams>,
}

// --- Defaults ---

const fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "Llama vNext".into()
}

fn default_dataset() -> String {
    "Mix-Stack v3".into()
}

const fn default_capacity() -> usize {
    SeriesBuffer::<Sample>::DEFAULT_CAPACITY
}

const fn default_log_capacity() -> usize {
    EventLog::DEFAULT_CAPACITY
}

const fn default_base() -> f64 {
    CosineSchedule::DEFAULT_BASE
}

const fn default_period() -> f64 {
    CosineSchedule::DEFAULT_PERIOD_SECS
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval: TickInterval::default(),
            smoothing: SmoothingWindow::default(),
            running: default_true(),
            seed: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            dataset: default_dataset(),
        }
    }
}

impl Default for BuffersConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            log_capacity: default_log_capacity(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            period_secs: default_period(),
        }
    }
}

impl WalkersConfig {
    /// The configured overrides keyed by metric.
    #[must_use]
    pub fn overrides(&self) -> HashMap<MetricKind, WalkerParams> {
        [
            (MetricKind::Loss, self.loss),
            (MetricKind::Accuracy, self.accuracy),
            (MetricKind::Throughput, self.throughput),
            (MetricKind::Memory, self.memory),
            (MetricKind::Latency, self.latency),
            (MetricKind::GradNorm, self.grad_norm),
            (MetricKind::GpuUtil, self.gpu_util),
        ]
        .into_iter()
        .filter_map(|(kind, params)| params.map(|p| (kind, p)))
        .collect()
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!(path = %path.display(), "Created default config file");
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = self.to_toml()?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Render the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Default location: `<config dir>/trainpulse/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory is unknown.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("trainpulse").join("config.toml"))
    }

    /// Validate the simulation sections and turn them into pipeline settings.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending section when the schedule,
    /// a buffer size or a walker override is invalid.
    pub fn pipeline_settings(&self) -> Result<PipelineSettings> {
        let schedule = CosineSchedule::new(self.schedule.base, self.schedule.period_secs)
            .context("Invalid [schedule] section")?;
        anyhow::ensure!(self.buffers.capacity > 0, "[buffers] capacity must be positive");
        anyhow::ensure!(
            self.buffers.log_capacity > 0,
            "[buffers] log_capacity must be positive"
        );

        let walker_overrides = self.walkers.overrides();
        for (kind, params) in &walker_overrides {
            params
                .validate()
                .with_context(|| format!("Invalid [walkers.{}] parameters", kind.key()))?;
        }

        Ok(PipelineSettings {
            capacity: self.buffers.capacity,
            log_capacity: self.buffers.log_capacity,
            schedule,
            walker_overrides,
        })
    }
}
