use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::log_entry::LogEntry;
use crate::domain::entities::sample::{MemorySample, Sample};
use crate::domain::entities::snapshot::DashboardSnapshot;
use crate::domain::error::SimulationError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::random::RandomSource;
use crate::domain::simulation::event_log::{EventLog, EventLogGenerator};
use crate::domain::simulation::schedule::CosineSchedule;
use crate::domain::simulation::series::SeriesBuffer;
use crate::domain::simulation::smoothing::smooth_samples;
use crate::domain::simulation::walker::Walker;
use crate::domain::value_objects::{MetricKind, SmoothingWindow, WalkerParams};

/// Everything needed to build a [`Pipeline`] besides its random source and clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub capacity: usize,
    pub log_capacity: usize,
    pub schedule: CosineSchedule,
    /// Per-metric parameters replacing [`MetricKind::default_params`].
    pub walker_overrides: HashMap<MetricKind, WalkerParams>,
}

impl PipelineSettings {
    #[must_use]
    pub fn walker_params(&self, kind: MetricKind) -> WalkerParams {
        self.walker_overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_params())
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            capacity: SeriesBuffer::<Sample>::DEFAULT_CAPACITY,
            log_capacity: EventLog::DEFAULT_CAPACITY,
            schedule: CosineSchedule::default(),
            walker_overrides: HashMap::new(),
        }
    }
}

/// What a single tick produced, for logging by whoever drives the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Zero-based index of the tick that was just applied.
    pub index: u64,
    pub at: DateTime<Utc>,
    pub loss: f64,
    pub learning_rate: f64,
    pub gpu_util: f64,
    pub event: Option<LogEntry>,
}

#[derive(Debug, Clone)]
struct Walkers {
    loss: Walker,
    accuracy: Walker,
    throughput: Walker,
    memory: Walker,
    latency: Walker,
    grad_norm: Walker,
    gpu_util: Walker,
}

impl Walkers {
    fn new(settings: &PipelineSettings) -> Result<Self, SimulationError> {
        let build = |kind| Walker::new(settings.walker_params(kind));
        Ok(Self {
            loss: build(MetricKind::Loss)?,
            accuracy: build(MetricKind::Accuracy)?,
            throughput: build(MetricKind::Throughput)?,
            memory: build(MetricKind::Memory)?,
            latency: build(MetricKind::Latency)?,
            grad_norm: build(MetricKind::GradNorm)?,
            gpu_util: build(MetricKind::GpuUtil)?,
        })
    }
}

/// One simulated training session: every walker, every series buffer, the
/// event log and the tick counter.
///
/// A pipeline is plain synchronous state. [`Pipeline::tick`] is the only
/// mutation and always applies a whole tick.
pub struct Pipeline {
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    walkers: Walkers,
    loss: SeriesBuffer<Sample>,
    accuracy: SeriesBuffer<Sample>,
    throughput: SeriesBuffer<Sample>,
    memory: SeriesBuffer<MemorySample>,
    latency: SeriesBuffer<Sample>,
    grad_norm: SeriesBuffer<Sample>,
    learning_rate: SeriesBuffer<Sample>,
    gpu_util: f64,
    schedule: CosineSchedule,
    events: EventLogGenerator,
    step: u64,
}

impl Pipeline {
    /// Device memory reported as the `free` half of each VRAM sample, in GB.
    pub const VRAM_TOTAL_GB: f64 = 80.0;
    /// GPU gauge reading before the first tick.
    pub const INITIAL_GPU_UTIL: f64 = 0.6;

    /// # Errors
    ///
    /// Returns `SimulationError` if a walker parameter set or a capacity is
    /// invalid.
    pub fn new(
        settings: &PipelineSettings,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SimulationError> {
        let capacity = settings.capacity;
        Ok(Self {
            rng,
            clock,
            walkers: Walkers::new(settings)?,
            loss: SeriesBuffer::new(capacity)?,
            accuracy: SeriesBuffer::new(capacity)?,
            throughput: SeriesBuffer::new(capacity)?,
            memory: SeriesBuffer::new(capacity)?,
            latency: SeriesBuffer::new(capacity)?,
            grad_norm: SeriesBuffer::new(capacity)?,
            learning_rate: SeriesBuffer::new(capacity)?,
            gpu_util: Self::INITIAL_GPU_UTIL,
            schedule: settings.schedule,
            events: EventLogGenerator::new(EventLog::new(settings.log_capacity)?),
            step: 0,
        })
    }

    /// Apply one tick: step every walker, append one sample per series,
    /// evaluate the schedule, refresh the GPU gauge, maybe emit a log line,
    /// then bump the tick counter.
    pub fn tick(&mut self) -> TickOutcome {
        let index = self.step;
        let now = self.clock.now();
        let rng = self.rng.as_mut();
        let w = &mut self.walkers;

        let loss = MetricKind::Loss.display_guard(w.loss.step(rng));
        self.loss.push(Sample::new(now, loss));

        let accuracy = MetricKind::Accuracy.display_guard(w.accuracy.step(rng));
        self.accuracy.push(Sample::new(now, accuracy));

        let throughput = MetricKind::Throughput.display_guard(w.throughput.step(rng));
        self.throughput.push(Sample::new(now, throughput));

        let used = MetricKind::Memory.display_guard(w.memory.step(rng));
        self.memory
            .push(MemorySample::new(now, used, Self::VRAM_TOTAL_GB));

        let latency = MetricKind::Latency.display_guard(w.latency.step(rng));
        self.latency.push(Sample::new(now, latency));

        let grad_norm = MetricKind::GradNorm.display_guard(w.grad_norm.step(rng));
        self.grad_norm.push(Sample::new(now, grad_norm));

        let learning_rate = self.schedule.value_at_time(now);
        self.learning_rate.push(Sample::new(now, learning_rate));

        self.gpu_util = w.gpu_util.step(rng);

        let event = self.events.maybe_emit(index, rng, now);
        self.step += 1;

        TickOutcome {
            index,
            at: now,
            loss,
            learning_rate,
            gpu_util: self.gpu_util,
            event,
        }
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Scalar series for `kind`; `None` for VRAM (see [`Pipeline::memory`])
    /// and GPU utilization, which is a gauge rather than a series.
    #[must_use]
    pub const fn series(&self, kind: MetricKind) -> Option<&SeriesBuffer<Sample>> {
        match kind {
            MetricKind::Loss => Some(&self.loss),
            MetricKind::Accuracy => Some(&self.accuracy),
            MetricKind::Throughput => Some(&self.throughput),
            MetricKind::Latency => Some(&self.latency),
            MetricKind::GradNorm => Some(&self.grad_norm),
            MetricKind::Memory | MetricKind::GpuUtil => None,
        }
    }

    #[must_use]
    pub const fn memory(&self) -> &SeriesBuffer<MemorySample> {
        &self.memory
    }

    #[must_use]
    pub const fn learning_rate(&self) -> &SeriesBuffer<Sample> {
        &self.learning_rate
    }

    #[must_use]
    pub const fn gpu_util(&self) -> f64 {
        self.gpu_util
    }

    #[must_use]
    pub const fn events(&self) -> &EventLog {
        self.events.log()
    }

    /// Copy every series out, deriving the smoothed loss, accuracy and
    /// throughput with `window`.
    #[must_use]
    pub fn snapshot(&self, window: SmoothingWindow) -> DashboardSnapshot {
        let loss = self.loss.to_vec();
        let accuracy = self.accuracy.to_vec();
        let throughput = self.throughput.to_vec();
        DashboardSnapshot {
            taken_at: self.clock.now(),
            step: self.step,
            window,
            loss_smoothed: smooth_samples(&loss, window),
            accuracy_smoothed: smooth_samples(&accuracy, window),
            throughput_smoothed: smooth_samples(&throughput, window),
            loss,
            accuracy,
            throughput,
            memory: self.memory.to_vec(),
            latency: self.latency.to_vec(),
            grad_norm: self.grad_norm.to_vec(),
            learning_rate: self.learning_rate.to_vec(),
            gpu_util: self.gpu_util,
            logs: self.events.log().to_vec(),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("step", &self.step)
            .field("gpu_util", &self.gpu_util)
            .field("capacity", &self.loss.capacity())
            .field("events", &self.events.log().len())
            .finish_non_exhaustive()
    }
}
