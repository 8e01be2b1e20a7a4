use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::pipeline::Pipeline;
use crate::domain::entities::log_entry::LogEntry;
use crate::domain::entities::snapshot::DashboardSnapshot;
use crate::domain::value_objects::{SmoothingWindow, TickInterval};

/// Whether the periodic timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "paused"),
        }
    }
}

struct Shared {
    pipeline: Pipeline,
    /// Bumped on every cancellation; a timer only applies ticks while the
    /// generation it was spawned with is still current.
    generation: u64,
    ticks: watch::Sender<u64>,
    /// Every emitted log line is queued for each live subscriber.
    events: Vec<mpsc::UnboundedSender<LogEntry>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The tick body never panics half-way, so a poisoned guard still holds
    // a consistent pipeline.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives a [`Pipeline`] from a single periodic timer.
///
/// Each timer firing applies one whole tick while holding the pipeline lock,
/// so [`TickScheduler::snapshot`] never observes a partial tick. Once
/// [`TickScheduler::stop`] returns, no further tick is applied.
pub struct TickScheduler {
    shared: Arc<Mutex<Shared>>,
    interval: TickInterval,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Wrap `pipeline` in a stopped scheduler that will spawn its timer on
    /// `runtime`.
    #[must_use]
    pub fn new(pipeline: Pipeline, interval: TickInterval, runtime: Handle) -> Self {
        let (ticks, _) = watch::channel(pipeline.step());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                pipeline,
                generation: 0,
                ticks,
                events: Vec::new(),
            })),
            interval,
            runtime,
            task: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        if self.task.is_some() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.task.is_some()
    }

    #[must_use]
    pub const fn interval(&self) -> TickInterval {
        self.interval
    }

    /// Arm the timer. The first tick fires one interval from now.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.spawn_timer();
        tracing::info!(interval = %self.interval, "Scheduler started");
    }

    /// Disarm the timer; no tick is applied after this returns.
    pub fn stop(&mut self) {
        if self.cancel_timer() {
            tracing::info!(step = self.step(), "Scheduler stopped");
        }
    }

    pub fn set_running(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn toggle(&mut self) {
        let running = !self.is_running();
        self.set_running(running);
    }

    /// Change the period. A running timer is replaced by one at the new
    /// rate; the tick counter carries on unchanged.
    pub fn set_interval(&mut self, interval: TickInterval) {
        if interval == self.interval {
            return;
        }
        self.interval = interval;
        if self.cancel_timer() {
            self.spawn_timer();
        }
        tracing::info!(%interval, "Tick interval changed");
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn step(&self) -> u64 {
        lock(&self.shared).pipeline.step()
    }

    /// Consistent copy of every series between two ticks.
    #[must_use]
    pub fn snapshot(&self, window: SmoothingWindow) -> DashboardSnapshot {
        lock(&self.shared).pipeline.snapshot(window)
    }

    /// Receiver notified with the tick count after every applied tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        lock(&self.shared).ticks.subscribe()
    }

    /// Queue receiving every log line emitted from now on, in tick order.
    ///
    /// Unlike [`TickScheduler::subscribe`], nothing is coalesced when the
    /// receiver falls behind.
    #[must_use]
    pub fn subscribe_events(&self) -> mpsc::UnboundedReceiver<LogEntry> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.shared).events.push(tx);
        rx
    }

    /// Read the pipeline under the lock.
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&Pipeline) -> R) -> R {
        f(&lock(&self.shared).pipeline)
    }

    fn cancel_timer(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        lock(&self.shared).generation += 1;
        task.abort();
        true
    }

    fn spawn_timer(&mut self) {
        let generation = lock(&self.shared).generation;
        let shared = Arc::clone(&self.shared);
        let period = self.interval.as_duration();
        let first = Instant::now() + period;

        self.task = Some(self.runtime.spawn(async move {
            let mut timer = time::interval_at(first, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                let mut guard = lock(&shared);
                if guard.generation != generation {
                    break;
                }
                let outcome = guard.pipeline.tick();
                if let Some(event) = &outcome.event {
                    guard.events.retain(|tx| tx.send(event.clone()).is_ok());
                }
                let step = guard.pipeline.step();
                guard.ticks.send_replace(step);
                drop(guard);

                tracing::trace!(
                    tick = outcome.index,
                    loss = outcome.loss,
                    emitted = outcome.event.is_some(),
                    "Tick applied"
                );
            }
        }));
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("state", &self.state())
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
