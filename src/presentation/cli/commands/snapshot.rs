use anyhow::Context;

use crate::application::services::pipeline::Pipeline;
use crate::domain::entities::snapshot::DashboardSnapshot;
use crate::domain::value_objects::{SmoothingWindow, TickInterval};
use crate::infrastructure::clock::ManualClock;
use crate::presentation::cli::formatters::summary_fmt::print_snapshot_summary;

/// Apply `ticks` ticks back to back, moving `clock` one `interval` before
/// each, and return the resulting snapshot.
///
/// `clock` must be the clock the pipeline was built with.
pub fn simulate(
    pipeline: &mut Pipeline,
    clock: &ManualClock,
    ticks: u64,
    interval: TickInterval,
    window: SmoothingWindow,
) -> DashboardSnapshot {
    let step = chrono::Duration::from_std(interval.as_duration()).unwrap_or_default();
    for _ in 0..ticks {
        clock.advance(step);
        let outcome = pipeline.tick();
        if let Some(event) = outcome.event {
            tracing::debug!(tick = outcome.index, level = %event.level, "{}", event.text);
        }
    }
    pipeline.snapshot(window)
}

/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_snapshot(
    snapshot: &DashboardSnapshot,
    model: &str,
    dataset: &str,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        println!("{rendered}");
    } else {
        print_snapshot_summary(snapshot, model, dataset);
    }
    Ok(())
}
