use tokio::sync::mpsc;

use crate::application::services::scheduler::TickScheduler;
use crate::domain::entities::log_entry::LogEntry;
use crate::domain::value_objects::MetricKind;
use crate::presentation::cli::formatters::summary_fmt::format_metric;

/// Totals of a headless session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
    pub events: u64,
}

/// Drive `scheduler` without a dashboard, logging one line per tick.
///
/// Every emitted log line is logged as well, even when several ticks land
/// between two wake-ups. Runs until `max_ticks` ticks have been applied or
/// until SIGINT (Ctrl+C) arrives, then stops the timer.
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler cannot be installed.
pub async fn run_headless(
    scheduler: &mut TickScheduler,
    max_ticks: Option<u64>,
) -> anyhow::Result<RunReport> {
    if max_ticks == Some(0) {
        return Ok(RunReport {
            ticks: scheduler.step(),
            events: 0,
        });
    }

    let mut ticks = scheduler.subscribe();
    let mut events = scheduler.subscribe_events();
    scheduler.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut logged = 0;
    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let step = *ticks.borrow_and_update();
                let line = scheduler.with_pipeline(|p| {
                    let latest = |kind| p.series(kind).and_then(|s| s.latest()).map(|s| s.value);
                    format!(
                        "loss {} · acc {} · {} · lr {:.2e} · gpu {}",
                        format_metric(MetricKind::Loss, latest(MetricKind::Loss)),
                        format_metric(MetricKind::Accuracy, latest(MetricKind::Accuracy)),
                        format_metric(MetricKind::Throughput, latest(MetricKind::Throughput)),
                        p.learning_rate().latest().map_or(0.0, |s| s.value),
                        format_metric(MetricKind::GpuUtil, Some(p.gpu_util())),
                    )
                });
                tracing::info!(step, "{line}");
                logged += drain_events(&mut events);

                if max_ticks.is_some_and(|max| step >= max) {
                    break;
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupt received, stopping");
                break;
            }
        }
    }

    scheduler.stop();
    logged += drain_events(&mut events);
    Ok(RunReport {
        ticks: scheduler.step(),
        events: logged,
    })
}

fn drain_events(events: &mut mpsc::UnboundedReceiver<LogEntry>) -> u64 {
    let mut count = 0;
    while let Ok(entry) = events.try_recv() {
        tracing::info!(level = %entry.level, "{}", entry.text);
        count += 1;
    }
    count
}
