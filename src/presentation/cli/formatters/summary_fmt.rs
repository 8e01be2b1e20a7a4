use colored::{ColoredString, Colorize};

use crate::domain::entities::log_entry::{LogEntry, LogLevel};
use crate::domain::entities::sample::SeriesPoint;
use crate::domain::entities::snapshot::DashboardSnapshot;
use crate::domain::value_objects::MetricKind;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the last `width` values as a one-line block sparkline, scaled
/// between their own minimum and maximum.
#[must_use]
pub fn sparkline(values: &[f64], width: usize) -> String {
    let tail = &values[values.len().saturating_sub(width)..];
    let (min, max) = tail
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    tail.iter()
        .map(|v| {
            if span <= f64::EPSILON {
                return BLOCKS[BLOCKS.len() / 2];
            }
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            let idx = (((v - min) / span) * (BLOCKS.len() - 1) as f64).round() as usize;
            BLOCKS[idx.min(BLOCKS.len() - 1)]
        })
        .collect()
}

/// Latest value of `kind` with its unit, or `-` before the first tick.
#[must_use]
pub fn format_metric(kind: MetricKind, value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let (value, precision) = match kind {
        MetricKind::Loss => (value, 3),
        MetricKind::GradNorm => (value, 2),
        MetricKind::Accuracy | MetricKind::Memory => (value, 1),
        MetricKind::GpuUtil => (value * 100.0, 0),
        MetricKind::Throughput | MetricKind::Latency => (value, 0),
    };
    let number = format!("{value:.precision$}");
    match kind.unit() {
        "" => number,
        "%" => format!("{number}%"),
        unit => format!("{number} {unit}"),
    }
}

#[must_use]
pub fn level_badge(level: LogLevel) -> ColoredString {
    let label = format!("[{level}]");
    match level {
        LogLevel::Info => label.cyan(),
        LogLevel::Warn => label.yellow().bold(),
        LogLevel::Error => label.red().bold(),
    }
}

#[must_use]
pub fn format_log_entry(entry: &LogEntry) -> String {
    format!("{} {} {}", entry.time.dimmed(), level_badge(entry.level), entry.text)
}

fn print_metric_row(kind: MetricKind, latest: Option<f64>, series: &[f64]) {
    println!(
        "  {:<16} {:>12}  {}",
        kind.label(),
        format_metric(kind, latest).bold(),
        sparkline(series, 40).green()
    );
}

fn values<S: SeriesPoint>(samples: &[S]) -> Vec<f64> {
    samples.iter().map(SeriesPoint::value).collect()
}

/// Print a colored, human-readable summary of `snapshot`.
pub fn print_snapshot_summary(snapshot: &DashboardSnapshot, model: &str, dataset: &str) {
    println!("{}", "trainpulse - Session summary".bold().cyan());
    println!("{}", "━".repeat(50));
    println!(
        "  {} · {} · step {} · smoothing {}",
        model.bold(),
        dataset,
        snapshot.step,
        snapshot.window
    );

    println!("\n{}", "Metrics".bold().cyan());
    print_metric_row(
        MetricKind::Loss,
        snapshot.latest_loss(),
        &values(&snapshot.loss_smoothed),
    );
    print_metric_row(
        MetricKind::Accuracy,
        snapshot.latest_accuracy(),
        &values(&snapshot.accuracy_smoothed),
    );
    print_metric_row(
        MetricKind::Throughput,
        snapshot.latest_throughput(),
        &values(&snapshot.throughput_smoothed),
    );
    print_metric_row(
        MetricKind::Latency,
        snapshot.latest_latency(),
        &values(&snapshot.latency),
    );
    print_metric_row(
        MetricKind::GradNorm,
        snapshot.grad_norm.last().map(|s| s.value),
        &values(&snapshot.grad_norm),
    );
    print_metric_row(
        MetricKind::Memory,
        snapshot.latest_memory().map(|m| m.used),
        &values(&snapshot.memory),
    );
    println!(
        "  {:<16} {:>12}",
        MetricKind::GpuUtil.label(),
        format_metric(MetricKind::GpuUtil, Some(snapshot.gpu_util)).bold()
    );
    if let Some(lr) = snapshot.latest_learning_rate() {
        println!("  {:<16} {:>12.2e}", "Learning rate", lr);
    }

    println!("\n{}", "Events".bold().cyan());
    if snapshot.logs.is_empty() {
        println!("  {}", "No events yet".dimmed());
    }
    for entry in &snapshot.logs {
        println!("  {}", format_log_entry(entry));
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use colored::control;

    fn disable_colors() {
        control::set_override(false);
    }

    #[test]
    fn sparkline_spans_lowest_to_highest_block() {
        let line = sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 8);
        assert_eq!(line, "▁▂▃▄▅▆▇█");
    }

    #[test]
    fn sparkline_keeps_only_the_tail() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(sparkline(&values, 10).chars().count(), 10);
    }

    #[test]
    fn sparkline_of_flat_series_is_mid_level() {
        assert_eq!(sparkline(&[2.0; 4], 10), "▅▅▅▅");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn format_metric_uses_units_and_placeholder() {
        assert_eq!(format_metric(MetricKind::Loss, None), "-");
        assert_eq!(format_metric(MetricKind::Loss, Some(2.3849)), "2.385");
        assert_eq!(format_metric(MetricKind::GpuUtil, Some(0.654)), "65%");
        assert_eq!(format_metric(MetricKind::Throughput, Some(2050.4)), "2050 t/s");
        assert_eq!(format_metric(MetricKind::Latency, Some(119.6)), "120 ms");
    }

    #[test]
    fn format_metric_follows_metric_units() {
        assert_eq!(format_metric(MetricKind::Memory, Some(34.04)), "34.0 GB");
        assert_eq!(format_metric(MetricKind::Accuracy, Some(40.46)), "40.5%");
        assert_eq!(format_metric(MetricKind::GradNorm, Some(1.499)), "1.50");
        for kind in MetricKind::ALL {
            let text = format_metric(kind, Some(1.0));
            assert!(text.ends_with(kind.unit()), "{kind}: {text}");
        }
    }

    #[test]
    fn level_badge_formats_level() {
        disable_colors();
        assert_eq!(level_badge(LogLevel::Warn).to_string(), "[warn]");
    }

    #[test]
    fn log_entry_line_contains_text() {
        disable_colors();
        let entry = LogEntry::new(Utc::now(), "Step 4: validation improved", LogLevel::Info);
        let line = format_log_entry(&entry);
        assert!(line.contains("[info]"));
        assert!(line.ends_with("Step 4: validation improved"));
    }
}
