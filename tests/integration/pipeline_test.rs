#![allow(clippy::expect_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use trainpulse::application::services::pipeline::{Pipeline, PipelineSettings};
use trainpulse::domain::entities::log_entry::LogLevel;
use trainpulse::domain::simulation::smoothing::moving_average;
use trainpulse::domain::value_objects::{MetricKind, SmoothingWindow, TickInterval};
use trainpulse::infrastructure::clock::ManualClock;
use trainpulse::infrastructure::random::{RngSource, ScriptedRandom};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0)
        .single()
        .expect("valid date")
}

fn seeded_session(settings: &PipelineSettings, seed: u64) -> (Pipeline, ManualClock) {
    let clock = ManualClock::new(start());
    let pipeline = Pipeline::new(
        settings,
        Box::new(RngSource::seeded(seed)),
        Box::new(clock.clone()),
    )
    .expect("pipeline");
    (pipeline, clock)
}

fn run_ticks(pipeline: &mut Pipeline, clock: &ManualClock, ticks: usize, interval: TickInterval) {
    let step = Duration::milliseconds(i64::try_from(interval.as_millis()).expect("fits"));
    for _ in 0..ticks {
        clock.advance(step);
        pipeline.tick();
    }
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn ten_ticks_at_one_second_with_window_four() {
    let (mut pipeline, clock) = seeded_session(&PipelineSettings::default(), 2024);
    run_ticks(&mut pipeline, &clock, 10, TickInterval::OneSecond);

    let window = SmoothingWindow::new(4).expect("window");
    let snapshot = pipeline.snapshot(window);

    assert_eq!(snapshot.step, 10);
    assert_eq!(snapshot.loss.len(), 10);
    assert_eq!(snapshot.accuracy.len(), 10);
    assert_eq!(snapshot.throughput.len(), 10);
    assert_eq!(snapshot.memory.len(), 10);
    assert_eq!(snapshot.latency.len(), 10);
    assert_eq!(snapshot.grad_norm.len(), 10);
    assert_eq!(snapshot.learning_rate.len(), 10);

    assert_eq!(snapshot.loss_smoothed.len(), 10);
    assert_eq!(snapshot.loss_smoothed[0].value, snapshot.loss[0].value);

    let raw: Vec<f64> = snapshot.loss.iter().map(|s| s.value).collect();
    let expected = moving_average(&raw, window);
    for (smoothed, want) in snapshot.loss_smoothed.iter().zip(expected) {
        assert!((smoothed.value - want).abs() < 1e-12);
    }
}

#[test]
fn every_series_of_a_tick_shares_its_timestamp() {
    let (mut pipeline, clock) = seeded_session(&PipelineSettings::default(), 5);
    run_ticks(&mut pipeline, &clock, 25, TickInterval::HalfSecond);
    let snapshot = pipeline.snapshot(SmoothingWindow::default());

    for i in 0..25 {
        let at = snapshot.loss[i].timestamp;
        assert_eq!(snapshot.accuracy[i].timestamp, at);
        assert_eq!(snapshot.throughput[i].timestamp, at);
        assert_eq!(snapshot.memory[i].timestamp, at);
        assert_eq!(snapshot.latency[i].timestamp, at);
        assert_eq!(snapshot.grad_norm[i].timestamp, at);
        assert_eq!(snapshot.learning_rate[i].timestamp, at);
    }
}

// ---------------------------------------------------------------------------
// Capacity and ordering
// ---------------------------------------------------------------------------

#[test]
fn long_session_keeps_the_most_recent_samples_in_order() {
    let (mut pipeline, clock) = seeded_session(&PipelineSettings::default(), 77);
    run_ticks(&mut pipeline, &clock, 500, TickInterval::OneSecond);
    let snapshot = pipeline.snapshot(SmoothingWindow::IDENTITY);

    assert_eq!(snapshot.step, 500);
    assert_eq!(snapshot.loss.len(), 180);
    assert_eq!(snapshot.memory.len(), 180);
    assert!(snapshot.logs.len() <= 50);

    // Oldest kept sample is tick 321 (1-based), newest is tick 500
    assert_eq!(snapshot.loss[0].timestamp, start() + Duration::seconds(321));
    assert_eq!(snapshot.loss[179].timestamp, start() + Duration::seconds(500));
    assert!(snapshot
        .loss
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp));

    // Log is newest first
    assert!(snapshot
        .logs
        .windows(2)
        .all(|w| w[0].timestamp >= w[1].timestamp));
}

#[test]
fn smoothing_window_one_is_identity_on_snapshot() {
    let (mut pipeline, clock) = seeded_session(&PipelineSettings::default(), 31);
    run_ticks(&mut pipeline, &clock, 40, TickInterval::OneSecond);
    let snapshot = pipeline.snapshot(SmoothingWindow::IDENTITY);
    assert_eq!(snapshot.loss_smoothed, snapshot.loss);
    assert_eq!(snapshot.accuracy_smoothed, snapshot.accuracy);
    assert_eq!(snapshot.throughput_smoothed, snapshot.throughput);
}

// ---------------------------------------------------------------------------
// Bounds under adversarial draws
// ---------------------------------------------------------------------------

#[test]
fn extreme_draws_never_escape_bounds() {
    for draw in [0.0, 0.999_999_999] {
        let clock = ManualClock::new(start());
        let mut pipeline = Pipeline::new(
            &PipelineSettings::default(),
            Box::new(ScriptedRandom::constant(draw)),
            Box::new(clock.clone()),
        )
        .expect("pipeline");
        run_ticks(&mut pipeline, &clock, 2000, TickInterval::OneSecond);

        for kind in [
            MetricKind::Loss,
            MetricKind::Accuracy,
            MetricKind::Throughput,
            MetricKind::Latency,
            MetricKind::GradNorm,
        ] {
            let params = kind.default_params();
            let series = pipeline.series(kind).expect("scalar series");
            assert!(
                series
                    .iter()
                    .all(|s| s.value >= params.min && s.value <= params.max),
                "{kind} escaped bounds with draw {draw}"
            );
        }
        let memory = MetricKind::Memory.default_params();
        assert!(pipeline
            .memory()
            .iter()
            .all(|m| m.used >= memory.min && m.used <= memory.max));
        assert!((0.2..=0.98).contains(&pipeline.gpu_util()));
    }
}

// ---------------------------------------------------------------------------
// Event log statistics
// ---------------------------------------------------------------------------

#[test]
fn log_levels_converge_to_reference_rates() {
    let settings = PipelineSettings {
        log_capacity: 1,
        ..PipelineSettings::default()
    };
    let (mut pipeline, clock) = seeded_session(&settings, 0xC0FFEE);
    let ticks = 50_000_u32;
    let (mut info, mut warn) = (0_u32, 0_u32);
    for _ in 0..ticks {
        clock.advance(Duration::seconds(1));
        if let Some(entry) = pipeline.tick().event {
            match entry.level {
                LogLevel::Info => info += 1,
                LogLevel::Warn => warn += 1,
                LogLevel::Error => {}
            }
        }
    }
    let info_rate = f64::from(info) / f64::from(ticks);
    let warn_rate = f64::from(warn) / f64::from(ticks);
    assert!((info_rate - 0.08).abs() < 0.01, "info rate {info_rate}");
    assert!((warn_rate - 0.04).abs() < 0.01, "warn rate {warn_rate}");
    assert_eq!(pipeline.events().len(), 1);
}
