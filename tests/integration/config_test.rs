#![allow(clippy::expect_used)]

use chrono::{Duration, TimeZone, Utc};

use trainpulse::application::config::AppConfig;
use trainpulse::application::services::pipeline::Pipeline;
use trainpulse::domain::value_objects::{MetricKind, TickInterval};
use trainpulse::infrastructure::clock::ManualClock;
use trainpulse::infrastructure::random::ScriptedRandom;

const CUSTOM_CONFIG: &str = r#"
[general]
interval_ms = 2000
smoothing = 3
running = false
seed = 11

[session]
model = "Transformer XL Pro"
dataset = "WebCorpus Clean"

[buffers]
capacity = 20
log_capacity = 5

[schedule]
base = 0.002
period_secs = 60.0

[walkers.loss]
start = 1.0
drift = -0.1
volatility = 0.0
min = 0.5
max = 2.0
"#;

#[test]
fn config_file_drives_the_pipeline() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CUSTOM_CONFIG).expect("write config");

    let config = AppConfig::load_or_create(&path).expect("load");
    assert_eq!(config.general.interval, TickInterval::TwoSeconds);
    assert_eq!(config.general.smoothing.get(), 3);
    assert!(!config.general.running);

    let settings = config.pipeline_settings().expect("settings");
    let start = Utc.timestamp_opt(600, 0).single().expect("timestamp");
    let clock = ManualClock::new(start);
    let mut pipeline = Pipeline::new(
        &settings,
        Box::new(ScriptedRandom::constant(0.5)),
        Box::new(clock.clone()),
    )
    .expect("pipeline");

    // Overridden walker: 1.0 drifting down by 0.1 a tick, floored at 0.5
    let losses: Vec<f64> = (0..8)
        .map(|_| {
            clock.advance(Duration::seconds(2));
            pipeline.tick().loss
        })
        .collect();
    let expected = [0.9, 0.8, 0.7, 0.6, 0.5, 0.5, 0.5, 0.5];
    for (got, want) in losses.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    // Schedule uses the configured base and period
    assert!((settings.schedule.value_at(0.0) - 0.002).abs() < 1e-15);
    assert!((settings.schedule.period_secs() - 60.0).abs() < f64::EPSILON);

    // Buffers respect the configured capacity
    for _ in 0..30 {
        clock.advance(Duration::seconds(2));
        pipeline.tick();
    }
    let loss = pipeline.series(MetricKind::Loss).expect("loss series");
    assert_eq!(loss.len(), 20);
    assert_eq!(loss.capacity(), 20);
    assert_eq!(pipeline.events().capacity(), 5);
}

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("nested").join("config.toml");
    let config = AppConfig::load_or_create(&path).expect("create");
    assert!(path.exists());
    assert_eq!(config.buffers.capacity, 180);

    let written = std::fs::read_to_string(&path).expect("read back");
    assert!(written.contains("[general]"));
    assert!(written.contains("interval_ms = 1000"));
    assert!(written.contains("resume_on_visible = false"));
}

#[test]
fn invalid_walker_override_is_reported_with_its_table() {
    let toml = r"
[walkers.throughput]
start = 100.0
drift = 0.0
volatility = 1.0
min = 500.0
max = 100.0
";
    let config: AppConfig = toml::from_str(toml).expect("parse");
    let err = config.pipeline_settings().expect_err("inverted bounds");
    assert!(format!("{err:#}").contains("[walkers.throughput]"));
}
