#![allow(clippy::expect_used)]

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time;

use trainpulse::application::services::pipeline::{Pipeline, PipelineSettings};
use trainpulse::application::services::scheduler::{RunState, TickScheduler};
use trainpulse::application::services::visibility::{Visibility, VisibilityController};
use trainpulse::domain::value_objects::{SmoothingWindow, TickInterval};
use trainpulse::infrastructure::clock::SystemClock;
use trainpulse::infrastructure::random::RngSource;

fn scheduler(interval: TickInterval) -> TickScheduler {
    let pipeline = Pipeline::new(
        &PipelineSettings::default(),
        Box::new(RngSource::seeded(123)),
        Box::new(SystemClock),
    )
    .expect("pipeline");
    TickScheduler::new(pipeline, interval, Handle::current())
}

#[tokio::test(start_paused = true)]
async fn timed_session_produces_one_sample_per_second() {
    let mut s = scheduler(TickInterval::OneSecond);
    s.start();
    time::sleep(Duration::from_millis(10_500)).await;
    s.stop();

    let window = SmoothingWindow::new(4).expect("window");
    let snapshot = s.snapshot(window);
    assert_eq!(snapshot.step, 10);
    assert_eq!(snapshot.loss.len(), 10);
    assert_eq!(snapshot.memory.len(), 10);
    assert_eq!(snapshot.learning_rate.len(), 10);
    assert_eq!(snapshot.loss_smoothed.len(), 10);
    assert_eq!(snapshot.loss_smoothed[0], snapshot.loss[0]);
}

#[tokio::test(start_paused = true)]
async fn hidden_display_stops_within_one_tick() {
    let mut s = scheduler(TickInterval::OneSecond);
    let mut visibility = VisibilityController::default();
    s.start();
    time::sleep(Duration::from_millis(3200)).await;

    visibility.observe(Visibility::Hidden, &mut s);
    let at_hide = s.step();
    assert_eq!(at_hide, 3);
    assert_eq!(s.state(), RunState::Stopped);

    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(s.step(), at_hide);

    // Refocus leaves the pause in place by default
    visibility.observe(Visibility::Visible, &mut s);
    time::sleep(Duration::from_secs(5)).await;
    assert_eq!(s.step(), at_hide);
}

#[tokio::test(start_paused = true)]
async fn opt_in_resume_restarts_after_refocus() {
    let mut s = scheduler(TickInterval::HalfSecond);
    let mut visibility = VisibilityController::new(true);
    s.start();
    time::sleep(Duration::from_millis(1200)).await;
    visibility.observe(Visibility::Hidden, &mut s);
    let paused_at = s.step();

    time::sleep(Duration::from_secs(10)).await;
    visibility.observe(Visibility::Visible, &mut s);
    time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(s.step(), paused_at + 2);
}

#[tokio::test(start_paused = true)]
async fn interval_changes_never_skip_or_repeat_ticks() {
    let mut s = scheduler(TickInterval::OneSecond);
    let mut ticks = s.subscribe();
    s.start();

    let mut seen = Vec::new();
    let plan = [
        TickInterval::HalfSecond,
        TickInterval::TwoSeconds,
        TickInterval::OneSecond,
        TickInterval::FiveSeconds,
    ];
    for interval in plan {
        for _ in 0..3 {
            ticks.changed().await.expect("scheduler alive");
            seen.push(*ticks.borrow_and_update());
        }
        s.set_interval(interval);
    }

    let expected: Vec<u64> = (1..=12).collect();
    assert_eq!(seen, expected);
    assert_eq!(s.snapshot(SmoothingWindow::IDENTITY).loss.len(), 12);
}

#[tokio::test(start_paused = true)]
async fn independent_sessions_do_not_share_state() {
    let mut fast = scheduler(TickInterval::HalfSecond);
    let mut slow = scheduler(TickInterval::TwoSeconds);
    fast.start();
    slow.start();
    time::sleep(Duration::from_millis(4100)).await;
    assert_eq!(fast.step(), 8);
    assert_eq!(slow.step(), 2);
}
