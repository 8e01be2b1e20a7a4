use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType};
use ratatui::Frame;

use crate::domain::entities::sample::Sample;

/// Samples shown in the latency distribution.
pub const LATENCY_BARS: usize = 60;

/// The learning rate is drawn on the loss axis multiplied by this factor.
const LR_SCALE: f64 = 1e3;

#[allow(clippy::cast_precision_loss)]
fn points(values: impl Iterator<Item = f64>) -> Vec<(f64, f64)> {
    values.enumerate().map(|(i, v)| (i as f64, v)).collect()
}

/// Y bounds covering every point with a little headroom.
fn y_bounds<'a>(sets: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (lo, hi) = sets
        .into_iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo) * 0.1).max(f64::EPSILON.max(hi.abs() * 0.01));
    [lo - pad, hi + pad]
}

#[allow(clippy::cast_precision_loss)]
fn x_bounds(len: usize) -> [f64; 2] {
    [0.0, (len.saturating_sub(1) as f64).max(1.0)]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| {
            if v.abs() >= 100.0 {
                format!("{v:.0}")
            } else {
                format!("{v:.2}")
            }
        })
        .collect()
}

/// Smoothed loss with the learning-rate schedule overlaid.
pub fn render_loss_chart(
    frame: &mut Frame,
    loss_smoothed: &[Sample],
    learning_rate: &[Sample],
    area: Rect,
) {
    let loss = points(loss_smoothed.iter().map(|s| s.value));
    let lr = points(learning_rate.iter().map(|s| s.value * LR_SCALE));
    let bounds = y_bounds([loss.as_slice(), lr.as_slice()]);

    let datasets = vec![
        Dataset::default()
            .name("loss")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&loss),
        Dataset::default()
            .name("lr ×1e3")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&lr),
    ];

    let chart = Chart::new(datasets)
        .block(Block::bordered().title("Loss & learning rate"))
        .x_axis(Axis::default().bounds(x_bounds(loss.len())))
        .y_axis(
            Axis::default()
                .bounds(bounds)
                .labels(axis_labels(bounds))
                .style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(chart, area);
}

/// A single line series with its own y range.
pub fn render_series_chart(
    frame: &mut Frame,
    title: &str,
    values: &[f64],
    color: Color,
    area: Rect,
) {
    let data = points(values.iter().copied());
    let bounds = y_bounds([data.as_slice()]);
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(title.to_string()))
        .x_axis(Axis::default().bounds(x_bounds(data.len())))
        .y_axis(
            Axis::default()
                .bounds(bounds)
                .labels(axis_labels(bounds))
                .style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(chart, area);
}

/// Bars for the most recent latency samples, oldest on the left.
pub fn render_latency_bars(frame: &mut Frame, latency: &[Sample], area: Rect) {
    let tail = &latency[latency.len().saturating_sub(LATENCY_BARS)..];
    let bars: Vec<Bar<'_>> = tail
        .iter()
        .map(|s| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let ms = s.value.max(0.0).round() as u64;
            Bar::default()
                .value(ms)
                .text_value(String::new())
                .style(Style::default().fg(Color::Yellow))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::bordered().title("Latency (ms)"))
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}
