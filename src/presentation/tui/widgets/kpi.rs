use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Sparkline};
use ratatui::Frame;

use crate::domain::entities::sample::Sample;
use crate::domain::value_objects::MetricKind;
use crate::presentation::cli::formatters::summary_fmt::format_metric;

/// Rescale the last `width` values onto `0..=100` for a sparkline.
#[must_use]
pub fn scale_to_bars(values: &[f64], width: usize) -> Vec<u64> {
    let tail = &values[values.len().saturating_sub(width)..];
    let (min, max) = tail
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    tail.iter()
        .map(|v| {
            let ratio = if span <= f64::EPSILON {
                0.5
            } else {
                (v - min) / span
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bar = (ratio * 100.0).round() as u64;
            bar.max(1)
        })
        .collect()
}

/// One headline tile: latest raw value plus a sparkline of the smoothed series.
pub fn render_kpi(
    frame: &mut Frame,
    kind: MetricKind,
    latest: Option<f64>,
    smoothed: &[Sample],
    color: Color,
    area: Rect,
) {
    let block = Block::bordered().title(kind.label());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [value_area, spark_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let value = Line::from(vec![Span::styled(
        format_metric(kind, latest),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )]);
    frame.render_widget(Paragraph::new(value), value_area);

    let values: Vec<f64> = smoothed.iter().map(|s| s.value).collect();
    let bars = scale_to_bars(&values, usize::from(spark_area.width));
    let sparkline = Sparkline::default()
        .data(&bars)
        .max(100)
        .style(Style::default().fg(color));
    frame.render_widget(sparkline, spark_area);
}
