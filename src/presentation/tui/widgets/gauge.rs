use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Gauge};
use ratatui::Frame;

fn threshold_color(value: f64, warning: f64, critical: f64) -> Color {
    if value > critical {
        Color::Red
    } else if value > warning {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// GPU utilization, `util` being a fraction in `[0, 1]`.
pub fn render_gpu_gauge(frame: &mut Frame, util: f64, area: Rect) {
    let percent = util * 100.0;
    let gauge = Gauge::default()
        .block(Block::bordered().title("GPU utilization"))
        .gauge_style(Style::default().fg(threshold_color(percent, 85.0, 95.0)))
        .ratio(util.clamp(0.0, 1.0))
        .label(format!("{percent:.0}%"));
    frame.render_widget(gauge, area);
}
