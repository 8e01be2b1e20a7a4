use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem},
    Frame,
};

use crate::domain::entities::log_entry::{LogEntry, LogLevel};

const fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => Color::Cyan,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    }
}

fn level_style(level: LogLevel) -> Style {
    let style = Style::default().fg(level_color(level));
    if matches!(level, LogLevel::Error) {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Event log, newest entry on top.
pub fn render_event_log(frame: &mut Frame, logs: &[LogEntry], area: Rect) {
    let block = Block::bordered().title("Events");

    let items: Vec<ListItem<'_>> = if logs.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No events yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        logs.iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.time),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(format!("{:<5} ", entry.level.to_string()), level_style(entry.level)),
                    Span::raw(entry.text.as_str()),
                ]))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(logs: &[LogEntry]) -> String {
        let backend = TestBackend::new(70, 8);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render_event_log(frame, logs, frame.area()))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn empty_log_shows_placeholder() {
        assert!(rendered(&[]).contains("No events yet"));
    }

    #[test]
    fn entries_show_level_and_text() {
        let now = Utc::now();
        let logs = vec![
            LogEntry::new(now, "GPU 3 throttle detected. Fan curve adjusted", LogLevel::Warn),
            LogEntry::new(now, "Step 7: validation improved", LogLevel::Info),
        ];
        let text = rendered(&logs);
        assert!(text.contains("warn"));
        assert!(text.contains("Step 7: validation improved"));
    }

    #[test]
    fn level_colors() {
        assert_eq!(level_color(LogLevel::Info), Color::Cyan);
        assert_eq!(level_color(LogLevel::Warn), Color::Yellow);
        assert_eq!(level_color(LogLevel::Error), Color::Red);
    }
}
