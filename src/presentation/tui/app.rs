use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, DisableFocusChange, EnableFocusChange, Event as CrosstermEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::application::services::scheduler::{RunState, TickScheduler};
use crate::application::services::visibility::{Visibility, VisibilityController};
use crate::domain::entities::sample::SeriesPoint;
use crate::domain::entities::snapshot::DashboardSnapshot;
use crate::domain::value_objects::{MetricKind, SmoothingWindow};
use crate::presentation::tui::event::{
    next_preset, visibility_of, Action, DATASET_PRESETS, MODEL_PRESETS,
};
use crate::presentation::tui::widgets::charts::{
    render_latency_bars, render_loss_chart, render_series_chart,
};
use crate::presentation::tui::widgets::event_log::render_event_log;
use crate::presentation::tui::widgets::gauge::render_gpu_gauge;
use crate::presentation::tui::widgets::kpi::render_kpi;

/// How long to wait for input before redrawing.
const REDRAW_EVERY: Duration = Duration::from_millis(200);

/// Start-up settings for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub window: SmoothingWindow,
    pub running: bool,
    pub resume_on_visible: bool,
    pub model: String,
    pub dataset: String,
}

struct App {
    scheduler: TickScheduler,
    visibility: VisibilityController,
    window: SmoothingWindow,
    model: String,
    dataset: String,
    should_quit: bool,
}

impl App {
    fn new(mut scheduler: TickScheduler, options: DashboardOptions) -> Self {
        if options.running {
            scheduler.start();
        }
        Self {
            scheduler,
            visibility: VisibilityController::new(options.resume_on_visible),
            window: options.window,
            model: options.model,
            dataset: options.dataset,
            should_quit: false,
        }
    }

    fn handle_event(&mut self, event: &CrosstermEvent) {
        if let Some(visibility) = visibility_of(event) {
            self.visibility.observe(visibility, &mut self.scheduler);
            return;
        }
        if let CrosstermEvent::Key(key) = event {
            if let Some(action) = Action::from_key(*key) {
                self.apply(action);
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleRun => {
                self.scheduler.toggle();
                self.visibility.user_override();
            }
            Action::CycleInterval => {
                let next = self.scheduler.interval().next();
                self.scheduler.set_interval(next);
            }
            Action::CycleSmoothing => {
                self.window = self.window.next();
                tracing::debug!(window = %self.window, "Smoothing changed");
            }
            Action::CycleModel => self.model = next_preset(&self.model, &MODEL_PRESETS),
            Action::CycleDataset => self.dataset = next_preset(&self.dataset, &DATASET_PRESETS),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.scheduler.snapshot(self.window);

        let [header_area, kpi_area, main_area, lower_area, log_area, status_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .areas(frame.area());

        self.render_header(frame, &snapshot, header_area);
        render_kpi_row(frame, &snapshot, kpi_area);

        let [loss_area, side_area] =
            Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).areas(main_area);
        render_loss_chart(frame, &snapshot.loss_smoothed, &snapshot.learning_rate, loss_area);
        let [gauge_area, throughput_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(side_area);
        render_gpu_gauge(frame, snapshot.gpu_util, gauge_area);
        render_series_chart(
            frame,
            "Throughput (t/s)",
            &values(&snapshot.throughput_smoothed),
            Color::Green,
            throughput_area,
        );

        let [latency_area, grad_area, vram_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .areas(lower_area);
        render_latency_bars(frame, &snapshot.latency, latency_area);
        render_series_chart(
            frame,
            "Gradient norm",
            &values(&snapshot.grad_norm),
            Color::LightRed,
            grad_area,
        );
        render_series_chart(
            frame,
            "VRAM used (GB of 80)",
            &values(&snapshot.memory),
            Color::Blue,
            vram_area,
        );

        render_event_log(frame, &snapshot.logs, log_area);
        render_status_bar(frame, status_area);
    }

    fn render_header(&self, frame: &mut Frame, snapshot: &DashboardSnapshot, area: Rect) {
        let (state_label, state_color) = match self.scheduler.state() {
            RunState::Running => ("● running", Color::Green),
            RunState::Stopped => ("❚❚ paused", Color::Yellow),
        };

        let mut spans = vec![
            Span::styled(
                " TRAINPULSE ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ "),
            Span::styled(
                format!("{} · {}", self.model, self.dataset),
                Style::default().fg(Color::White),
            ),
            Span::raw(" │ "),
            Span::styled(state_label, Style::default().fg(state_color)),
            Span::raw(" │ "),
            Span::styled(
                format!(
                    "every {} · smoothing {} · step {}",
                    self.scheduler.interval(),
                    self.window,
                    snapshot.step
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if self.visibility.state() == Visibility::Hidden {
            spans.push(Span::styled(
                " │ unfocused",
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn values<S: SeriesPoint>(samples: &[S]) -> Vec<f64> {
    samples.iter().map(SeriesPoint::value).collect()
}

fn render_kpi_row(frame: &mut Frame, snapshot: &DashboardSnapshot, area: Rect) {
    let [loss, accuracy, throughput, latency] = Layout::horizontal([
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
    ])
    .areas(area);

    render_kpi(
        frame,
        MetricKind::Loss,
        snapshot.latest_loss(),
        &snapshot.loss_smoothed,
        Color::Cyan,
        loss,
    );
    render_kpi(
        frame,
        MetricKind::Accuracy,
        snapshot.latest_accuracy(),
        &snapshot.accuracy_smoothed,
        Color::Green,
        accuracy,
    );
    render_kpi(
        frame,
        MetricKind::Throughput,
        snapshot.latest_throughput(),
        &snapshot.throughput_smoothed,
        Color::Magenta,
        throughput,
    );
    render_kpi(
        frame,
        MetricKind::Latency,
        snapshot.latest_latency(),
        &snapshot.latency,
        Color::Yellow,
        latency,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let bar = Line::from(vec![
        Span::styled(" q", key_style),
        Span::raw(":quit "),
        Span::styled("space", key_style),
        Span::raw(":run/pause "),
        Span::styled("i", key_style),
        Span::raw(":interval "),
        Span::styled("s", key_style),
        Span::raw(":smoothing "),
        Span::styled("m", key_style),
        Span::raw(":model "),
        Span::styled("d", key_style),
        Span::raw(":dataset"),
    ]);

    frame.render_widget(
        Paragraph::new(bar).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

/// Restore the terminal to its normal state.
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        eprintln!("Failed to disable raw mode: {e}");
    }
    if let Err(e) = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen) {
        eprintln!("Failed to leave alternate screen: {e}");
    }
}

/// Launch the interactive dashboard on top of `scheduler`.
///
/// Terminal focus changes are forwarded to the visibility controller, so
/// switching away from the terminal pauses the simulation.
///
/// # Errors
///
/// Returns an error if terminal setup, rendering, or event handling fails.
pub fn run_tui(scheduler: TickScheduler, options: DashboardOptions) -> anyhow::Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableFocusChange) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    // Restore the terminal even on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(scheduler, options);
    let result = run_app_loop(&mut terminal, &mut app);

    app.scheduler.stop();
    restore_terminal();
    let _ = terminal.show_cursor();
    let _ = std::panic::take_hook();

    result
}

fn run_app_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(REDRAW_EVERY)? {
            let event = event::read()?;
            app.handle_event(&event);
        }

        if app.should_quit {
            tracing::info!(step = app.scheduler.step(), "Dashboard closed");
            return Ok(());
        }
    }
}
