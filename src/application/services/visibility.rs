use std::fmt;

use super::scheduler::TickScheduler;

/// Whether the dashboard is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Hidden => write!(f, "hidden"),
        }
    }
}

/// Pauses the scheduler when the display goes away.
///
/// Becoming hidden always stops the scheduler. Becoming visible again does
/// nothing unless `resume_on_visible` is set, in which case only a pause
/// that this controller caused is undone.
#[derive(Debug, Clone, Default)]
pub struct VisibilityController {
    state: Visibility,
    resume_on_visible: bool,
    auto_paused: bool,
}

impl VisibilityController {
    #[must_use]
    pub const fn new(resume_on_visible: bool) -> Self {
        Self {
            state: Visibility::Visible,
            resume_on_visible,
            auto_paused: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> Visibility {
        self.state
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state, Visibility::Visible)
    }

    /// Feed a visibility report from the host. Returns `true` when the state
    /// actually changed.
    pub fn observe(&mut self, visibility: Visibility, scheduler: &mut TickScheduler) -> bool {
        if visibility == self.state {
            return false;
        }
        self.state = visibility;
        match visibility {
            Visibility::Hidden => {
                self.auto_paused = scheduler.is_running();
                scheduler.stop();
                tracing::info!(auto_paused = self.auto_paused, "Display hidden, scheduler paused");
            }
            Visibility::Visible => {
                if self.resume_on_visible && self.auto_paused {
                    scheduler.start();
                    tracing::info!("Display visible, scheduler resumed");
                } else {
                    tracing::info!(running = scheduler.is_running(), "Display visible");
                }
                self.auto_paused = false;
            }
        }
        true
    }

    /// The user took explicit control of run/pause; forget any auto-pause.
    pub fn user_override(&mut self) {
        self.auto_paused = false;
    }
}
