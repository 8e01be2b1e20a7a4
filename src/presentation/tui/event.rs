use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::application::services::visibility::Visibility;

/// Model names offered by the model selector.
pub const MODEL_PRESETS: [&str; 3] = ["Llama vNext", "Mamba Large", "Transformer XL Pro"];

/// Dataset names offered by the dataset selector.
pub const DATASET_PRESETS: [&str; 3] = ["Mix-Stack v3", "Code-Blend", "WebCorpus Clean"];

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleRun,
    CycleInterval,
    CycleSmoothing,
    CycleModel,
    CycleDataset,
}

impl Action {
    /// Map a key press to an action; releases and repeats are ignored.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char(' ') => Some(Self::ToggleRun),
            KeyCode::Char('i') => Some(Self::CycleInterval),
            KeyCode::Char('s') => Some(Self::CycleSmoothing),
            KeyCode::Char('m') => Some(Self::CycleModel),
            KeyCode::Char('d') => Some(Self::CycleDataset),
            _ => None,
        }
    }
}

/// Terminal focus changes stand in for page visibility.
#[must_use]
pub const fn visibility_of(event: &CrosstermEvent) -> Option<Visibility> {
    match event {
        CrosstermEvent::FocusLost => Some(Visibility::Hidden),
        CrosstermEvent::FocusGained => Some(Visibility::Visible),
        _ => None,
    }
}

/// The preset after `current`, wrapping around. A label that is not a
/// preset (e.g. a custom name from the config file) moves to the first one.
#[must_use]
pub fn next_preset(current: &str, presets: &[&str]) -> String {
    let next = presets
        .iter()
        .position(|p| *p == current)
        .map_or(0, |i| (i + 1) % presets.len());
    presets.get(next).map_or_else(|| current.to_string(), |p| (*p).to_string())
}
