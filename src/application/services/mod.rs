pub mod pipeline;
pub mod scheduler;
pub mod visibility;

pub use pipeline::{Pipeline, PipelineSettings, TickOutcome};
pub use scheduler::{RunState, TickScheduler};
pub use visibility::{Visibility, VisibilityController};
