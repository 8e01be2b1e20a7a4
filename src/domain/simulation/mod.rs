//! The stochastic core: bounded walkers, fixed-capacity series, smoothing,
//! the learning-rate schedule and the synthetic event log.
//!
//! Everything here is synchronous and total once constructed; the
//! scheduler in `application::services` decides when a tick happens.

pub mod event_log;
pub mod schedule;
pub mod series;
pub mod smoothing;
pub mod walker;

pub use event_log::{EventLog, EventLogGenerator};
pub use schedule::CosineSchedule;
pub use series::SeriesBuffer;
pub use smoothing::{moving_average, smooth_samples};
pub use walker::Walker;
