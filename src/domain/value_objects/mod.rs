pub mod metric;
pub mod smoothing_window;
pub mod tick_interval;
pub mod walker_params;

pub use metric::MetricKind;
pub use smoothing_window::SmoothingWindow;
pub use tick_interval::TickInterval;
pub use walker_params::WalkerParams;
