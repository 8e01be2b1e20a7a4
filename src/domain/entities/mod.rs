pub mod log_entry;
pub mod sample;
pub mod snapshot;

pub use log_entry::{LogEntry, LogLevel};
pub use sample::{MemorySample, Sample, SeriesPoint};
pub use snapshot::DashboardSnapshot;
