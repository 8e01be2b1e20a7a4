use chrono::{DateTime, Utc};

/// Wall-clock time as seen by the pipeline.
///
/// Sample timestamps and the learning-rate schedule are both read from here,
/// once per tick.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
