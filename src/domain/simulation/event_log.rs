use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::domain::entities::log_entry::{LogEntry, LogLevel};
use crate::domain::error::SimulationError;
use crate::domain::ports::random::RandomSource;

const VALIDATION_IMPROVED: &str = "validation improved";
const THROTTLE_NOTICE: &str = "GPU 3 throttle detected. Fan curve adjusted";

/// Bounded event log, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 50;

    /// # Errors
    ///
    /// Returns `SimulationError::ZeroCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::ZeroCapacity);
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Prepend `entry`, dropping the oldest entries beyond capacity.
    pub fn push_front(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Emits sparse synthetic log lines: roughly 8% `info`, 4% `warn`, and
/// nothing on the remaining ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogGenerator {
    log: EventLog,
}

impl EventLogGenerator {
    /// Draws strictly above this produce an `info` line.
    pub const INFO_ABOVE: f64 = 0.92;
    /// Draws strictly below this produce a `warn` line.
    pub const WARN_BELOW: f64 = 0.04;

    #[must_use]
    pub const fn new(log: EventLog) -> Self {
        Self { log }
    }

    /// Map one uniform draw to the level it emits, if any.
    #[must_use]
    pub fn classify(roll: f64) -> Option<LogLevel> {
        if roll > Self::INFO_ABOVE {
            Some(LogLevel::Info)
        } else if roll < Self::WARN_BELOW {
            Some(LogLevel::Warn)
        } else {
            None
        }
    }

    /// Draw once and, when the draw lands in an emitting band, prepend a line
    /// to the log and return it.
    pub fn maybe_emit(
        &mut self,
        tick_index: u64,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Option<LogEntry> {
        let level = Self::classify(rng.next_unit())?;
        let text = match level {
            LogLevel::Info => format!("Step {tick_index}: {VALIDATION_IMPROVED}"),
            LogLevel::Warn | LogLevel::Error => THROTTLE_NOTICE.to_string(),
        };
        let entry = LogEntry::new(now, text, level);
        self.log.push_front(entry.clone());
        Some(entry)
    }

    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infrastructure::random::rng_source::RngSource;
    use crate::infrastructure::random::scripted::ScriptedRandom;

    fn generator(capacity: usize) -> EventLogGenerator {
        EventLogGenerator::new(EventLog::new(capacity).expect("log"))
    }

    #[test]
    fn classify_bands() {
        assert_eq!(EventLogGenerator::classify(0.95), Some(LogLevel::Info));
        assert_eq!(EventLogGenerator::classify(0.92), None);
        assert_eq!(EventLogGenerator::classify(0.5), None);
        assert_eq!(EventLogGenerator::classify(0.04), None);
        assert_eq!(EventLogGenerator::classify(0.039), Some(LogLevel::Warn));
        assert_eq!(EventLogGenerator::classify(0.0), Some(LogLevel::Warn));
    }

    #[test]
    fn info_line_references_tick() {
        let mut rng = ScriptedRandom::constant(0.99);
        let mut gen = generator(50);
        let entry = gen.maybe_emit(17, &mut rng, Utc::now()).expect("emitted");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.text, "Step 17: validation improved");
    }

    #[test]
    fn warn_line_is_throttle_notice() {
        let mut rng = ScriptedRandom::constant(0.01);
        let mut gen = generator(50);
        let entry = gen.maybe_emit(3, &mut rng, Utc::now()).expect("emitted");
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.text, "GPU 3 throttle detected. Fan curve adjusted");
    }

    #[test]
    fn quiet_band_emits_nothing() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut gen = generator(50);
        assert!(gen.maybe_emit(0, &mut rng, Utc::now()).is_none());
        assert!(gen.log().is_empty());
    }

    #[test]
    fn log_is_newest_first_and_bounded() {
        let mut rng = ScriptedRandom::constant(0.99);
        let mut gen = generator(50);
        for tick in 0..120 {
            gen.maybe_emit(tick, &mut rng, Utc::now());
            assert!(gen.log().len() <= 50);
        }
        assert_eq!(gen.log().len(), 50);
        let newest = gen.log().newest().expect("newest");
        assert_eq!(newest.text, "Step 119: validation improved");
        let texts: Vec<_> = gen.log().iter().map(|e| e.text.clone()).collect();
        assert_eq!(texts[49], "Step 70: validation improved");
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn emission_rates_converge() {
        let mut rng = RngSource::seeded(0x5EED);
        let mut gen = generator(50);
        let draws = 200_000u64;
        let (mut info, mut warn) = (0u64, 0u64);
        for tick in 0..draws {
            match gen.maybe_emit(tick, &mut rng, Utc::now()).map(|e| e.level) {
                Some(LogLevel::Info) => info += 1,
                Some(LogLevel::Warn) => warn += 1,
                _ => {}
            }
        }
        let info_rate = info as f64 / draws as f64;
        let warn_rate = warn as f64 / draws as f64;
        assert!((info_rate - 0.08).abs() < 0.005, "info rate {info_rate}");
        assert!((warn_rate - 0.04).abs() < 0.005, "warn rate {warn_rate}");
        assert_eq!(gen.log().len(), 50);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(EventLog::new(0).err(), Some(SimulationError::ZeroCapacity));
    }
}
