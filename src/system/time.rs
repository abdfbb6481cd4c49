//! Time keeping for the watch face

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use embassy_time::Instant;

use crate::platform::Clock;

/// Wall time the engine draws, in the device's time zone
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    /// Last refreshed UTC time in epoch milliseconds
    millis: i64,
    /// Time zone the time is shown in
    offset: FixedOffset,
}

impl Default for WallClock {
    fn default() -> Self {
        Self {
            millis: 0,
            offset: Utc.fix(),
        }
    }
}

impl WallClock {
    /// Create a clock showing `millis` in time zone `offset`
    pub fn new(millis: i64, offset: FixedOffset) -> Self {
        Self { millis, offset }
    }
    /// Move the clock to `millis`
    pub fn refresh(&mut self, millis: i64) {
        self.millis = millis;
    }
    /// Switch to another time zone
    pub fn set_offset(&mut self, offset: FixedOffset) {
        self.offset = offset;
    }
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
    pub fn millis(&self) -> i64 {
        self.millis
    }
    /// Local time of day
    pub fn local_time(&self) -> NaiveTime {
        DateTime::<Utc>::from_timestamp_millis(self.millis)
            .map(|utc| utc.with_timezone(&self.offset).time())
            .unwrap_or_default()
    }
}

/// Pairs a known wall time with the system time it was taken at
#[derive(Debug, Clone, Copy)]
struct TimeReference {
    /// Clock time in epoch milliseconds
    millis: i64,
    /// Related system time
    instant: Instant,
}

/// [`Clock`] driven by the embassy time driver
///
/// Wall time advances from a reference set on boot or whenever the phone
/// syncs the time.
pub struct SystemClock {
    reference: TimeReference,
    offset: FixedOffset,
}

impl SystemClock {
    /// Start counting from `millis` (UTC epoch milliseconds) now
    pub fn new(millis: i64, offset: FixedOffset) -> Self {
        Self {
            reference: TimeReference {
                millis,
                instant: Instant::now(),
            },
            offset,
        }
    }
    /// Update the time reference
    pub fn set_time(&mut self, millis: i64) {
        self.reference = TimeReference {
            millis,
            instant: Instant::now(),
        };
    }
    /// Update the time zone
    pub fn set_offset(&mut self, offset: FixedOffset) {
        self.offset = offset;
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let elapsed = Instant::now().saturating_duration_since(self.reference.instant);
        self.reference.millis + elapsed.as_millis() as i64
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn local_time_applies_offset() {
        // 1970-01-01 09:05:03 UTC
        let millis = (9 * 3_600 + 5 * 60 + 3) * 1_000;
        let mut clock = WallClock::new(millis, Utc.fix());
        assert_eq!(clock.local_time(), NaiveTime::from_hms_opt(9, 5, 3).unwrap());

        clock.set_offset(FixedOffset::east_opt(3_600).unwrap());
        assert_eq!(clock.local_time().hour(), 10);

        clock.set_offset(FixedOffset::west_opt(10 * 3_600).unwrap());
        assert_eq!(clock.local_time().hour(), 23);
    }

    #[test]
    fn refresh_moves_time() {
        let mut clock = WallClock::default();
        clock.refresh(61_000);
        assert_eq!(clock.millis(), 61_000);
        assert_eq!(clock.local_time(), NaiveTime::from_hms_opt(0, 1, 1).unwrap());
    }

    #[test]
    fn system_clock_counts_from_reference() {
        let mut clock = SystemClock::new(5_000, Utc.fix());
        assert!(clock.now_millis() >= 5_000);

        clock.set_time(1_000_000);
        assert!(clock.now_millis() >= 1_000_000);

        let offset = FixedOffset::east_opt(7_200).unwrap();
        clock.set_offset(offset);
        assert_eq!(clock.local_offset(), offset);
    }
}
