use chrono::{DateTime, Duration, Local, NaiveDateTime};

/// Format used to stamp performance records (`20231114_2213`).
pub const RECORD_STAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// A simple clock abstraction for deterministic record stamps in services and tests.
///
/// Performance records are named after the user's wall clock, so the clock
/// reports naive local time rather than UTC.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Returns a clock that uses the current local time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given local timestamp.
    #[must_use]
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current local time according to the clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Default => Local::now().naive_local(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Returns the current time formatted with [`RECORD_STAMP_FORMAT`].
    #[must_use]
    pub fn record_stamp(&self) -> String {
        self.now().format(RECORD_STAMP_FORMAT).to_string()
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `NaiveDateTime` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> NaiveDateTime {
    DateTime::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
        .naive_utc()
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_formats_record_stamp() {
        assert_eq!(fixed_clock().record_stamp(), "20231114_2213");
    }

    #[test]
    fn advancing_fixed_clock_moves_stamp() {
        let mut clock = fixed_clock();
        clock.advance(Duration::minutes(2));
        assert_eq!(clock.record_stamp(), "20231114_2215");
    }
}
