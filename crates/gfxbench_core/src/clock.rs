//! Monotonic timestamps
//!
//! The harness correlates the start signal with frame timestamps taken from
//! `CLOCK_MONOTONIC`, so the signal carries whole milliseconds since that
//! clock's (arbitrary) epoch.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// A reading from a monotonic clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timespec {
    /// Whole seconds since the clock epoch.
    pub seconds: u64,
    /// Sub-second part, in `[0, 999_999_999]`.
    pub nanoseconds: u32,
}

impl Timespec {
    pub const fn new(seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Whole milliseconds, truncating the sub-millisecond remainder.
    pub const fn as_millis(&self) -> u64 {
        to_millis(self.seconds, self.nanoseconds)
    }
}

impl From<Duration> for Timespec {
    fn from(d: Duration) -> Self {
        Self::new(d.as_secs(), d.subsec_nanos())
    }
}

/// `seconds * 1000 + nanoseconds / 1_000_000`, truncating.
///
/// Saturates at `u64::MAX`.
pub const fn to_millis(seconds: u64, nanoseconds: u32) -> u64 {
    seconds
        .saturating_mul(1000)
        .saturating_add((nanoseconds / 1_000_000) as u64)
}

/// Source of monotonic time.
pub trait MonotonicClock: Send + Sync {
    fn now(&self) -> Timespec;

    fn now_millis(&self) -> u64 {
        self.now().as_millis()
    }
}

/// Host clock measuring from the first reading in this process.
///
/// Not comparable with `CLOCK_MONOTONIC` values taken by other processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantClock;

impl MonotonicClock for InstantClock {
    fn now(&self) -> Timespec {
        static ANCHOR: OnceLock<Instant> = OnceLock::new();
        let anchor = ANCHOR.get_or_init(Instant::now);
        Timespec::from(anchor.elapsed())
    }
}

/// Clock frozen at a fixed reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedClock(pub Timespec);

impl MonotonicClock for FixedClock {
    fn now(&self) -> Timespec {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis_examples() {
        assert_eq!(to_millis(5, 500_000_000), 5500);
        assert_eq!(to_millis(0, 999_999_999), 999);
        assert_eq!(to_millis(1, 0), 1000);
        assert_eq!(to_millis(0, 0), 0);
    }

    #[test]
    fn test_to_millis_saturates() {
        assert_eq!(to_millis(u64::MAX / 1000 + 1, 0), u64::MAX);
        assert_eq!(to_millis(u64::MAX, 999_999_999), u64::MAX);
        assert_eq!(to_millis(u64::MAX / 1000, 0), 18_446_744_073_709_551_000);
        // u64::MAX ends in ...615, so 615 ms fits exactly and 616 ms saturates
        assert_eq!(to_millis(u64::MAX / 1000, 615_999_999), u64::MAX);
        assert_eq!(to_millis(u64::MAX / 1000, 616_000_000), u64::MAX);
    }

    #[test]
    fn test_to_millis_truncates() {
        for nanos in [0u32, 1, 999_999, 1_000_000, 1_999_999, 123_456_789, 999_999_999] {
            assert_eq!(to_millis(42, nanos), 42_000 + u64::from(nanos / 1_000_000));
        }
    }

    #[test]
    fn test_timespec_from_duration() {
        let ts = Timespec::from(Duration::from_nanos(3_250_000_001));
        assert_eq!(ts, Timespec::new(3, 250_000_001));
        assert_eq!(ts.as_millis(), 3250);
    }

    #[test]
    fn test_instant_clock_never_goes_backwards() {
        let clock = InstantClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(Timespec::new(7, 1_500_000));
        assert_eq!(clock.now_millis(), 7001);
    }
}
