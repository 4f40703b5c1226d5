use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH as SYSTEM_UNIX_EPOCH};

/// Default packed-ID epoch: Monday, July 1, 2024 00:00:00 UTC
pub const DEFAULT_EPOCH: u64 = 1_719_801_600_000;

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: u64 = 0;

/// A millisecond clock that generators read on every attempt.
///
/// Implementations return milliseconds since the UNIX epoch. Generators
/// subtract their own configured epoch, so a time source never needs to know
/// about ID layouts.
///
/// This abstraction lets you plug in the system wall clock, a monotonic
/// ticker, or a scripted clock in tests.
///
/// # Example
///
/// ```
/// use seqloom::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the UNIX epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The system wall clock.
///
/// This clock follows every adjustment made to the system time, including
/// backwards steps. Generators tolerate those by retrying until the clock
/// catches up with the last timestamp they handed out.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        // A system clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(SYSTEM_UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
