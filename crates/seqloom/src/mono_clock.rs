use crate::{TimeSource, WallClock};
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    elapsed: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A time source that never goes backward.
///
/// The clock samples the wall clock once at construction and from then on
/// advances by the elapsed monotonic time (`Instant`), so later adjustments
/// to the system time (NTP steps, manual changes) are not observed.
/// Generators driven by this clock never hit the clock-rollback retry path.
///
/// A background thread refreshes a shared counter once per millisecond;
/// reads are a single atomic load. The thread exits once every clone of the
/// clock has been dropped.
///
/// # Example
///
/// ```
/// use seqloom::{BitPackedGenerator, MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let before = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(3));
/// assert!(clock.current_millis() >= before);
///
/// let generator = BitPackedGenerator::with_clock(clock);
/// assert!(generator.try_next_id().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    start_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a clock anchored to the current wall-clock time.
    pub fn new() -> Self {
        let start = Instant::now();
        let start_millis = WallClock.current_millis();

        let inner = Arc::new(SharedTickerInner {
            elapsed: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Re-measure after waking; sleep granularity is coarse.
                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.elapsed.store(now_ms, Ordering::Relaxed);
                tick = now_ms + 1;
            }
        });

        let _ = inner._handle.set(handle);

        Self {
            inner,
            start_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start_millis + self.inner.elapsed.load(Ordering::Relaxed)
    }
}
