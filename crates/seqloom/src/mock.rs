use crate::TimeSource;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays a fixed list of readings, one per call, then keeps returning the
/// last one.
pub struct ScriptedClock {
    values: Vec<u64>,
    index: AtomicUsize,
}

impl ScriptedClock {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "script needs at least one reading");
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    /// Number of readings taken so far.
    pub fn reads(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl TimeSource for ScriptedClock {
    fn current_millis(&self) -> u64 {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.values[i.min(self.values.len() - 1)]
    }
}

pub struct FixedTime(pub u64);

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.0
    }
}
