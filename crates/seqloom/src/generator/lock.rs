pub use parking_lot::{Mutex, RwLock};

/// Runtime state slot, padded to its own cache line when `cache-padded` is
/// enabled so that hot counters of neighbouring generators do not share one.
#[cfg(feature = "cache-padded")]
pub type StateCell<S> = crossbeam_utils::CachePadded<Mutex<S>>;
#[cfg(not(feature = "cache-padded"))]
pub type StateCell<S> = Mutex<S>;

pub fn state_cell<S>(state: S) -> StateCell<S> {
    #[cfg(feature = "cache-padded")]
    {
        crossbeam_utils::CachePadded::new(Mutex::new(state))
    }
    #[cfg(not(feature = "cache-padded"))]
    {
        Mutex::new(state)
    }
}
