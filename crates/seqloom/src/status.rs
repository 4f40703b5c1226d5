/// Represents the result of a single generation attempt.
///
/// This type models the outcome of the non-blocking entry points such as
/// [`BitPackedGenerator::try_poll_id`] and [`OdometerGenerator::poll_seq`]:
///
/// - [`GenStatus::Ready`] indicates a new value was produced.
/// - [`GenStatus::Pending`] means the attempt hit a transient clock anomaly
///   (the clock stepped backwards, or the current millisecond is used up) and
///   nothing was produced.
///
/// The blocking entry points simply retry on `Pending`, which is what most
/// callers want. Polling is useful for callers that want to decide for
/// themselves how to spend the wait.
///
/// # Example
///
/// ```
/// use seqloom::{BitPackedGenerator, GenStatus};
///
/// let generator = BitPackedGenerator::new();
/// let id = loop {
///     match generator.try_poll_id().unwrap() {
///         GenStatus::Ready { value } => break value,
///         GenStatus::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert!(id > 0);
/// ```
///
/// [`BitPackedGenerator::try_poll_id`]: crate::BitPackedGenerator::try_poll_id
/// [`OdometerGenerator::poll_seq`]: crate::OdometerGenerator::poll_seq
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenStatus<V> {
    /// A value was generated and is ready to use.
    Ready {
        /// The generated value.
        value: V,
    },
    /// No value could be generated on this attempt.
    Pending {
        /// Milliseconds until the stored timestamp is reachable again.
        yield_for: u64,
    },
}

impl<V> GenStatus<V> {
    /// Returns `true` if this attempt produced a value.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Converts into the generated value, discarding a pending status.
    pub fn ready(self) -> Option<V> {
        match self {
            Self::Ready { value } => Some(value),
            Self::Pending { .. } => None,
        }
    }
}
