use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, GenStatus, PackedConfig, PackedLayout, Reconfigurable, Result, SequenceSource,
    TimeSource, WallClock,
    generator::{RwLock, StateCell, state_cell},
};

/// Runtime pair guarded by the inner mutex.
#[derive(Debug)]
struct PackedState {
    timestamp: u64,
    sequence: u64,
}

impl PackedState {
    /// State right after construction or a commit: the first usable
    /// millisecond is the one after `now`.
    fn fresh(now: u64, layout: &PackedLayout) -> Self {
        Self {
            timestamp: now.saturating_add(1),
            sequence: layout.config().sequence_default,
        }
    }
}

/// A thread-safe generator of Snowflake-style 64-bit IDs with a
/// reconfigurable bit layout.
///
/// Each ID packs the milliseconds elapsed since the configured epoch, a
/// datacenter ID, a worker ID, and a per-millisecond sequence (see
/// [`PackedConfig`]). IDs from one generator are strictly increasing as long
/// as the layout is unchanged.
///
/// ## Locking
/// - The layout sits behind a read/write lock. Generation holds it shared, so
///   any number of threads generate in parallel; a commit holds it
///   exclusively.
/// - The `(timestamp, sequence)` pair sits behind its own mutex, held only
///   for the read-modify-write of that pair. Packing the ID happens after the
///   mutex is released.
///
/// ## Clock anomalies
/// - If the clock reads earlier than the last timestamp used, the attempt is
///   abandoned and retried until the clock catches up.
/// - If the sequence is exhausted within a millisecond, the stored timestamp
///   is pushed to the next millisecond and the attempt is retried.
///
/// Neither case is an error; [`BitPackedGenerator::try_poll_id`] reports them
/// as [`GenStatus::Pending`] and [`BitPackedGenerator::try_next_id`] spins
/// through them.
///
/// ## See Also
/// - [`OdometerGenerator`] for fixed-width codes over a custom alphabet
/// - [`Reconstructor`] for live reconfiguration
///
/// [`OdometerGenerator`]: crate::OdometerGenerator
/// [`Reconstructor`]: crate::Reconstructor
pub struct BitPackedGenerator<T = WallClock>
where
    T: TimeSource,
{
    layout: RwLock<PackedLayout>,
    state: StateCell<PackedState>,
    clock: T,
}

impl BitPackedGenerator<WallClock> {
    /// Creates a generator with the default layout reading the system wall
    /// clock.
    ///
    /// # Example
    /// ```
    /// use seqloom::BitPackedGenerator;
    ///
    /// let generator = BitPackedGenerator::new();
    /// let a = generator.try_next_id().unwrap();
    /// let b = generator.try_next_id().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new() -> Self {
        Self::with_clock(WallClock)
    }
}

impl Default for BitPackedGenerator<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BitPackedGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator with the default layout reading `clock`.
    pub fn with_clock(clock: T) -> Self {
        Self::from_layout(PackedLayout::derive(PackedConfig::default()), clock)
    }

    /// Creates a generator from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate; see
    /// [`PackedConfig::validate`].
    pub fn try_from_config(config: PackedConfig, clock: T) -> Result<Self> {
        Ok(Self::from_layout(config.validate()?, clock))
    }

    fn from_layout(layout: PackedLayout, clock: T) -> Self {
        let state = PackedState::fresh(clock.current_millis(), &layout);
        Self {
            layout: RwLock::new(layout),
            state: state_cell(state),
            clock,
        }
    }

    /// Generates the next ID, retrying through transient clock anomalies.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockOverflow`] once the time since the epoch no longer
    ///   fits in the timestamp field
    /// - [`Error::ClockBeforeEpoch`] if the clock reads earlier than the
    ///   epoch
    pub fn try_next_id(&self) -> Result<u64> {
        loop {
            match self.try_poll_id()? {
                GenStatus::Ready { value } => break Ok(value),
                GenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    /// Makes exactly one generation attempt.
    ///
    /// Returns [`GenStatus::Pending`] if the clock is behind the stored
    /// timestamp or the sequence ran out for the current millisecond. In the
    /// second case the next attempt in the following millisecond will
    /// succeed.
    ///
    /// # Errors
    ///
    /// Same as [`BitPackedGenerator::try_next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<GenStatus<u64>> {
        let layout = self.layout.read();
        let now = self.clock.current_millis();

        let sequence = {
            let mut state = self.state.lock();
            match now.cmp(&state.timestamp) {
                Ordering::Less => return Ok(Self::cold_clock_behind(now, state.timestamp)),
                Ordering::Equal => {
                    let next = state.sequence + 1;
                    if next > layout.sequence_max() {
                        // When the default is already the maximum, every
                        // millisecond holds exactly one ID. Pushing ahead
                        // would overflow again on arrival, so stay put and
                        // let the next millisecond take the fresh branch.
                        if layout.config().sequence_default < layout.sequence_max() {
                            state.timestamp = now.saturating_add(1);
                        }
                        state.sequence = layout.config().sequence_default;
                        return Ok(GenStatus::Pending { yield_for: 1 });
                    }
                    state.sequence = next;
                    next
                }
                Ordering::Greater => {
                    state.timestamp = now;
                    state.sequence = layout.config().sequence_default;
                    state.sequence
                }
            }
        };

        let epoch = layout.config().epoch;
        let relative = now
            .checked_sub(epoch)
            .ok_or(Error::ClockBeforeEpoch { now, epoch })?;
        if relative > layout.timestamp_max() {
            return Err(Error::ClockOverflow {
                relative,
                max: layout.timestamp_max(),
            });
        }

        Ok(GenStatus::Ready {
            value: layout.pack(relative, sequence),
        })
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, stored: u64) -> GenStatus<u64> {
        let yield_for = stored - now;
        #[cfg(feature = "tracing")]
        tracing::trace!(now, stored, yield_for, "clock behind last timestamp");
        GenStatus::Pending { yield_for }
    }

    /// A copy of the active layout.
    pub fn layout(&self) -> PackedLayout {
        *self.layout.read()
    }

    /// The time source this generator reads.
    pub fn clock(&self) -> &T {
        &self.clock
    }
}

impl<T> Reconfigurable for BitPackedGenerator<T>
where
    T: TimeSource,
{
    type Config = PackedConfig;

    fn config(&self) -> PackedConfig {
        *self.layout.read().config()
    }

    /// Installs a new layout and restarts the generator one millisecond in
    /// the future with the new sequence default. IDs produced after the
    /// commit carry a later timestamp than any produced before it.
    fn reconfigure(&self, config: PackedConfig) -> Result<()> {
        let layout = config.validate()?;

        let mut active = self.layout.write();
        *active = layout;
        let state = PackedState::fresh(self.clock.current_millis(), &layout);
        #[cfg(feature = "tracing")]
        tracing::debug!(?config, restart_at = state.timestamp, "packed layout committed");
        *self.state.lock() = state;
        Ok(())
    }
}

impl<T> SequenceSource for BitPackedGenerator<T>
where
    T: TimeSource + Send + Sync,
{
    fn try_next_value(&self) -> Result<String> {
        self.try_next_id().map(|id| id.to_string())
    }
}

impl<T> fmt::Debug for BitPackedGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitPackedGenerator")
            .field("layout", &*self.layout.read())
            .finish_non_exhaustive()
    }
}
