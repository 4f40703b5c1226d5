use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GenStatus, OdometerConfig, Reconfigurable, Result, Seq, SequenceSource, TimeSource, WallClock,
    generator::{RwLock, StateCell, state_cell},
};

#[derive(Debug)]
struct OdometerState {
    timestamp: u64,
    /// One alphabet index per code position, most significant first.
    digits: Vec<usize>,
}

impl OdometerState {
    fn fresh(now: u64, length: usize) -> Self {
        Self {
            timestamp: now.saturating_add(1),
            digits: vec![0; length],
        }
    }

    /// Advances the odometer by one. Returns `false` on full overflow, in
    /// which case every position has wrapped back to zero.
    fn advance(&mut self, radix: usize) -> bool {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < radix {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

/// A thread-safe generator of fixed-width codes over a custom alphabet.
///
/// Within one millisecond the code counts upward like an odometer: the
/// rightmost position advances through the alphabet and carries into the
/// position to its left when it wraps. Every new millisecond restarts the
/// count at the first character in every position. Each result is paired
/// with its millisecond as a [`Seq`], so `(timestamp, code)` is unique per
/// generator.
///
/// For alphabet `"a1234s"` and length 7, the first two codes generated in
/// the same millisecond are `"aaaaaa1"` and `"aaaaaa2"`.
///
/// When every code of the current millisecond has been handed out, the
/// generator moves its stored timestamp to the next millisecond and waits
/// for the clock to get there. A clock that stepped backwards is waited out
/// the same way.
///
/// Locking follows [`BitPackedGenerator`]: the configuration is behind a
/// read/write lock, the digits behind a separate mutex that is released
/// before the code is rendered.
///
/// [`BitPackedGenerator`]: crate::BitPackedGenerator
pub struct OdometerGenerator<T = WallClock>
where
    T: TimeSource,
{
    config: RwLock<OdometerConfig>,
    state: StateCell<OdometerState>,
    clock: T,
}

impl OdometerGenerator<WallClock> {
    /// Creates a generator of `length`-character codes over `alphabet`,
    /// reading the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAlphabet`] if `alphabet` is empty.
    ///
    /// # Example
    /// ```
    /// use seqloom::OdometerGenerator;
    ///
    /// let generator = OdometerGenerator::new(4, "ABCDEF").unwrap();
    /// let seq = generator.generate_seq();
    /// assert_eq!(seq.code.len(), 4);
    /// ```
    ///
    /// [`Error::EmptyAlphabet`]: crate::Error::EmptyAlphabet
    pub fn new(length: usize, alphabet: &str) -> Result<Self> {
        OdometerConfig::new(length, alphabet).build()
    }
}

impl Default for OdometerGenerator<WallClock> {
    /// Five decimal digits on the system wall clock.
    fn default() -> Self {
        Self::from_valid(OdometerConfig::default(), WallClock)
    }
}

impl<T> OdometerGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`OdometerConfig::validate`].
    pub fn try_from_config(config: OdometerConfig, clock: T) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config, clock))
    }

    fn from_valid(config: OdometerConfig, clock: T) -> Self {
        let state = OdometerState::fresh(clock.current_millis(), config.length);
        Self {
            config: RwLock::new(config),
            state: state_cell(state),
            clock,
        }
    }

    /// Generates the next code, waiting out clock rollback and exhausted
    /// milliseconds.
    pub fn generate_seq(&self) -> Seq {
        loop {
            match self.poll_seq() {
                GenStatus::Ready { value } => break value,
                GenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    /// Makes exactly one generation attempt.
    ///
    /// Returns [`GenStatus::Pending`] if the clock is behind the stored
    /// timestamp, or if this attempt overflowed the odometer and pushed the
    /// stored timestamp to the next millisecond.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_seq(&self) -> GenStatus<Seq> {
        let config = self.config.read();
        let now = self.clock.current_millis();

        let digits = {
            let mut state = self.state.lock();
            match now.cmp(&state.timestamp) {
                Ordering::Less => return Self::cold_clock_behind(now, state.timestamp),
                Ordering::Equal => {
                    if !state.advance(config.alphabet.len()) {
                        // A one-code space would overflow again on the very
                        // next millisecond; stay put so that millisecond takes
                        // the fresh branch below instead.
                        if !config.has_single_code() {
                            state.timestamp = now.saturating_add(1);
                        }
                        return GenStatus::Pending { yield_for: 1 };
                    }
                }
                Ordering::Greater => {
                    state.digits.fill(0);
                    state.timestamp = now;
                }
            }
            state.digits.clone()
        };

        let code: String = digits.iter().map(|&digit| config.alphabet[digit]).collect();
        GenStatus::Ready {
            value: Seq::new(now, code),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, stored: u64) -> GenStatus<Seq> {
        let yield_for = stored - now;
        #[cfg(feature = "tracing")]
        tracing::trace!(now, stored, yield_for, "clock behind last timestamp");
        GenStatus::Pending { yield_for }
    }

    /// The time source this generator reads.
    pub fn clock(&self) -> &T {
        &self.clock
    }
}

impl<T> Reconfigurable for OdometerGenerator<T>
where
    T: TimeSource,
{
    type Config = OdometerConfig;

    fn config(&self) -> OdometerConfig {
        self.config.read().clone()
    }

    /// Installs the new length and alphabet, reallocates the digits, and
    /// restarts the generator one millisecond in the future.
    fn reconfigure(&self, config: OdometerConfig) -> Result<()> {
        config.validate()?;

        let mut active = self.config.write();
        let state = OdometerState::fresh(self.clock.current_millis(), config.length);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            length = config.length,
            radix = config.alphabet.len(),
            restart_at = state.timestamp,
            "odometer configuration committed"
        );
        *active = config;
        *self.state.lock() = state;
        Ok(())
    }
}

impl<T> SequenceSource for OdometerGenerator<T>
where
    T: TimeSource + Send + Sync,
{
    /// The decimal timestamp followed by the code.
    fn try_next_value(&self) -> Result<String> {
        Ok(self.generate_seq().to_string())
    }
}

impl<T> fmt::Debug for OdometerGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdometerGenerator")
            .field("config", &*self.config.read())
            .finish_non_exhaustive()
    }
}
