use crate::{Error, OdometerGenerator, Result, TimeSource, WallClock};

/// Configuration of an [`OdometerGenerator`].
///
/// `length` is the number of characters in every code and `alphabet` the
/// ordered characters each position cycles through. Duplicates in the
/// alphabet are allowed and rendered as-is, so two digit values can map to
/// the same character and codes within a millisecond may repeat.
/// A zero length is valid and yields one empty code per millisecond.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OdometerConfig {
    pub length: usize,
    pub alphabet: Vec<char>,
}

impl Default for OdometerConfig {
    /// Five decimal digits.
    fn default() -> Self {
        Self::new(5, "0123456789")
    }
}

impl OdometerConfig {
    /// Creates a configuration from a code length and the characters of
    /// `alphabet`, in order.
    pub fn new(length: usize, alphabet: &str) -> Self {
        Self {
            length,
            alphabet: alphabet.chars().collect(),
        }
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub fn with_alphabet(mut self, alphabet: &str) -> Self {
        self.alphabet = alphabet.chars().collect();
        self
    }

    /// Number of distinct codes per millisecond, or `None` if that count
    /// does not fit in a `u128`.
    pub fn capacity(&self) -> Option<u128> {
        let radix = u128::try_from(self.alphabet.len()).ok()?;
        let exponent = u32::try_from(self.length).ok()?;
        radix.checked_pow(exponent)
    }

    /// Whether exactly one code exists: a zero length, or a single-character
    /// alphabet.
    pub fn has_single_code(&self) -> bool {
        self.length == 0 || self.alphabet.len() == 1
    }

    /// # Errors
    ///
    /// Returns [`Error::EmptyAlphabet`] if there are no characters to draw
    /// codes from.
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        Ok(())
    }

    /// Validates the configuration and creates a generator reading the
    /// system wall clock.
    ///
    /// # Errors
    ///
    /// See [`OdometerConfig::validate`].
    pub fn build(self) -> Result<OdometerGenerator<WallClock>> {
        self.build_with_clock(WallClock)
    }

    /// Validates the configuration and creates a generator reading `clock`.
    ///
    /// # Errors
    ///
    /// See [`OdometerConfig::validate`].
    pub fn build_with_clock<T: TimeSource>(self, clock: T) -> Result<OdometerGenerator<T>> {
        OdometerGenerator::try_from_config(self, clock)
    }
}
