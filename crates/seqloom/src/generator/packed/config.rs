use crate::{BitPackedGenerator, DEFAULT_EPOCH, Error, Result, TimeSource, WallClock};

/// Bits available to a packed ID. The sign bit is never used so IDs stay
/// positive when stored in signed 64-bit columns.
pub const MAX_LAYOUT_BITS: u32 = 63;

/// Configuration of a [`BitPackedGenerator`].
///
/// An ID is laid out, from the most significant bit down, as
///
/// ```text
/// [ timestamp | datacenter_id | worker_id | sequence ]
/// ```
///
/// where the timestamp is milliseconds since `epoch`. The four widths may add
/// up to at most [`MAX_LAYOUT_BITS`]. Unused high bits are zero.
///
/// All fields are public; the struct is plain data until it is validated by
/// [`PackedConfig::validate`], [`PackedConfig::build`], or a
/// [`Reconstructor`] commit.
///
/// [`Reconstructor`]: crate::Reconstructor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedConfig {
    /// Reference instant in milliseconds since the UNIX epoch.
    pub epoch: u64,
    pub timestamp_bits: u8,
    pub datacenter_bits: u8,
    pub worker_bits: u8,
    pub sequence_bits: u8,
    pub datacenter_id: u64,
    pub worker_id: u64,
    /// Value the sequence resets to whenever the timestamp moves.
    pub sequence_default: u64,
}

impl Default for PackedConfig {
    /// 41 timestamp bits from [`DEFAULT_EPOCH`], 5 datacenter bits, 5 worker
    /// bits and a 12 bit sequence starting at 0.
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            timestamp_bits: 41,
            datacenter_bits: 5,
            worker_bits: 5,
            sequence_bits: 12,
            datacenter_id: 0,
            worker_id: 0,
            sequence_default: 0,
        }
    }
}

impl PackedConfig {
    #[must_use]
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Sets all four bit widths at once.
    #[must_use]
    pub fn with_bits(mut self, timestamp: u8, datacenter: u8, worker: u8, sequence: u8) -> Self {
        self.timestamp_bits = timestamp;
        self.datacenter_bits = datacenter;
        self.worker_bits = worker;
        self.sequence_bits = sequence;
        self
    }

    #[must_use]
    pub fn with_datacenter_id(mut self, datacenter_id: u64) -> Self {
        self.datacenter_id = datacenter_id;
        self
    }

    #[must_use]
    pub fn with_worker_id(mut self, worker_id: u64) -> Self {
        self.worker_id = worker_id;
        self
    }

    #[must_use]
    pub fn with_sequence_default(mut self, sequence_default: u64) -> Self {
        self.sequence_default = sequence_default;
        self
    }

    /// Checks the configuration and derives the shifts and maxima of its
    /// layout.
    ///
    /// # Errors
    ///
    /// - [`Error::BitWidthOverflow`] if the widths sum to more than
    ///   [`MAX_LAYOUT_BITS`]
    /// - [`Error::SiteIdOutOfRange`] if a datacenter or worker ID does not
    ///   fit its width
    /// - [`Error::SequenceDefaultOutOfRange`] if the sequence reset value
    ///   does not fit the sequence width
    ///
    /// # Example
    ///
    /// ```
    /// use seqloom::{Error, PackedConfig};
    ///
    /// assert!(PackedConfig::default().with_bits(41, 5, 5, 12).validate().is_ok());
    /// assert_eq!(
    ///     PackedConfig::default().with_bits(42, 5, 5, 12).validate(),
    ///     Err(Error::BitWidthOverflow { total: 64 }),
    /// );
    /// ```
    pub fn validate(&self) -> Result<PackedLayout> {
        let total = u32::from(self.timestamp_bits)
            + u32::from(self.datacenter_bits)
            + u32::from(self.worker_bits)
            + u32::from(self.sequence_bits);
        if total > MAX_LAYOUT_BITS {
            return Err(Error::BitWidthOverflow { total });
        }

        check_site_id("datacenter_id", self.datacenter_id, self.datacenter_bits)?;
        check_site_id("worker_id", self.worker_id, self.worker_bits)?;

        let sequence_max = max_for_bits(self.sequence_bits);
        if self.sequence_default > sequence_max {
            return Err(Error::SequenceDefaultOutOfRange {
                value: self.sequence_default,
                max: sequence_max,
            });
        }

        Ok(PackedLayout::derive(*self))
    }

    /// Validates the configuration and creates a generator reading the
    /// system wall clock.
    ///
    /// # Errors
    ///
    /// See [`PackedConfig::validate`].
    pub fn build(self) -> Result<BitPackedGenerator<WallClock>> {
        self.build_with_clock(WallClock)
    }

    /// Validates the configuration and creates a generator reading `clock`.
    ///
    /// # Errors
    ///
    /// See [`PackedConfig::validate`].
    pub fn build_with_clock<T: TimeSource>(self, clock: T) -> Result<BitPackedGenerator<T>> {
        BitPackedGenerator::try_from_config(self, clock)
    }
}

fn check_site_id(field: &'static str, value: u64, bits: u8) -> Result<()> {
    if value > max_for_bits(bits) {
        return Err(Error::SiteIdOutOfRange { field, value, bits });
    }
    Ok(())
}

/// Largest value representable in `bits` bits, saturating at 64.
fn max_for_bits(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// A validated [`PackedConfig`] together with its derived bit positions.
///
/// Field positions are fixed by the widths: the sequence occupies the lowest
/// bits, the worker ID sits above it, then the datacenter ID, then the
/// timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedLayout {
    config: PackedConfig,
    timestamp_shift: u32,
    datacenter_shift: u32,
    worker_shift: u32,
    timestamp_max: u64,
    sequence_max: u64,
}

impl PackedLayout {
    /// Derives shifts and maxima without checking `config`.
    pub(crate) fn derive(config: PackedConfig) -> Self {
        let worker_shift = u32::from(config.sequence_bits);
        let datacenter_shift = worker_shift + u32::from(config.worker_bits);
        let timestamp_shift = datacenter_shift + u32::from(config.datacenter_bits);

        Self {
            config,
            timestamp_shift,
            datacenter_shift,
            worker_shift,
            timestamp_max: max_for_bits(config.timestamp_bits),
            sequence_max: max_for_bits(config.sequence_bits),
        }
    }

    /// The configuration this layout was derived from.
    pub fn config(&self) -> &PackedConfig {
        &self.config
    }

    pub fn timestamp_shift(&self) -> u32 {
        self.timestamp_shift
    }

    pub fn datacenter_shift(&self) -> u32 {
        self.datacenter_shift
    }

    pub fn worker_shift(&self) -> u32 {
        self.worker_shift
    }

    /// Largest relative timestamp this layout can encode.
    pub fn timestamp_max(&self) -> u64 {
        self.timestamp_max
    }

    pub fn sequence_max(&self) -> u64 {
        self.sequence_max
    }

    /// Packs a relative timestamp and a sequence value together with this
    /// layout's site identifiers.
    ///
    /// The caller is responsible for keeping both values within their
    /// maxima; out of range bits would bleed into neighbouring fields.
    pub fn pack(&self, relative: u64, sequence: u64) -> u64 {
        (relative << self.timestamp_shift)
            | (self.config.datacenter_id << self.datacenter_shift)
            | (self.config.worker_id << self.worker_shift)
            | sequence
    }

    /// Splits an ID produced under this layout back into its components.
    ///
    /// # Example
    ///
    /// ```
    /// use seqloom::PackedConfig;
    ///
    /// let layout = PackedConfig::default()
    ///     .with_datacenter_id(2)
    ///     .with_worker_id(9)
    ///     .validate()
    ///     .unwrap();
    ///
    /// let parts = layout.decompose(layout.pack(1_000, 17));
    /// assert_eq!(parts.timestamp, 1_000);
    /// assert_eq!(parts.datacenter_id, 2);
    /// assert_eq!(parts.worker_id, 9);
    /// assert_eq!(parts.sequence, 17);
    /// ```
    pub fn decompose(&self, id: u64) -> PackedParts {
        let field = |shift: u32, bits: u8| (id >> shift) & max_for_bits(bits);
        PackedParts {
            timestamp: field(self.timestamp_shift, self.config.timestamp_bits),
            datacenter_id: field(self.datacenter_shift, self.config.datacenter_bits),
            worker_id: field(self.worker_shift, self.config.worker_bits),
            sequence: field(0, self.config.sequence_bits),
        }
    }
}

/// The components of a packed ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedParts {
    /// Milliseconds since the layout's epoch.
    pub timestamp: u64,
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}
