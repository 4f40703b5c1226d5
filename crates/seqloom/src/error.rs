/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `seqloom` can produce.
///
/// Configuration variants are raised when a config is validated (at build
/// time or on [`Reconstructor::commit`]); a rejected config never reaches the
/// generator. Clock variants are raised by generation and mean the generator
/// cannot produce a valid value under its current configuration. None of
/// these are retried internally.
///
/// Transient clock anomalies (a clock that stepped backwards, or a counter
/// exhausted within one millisecond) are not errors. They surface only as
/// [`GenStatus::Pending`] from the single-attempt entry points and are
/// absorbed by the blocking ones.
///
/// [`Reconstructor::commit`]: crate::Reconstructor::commit
/// [`GenStatus::Pending`]: crate::GenStatus::Pending
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The four bit widths of a packed layout add up to more than 63.
    #[error("bit widths sum to {total}, exceeding the 63 usable bits")]
    BitWidthOverflow {
        /// Sum of the timestamp, datacenter, worker and sequence widths.
        total: u32,
    },

    /// A site identifier does not fit inside its configured bit width.
    #[error("{field} {value} does not fit in {bits} bits")]
    SiteIdOutOfRange {
        /// Which identifier was rejected (`datacenter_id` or `worker_id`).
        field: &'static str,
        value: u64,
        bits: u8,
    },

    /// The sequence reset value is larger than the sequence field can hold.
    #[error("sequence default {value} exceeds the sequence maximum {max}")]
    SequenceDefaultOutOfRange { value: u64, max: u64 },

    /// An odometer was configured with no characters to draw from.
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    /// The time elapsed since the epoch no longer fits in the timestamp
    /// field. The generator has exhausted its lifetime under this layout.
    #[error("relative timestamp {relative} exceeds the timestamp maximum {max}")]
    ClockOverflow { relative: u64, max: u64 },

    /// The clock reads earlier than the configured epoch.
    #[error("clock reads {now}ms, which is before the epoch {epoch}ms")]
    ClockBeforeEpoch { now: u64, epoch: u64 },

    /// A composer reached a placeholder but the caller supplied no override
    /// sources to fill it with.
    #[error("placeholder at position {slot} has no override source")]
    MissingOverride {
        /// Position of the placeholder within the composer's source list.
        slot: usize,
    },
}
