use core::fmt;

/// A value produced by an [`OdometerGenerator`]: the millisecond it was
/// generated in and the code drawn for it.
///
/// Two `Seq`s are equal only if both the timestamp and the code match. The
/// textual form is the decimal timestamp immediately followed by the code.
///
/// ```
/// use seqloom::Seq;
///
/// let seq = Seq::new(1_700_000_000_000, "aaaaaa1");
/// assert_eq!(seq.to_string(), "1700000000000aaaaaa1");
/// ```
///
/// [`OdometerGenerator`]: crate::OdometerGenerator
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seq {
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
    pub code: String,
}

impl Seq {
    pub fn new(timestamp: u64, code: impl Into<String>) -> Self {
        Self {
            timestamp,
            code: code.into(),
        }
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.timestamp, self.code)
    }
}
