use crate::Result;
use std::sync::Arc;

/// Anything that can produce the next value of a sequence as text.
///
/// This is the common currency of the crate: both clock-driven generators
/// implement it, and a [`SequenceComposer`] is built from (and is itself) a
/// source. Implementations must be safe to call from many threads at once;
/// the composer never synchronizes the sources it holds.
///
/// # Example
///
/// ```
/// use seqloom::{Result, SequenceSource};
///
/// struct Region(&'static str);
/// impl SequenceSource for Region {
///     fn try_next_value(&self) -> Result<String> {
///         Ok(self.0.to_owned())
///     }
/// }
///
/// assert_eq!(Region("eu").try_next_value().unwrap(), "eu");
/// ```
///
/// [`SequenceComposer`]: crate::SequenceComposer
pub trait SequenceSource: Send + Sync {
    /// Produces the next value.
    ///
    /// # Errors
    ///
    /// Returns whatever fatal error the underlying generator hits, for
    /// example [`Error::ClockOverflow`] from an exhausted packed layout.
    ///
    /// [`Error::ClockOverflow`]: crate::Error::ClockOverflow
    fn try_next_value(&self) -> Result<String>;
}

impl<S: SequenceSource + ?Sized> SequenceSource for Arc<S> {
    fn try_next_value(&self) -> Result<String> {
        (**self).try_next_value()
    }
}

impl<S: SequenceSource + ?Sized> SequenceSource for &S {
    fn try_next_value(&self) -> Result<String> {
        (**self).try_next_value()
    }
}
