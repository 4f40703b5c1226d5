use crate::{Error, Result, SequenceSource, Slot, generator::RwLock};
use core::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Default)]
struct ComposerState {
    slots: Vec<Slot>,
    separator: String,
}

/// Joins the values of several sources into one delimited string.
///
/// The composer holds an ordered list of [`Slot`]s and a separator. Each
/// generation asks every slot's source for its next value, in order, and
/// joins the values with the separator. [`Slot::Placeholder`] entries are
/// filled at call time from the `overrides` passed to
/// [`SequenceComposer::try_next_value_with`].
///
/// The list and separator sit behind a read/write lock: any number of
/// generations run in parallel, while [`append`], [`replace_slots`] and
/// [`set_separator`] wait for them to finish. The lock does not extend to
/// the sources themselves, which synchronize on their own.
///
/// A composer is itself a [`SequenceSource`], so composers nest.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use seqloom::{BitPackedGenerator, OdometerGenerator, SequenceComposer, SequenceSource, Slot};
///
/// let ids = Arc::new(BitPackedGenerator::new());
/// let codes = OdometerGenerator::new(4, "ABCDEFGH").unwrap();
///
/// let composer = SequenceComposer::with_separator("-");
/// composer.append([Slot::from(ids), Slot::Placeholder]);
///
/// let value = composer.try_next_value_with(&[&codes]).unwrap();
/// assert_eq!(value.split('-').count(), 2);
/// ```
///
/// [`append`]: SequenceComposer::append
/// [`replace_slots`]: SequenceComposer::replace_slots
/// [`set_separator`]: SequenceComposer::set_separator
#[derive(Default)]
pub struct SequenceComposer {
    state: RwLock<ComposerState>,
}

impl SequenceComposer {
    /// Creates an empty composer with an empty separator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(ComposerState {
                slots: Vec::new(),
                separator: separator.into(),
            }),
        }
    }

    /// Appends slots to the end of the list.
    pub fn append(&self, slots: impl IntoIterator<Item = Slot>) -> &Self {
        self.state.write().slots.extend(slots);
        self
    }

    /// Replaces the whole list.
    pub fn replace_slots(&self, slots: impl IntoIterator<Item = Slot>) -> &Self {
        let slots: Vec<Slot> = slots.into_iter().collect();
        self.state.write().slots = slots;
        self
    }

    /// A copy of the current list. Changing it does not affect the composer.
    pub fn slots(&self) -> Vec<Slot> {
        self.state.read().slots.clone()
    }

    pub fn set_separator(&self, separator: impl Into<String>) -> &Self {
        let separator = separator.into();
        self.state.write().separator = separator;
        self
    }

    pub fn separator(&self) -> String {
        self.state.read().separator.clone()
    }

    /// Generates one composed value, filling placeholders from `overrides`.
    ///
    /// Placeholders are filled left to right: the first takes
    /// `overrides[0]`, the second `overrides[1]`, and so on. Once the last
    /// override has been used, every further placeholder reuses it; the
    /// overrides never wrap around to the start.
    ///
    /// An empty composer returns an empty string without touching
    /// `overrides`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingOverride`] if a placeholder is reached and
    ///   `overrides` is empty
    /// - any error returned by one of the sources; no partial value is
    ///   returned
    ///
    /// # Example
    ///
    /// ```
    /// use seqloom::{Result, SequenceComposer, SequenceSource, Slot};
    ///
    /// struct Text(&'static str);
    /// impl SequenceSource for Text {
    ///     fn try_next_value(&self) -> Result<String> {
    ///         Ok(self.0.to_owned())
    ///     }
    /// }
    ///
    /// let composer = SequenceComposer::with_separator("-");
    /// composer.append([
    ///     Slot::source(Text("X")),
    ///     Slot::Placeholder,
    ///     Slot::source(Text("Y")),
    ///     Slot::Placeholder,
    /// ]);
    ///
    /// assert_eq!(composer.try_next_value_with(&[&Text("Q")]).unwrap(), "X-Q-Y-Q");
    /// ```
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(overrides = overrides.len()))
    )]
    pub fn try_next_value_with(&self, overrides: &[&dyn SequenceSource]) -> Result<String> {
        let state = self.state.read();
        if state.slots.is_empty() {
            return Ok(String::new());
        }

        let mut cursor = 0;
        let mut composed = String::new();
        for (position, slot) in state.slots.iter().enumerate() {
            let value = match slot {
                Slot::Source(source) => source.try_next_value()?,
                Slot::Placeholder => {
                    let source = overrides
                        .get(cursor)
                        .ok_or(Error::MissingOverride { slot: position })?;
                    if cursor + 1 < overrides.len() {
                        cursor += 1;
                    }
                    source.try_next_value()?
                }
            };
            composed.push_str(&value);
            composed.push_str(&state.separator);
        }

        composed.truncate(composed.len() - state.separator.len());
        Ok(composed)
    }
}

impl SequenceSource for SequenceComposer {
    /// Generates one composed value with no overrides.
    fn try_next_value(&self) -> Result<String> {
        self.try_next_value_with(&[])
    }
}

impl fmt::Debug for SequenceComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("SequenceComposer")
            .field("slots", &state.slots)
            .field("separator", &state.separator)
            .finish()
    }
}
