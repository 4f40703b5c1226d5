use crate::{Result, SequenceSource};
use core::fmt;
use std::sync::Arc;

/// One entry in a [`SequenceComposer`].
///
/// A slot either holds a shared source, or is a placeholder to be filled by
/// a source passed at generation time (see
/// [`SequenceComposer::try_next_value_with`]). Used directly as a source, a
/// placeholder produces the empty string.
///
/// [`SequenceComposer`]: crate::SequenceComposer
/// [`SequenceComposer::try_next_value_with`]: crate::SequenceComposer::try_next_value_with
#[derive(Clone)]
pub enum Slot {
    Source(Arc<dyn SequenceSource>),
    Placeholder,
}

impl Slot {
    /// Wraps an owned source.
    pub fn source<S: SequenceSource + 'static>(source: S) -> Self {
        Self::Source(Arc::new(source))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

impl<S: SequenceSource + 'static> From<Arc<S>> for Slot {
    fn from(source: Arc<S>) -> Self {
        Self::Source(source)
    }
}

impl SequenceSource for Slot {
    fn try_next_value(&self) -> Result<String> {
        match self {
            Self::Source(source) => source.try_next_value(),
            Self::Placeholder => Ok(String::new()),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(source) => f
                .debug_tuple("Source")
                .field(&Arc::as_ptr(source).cast::<()>())
                .finish(),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}
