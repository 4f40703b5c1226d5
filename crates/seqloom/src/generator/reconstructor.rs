use crate::Result;
use core::fmt;

/// A generator whose configuration can be replaced while it is in use.
///
/// Implementors keep their configuration behind an exclusive/shared lock.
/// [`Reconfigurable::reconfigure`] validates the new configuration first and
/// only then takes the lock exclusively, installs the configuration, and
/// resets all runtime state so that nothing generated afterwards can collide
/// with what was generated before.
pub trait Reconfigurable {
    /// The detached, plain-data form of the generator's configuration.
    type Config: Clone;

    /// Returns a copy of the active configuration.
    fn config(&self) -> Self::Config;

    /// Validates `config` and atomically installs it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid, in which case
    /// the generator is left untouched.
    fn reconfigure(&self, config: Self::Config) -> Result<()>;

    /// Opens a [`Reconstructor`] staged with the active configuration.
    fn reconstructor(&self) -> Reconstructor<'_, Self>
    where
        Self: Sized,
    {
        Reconstructor::new(self)
    }
}

/// A staging area for a new generator configuration.
///
/// The reconstructor holds its own copy of the configuration. Edits made
/// through [`Reconstructor::config_mut`] take no locks and are invisible to
/// the generator until [`Reconstructor::commit`] is called. A reconstructor
/// can be committed any number of times; each commit resets the generator's
/// runtime state.
///
/// # Example
///
/// ```
/// use seqloom::{BitPackedGenerator, Reconfigurable};
///
/// let generator = BitPackedGenerator::new();
///
/// let mut staged = generator.reconstructor();
/// staged.config_mut().worker_id = 7;
/// staged.config_mut().datacenter_id = 3;
/// staged.commit().unwrap();
///
/// assert_eq!(generator.config().worker_id, 7);
/// ```
pub struct Reconstructor<'a, G: Reconfigurable> {
    generator: &'a G,
    staged: G::Config,
}

impl<'a, G: Reconfigurable> Reconstructor<'a, G> {
    /// Creates a reconstructor staged with `generator`'s active configuration.
    pub fn new(generator: &'a G) -> Self {
        Self {
            staged: generator.config(),
            generator,
        }
    }

    /// The staged configuration.
    pub fn config(&self) -> &G::Config {
        &self.staged
    }

    /// Mutable access to the staged configuration.
    pub fn config_mut(&mut self) -> &mut G::Config {
        &mut self.staged
    }

    /// Applies `edit` to the staged configuration.
    pub fn update(&mut self, edit: impl FnOnce(&mut G::Config)) -> &mut Self {
        edit(&mut self.staged);
        self
    }

    /// Discards all staged edits and re-reads the generator's configuration.
    pub fn reload(&mut self) -> &mut Self {
        self.staged = self.generator.config();
        self
    }

    /// Validates the staged configuration and installs it into the generator.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the staged configuration is invalid.
    pub fn commit(&self) -> Result<()> {
        self.generator.reconfigure(self.staged.clone())
    }

    /// The generator this reconstructor commits into.
    pub fn generator(&self) -> &'a G {
        self.generator
    }
}

impl<G> fmt::Debug for Reconstructor<'_, G>
where
    G: Reconfigurable,
    G::Config: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconstructor")
            .field("staged", &self.staged)
            .finish_non_exhaustive()
    }
}
