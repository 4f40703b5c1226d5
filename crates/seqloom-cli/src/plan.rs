use crate::config::{Part, ToolConfig};
use anyhow::Context;
use seqloom::{OdometerGenerator, SequenceComposer, SequenceSource, Slot, TimeSource};
use std::sync::Arc;


/// The generators behind one run of the binary, wired into a composer.
///
/// `packed` and `odometer` parts each get one shared generator no matter
/// how often they are listed. Every `slot` part becomes a placeholder that
/// is filled from a single filler odometer on each call.
pub struct SequencePlan<T>
where
    T: TimeSource + Send + Sync + 'static,
{
    composer: SequenceComposer,
    slot_filler: Option<OdometerGenerator<T>>,
}

impl<T> SequencePlan<T>
where
    T: TimeSource + Clone + Send + Sync + 'static,
{
    pub fn build(config: &ToolConfig, clock: T) -> anyhow::Result<Self> {
        let packed = if config.uses(Part::Packed) {
            let generator = config
                .packed
                .build_with_clock(clock.clone())
                .context("failed to build packed generator")?;
            Some(Slot::from(Arc::new(generator)))
        } else {
            None
        };

        let odometer = if config.uses(Part::Odometer) {
            let generator = config
                .odometer
                .clone()
                .build_with_clock(clock.clone())
                .context("failed to build odometer generator")?;
            Some(Slot::from(Arc::new(generator)))
        } else {
            None
        };

        let slot_filler = if config.uses(Part::Slot) {
            let generator = config
                .slot
                .clone()
                .build_with_clock(clock)
                .context("failed to build slot filler")?;
            Some(generator)
        } else {
            None
        };

        let slots = config.parts.iter().filter_map(|part| match part {
            Part::Packed => packed.clone(),
            Part::Odometer => odometer.clone(),
            Part::Slot => Some(Slot::Placeholder),
        });

        let composer = SequenceComposer::with_separator(config.separator.as_str());
        composer.append(slots);

        Ok(Self {
            composer,
            slot_filler,
        })
    }

    pub fn next_value(&self) -> anyhow::Result<String> {
        let value = match &self.slot_filler {
            Some(filler) => {
                let filler: &dyn SequenceSource = filler;
                self.composer.try_next_value_with(&[filler])
            }
            None => self.composer.try_next_value(),
        };
        value.context("failed to generate value")
    }
}
