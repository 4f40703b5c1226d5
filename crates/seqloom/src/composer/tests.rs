use crate::{
    BitPackedGenerator, Error, OdometerConfig, OdometerGenerator, PackedConfig, Result,
    SequenceComposer, SequenceSource, Slot, mock::ScriptedClock,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::scope;

struct Text(&'static str);

impl SequenceSource for Text {
    fn try_next_value(&self) -> Result<String> {
        Ok(self.0.to_owned())
    }
}

#[derive(Default)]
struct Counter(AtomicUsize);

impl SequenceSource for Counter {
    fn try_next_value(&self) -> Result<String> {
        Ok(self.0.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

struct Failing;

impl SequenceSource for Failing {
    fn try_next_value(&self) -> Result<String> {
        Err(Error::ClockOverflow {
            relative: 16,
            max: 15,
        })
    }
}

fn text(value: &'static str) -> Slot {
    Slot::source(Text(value))
}

#[test]
fn placeholder_is_filled_from_override() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("X"), Slot::Placeholder, text("Y")]);

    assert_eq!(composer.try_next_value_with(&[&Text("Z")]).unwrap(), "X-Z-Y");
}

#[test]
fn last_override_fills_remaining_placeholders() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("X"), Slot::Placeholder, text("Y"), Slot::Placeholder]);

    assert_eq!(composer.try_next_value_with(&[&Text("Q")]).unwrap(), "X-Q-Y-Q");
}

#[test]
fn overrides_are_consumed_in_order_then_clamped() {
    let composer = SequenceComposer::with_separator(",");
    composer.append([Slot::Placeholder, Slot::Placeholder, Slot::Placeholder]);

    assert_eq!(
        composer
            .try_next_value_with(&[&Text("A"), &Text("B")])
            .unwrap(),
        "A,B,B"
    );
    assert_eq!(
        composer
            .try_next_value_with(&[&Text("A"), &Text("B"), &Text("C"), &Text("D")])
            .unwrap(),
        "A,B,C"
    );
}

#[test]
fn clamped_override_is_called_once_per_placeholder() {
    let counter = Counter::default();
    let composer = SequenceComposer::with_separator("|");
    composer.append([Slot::Placeholder, Slot::Placeholder, Slot::Placeholder]);

    assert_eq!(composer.try_next_value_with(&[&counter]).unwrap(), "0|1|2");
}

#[test]
fn empty_composer_yields_empty_string() {
    let composer = SequenceComposer::with_separator("-");

    assert_eq!(composer.try_next_value().unwrap(), "");
    assert_eq!(composer.try_next_value_with(&[&Text("Z")]).unwrap(), "");
}

#[test]
fn placeholder_without_overrides_is_an_error() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("X"), Slot::Placeholder]);

    assert_eq!(
        composer.try_next_value(),
        Err(Error::MissingOverride { slot: 1 })
    );
}

#[test]
fn source_errors_propagate() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("X"), Slot::source(Failing), text("Y")]);

    assert_eq!(
        composer.try_next_value(),
        Err(Error::ClockOverflow {
            relative: 16,
            max: 15
        })
    );
}

#[test]
fn separator_is_stripped_exactly_once() {
    let composer = SequenceComposer::with_separator("::");
    composer.append([text("X"), text("Y")]);
    assert_eq!(composer.try_next_value().unwrap(), "X::Y");

    composer.set_separator("");
    assert_eq!(composer.try_next_value().unwrap(), "XY");
    assert_eq!(composer.separator(), "");

    // A trailing empty value keeps its separator.
    composer.set_separator("-").append([text("")]);
    assert_eq!(composer.try_next_value().unwrap(), "X-Y-");
}

#[test]
fn slots_returns_a_detached_copy() {
    let composer = SequenceComposer::new();
    composer.append([text("X"), Slot::Placeholder]);

    let mut slots = composer.slots();
    slots.clear();

    assert_eq!(composer.slots().len(), 2);
    assert!(composer.slots()[1].is_placeholder());
}

#[test]
fn replace_slots_swaps_the_whole_list() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("X"), text("Y")]);
    composer.replace_slots([text("A")]);

    assert_eq!(composer.try_next_value().unwrap(), "A");
}

#[test]
fn placeholder_as_source_is_empty() {
    assert_eq!(Slot::Placeholder.try_next_value().unwrap(), "");
}

#[test]
fn composers_nest() {
    let inner = Arc::new(SequenceComposer::with_separator("."));
    inner.append([text("a"), text("b")]);

    let outer = SequenceComposer::with_separator("/");
    outer.append([Slot::from(Arc::clone(&inner)), text("c")]);

    assert_eq!(outer.try_next_value().unwrap(), "a.b/c");
}

#[test]
fn composes_clock_driven_generators() {
    let ids = Arc::new(
        PackedConfig::default()
            .with_epoch(0)
            .build_with_clock(ScriptedClock::new([41, 42]))
            .unwrap(),
    );
    let codes = OdometerConfig::new(3, "xyz")
        .build_with_clock(ScriptedClock::new([41, 42]))
        .unwrap();

    let composer = SequenceComposer::with_separator("-");
    composer.append([Slot::from(Arc::clone(&ids)), Slot::Placeholder]);

    let first = composer.try_next_value_with(&[&codes]).unwrap();
    let second = composer.try_next_value_with(&[&codes]).unwrap();

    assert_eq!(first, format!("{}-42xxy", (42u64 << 22) | 1));
    assert_eq!(second, format!("{}-42xxz", (42u64 << 22) | 2));
}

#[test]
fn generation_never_observes_a_half_replaced_list() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([text("A"), text("B")]);

    scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..10_000 {
                    let value = composer.try_next_value().unwrap();
                    assert!(value == "A-B" || value == "C-D", "mixed value {value}");
                }
            });
        }

        s.spawn(|| {
            for i in 0..1_000 {
                if i % 2 == 0 {
                    composer.replace_slots([text("C"), text("D")]);
                } else {
                    composer.replace_slots([text("A"), text("B")]);
                }
            }
        });
    });
}

#[test]
fn shared_generator_slots_stay_unique_across_threads() {
    let composer = SequenceComposer::with_separator("-");
    composer.append([
        Slot::from(Arc::new(BitPackedGenerator::new())),
        Slot::from(Arc::new(OdometerGenerator::default())),
    ]);

    let values = std::sync::Mutex::new(std::collections::HashSet::new());
    scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let batch: Vec<String> = (0..5_000)
                    .map(|_| composer.try_next_value().unwrap())
                    .collect();
                let mut values = values.lock().unwrap();
                for value in batch {
                    assert!(values.insert(value));
                }
            });
        }
    });

    assert_eq!(values.lock().unwrap().len(), 20_000);
}
