use crate::{
    Error, GenStatus, OdometerConfig, OdometerGenerator, Reconfigurable, Seq, SequenceSource,
    mock::ScriptedClock,
};
use std::collections::HashSet;
use std::sync::Mutex;
use std::thread::scope;

fn generator_with_script(
    length: usize,
    alphabet: &str,
    script: impl Into<Vec<u64>>,
) -> OdometerGenerator<ScriptedClock> {
    OdometerConfig::new(length, alphabet)
        .build_with_clock(ScriptedClock::new(script))
        .expect("valid config")
}

fn codes(generator: &OdometerGenerator<ScriptedClock>, count: usize) -> Vec<String> {
    (0..count).map(|_| generator.generate_seq().code).collect()
}

#[test]
fn first_codes_in_a_millisecond_count_up() {
    let generator = generator_with_script(7, "a1234s", [50, 51]);

    let first = generator.generate_seq();
    let second = generator.generate_seq();

    assert_eq!(first, Seq::new(51, "aaaaaa1"));
    assert_eq!(second, Seq::new(51, "aaaaaa2"));
}

#[test]
fn carry_propagates_left() {
    let generator = generator_with_script(3, "01", [0, 1]);
    assert_eq!(
        codes(&generator, 7),
        ["001", "010", "011", "100", "101", "110", "111"]
    );
}

#[test]
fn full_overflow_moves_to_next_millisecond() {
    let generator = generator_with_script(2, "ab", [0, 1, 1, 1, 1, 1, 2]);
    assert_eq!(codes(&generator, 3), ["ab", "ba", "bb"]);

    // Every position sits on the last character: the odometer wraps.
    assert_eq!(generator.poll_seq(), GenStatus::Pending { yield_for: 1 });
    // The clock still reads 1, which is behind the forced timestamp 2.
    assert_eq!(generator.poll_seq(), GenStatus::Pending { yield_for: 1 });

    assert_eq!(generator.generate_seq(), Seq::new(2, "ab"));
}

#[test]
fn new_millisecond_restarts_at_first_character() {
    let generator = generator_with_script(3, "xyz", [0, 1, 2]);

    assert_eq!(generator.generate_seq(), Seq::new(1, "xxy"));
    assert_eq!(generator.generate_seq(), Seq::new(2, "xxx"));
}

#[test]
fn rolled_back_clock_is_waited_out() {
    let generator = generator_with_script(2, "0123456789", [100, 97, 99, 101]);

    assert_eq!(generator.poll_seq(), GenStatus::Pending { yield_for: 4 });
    assert_eq!(generator.generate_seq(), Seq::new(101, "01"));
    assert_eq!(generator.clock().reads(), 4);
}

#[test]
fn zero_length_yields_one_empty_code_per_millisecond() {
    let generator = generator_with_script(0, "abc", [0, 1, 1, 2, 2, 3]);

    assert_eq!(generator.generate_seq(), Seq::new(2, ""));
    assert_eq!(generator.generate_seq(), Seq::new(3, ""));
}

#[test]
fn single_character_alphabet_yields_one_code_per_millisecond() {
    let generator = generator_with_script(3, "z", [0, 1, 2, 2, 3]);

    assert_eq!(generator.generate_seq(), Seq::new(2, "zzz"));
    assert_eq!(generator.generate_seq(), Seq::new(3, "zzz"));
}

#[test]
fn empty_alphabet_is_rejected() {
    assert_eq!(
        OdometerGenerator::new(3, "").unwrap_err(),
        Error::EmptyAlphabet
    );
}

#[test]
fn commit_swaps_alphabet_and_restarts() {
    let generator = generator_with_script(2, "ab", [0, 1, 1, 2]);
    assert_eq!(generator.generate_seq(), Seq::new(1, "ab"));

    let mut staged = generator.reconstructor();
    staged.update(|config| {
        config.length = 3;
        config.alphabet = "xyz".chars().collect();
    });
    staged.commit().unwrap();

    assert_eq!(generator.config(), OdometerConfig::new(3, "xyz"));
    assert_eq!(generator.generate_seq(), Seq::new(2, "xxy"));
}

#[test]
fn rejected_commit_keeps_previous_alphabet() {
    let generator = generator_with_script(2, "ab", [0]);

    let mut staged = generator.reconstructor();
    staged.config_mut().alphabet.clear();

    assert_eq!(staged.commit(), Err(Error::EmptyAlphabet));
    assert_eq!(generator.config(), OdometerConfig::new(2, "ab"));
}

#[test]
fn duplicate_characters_render_as_is() {
    let generator = generator_with_script(2, "aab", [0, 1]);
    assert_eq!(codes(&generator, 3), ["aa", "ab", "aa"]);
}

#[test]
fn capacity_counts_codes_per_millisecond() {
    assert_eq!(OdometerConfig::new(7, "a1234s").capacity(), Some(279_936));
    assert_eq!(OdometerConfig::new(0, "abc").capacity(), Some(1));
    assert_eq!(OdometerConfig::new(200, "0123456789").capacity(), None);
}

#[test]
fn next_value_prefixes_timestamp() {
    let generator = generator_with_script(3, "abc", [9, 10]);
    assert_eq!(generator.try_next_value().unwrap(), "10aab");
}

#[test]
fn seq_identity_covers_both_fields() {
    let mut seen = HashSet::new();
    assert!(seen.insert(Seq::new(5, "ab")));
    assert!(seen.insert(Seq::new(6, "ab")));
    assert!(seen.insert(Seq::new(5, "ba")));
    assert!(!seen.insert(Seq::new(5, "ab")));
}

#[test]
fn threaded_seqs_are_unique() {
    const THREADS: usize = 8;
    const SEQS_PER_THREAD: usize = 20_000;

    let generator = OdometerGenerator::new(4, "0123456789").unwrap();
    let seen = Mutex::new(HashSet::with_capacity(THREADS * SEQS_PER_THREAD));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = &generator;
            let seen = &seen;
            s.spawn(move || {
                let seqs: Vec<Seq> = (0..SEQS_PER_THREAD)
                    .map(|_| generator.generate_seq())
                    .collect();
                let mut seen = seen.lock().unwrap();
                for seq in seqs {
                    assert!(seen.insert(seq.clone()), "duplicate seq {seq}");
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), THREADS * SEQS_PER_THREAD);
}

#[test]
fn default_is_five_decimal_digits() {
    let generator: OdometerGenerator = OdometerGenerator::default();
    let seq = generator.generate_seq();
    assert_eq!(seq.code.len(), 5);
    assert!(seq.code.chars().all(|c| c.is_ascii_digit()));
}

#[cfg(feature = "serde")]
#[test]
fn seq_serde_round_trip() {
    let seq = Seq::new(1_719_801_600_123, "aaaaaa1");
    let json = serde_json::to_string(&seq).unwrap();
    let back: Seq = serde_json::from_str(&json).unwrap();
    assert_eq!(back, seq);
}
