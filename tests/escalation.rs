use std::time::Duration;

use hex_literal::hex;
use keysolver::cipher::pad_key;
use keysolver::{
    Aes128Ecb, BlockCipherEngine, Escalation, Outcome, Sample, SampleSet, SearchConfig, Silent,
    Validator,
};

fn config(max_length: usize, workers: usize) -> SearchConfig {
    SearchConfig {
        max_length,
        workers,
        ..SearchConfig::default()
    }
}

fn found_key(outcome: Outcome) -> Vec<u8> {
    match outcome {
        Outcome::Found { key, .. } => key.candidate,
        other => panic!("expected a key, got {other:?}"),
    }
}

#[test]
fn single_byte_key_recovers_digit_string() {
    let key = hex!("01000000000000000000000000000000");
    let ct = Aes128Ecb.encrypt(&key, b"123456789012");
    assert_eq!(ct.len(), 16);

    let samples = SampleSet::from_samples(vec![Sample::raw(ct.clone(), None)]).unwrap();
    let escalation = Escalation::new(config(1, 4), Validator::new(samples)).unwrap();

    match escalation.run(&Silent).unwrap() {
        Outcome::Found { key: found, samples } => {
            assert_eq!(found.candidate, vec![0x01]);
            assert_eq!(found.key, key);
            assert_eq!(samples.len(), 1);
            assert_eq!(samples[0].plaintext, "123456789012");

            let pt = Aes128Ecb.decrypt(&found.key, &ct);
            assert_eq!(Aes128Ecb.remove_padding(&pt).unwrap(), b"123456789012");
        }
        other => panic!("expected a key, got {other:?}"),
    }
}

#[test]
fn decoded_base64_samples_with_markers() {
    let key = pad_key(&[0xbe, 0xef]);
    let numbers = ["2728513142", "2630253647", "2171951344"];
    let encoded: Vec<(String, Option<&str>)> = numbers
        .iter()
        .map(|n| {
            let s = Sample::raw(Aes128Ecb.encrypt(&key, n.as_bytes()), None);
            (s.encoded, Some(*n))
        })
        .collect();

    let samples = SampleSet::decode(encoded.iter().map(|(b64, m)| (b64.as_str(), *m))).unwrap();
    let escalation = Escalation::new(config(2, 4), Validator::new(samples)).unwrap();

    match escalation.run(&Silent).unwrap() {
        Outcome::Found { key: found, samples } => {
            assert_eq!(found.candidate, vec![0xbe, 0xef]);
            for (s, n) in samples.iter().zip(numbers) {
                assert_eq!(s.plaintext, n);
                assert_eq!(s.marker.as_deref(), Some(n));
            }
        }
        other => panic!("expected a key, got {other:?}"),
    }
}

#[test]
fn same_outcome_for_any_worker_count() {
    let key = pad_key(&[0x33, 0xc4]);
    let samples = SampleSet::from_samples(vec![
        Sample::raw(Aes128Ecb.encrypt(&key, b"1111"), None),
        Sample::raw(Aes128Ecb.encrypt(&key, b"90210"), None),
    ])
    .unwrap();

    for workers in [1, 2, 8] {
        for _ in 0..2 {
            let escalation =
                Escalation::new(config(2, workers), Validator::new(samples.clone())).unwrap();
            assert_eq!(found_key(escalation.run(&Silent).unwrap()), vec![0x33, 0xc4]);
        }
    }
}

#[test]
fn exhaustion_is_repeatable() {
    let key = pad_key(&[1, 2, 3]);
    let samples =
        SampleSet::from_samples(vec![Sample::raw(Aes128Ecb.encrypt(&key, b"7"), None)]).unwrap();

    for workers in [1, 3] {
        let escalation = Escalation::new(config(1, workers), Validator::new(samples.clone())).unwrap();
        assert_eq!(escalation.run(&Silent).unwrap(), Outcome::Exhausted);
    }
}

#[test]
fn zero_length_searches_empty_candidate_only() {
    let samples = SampleSet::from_samples(vec![Sample::raw(
        Aes128Ecb.encrypt(&[0u8; 16], b"000"),
        None,
    )])
    .unwrap();
    let escalation = Escalation::new(config(0, 2), Validator::new(samples)).unwrap();
    assert_eq!(found_key(escalation.run(&Silent).unwrap()), Vec::<u8>::new());
}

#[test]
fn zero_timeout_cancels_run() {
    let key = pad_key(&[0xaa, 0xbb, 0xcc]);
    let samples =
        SampleSet::from_samples(vec![Sample::raw(Aes128Ecb.encrypt(&key, b"1"), None)]).unwrap();
    let cfg = SearchConfig {
        timeout: Some(Duration::ZERO),
        ..config(3, 2)
    };
    let escalation = Escalation::new(cfg, Validator::new(samples)).unwrap();
    assert_eq!(escalation.run(&Silent).unwrap(), Outcome::Cancelled { length: 1 });
}
