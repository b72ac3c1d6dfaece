//! Error-correction tests for the Berlekamp-Welch decode path
//!
//! Exercises corruption detection and repair through the public
//! `correct`/`decode_to`/`decode` surface: literal recovery vectors,
//! corrupted multi-block decodes, the correction radius, idempotence and
//! randomized trials.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rsfec::{Error, Fec, Share};
use rustc_hash::FxHashMap;

fn some_shares(fec: &Fec, block: usize) -> (Vec<u8>, Vec<Share>) {
    let data: Vec<u8> = (0..fec.required() * block)
        .map(|i| (i + 1) as u8)
        .collect();
    let mut shares = Vec::new();
    fec.encode(&data, |num, output| {
        shares.push(Share::new(num, output.to_vec()));
    })
    .unwrap();
    (data, shares)
}

fn decode_to_map(fec: &Fec, shares: &mut [Share]) -> FxHashMap<usize, Vec<u8>> {
    let mut decoded = FxHashMap::default();
    fec.decode_to(shares, |num, data| {
        let previous = decoded.insert(num, data.to_vec());
        assert!(previous.is_none(), "block {num} yielded twice");
    })
    .unwrap();
    decoded
}

// pick a replacement byte that differs from the current one
fn mutate_byte(rng: &mut StdRng, byte: &mut u8) {
    let orig = *byte;
    let mut next = rng.gen::<u8>();
    while next == orig {
        next = rng.gen::<u8>();
    }
    *byte = next;
}

#[test]
fn test_single_block_shares() {
    let fec = Fec::new(3, 7).unwrap();
    let (_, shares) = some_shares(&fec, 1);

    let bytes: Vec<u8> = shares.iter().map(|s| s.data[0]).collect();
    assert_eq!(bytes, vec![0x01, 0x02, 0x03, 0x15, 0x69, 0xcc, 0xf2]);
}

#[test]
fn test_multiple_block_corruption() {
    let block = 4096;
    let fec = Fec::new(3, 7).unwrap();
    let (_, mut shares) = some_shares(&fec, block);
    let pristine = shares.clone();

    shares[0].data[0] = shares[0].data[0].wrapping_add(1);
    shares[1].data[0] = shares[1].data[0].wrapping_add(1);

    let decoded = decode_to_map(&fec, &mut shares);

    assert_eq!(decoded.len(), 3);
    for share in &pristine[..3] {
        assert_eq!(decoded[&share.num], share.data);
    }
}

#[test]
fn test_decode_into_buffer() {
    let block = 4096;
    let fec = Fec::new(3, 7).unwrap();
    let (data, mut shares) = some_shares(&fec, block);

    let mut output = vec![0u8; data.len() + 1];
    let written = fec.decode(&mut shares, &mut output).unwrap();
    assert_eq!(written, data.len());
    assert_eq!(&output[..written], &data[..]);
}

#[test]
fn test_zero_runs() {
    let fec = Fec::new(20, 40).unwrap();

    let mut data = vec![0u8; 200];
    data.extend(std::iter::repeat(0x14).take(20));

    let mut shares = Vec::new();
    fec.encode(&data, |num, output| {
        shares.push(Share::new(num, output.to_vec()));
    })
    .unwrap();

    shares[0].data[0] = shares[0].data[0].wrapping_add(1);

    fec.decode_to(&mut shares, |_, _| {}).unwrap();
}

#[test]
fn test_correction_radius() {
    let fec = Fec::new(3, 7).unwrap();
    let (data, shares) = some_shares(&fec, 2);

    // e = (7 - 3) / 2 = 2 corrupted shares per column are recoverable
    let mut corrupted = shares.clone();
    corrupted[2].data[0] ^= 0xFF;
    corrupted[6].data[0] ^= 0x3C;
    corrupted[0].data[1] ^= 0x01;

    let mut output = vec![0u8; data.len()];
    fec.decode(&mut corrupted, &mut output).unwrap();
    assert_eq!(output, data);

    // one error beyond the radius is detected and refused
    let mut corrupted = shares.clone();
    corrupted[0].data[0] ^= 0xFF;
    corrupted[3].data[0] ^= 0x77;
    corrupted[5].data[0] ^= 0x1B;

    let err = fec.decode(&mut corrupted, &mut output).unwrap_err();
    assert_eq!(err, Error::TooManyErrors);
}

#[test]
fn test_correct_is_idempotent() {
    let fec = Fec::new(4, 9).unwrap();
    let (_, mut shares) = some_shares(&fec, 64);

    shares[1].data[17] ^= 0x80;
    fec.correct(&mut shares).unwrap();
    let repaired = shares.clone();

    fec.correct(&mut shares).unwrap();
    assert_eq!(shares, repaired);
}

#[test]
fn test_correct_requires_enough_shares() {
    let fec = Fec::new(5, 10).unwrap();
    let (_, shares) = some_shares(&fec, 8);

    let mut too_few: Vec<Share> = shares[..4].to_vec();
    assert!(matches!(
        fec.correct(&mut too_few),
        Err(Error::NotEnoughShares { have: 4, need: 5 })
    ));
}

#[test]
fn test_random_corruption_trials() {
    let block = 64;
    let required = 3;
    let total = 7;
    let repetitions = 500;

    let fec = Fec::new(required, total).unwrap();
    let (_, shares) = some_shares(&fec, block);
    let mut rng = StdRng::seed_from_u64(0xB57);

    for rep in 0..repetitions {
        let mut trial = shares.clone();

        // random order, random count between required+2 and total
        trial.shuffle(&mut rng);
        let keep = required + 2 + rng.gen_range(0..=total - required - 2);
        trial.truncate(keep);

        // one corrupted share per byte position stays within the radius
        for j in 0..block {
            let victim = rng.gen_range(0..trial.len());
            mutate_byte(&mut rng, &mut trial[victim].data[j]);
        }

        let decoded = decode_to_map(&fec, &mut trial);
        for share in &shares[..required] {
            assert_eq!(
                decoded[&share.num], share.data,
                "mismatch in repetition {rep}"
            );
        }
    }
}
