//! Shared segment generators and constants for all benchmarks.
//!
//! Random segments come from a seeded ChaCha RNG so every run measures the
//! same input; sieved segments come from the reference engine.
#![allow(dead_code)]

use primecraft::core::Segment;
use primecraft::engine::{sieving_primes, SegmentedSieve};
use primecraft::util::isqrt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Segment sizes in bytes: L1, L2 and beyond.
pub const SEGMENT_SIZES: &[usize] = &[1 << 10, 32 << 10, 256 << 10];

/// Fixed seed for reproducible inputs.
pub const SEED: u64 = 0x5eed_0030;

/// Random sieve bytes where each bit is set with probability `density`.
pub fn random_segment(len: usize, density: f64, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            (0..8).fold(0u8, |byte, bit| {
                if rng.gen_bool(density) {
                    byte | (1 << bit)
                } else {
                    byte
                }
            })
        })
        .collect()
}

/// Real sieve output: the first segment of `len` bytes starting at `low`.
///
/// `low` must be a multiple of 30.
pub fn sieved_segment(low: u64, len: usize) -> Vec<u8> {
    let stop = low + 30 * len as u64 + 6;
    let primes = sieving_primes(isqrt(stop));
    let mut bytes = Vec::with_capacity(len);
    SegmentedSieve::new(low + 7, stop, len, &primes).sieve(&mut |segment: &Segment<'_>| {
        if bytes.is_empty() {
            bytes.extend_from_slice(segment.bytes());
        }
    });
    bytes
}
