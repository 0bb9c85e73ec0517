//! Segmented mod-30 sieve of Eratosthenes.
//!
//! The engine produces the segments the rest of the crate consumes. It is a
//! straightforward reference implementation: every segment is reset to all
//! ones, each sieving prime crosses off its multiples coprime to 30, and the
//! candidates outside the run's range are cleared before the segment is handed
//! to a [`SegmentHandler`].
//!
//! # Segment Layout
//!
//! ```text
//! byte j of a segment at `low`:
//!   bit:    0    1    2    3    4    5    6    7
//!   value: +7  +11  +13  +17  +19  +23  +29  +31   (+ low + 30j)
//! ```
//!
//! Segment lower bounds are multiples of 30 and consecutive segments are
//! contiguous, so `segment_bytes * 30` numbers separate their lows.

mod small;

pub use small::sieving_primes;

use crate::core::wheel::{bit_of, segment_low_for, value_at, FIRST_WHEEL_VALUE, NUMBERS_PER_BYTE};
use crate::core::Segment;
use crate::util::isqrt;

/// Receives each sieved segment, in ascending order.
pub trait SegmentHandler {
    /// Called once per segment. The segment is only valid for the call.
    fn segment_processed(&mut self, segment: &Segment<'_>);
}

impl<F: FnMut(&Segment<'_>)> SegmentHandler for F {
    fn segment_processed(&mut self, segment: &Segment<'_>) {
        self(segment);
    }
}

/// Distance to the next number coprime to 30, indexed by residue mod 30.
const WHEEL_GAP: [u64; 30] = {
    let mut gaps = [0u64; 30];
    let residues = [1u64, 7, 11, 13, 17, 19, 23, 29];
    let mut i = 0;
    while i < 8 {
        let next = if i == 7 { 31 } else { residues[i + 1] };
        gaps[residues[i] as usize] = next - residues[i];
        i += 1;
    }
    gaps
};

/// Smallest `q >= n` with `gcd(q, 30) == 1`.
fn next_coprime(mut n: u64) -> u64 {
    while n % 2 == 0 || n % 3 == 0 || n % 5 == 0 {
        n += 1;
    }
    n
}

/// Sieve over `[start, stop]` that borrows its crossing-off primes.
///
/// Parallel runs build the primes once with [`sieving_primes`] and hand the
/// same slice to one sieve per chunk.
///
/// # Examples
///
/// ```
/// use primecraft::core::Segment;
/// use primecraft::engine::{sieving_primes, SegmentedSieve};
///
/// let primes = sieving_primes(10);
/// let mut found = Vec::new();
/// SegmentedSieve::new(0, 100, 1024, &primes).sieve(&mut |segment: &Segment<'_>| {
///     for (byte, &bits) in segment.bytes().iter().enumerate() {
///         for bit in 0..8 {
///             if bits & (1 << bit) != 0 {
///                 found.push(segment.low() + 30 * byte as u64
///                     + primecraft::core::wheel::BIT_VALUES[bit]);
///             }
///         }
///     }
/// });
/// assert_eq!(found.len(), 25 - 3);
/// assert_eq!(found[0], 7);
/// assert_eq!(*found.last().unwrap(), 97);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentedSieve<'a> {
    start: u64,
    stop: u64,
    segment_bytes: usize,
    primes: &'a [u32],
}

impl<'a> SegmentedSieve<'a> {
    /// Sieve `[start, stop]` in segments of `segment_bytes` bytes.
    ///
    /// `primes` must hold at least every prime in `7..=isqrt(stop)`.
    #[must_use]
    pub fn new(start: u64, stop: u64, segment_bytes: usize, primes: &'a [u32]) -> Self {
        debug_assert!(segment_bytes > 0);
        debug_assert!(primes.last().map_or(true, |&p| u64::from(p) >= 7));
        Self {
            start,
            stop,
            segment_bytes,
            primes,
        }
    }

    /// Lower bound of the first segment.
    #[must_use]
    pub const fn first_low(&self) -> u64 {
        segment_low_for(self.start)
    }

    /// Total sieve bytes needed for the range.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        let low = self.first_low();
        if self.start > self.stop || self.stop < low + FIRST_WHEEL_VALUE {
            return 0;
        }
        (self.stop - low - FIRST_WHEEL_VALUE) / NUMBERS_PER_BYTE + 1
    }

    /// Run the sieve, calling `handler` once per segment.
    pub fn sieve<H: SegmentHandler + ?Sized>(&self, handler: &mut H) {
        let mut remaining = self.total_bytes();
        if remaining == 0 {
            return;
        }
        let root = isqrt(self.stop);
        let primes_end = self.primes.partition_point(|&p| u64::from(p) <= root);
        let primes = &self.primes[..primes_end];

        let mut buffer = vec![0u8; self.segment_bytes];
        let mut low = self.first_low();
        let mut first = true;

        while remaining > 0 {
            let size = remaining.min(self.segment_bytes as u64) as usize;
            let bytes = &mut buffer[..size];
            bytes.fill(0xff);

            cross_off(bytes, low, primes);
            if first {
                self.clear_below_start(bytes, low);
                first = false;
            }
            remaining -= size as u64;
            if remaining == 0 {
                self.clear_above_stop(bytes, low);
            }

            handler.segment_processed(&Segment::new(&buffer, size, low));
            low += size as u64 * NUMBERS_PER_BYTE;
        }
    }

    fn clear_below_start(&self, bytes: &mut [u8], low: u64) {
        // `start` always falls into byte 0 of the first segment.
        for bit in 0..8 {
            if value_at(low, 0, bit) < self.start {
                bytes[0] &= !(1 << bit);
            }
        }
    }

    fn clear_above_stop(&self, bytes: &mut [u8], low: u64) {
        let last = bytes.len() - 1;
        for bit in 0..8 {
            if value_at(low, last, bit) > self.stop {
                bytes[last] &= !(1 << bit);
            }
        }
    }
}

/// Clear every multiple `p * q` (`q >= p`, `q` coprime to 30) inside the segment.
fn cross_off(bytes: &mut [u8], low: u64, primes: &[u32]) {
    let first_value = low + FIRST_WHEEL_VALUE;
    let last_value = value_at(low, bytes.len() - 1, 7);

    for &p in primes {
        let p = u64::from(p);
        let square = p * p;
        if square > last_value {
            break;
        }
        let mut q = if square >= first_value {
            p
        } else {
            next_coprime(first_value.div_ceil(p))
        };
        let mut multiple = p * q;
        while multiple <= last_value {
            let offset = multiple - first_value;
            if let Some(bit) = bit_of(offset % NUMBERS_PER_BYTE) {
                bytes[(offset / NUMBERS_PER_BYTE) as usize] &= !(1 << bit);
            }
            let gap = WHEEL_GAP[(q % NUMBERS_PER_BYTE) as usize];
            q += gap;
            multiple += p * gap;
        }
    }
}
