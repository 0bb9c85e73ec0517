//! Bootstrap sieve for the primes that strike composites out of segments.

use crate::util::bitops::{bit_mask, bit_offset, bits_to_words, word_index};
use crate::util::isqrt;

/// Odd-only bit-packed sieve of Eratosthenes over `[0, limit]`.
///
/// Returns the primes `7 <= p <= limit` in ascending order; 2, 3 and 5 are
/// built into the wheel and never needed for crossing off.
///
/// The whole table is held at once: for `limit` near `2^32` that is about
/// 800 MB of primes on top of a 256 MB bitset.
///
/// ```
/// use primecraft::engine::sieving_primes;
///
/// assert_eq!(sieving_primes(40), vec![7, 11, 13, 17, 19, 23, 29, 31, 37]);
/// assert!(sieving_primes(6).is_empty());
/// ```
#[must_use]
pub fn sieving_primes(limit: u64) -> Vec<u32> {
    if limit < 7 {
        return Vec::new();
    }
    // Limits are square roots of valid stops and always fit in u32.
    let limit = limit.min(u64::from(u32::MAX));

    // Bit i stands for the odd number 2i + 1.
    let half = (limit / 2) as usize;
    let mut bits = vec![!0u64; bits_to_words(half + 1)];
    bits[0] &= !1;

    let root = isqrt(limit);
    let mut i = 1usize;
    while (2 * i + 1) as u64 <= root {
        if bits[word_index(i)] & bit_mask(bit_offset(i)) != 0 {
            let step = 2 * i + 1;
            let mut j = 2 * i * (i + 1);
            while j <= half {
                bits[word_index(j)] &= !bit_mask(bit_offset(j));
                j += step;
            }
        }
        i += 1;
    }

    let mut primes = Vec::with_capacity(estimate_count(limit));
    for (w, &word) in bits.iter().enumerate() {
        let mut word = word;
        while word != 0 {
            let i = (w << 6) + word.trailing_zeros() as usize;
            word &= word - 1;
            let p = (2 * i + 1) as u64;
            if p > limit {
                break;
            }
            if p >= 7 {
                primes.push(p as u32);
            }
        }
    }
    primes
}

/// Upper estimate of pi(n) for pre-allocation.
fn estimate_count(n: u64) -> usize {
    if n < 10 {
        return 4;
    }
    let n = n as f64;
    (n / n.ln() * 1.15) as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_division(limit: u64) -> Vec<u32> {
        (7..=limit)
            .filter(|&n| (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0))
            .map(|n| n as u32)
            .collect()
    }

    #[test]
    fn test_small_limits() {
        for limit in 0..7 {
            assert!(sieving_primes(limit).is_empty());
        }
        assert_eq!(sieving_primes(7), vec![7]);
        assert_eq!(sieving_primes(10), vec![7]);
        assert_eq!(sieving_primes(11), vec![7, 11]);
    }

    #[test]
    fn test_matches_trial_division() {
        for limit in [49, 63, 64, 65, 127, 128, 129, 1_000, 4_096] {
            assert_eq!(sieving_primes(limit), trial_division(limit), "limit {limit}");
        }
    }

    #[test]
    fn test_table_stays_within_estimate() {
        for limit in [100u64, 65_536, 1 << 20, 10_000_000] {
            let primes = sieving_primes(limit);
            assert!(primes.len() <= estimate_count(limit), "limit {limit}");
        }
    }

    #[test]
    fn test_known_count() {
        // pi(10^6) minus 2, 3 and 5.
        assert_eq!(sieving_primes(1_000_000).len(), 78_498 - 3);
    }
}
