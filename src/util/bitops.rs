//! Bit manipulation utilities.
//!
//! Population counting is the hot path of prime counting: every sieved
//! segment is reduced to its number of set bits. The word path reads the
//! segment as little-endian 64-bit words and uses `u64::count_ones`, which
//! compiles to `POPCNT` where available and to a fixed SWAR reduction
//! otherwise. Either way the cost per word is constant and independent of
//! the data.
//!
//! The remaining helpers index the odd-only bit-packed arrays used by the
//! engine's bootstrap sieve.

#![allow(clippy::cast_possible_truncation)]

/// Number of set bits in `bytes`.
///
/// Whole 8-byte words go through the fixed-cost word path; the trailing
/// `len % 8` bytes fall back to [`popcount_kernighan`].
///
/// # Examples
///
/// ```
/// use primecraft::util::bitops::popcount;
///
/// assert_eq!(popcount(&[]), 0);
/// assert_eq!(popcount(&[0xff; 8]), 64);
/// assert_eq!(popcount(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x06]), 66);
/// ```
#[inline]
#[must_use]
pub fn popcount(bytes: &[u8]) -> u64 {
    let words = bytes.chunks_exact(8);
    let tail = words.remainder();
    let mut total: u64 = words
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from(u64::from_le_bytes(word).count_ones())
        })
        .sum();
    if !tail.is_empty() {
        total += popcount_kernighan(tail);
    }
    total
}

/// Byte-wise population count that clears the lowest set bit until none is
/// left. Cost is proportional to the number of set bits, so it is only used
/// for short tails.
///
/// ```
/// use primecraft::util::bitops::popcount_kernighan;
///
/// assert_eq!(popcount_kernighan(&[0x06, 0x80]), 3);
/// ```
#[must_use]
pub fn popcount_kernighan(bytes: &[u8]) -> u64 {
    let mut total = 0;
    for &byte in bytes {
        let mut b = byte;
        while b != 0 {
            b &= b - 1;
            total += 1;
        }
    }
    total
}

/// Calculate the number of u64 words needed to store n bits.
///
/// ```
/// use primecraft::util::bitops::bits_to_words;
///
/// assert_eq!(bits_to_words(0), 0);
/// assert_eq!(bits_to_words(64), 1);
/// assert_eq!(bits_to_words(65), 2);
/// ```
#[inline]
#[must_use]
pub const fn bits_to_words(n_bits: usize) -> usize {
    (n_bits + 63) / 64
}

/// Index of the word containing the given bit.
#[inline(always)]
#[must_use]
pub const fn word_index(bit_index: usize) -> usize {
    bit_index >> 6
}

/// Offset of the given bit within its word.
#[inline(always)]
#[must_use]
pub const fn bit_offset(bit_index: usize) -> usize {
    bit_index & 63
}

/// Mask with a single bit set at `offset` (0-63).
///
/// ```
/// use primecraft::util::bitops::bit_mask;
///
/// assert_eq!(bit_mask(0), 0b1);
/// assert_eq!(bit_mask(63), 1u64 << 63);
/// ```
#[inline(always)]
#[must_use]
pub const fn bit_mask(offset: usize) -> u64 {
    1u64 << (offset & 63)
}

/// Integer square root, exact for every u64.
///
/// ```
/// use primecraft::util::bitops::isqrt;
///
/// assert_eq!(isqrt(0), 0);
/// assert_eq!(isqrt(99), 9);
/// assert_eq!(isqrt(100), 10);
/// assert_eq!(isqrt(u64::MAX), 4_294_967_295);
/// ```
#[must_use]
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x > 0 && x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map_or(false, |sq| sq <= n) {
        x += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_by_bit(bytes: &[u8]) -> u64 {
        let mut total = 0;
        for &byte in bytes {
            for bit in 0..8 {
                total += u64::from((byte >> bit) & 1);
            }
        }
        total
    }

    #[test]
    fn test_popcount_matches_bit_by_bit() {
        let bytes: Vec<u8> = (0..1_037u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        for len in [0, 1, 7, 8, 9, 15, 16, 17, 100, 1_037] {
            assert_eq!(popcount(&bytes[..len]), bit_by_bit(&bytes[..len]), "len {len}");
        }
    }

    #[test]
    fn test_popcount_all_ones_tail() {
        for len in 0..20 {
            let bytes = vec![0xffu8; len];
            assert_eq!(popcount(&bytes), 8 * len as u64);
        }
    }

    #[test]
    fn test_kernighan() {
        assert_eq!(popcount_kernighan(&[]), 0);
        assert_eq!(popcount_kernighan(&[0xff, 0x00, 0x81]), 10);
    }

    #[test]
    fn test_word_helpers() {
        assert_eq!(word_index(0), 0);
        assert_eq!(word_index(64), 1);
        assert_eq!(bit_offset(65), 1);
        assert_eq!(bit_mask(2), 0b100);
        assert_eq!(bits_to_words(129), 3);
    }

    #[test]
    fn test_isqrt_boundaries() {
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(1 << 52), 1 << 26);
        assert_eq!(isqrt((1 << 32) - 1), 65_535);
        let r = isqrt(u64::MAX - 1);
        assert!(r * r <= u64::MAX - 1);
    }
}
