//! Mod-30 wheel mapping between sieve bits and numeric values.
//!
//! A segment with lower bound `low` (a multiple of 30) stores the value
//! `low + 30 * byte + BIT_VALUES[bit]` at bit `bit` of byte `byte`. Bits are
//! numbered from the least significant end, so walking set bits from the
//! lowest upward yields values in ascending order.

/// Numbers covered by one sieve byte.
pub const NUMBERS_PER_BYTE: u64 = 30;

/// Offset of each bit from `low + 30 * byte`.
pub const BIT_VALUES: [u64; 8] = [7, 11, 13, 17, 19, 23, 29, 31];

/// Smallest value the wheel can represent; primes below it live in the
/// run's small-prime table.
pub const FIRST_WHEEL_VALUE: u64 = BIT_VALUES[0];

/// Bit index of `(value - low - 7) % 30`, or `NONE` for residues the wheel skips.
const NONE: u8 = u8::MAX;
const BIT_OF_OFFSET: [u8; 30] = {
    let mut table = [NONE; 30];
    let mut bit = 0;
    while bit < 8 {
        table[(BIT_VALUES[bit] - FIRST_WHEEL_VALUE) as usize] = bit as u8;
        bit += 1;
    }
    table
};

/// Numeric value of `bit` in byte `byte` of a segment starting at `low`.
///
/// ```
/// use primecraft::core::wheel::value_at;
///
/// assert_eq!(value_at(0, 0, 0), 7);
/// assert_eq!(value_at(0, 0, 7), 31);
/// assert_eq!(value_at(30, 2, 1), 30 + 60 + 11);
/// ```
#[inline]
#[must_use]
pub const fn value_at(low: u64, byte: usize, bit: u32) -> u64 {
    low + byte as u64 * NUMBERS_PER_BYTE + BIT_VALUES[bit as usize]
}

/// Consume the lowest set bit of `bits` and return its value.
///
/// `bits` must be non-zero.
///
/// ```
/// use primecraft::core::wheel::next_value;
///
/// let mut bits = 0x06; // (11, 13)
/// assert_eq!(next_value(0, 0, &mut bits), 11);
/// assert_eq!(next_value(0, 0, &mut bits), 13);
/// assert_eq!(bits, 0);
/// ```
#[inline]
pub fn next_value(low: u64, byte: usize, bits: &mut u8) -> u64 {
    debug_assert!(*bits != 0, "next_value on an empty mask");
    let bit = bits.trailing_zeros();
    *bits &= *bits - 1;
    value_at(low, byte, bit)
}

/// Bit index for a value whose distance from `low + 30 * byte + 7` is `offset`
/// (`0..30`). Returns `None` for values divisible by 2, 3 or 5.
///
/// ```
/// use primecraft::core::wheel::bit_of;
///
/// assert_eq!(bit_of(0), Some(0));   // 7
/// assert_eq!(bit_of(24), Some(7));  // 31
/// assert_eq!(bit_of(2), None);      // 9
/// ```
#[inline]
#[must_use]
pub const fn bit_of(offset: u64) -> Option<u32> {
    if offset >= NUMBERS_PER_BYTE {
        return None;
    }
    match BIT_OF_OFFSET[offset as usize] {
        NONE => None,
        bit => Some(bit as u32),
    }
}

/// Segment lower bound for a run whose first candidate is `start`.
///
/// The result is a multiple of 30 chosen so that `start` falls into byte 0.
#[inline]
#[must_use]
pub const fn segment_low_for(start: u64) -> u64 {
    let start = if start < FIRST_WHEEL_VALUE { FIRST_WHEEL_VALUE } else { start };
    (start - FIRST_WHEEL_VALUE) / NUMBERS_PER_BYTE * NUMBERS_PER_BYTE
}

/// Read-only view of one sieved segment.
///
/// Each set bit is a prime survivor; the engine has already cleared every
/// candidate outside the run's range.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    bytes: &'a [u8],
    low: u64,
}

impl<'a> Segment<'a> {
    /// View the first `size` bytes of `buffer` as a segment starting at `low`.
    ///
    /// # Panics
    ///
    /// Panics if `size > buffer.len()`.
    #[inline]
    #[must_use]
    pub fn new(buffer: &'a [u8], size: usize, low: u64) -> Self {
        Self {
            bytes: &buffer[..size],
            low,
        }
    }

    /// View an entire buffer as a segment.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8], low: u64) -> Self {
        Self { bytes, low }
    }

    /// Sieve bytes.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of valid bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the segment has no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower bound the bit values are relative to.
    #[inline]
    #[must_use]
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Numbers covered by the segment, reported to progress hooks.
    #[inline]
    #[must_use]
    pub const fn span(&self) -> u64 {
        self.bytes.len() as u64 * NUMBERS_PER_BYTE
    }
}
