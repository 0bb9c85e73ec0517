//! Turning sieved segments into concrete primes and prime k-tuplets.

use crate::core::wheel::{next_value, value_at};
use crate::core::{Segment, TupletKind};
use crate::sink::Emit;

/// What a run generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Every prime, one value at a time.
    Primes,
    /// Every instance of one k-tuplet kind, one group at a time.
    Tuplets(TupletKind),
}

impl Generation {
    /// Kind of record produced.
    #[must_use]
    pub const fn kind(self) -> TupletKind {
        match self {
            Self::Primes => TupletKind::Primes,
            Self::Tuplets(kind) => kind,
        }
    }

    /// Name used in logs and configuration errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.kind().name()
    }
}

impl From<TupletKind> for Generation {
    fn from(kind: TupletKind) -> Self {
        if kind.is_tuplet() {
            Self::Tuplets(kind)
        } else {
            Self::Primes
        }
    }
}

/// Emits the primes or tuplets of a segment in ascending order.
///
/// # Examples
///
/// ```
/// use primecraft::core::Segment;
/// use primecraft::segment::{Generation, SegmentGenerator};
/// use primecraft::sink::PrintEmitter;
/// use primecraft::TupletKind;
///
/// let generator = SegmentGenerator::new(Generation::Tuplets(TupletKind::Twins));
/// let mut out = PrintEmitter::new(Vec::new());
///
/// let bytes = [0x06, 0x00, 0xc0];
/// generator.generate(&Segment::from_bytes(&bytes, 0), &mut out);
///
/// let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
/// assert_eq!(text, "(11, 13)\n(89, 91)\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SegmentGenerator {
    generation: Generation,
}

impl SegmentGenerator {
    /// Generator for `generation`.
    #[must_use]
    pub const fn new(generation: Generation) -> Self {
        Self { generation }
    }

    /// What this generator produces.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Deliver every record of `segment` to `sink`, ascending.
    pub fn generate(&self, segment: &Segment<'_>, sink: &mut dyn Emit) {
        match self.generation {
            Generation::Primes => generate_primes(segment, sink),
            Generation::Tuplets(kind) => generate_tuplets(segment, kind, sink),
        }
    }
}

/// Walks the segment one little-endian 64-bit word at a time, consuming the
/// lowest set bit first. Byte order within a word and bit order within a
/// byte both follow ascending value order.
fn generate_primes(segment: &Segment<'_>, sink: &mut dyn Emit) {
    let low = segment.low();
    let bytes = segment.bytes();
    let words = bytes.chunks_exact(8);
    let tail = words.remainder();

    for (i, chunk) in words.enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        let mut bits = u64::from_le_bytes(word);
        let base = i * 8;
        while bits != 0 {
            let tz = bits.trailing_zeros();
            bits &= bits - 1;
            sink.value(value_at(low, base + (tz / 8) as usize, tz % 8));
        }
    }

    let base = bytes.len() - tail.len();
    for (i, &byte) in tail.iter().enumerate() {
        let mut bits = byte;
        while bits != 0 {
            sink.value(next_value(low, base + i, &mut bits));
        }
    }
}

/// Byte-by-byte pattern scan. Patterns are sorted, so the scan over a byte
/// stops at the first pattern greater than the byte value.
fn generate_tuplets(segment: &Segment<'_>, kind: TupletKind, sink: &mut dyn Emit) {
    let low = segment.low();
    let patterns = kind.patterns();
    let mut group = [0u64; 8];

    for (j, &byte) in segment.bytes().iter().enumerate() {
        for &pattern in patterns.iter().take_while(|&&p| p <= byte) {
            if byte & pattern != pattern {
                continue;
            }
            let mut bits = pattern;
            let mut n = 0;
            while bits != 0 {
                group[n] = next_value(low, j, &mut bits);
                n += 1;
            }
            sink.group(&group[..n]);
        }
    }
}
