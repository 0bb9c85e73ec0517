//! Prime k-tuplet kinds and their in-byte bit patterns.
//!
//! Every byte of a sieved segment holds the eight residues coprime to 30 in
//! the window `[30k + 7, 30k + 31]`:
//!
//! ```text
//! bit:     0   1   2   3   4   5   6   7
//! value:   7  11  13  17  19  23  29  31   (+ 30k)
//! ```
//!
//! With this layout every admissible prime constellation up to the septuplet
//! `(p, p+2, p+6, p+8, p+12, p+18, p+20)` with `p >= 7` falls inside a single
//! byte, so a tuplet is just a bitmask that must be fully contained in the
//! byte. Constellations touching 2, 3 or 5 are handled by the run's
//! small-prime table instead (see [`run`](crate::run)).

#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Twin primes: `(11, 13)`, `(17, 19)`, `(29, 31)`.
const TWINS: &[u8] = &[0x06, 0x18, 0xc0];
/// Prime triplets: `(7, 11, 13)`, `(11, 13, 17)`, `(13, 17, 19)`, `(17, 19, 23)`.
const TRIPLETS: &[u8] = &[0x07, 0x0e, 0x1c, 0x38];
/// Prime quadruplets: `(11, 13, 17, 19)`.
const QUADRUPLETS: &[u8] = &[0x1e];
/// Prime quintuplets: `(7, 11, 13, 17, 19)`, `(11, 13, 17, 19, 23)`.
const QUINTUPLETS: &[u8] = &[0x1f, 0x3e];
/// Prime sextuplets: `(7, 11, 13, 17, 19, 23)`.
const SEXTUPLETS: &[u8] = &[0x3f];
/// Prime septuplets: `(11, 13, 17, 19, 23, 29, 31)`.
const SEPTUPLETS: &[u8] = &[0xfe];

/// Pattern table indexed by [`TupletKind::index`].
///
/// Each list is sorted in strictly increasing order so that a scan over a
/// byte value can stop at the first pattern greater than the byte.
const PATTERNS: [&[u8]; 7] = [
    &[],
    TWINS,
    TRIPLETS,
    QUADRUPLETS,
    QUINTUPLETS,
    SEXTUPLETS,
    SEPTUPLETS,
];

/// What a count or a generated record refers to.
///
/// Index 0 (`Primes`) stands for single primes; indices 1 to 6 are the
/// k-tuplet kinds from twins (k = 2) up to septuplets (k = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TupletKind {
    /// Single primes.
    Primes = 0,
    /// Twin primes (k = 2).
    Twins = 1,
    /// Prime triplets (k = 3).
    Triplets = 2,
    /// Prime quadruplets (k = 4).
    Quadruplets = 3,
    /// Prime quintuplets (k = 5).
    Quintuplets = 4,
    /// Prime sextuplets (k = 6).
    Sextuplets = 5,
    /// Prime septuplets (k = 7).
    Septuplets = 6,
}

impl TupletKind {
    /// Every kind, in index order.
    pub const ALL: [TupletKind; 7] = [
        TupletKind::Primes,
        TupletKind::Twins,
        TupletKind::Triplets,
        TupletKind::Quadruplets,
        TupletKind::Quintuplets,
        TupletKind::Sextuplets,
        TupletKind::Septuplets,
    ];

    /// The k-tuplet kinds only (everything except `Primes`).
    pub const TUPLETS: [TupletKind; 6] = [
        TupletKind::Twins,
        TupletKind::Triplets,
        TupletKind::Quadruplets,
        TupletKind::Quintuplets,
        TupletKind::Sextuplets,
        TupletKind::Septuplets,
    ];

    /// Position of this kind in count arrays (0 to 6).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind stored at `index`, if any.
    ///
    /// ```
    /// use primecraft::TupletKind;
    ///
    /// assert_eq!(TupletKind::from_index(1), Some(TupletKind::Twins));
    /// assert_eq!(TupletKind::from_index(7), None);
    /// ```
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Number of primes in one instance (1 for `Primes`, 2 for twins, ...).
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        self as usize + 1
    }

    /// Whether this is a k-tuplet kind (k >= 2).
    #[inline]
    #[must_use]
    pub const fn is_tuplet(self) -> bool {
        !matches!(self, Self::Primes)
    }

    /// Human readable plural name, used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primes => "primes",
            Self::Twins => "twin primes",
            Self::Triplets => "prime triplets",
            Self::Quadruplets => "prime quadruplets",
            Self::Quintuplets => "prime quintuplets",
            Self::Sextuplets => "prime sextuplets",
            Self::Septuplets => "prime septuplets",
        }
    }

    /// In-byte bit patterns of this kind, sorted ascending.
    ///
    /// `Primes` has no patterns: single primes are counted by population
    /// count, not by pattern lookup.
    ///
    /// ```
    /// use primecraft::TupletKind;
    ///
    /// assert_eq!(TupletKind::Twins.patterns(), &[0x06, 0x18, 0xc0]);
    /// assert!(TupletKind::Primes.patterns().is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn patterns(self) -> &'static [u8] {
        PATTERNS[self as usize]
    }
}

impl fmt::Display for TupletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
