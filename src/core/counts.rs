//! Per-kind accumulators and the set of requested count kinds.

use super::tuplet::TupletKind;
use std::fmt;
use std::ops::{AddAssign, Index};

/// Seven 64-bit accumulators: index 0 for primes, 1 to 6 for tuplet kinds.
///
/// Segment counting only ever produces deltas; combining deltas is
/// commutative, so counts from different segments or workers can be summed
/// in any order.
///
/// # Examples
///
/// ```
/// use primecraft::{Counts, TupletKind};
///
/// let mut total = Counts::new();
/// let mut delta = Counts::new();
/// delta.add(TupletKind::Primes, 25);
/// delta.add(TupletKind::Twins, 8);
///
/// total += delta;
/// assert_eq!(total[TupletKind::Primes], 25);
/// assert_eq!(total.get(TupletKind::Twins), 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counts {
    values: [u64; 7],
}

impl Counts {
    /// All accumulators at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: [0; 7] }
    }

    /// Build from raw values in index order.
    #[must_use]
    pub const fn from_array(values: [u64; 7]) -> Self {
        Self { values }
    }

    /// Current value for `kind`.
    #[inline]
    #[must_use]
    pub const fn get(&self, kind: TupletKind) -> u64 {
        self.values[kind.index()]
    }

    /// Add `delta` to the accumulator of `kind`.
    #[inline]
    pub fn add(&mut self, kind: TupletKind, delta: u64) {
        self.values[kind.index()] += delta;
    }

    /// Raw values in index order.
    #[must_use]
    pub const fn as_array(&self) -> &[u64; 7] {
        &self.values
    }

    /// `(kind, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TupletKind, u64)> + '_ {
        TupletKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }

    /// Whether every accumulator is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }
}

impl Index<TupletKind> for Counts {
    type Output = u64;

    fn index(&self, kind: TupletKind) -> &u64 {
        &self.values[kind.index()]
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.values.iter_mut().zip(rhs.values) {
            *lhs += rhs;
        }
    }
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(mut self, rhs: Self) -> Counts {
        self += rhs;
        self
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", kind, value)?;
        }
        Ok(())
    }
}

/// Compact set of [`TupletKind`]s, one bit per kind.
///
/// ```
/// use primecraft::{KindSet, TupletKind};
///
/// let kinds = KindSet::empty().with(TupletKind::Primes).with(TupletKind::Twins);
/// assert!(kinds.contains(TupletKind::Twins));
/// assert!(!kinds.contains(TupletKind::Triplets));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// No kinds.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every kind, primes included.
    #[must_use]
    pub const fn all() -> Self {
        Self(0x7f)
    }

    /// Copy of this set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: TupletKind) -> Self {
        Self(self.0 | (1 << kind.index()))
    }

    /// Add `kind` in place.
    pub fn insert(&mut self, kind: TupletKind) {
        self.0 |= 1 << kind.index();
    }

    /// Whether `kind` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, kind: TupletKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in index order.
    pub fn iter(self) -> impl Iterator<Item = TupletKind> {
        TupletKind::ALL.into_iter().filter(move |&kind| self.contains(kind))
    }
}

impl FromIterator<TupletKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = TupletKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}
