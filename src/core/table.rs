//! Byte-indexed tuplet count lookup tables.
//!
//! For a tuplet kind `k`, `table[k][b]` is the number of `k` patterns that are
//! bitwise submasks of byte value `b`. Counting a segment then costs one table
//! lookup per byte.

use super::counts::KindSet;
use super::tuplet::TupletKind;

/// Lookup tables for the requested tuplet kinds.
///
/// Tables are built once, before any segment is processed, and are immutable
/// afterwards; share them between workers with an `Arc`. Kinds that were not
/// requested keep an empty table and cost no memory.
///
/// # Examples
///
/// ```
/// use primecraft::core::TupletCountTable;
/// use primecraft::{KindSet, TupletKind};
///
/// let table = TupletCountTable::build(KindSet::empty().with(TupletKind::Twins));
/// assert_eq!(table.count_byte(TupletKind::Twins, 0x06), 1);
/// assert_eq!(table.count_byte(TupletKind::Twins, 0xde), 3);
/// assert!(!table.is_built(TupletKind::Triplets));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TupletCountTable {
    tables: [Vec<u8>; 7],
}

impl TupletCountTable {
    /// Build tables for every tuplet kind in `kinds`. `Primes` is ignored.
    #[must_use]
    pub fn build(kinds: KindSet) -> Self {
        let mut table = Self::default();
        for kind in kinds.iter().filter(|k| k.is_tuplet()) {
            table.tables[kind.index()] = build_kind(kind.patterns());
        }
        table
    }

    /// Whether the table for `kind` was built.
    #[inline]
    #[must_use]
    pub fn is_built(&self, kind: TupletKind) -> bool {
        !self.tables[kind.index()].is_empty()
    }

    /// The 256-entry table for `kind`, if built.
    #[must_use]
    pub fn get(&self, kind: TupletKind) -> Option<&[u8]> {
        let table = &self.tables[kind.index()];
        (!table.is_empty()).then_some(table.as_slice())
    }

    /// Patterns of `kind` contained in `byte`; 0 if the table was not built.
    #[inline]
    #[must_use]
    pub fn count_byte(&self, kind: TupletKind, byte: u8) -> u8 {
        self.tables[kind.index()]
            .get(usize::from(byte))
            .copied()
            .unwrap_or(0)
    }

    /// Total `kind` occurrences across `bytes`; 0 if the table was not built.
    #[must_use]
    pub fn count_bytes(&self, kind: TupletKind, bytes: &[u8]) -> u64 {
        match self.get(kind) {
            Some(table) => bytes
                .iter()
                .map(|&b| u64::from(table[usize::from(b)]))
                .sum(),
            None => 0,
        }
    }
}

/// One 256-entry table. `patterns` is sorted, so the scan stops at the first
/// pattern greater than the byte value: such a pattern cannot be a submask.
fn build_kind(patterns: &[u8]) -> Vec<u8> {
    (0..=u8::MAX)
        .map(|byte| {
            patterns
                .iter()
                .take_while(|&&p| p <= byte)
                .filter(|&&p| byte & p == p)
                .count() as u8
        })
        .collect()
}
