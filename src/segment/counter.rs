//! Counting primes and prime k-tuplets within one segment.

use crate::core::{Counts, KindSet, Segment, TupletCountTable, TupletKind};
use crate::util::bitops::popcount;
use std::sync::Arc;

/// Produces per-segment count deltas.
///
/// Primes are counted by population count over the segment; each requested
/// tuplet kind by summing its byte lookup table. The counter only reads the
/// segment and the shared tables, so any number of workers may count
/// concurrently.
///
/// # Examples
///
/// ```
/// use primecraft::core::{Segment, TupletCountTable};
/// use primecraft::segment::SegmentCounter;
/// use primecraft::{KindSet, TupletKind};
/// use std::sync::Arc;
///
/// let kinds = KindSet::empty().with(TupletKind::Primes).with(TupletKind::Twins);
/// let counter = SegmentCounter::new(kinds, Arc::new(TupletCountTable::build(kinds)));
///
/// // 7, 11, 13 are set in the first byte: three primes, one twin pair.
/// let bytes = [0x07];
/// let delta = counter.count(&Segment::from_bytes(&bytes, 0));
/// assert_eq!(delta[TupletKind::Primes], 3);
/// assert_eq!(delta[TupletKind::Twins], 1);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentCounter {
    kinds: KindSet,
    tables: Arc<TupletCountTable>,
}

impl SegmentCounter {
    /// Counter for `kinds`. `tables` must have been built for every tuplet
    /// kind in `kinds`.
    #[must_use]
    pub fn new(kinds: KindSet, tables: Arc<TupletCountTable>) -> Self {
        debug_assert!(
            kinds.iter().filter(|k| k.is_tuplet()).all(|k| tables.is_built(k)),
            "count table missing for a requested tuplet kind"
        );
        Self { kinds, tables }
    }

    /// Requested kinds.
    #[must_use]
    pub const fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// Counts found in `segment`; kinds that were not requested stay zero.
    #[must_use]
    pub fn count(&self, segment: &Segment<'_>) -> Counts {
        let bytes = segment.bytes();
        let mut delta = Counts::new();
        if self.kinds.contains(TupletKind::Primes) {
            delta.add(TupletKind::Primes, popcount(bytes));
        }
        for kind in TupletKind::TUPLETS {
            if self.kinds.contains(kind) {
                delta.add(kind, self.tables.count_bytes(kind, bytes));
            }
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(kinds: KindSet) -> SegmentCounter {
        SegmentCounter::new(kinds, Arc::new(TupletCountTable::build(kinds)))
    }

    #[test]
    fn test_single_twin_byte() {
        let c = counter(KindSet::all());
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0x06;
        let delta = c.count(&Segment::from_bytes(&bytes, 0));
        assert_eq!(delta[TupletKind::Primes], 2);
        assert_eq!(delta[TupletKind::Twins], 1);
        assert_eq!(delta[TupletKind::Triplets], 0);
    }

    #[test]
    fn test_empty_segment_counts_nothing() {
        let c = counter(KindSet::all());
        let delta = c.count(&Segment::from_bytes(&[], 0));
        assert!(delta.is_zero());
    }

    #[test]
    fn test_unrequested_kinds_stay_zero() {
        let c = counter(KindSet::empty().with(TupletKind::Twins));
        let bytes = [0xffu8; 10];
        let delta = c.count(&Segment::from_bytes(&bytes, 0));
        assert_eq!(delta[TupletKind::Primes], 0);
        assert_eq!(delta[TupletKind::Twins], 30);
        assert_eq!(delta[TupletKind::Septuplets], 0);
    }

    #[test]
    fn test_mixed_kinds_match_independent_runs() {
        let bytes: Vec<u8> = (0..257u32).map(|i| (i * 37 % 256) as u8).collect();
        let segment = Segment::from_bytes(&bytes, 0);
        let together = counter(KindSet::all()).count(&segment);
        for kind in TupletKind::ALL {
            let alone = counter(KindSet::empty().with(kind)).count(&segment);
            assert_eq!(alone[kind], together[kind], "{kind}");
        }
    }

    #[test]
    fn test_counting_is_deterministic() {
        let bytes: Vec<u8> = (0..100u8).collect();
        let segment = Segment::from_bytes(&bytes, 0);
        let c = counter(KindSet::all());
        assert_eq!(c.count(&segment), c.count(&segment));
    }
}
