//! Primes and tuplets below the wheel's first value.
//!
//! The mod-30 wheel cannot represent 2, 3 or 5, so every record containing
//! one of them is listed here. Each entry counts (and is generated) only if
//! all of its members lie inside the run's range.

use crate::core::{Counts, KindSet, TupletKind};
use crate::segment::Generation;
use crate::sink::Emit;

struct SmallRecord {
    kind: TupletKind,
    members: &'static [u64],
}

const SMALL_RECORDS: [SmallRecord; 8] = [
    SmallRecord { kind: TupletKind::Primes, members: &[2] },
    SmallRecord { kind: TupletKind::Primes, members: &[3] },
    SmallRecord { kind: TupletKind::Primes, members: &[5] },
    SmallRecord { kind: TupletKind::Twins, members: &[3, 5] },
    SmallRecord { kind: TupletKind::Twins, members: &[5, 7] },
    SmallRecord { kind: TupletKind::Triplets, members: &[5, 7, 11] },
    SmallRecord { kind: TupletKind::Quadruplets, members: &[5, 7, 11, 13] },
    SmallRecord { kind: TupletKind::Quintuplets, members: &[5, 7, 11, 13, 17] },
];

/// Largest member of any small record; ranges starting above it skip the table.
pub(crate) const SMALL_LIMIT: u64 = 17;

fn records(start: u64, stop: u64) -> impl Iterator<Item = &'static SmallRecord> {
    SMALL_RECORDS.iter().filter(move |record| {
        let first = record.members[0];
        let last = record.members[record.members.len() - 1];
        start <= first && last <= stop
    })
}

/// Counts of the small records inside `[start, stop]` for the requested kinds.
pub(crate) fn count(start: u64, stop: u64, kinds: KindSet) -> Counts {
    let mut counts = Counts::new();
    if start > SMALL_LIMIT {
        return counts;
    }
    for record in records(start, stop).filter(|r| kinds.contains(r.kind)) {
        counts.add(record.kind, 1);
    }
    counts
}

/// Emit the small records of `generation` inside `[start, stop]`, ascending.
pub(crate) fn generate(start: u64, stop: u64, generation: Generation, sink: &mut dyn Emit) {
    if start > SMALL_LIMIT {
        return;
    }
    let kind = generation.kind();
    for record in records(start, stop).filter(|r| r.kind == kind) {
        match generation {
            Generation::Primes => sink.value(record.members[0]),
            Generation::Tuplets(_) => sink.group(record.members),
        }
    }
}
