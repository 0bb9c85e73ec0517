//! Lock-free shared accumulators with cache-line padding.
//!
//! Workers of a parallel run count into their own local [`Counts`] and merge
//! them here once per chunk, so the atomics are touched a handful of times
//! per run rather than once per segment. Each accumulator still gets its own
//! cache line: merges from different workers then never invalidate each
//! other's lines.

use crate::core::{Counts, TupletKind};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Value aligned to (and padded out to) a 64-byte cache line.
///
/// # Memory Layout
///
/// ```text
/// [value][padding up to 64 bytes] = 1 cache line
/// ```
///
/// # Examples
///
/// ```
/// use primecraft::sync::CacheLinePadded;
/// use std::sync::atomic::AtomicU64;
///
/// let padded = CacheLinePadded::new(AtomicU64::new(42));
/// assert_eq!(padded.load(), 42);
/// assert_eq!(std::mem::align_of_val(&padded), 64);
/// ```
#[repr(align(64))]
#[derive(Default)]
pub struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    /// Create a new cache-line padded value.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Get a reference to the inner value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Consume the padded value and return the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl CacheLinePadded<AtomicU64> {
    /// Load with Acquire ordering.
    #[inline]
    #[must_use]
    pub fn load(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Add `delta` and return the previous value.
    #[inline]
    pub fn fetch_add(&self, delta: u64) -> u64 {
        self.value.fetch_add(delta, Ordering::AcqRel)
    }
}

impl<T: fmt::Debug> fmt::Debug for CacheLinePadded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLinePadded")
            .field("value", &self.value)
            .finish()
    }
}

/// Seven padded atomic accumulators, one per [`TupletKind`].
///
/// # Examples
///
/// ```
/// use primecraft::sync::AtomicCounts;
/// use primecraft::{Counts, TupletKind};
/// use std::sync::Arc;
/// use std::thread;
///
/// let shared = Arc::new(AtomicCounts::new());
/// let handles: Vec<_> = (0..4).map(|_| {
///     let shared = Arc::clone(&shared);
///     thread::spawn(move || {
///         let mut local = Counts::new();
///         local.add(TupletKind::Primes, 25);
///         shared.add_counts(&local);
///     })
/// }).collect();
///
/// for h in handles { h.join().unwrap(); }
/// assert_eq!(shared.get(TupletKind::Primes), 100);
/// ```
#[derive(Debug, Default)]
pub struct AtomicCounts {
    counters: [CacheLinePadded<AtomicU64>; 7],
}

impl AtomicCounts {
    /// All accumulators at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the accumulator of `kind`.
    #[inline]
    pub fn add(&self, kind: TupletKind, delta: u64) {
        if delta != 0 {
            self.counters[kind.index()].fetch_add(delta);
        }
    }

    /// Merge a worker's local counts.
    pub fn add_counts(&self, counts: &Counts) {
        for (kind, value) in counts.iter() {
            self.add(kind, value);
        }
    }

    /// Current value for `kind`.
    #[must_use]
    pub fn get(&self, kind: TupletKind) -> u64 {
        self.counters[kind.index()].load()
    }

    /// Plain copy of every accumulator.
    #[must_use]
    pub fn snapshot(&self) -> Counts {
        let mut values = [0u64; 7];
        for (value, counter) in values.iter_mut().zip(&self.counters) {
            *value = counter.load();
        }
        Counts::from_array(values)
    }
}
