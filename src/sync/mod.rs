//! Concurrency primitives for parallel runs.
//!
//! # Module Organization
//!
//! - [`OrderingGate`] - Mutex-guarded emitter with chunk turn-taking
//! - [`AtomicCounts`] - Lock-free shared per-kind accumulators
//! - [`CacheLinePadded`] - False-sharing free wrapper used by both
//!
//! # Concurrency Model
//!
//! | Operation | Shared state | Synchronization |
//! |-----------|--------------|-----------------|
//! | count     | count tables (read-only) | none |
//! | merge     | `AtomicCounts` | atomic add, once per chunk |
//! | generate  | emitter | `OrderingGate` mutex, ascending turns |
//!
//! Counting never waits on anything. Delivery to the emitter is serialized:
//! at most one worker is inside it at any instant, and a worker only blocks
//! on it once its chunk's sieving is done.

mod atomic_counts;
mod gate;

pub use atomic_counts::{AtomicCounts, CacheLinePadded};
pub use gate::{GateGuard, OrderingGate, Turn};
