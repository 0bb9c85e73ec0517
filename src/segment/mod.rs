//! Post-sieve segment processing.
//!
//! - [`SegmentCounter`] - Prime and tuplet counts via popcount and byte tables
//! - [`SegmentGenerator`] - Ascending primes or tuplet groups into an emitter
//! - [`SegmentProcessor`] - Per-worker fan-out called by the sieve engine
//!
//! # Data Flow
//!
//! ```text
//! engine ──segment_processed──▶ SegmentProcessor
//!                                  ├─▶ SegmentCounter   ─▶ local Counts
//!                                  ├─▶ SegmentGenerator ─▶ OrderingGate ─▶ Emit
//!                                  └─▶ ProgressHook
//! ```

mod counter;
mod generator;
mod processor;

pub use counter::SegmentCounter;
pub use generator::{Generation, SegmentGenerator};
pub use processor::{ProgressHook, SegmentProcessor};
