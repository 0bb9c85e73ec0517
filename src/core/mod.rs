//! Core types shared by counting, generation and the sieve engine.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── tuplet.rs    - TupletKind and the in-byte pattern table
//! ├── table.rs     - Byte-indexed tuplet count tables
//! ├── wheel.rs     - Mod-30 bit/value mapping and the Segment view
//! ├── counts.rs    - Per-kind accumulators and KindSet
//! └── mod.rs       - This file (public API)
//! ```
//!
//! Everything here is immutable after construction and `Send + Sync`, so one
//! instance can be shared by every worker of a parallel run.

pub mod counts;
pub mod table;
pub mod tuplet;
pub mod wheel;

pub use counts::{Counts, KindSet};
pub use table::TupletCountTable;
pub use tuplet::TupletKind;
pub use wheel::Segment;
