//! PrimeCraft: segmented prime sieving with prime k-tuplet counting and generation.
//!
//! PrimeCraft sieves a range `[start, stop]` with a segmented mod-30 sieve of
//! Eratosthenes and processes every finished segment: it counts primes and
//! prime k-tuplets (twins up to septuplets) and generates them, in ascending
//! order, to a text writer or a callback.
//!
//! # What is a Prime k-tuplet?
//!
//! A k-tuplet is a tightest-possible cluster of k primes, e.g. the twins
//! `(11, 13)`, the triplet `(7, 11, 13)` or the quadruplet `(11, 13, 17, 19)`.
//! A tuplet counts toward a range only if all of its members lie in it.
//!
//! # Quick Start
//!
//! ```
//! assert_eq!(primecraft::count_primes(0, 1_000_000).unwrap(), 78_498);
//! assert_eq!(primecraft::generate_primes(0, 30).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use primecraft::{PrimeSieveBuilder, TupletKind};
//!
//! let summary = PrimeSieveBuilder::new()
//!     .range(0, 10_000)
//!     .count_all()
//!     .threads(2)
//!     .build()
//!     .unwrap()
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(summary.counts[TupletKind::Primes], 1_229);
//! assert_eq!(summary.counts[TupletKind::Twins], 205);
//! ```
//!
//! # Sieve Layout
//!
//! Each sieve byte covers 30 numbers; its eight bits stand for the residues
//! coprime to 30:
//!
//! ```text
//! bit:    0   1   2   3   4   5   6   7
//! value:  7  11  13  17  19  23  29  31   (+ low + 30 * byte)
//! ```
//!
//! Every k-tuplet pattern fits inside one byte, so counting is a table lookup
//! per byte and generation a bit scan per byte.
//!
//! # Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`core`] | Tuplet kinds and patterns, count tables, wheel mapping, counts |
//! | [`segment`] | Counter, generator and the per-worker segment processor |
//! | [`sink`] | Print and callback destinations |
//! | [`sync`] | Ordering gate and padded atomic counters |
//! | [`engine`] | Reference segmented sieve |
//! | [`builder`] | Type-state run configuration |
//! | [`run`] | Run orchestration, progress, convenience functions |
//!
//! # Features
//!
//! - `serde` - Serialization of [`Counts`], [`TupletKind`] and run summaries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Tuplet kinds, count tables, wheel mapping and counts
pub mod core;

/// Error types and result aliases
pub mod error;

/// Bit-level helpers
pub mod util;

/// Post-sieve segment processing
pub mod segment;

/// Destinations for generated values
pub mod sink;

/// Concurrency primitives for parallel runs
pub mod sync;

/// Reference segmented sieve
pub mod engine;

/// Type-safe run configuration
pub mod builder;

/// Running a configured sieve
pub mod run;

// Re-export commonly used types at crate root
pub use error::{PrimeCraftError, Result};

pub use crate::core::{Counts, KindSet, TupletKind};

pub use builder::PrimeSieveBuilder;

pub use run::{count_primes, count_tuplets, generate_primes, PrimeSieve, Summary};

pub use sink::ResultSink;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use primecraft::prelude::*;
///
/// let count = count_tuplets(TupletKind::Triplets, 0, 1_000).unwrap();
/// assert_eq!(count, 30);
/// ```
pub mod prelude {
    pub use crate::builder::PrimeSieveBuilder;
    pub use crate::core::{Counts, KindSet, TupletKind};
    pub use crate::error::{PrimeCraftError, Result};
    pub use crate::run::{count_primes, count_tuplets, generate_primes, PrimeSieve, Summary};
    pub use crate::segment::{Generation, ProgressHook};
    pub use crate::sink::{Emit, ResultSink};
}
