//! Configuration of sieve runs.
//!
//! [`PrimeSieveBuilder`] follows the type-state pattern: a range must be
//! given before [`build`](PrimeSieveBuilder::build) becomes available. All
//! other settings are optional and validated together when the run is built.
//!
//! # Error Handling
//!
//! - **Compile-time errors**: missing range
//! - **Runtime errors**: invalid values and conflicting output settings
//!
//! # Examples
//!
//! ## Counting
//!
//! ```
//! use primecraft::builder::PrimeSieveBuilder;
//! use primecraft::TupletKind;
//!
//! let summary = PrimeSieveBuilder::new()
//!     .range(0, 1_000)
//!     .count(TupletKind::Primes)
//!     .count(TupletKind::Twins)
//!     .build()
//!     .unwrap()
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(summary.counts[TupletKind::Primes], 168);
//! assert_eq!(summary.counts[TupletKind::Twins], 35);
//! ```
//!
//! ## Rejected Configuration
//!
//! ```
//! use primecraft::builder::PrimeSieveBuilder;
//! use primecraft::PrimeCraftError;
//!
//! let err = PrimeSieveBuilder::new()
//!     .range(0, 100)
//!     .print_primes()
//!     .callback64(|_| {})
//!     .build()
//!     .unwrap_err();
//!
//! assert!(matches!(err, PrimeCraftError::ConflictingGeneration { .. }));
//! ```
//!
//! # Settings
//!
//! | Setting | Default | Constraint |
//! |---------|---------|------------|
//! | range | required | `start <= stop <= MAX_STOP` |
//! | threads | `num_cpus::get()` | `>= 1` |
//! | segment_bytes | 32 KiB | 1 KiB to 8 MiB |
//! | output | none | one generation mode, tuplets only printed |

#![allow(clippy::module_name_repetitions)]

mod sieve;

pub use sieve::{Complete, Initial, PrimeSieveBuilder};

/// Largest supported upper bound: `2^64 - 1 - 10 * 2^32`.
///
/// Stops this high need about 1 GB for the sieving primes up to
/// `sqrt(stop)`, allocated before sieving starts.
pub const MAX_STOP: u64 = u64::MAX - 10 * (1 << 32);

/// Smallest segment size in bytes.
pub const MIN_SEGMENT_BYTES: usize = 1 << 10;

/// Largest segment size in bytes.
pub const MAX_SEGMENT_BYTES: usize = 8 << 20;

/// Segment size used unless configured otherwise (L1-sized).
pub const DEFAULT_SEGMENT_BYTES: usize = 32 << 10;

/// Checks shared by [`PrimeSieveBuilder::build`].
pub(crate) mod validation {
    use super::{MAX_SEGMENT_BYTES, MAX_STOP, MIN_SEGMENT_BYTES};
    use crate::error::{PrimeCraftError, Result};
    use crate::segment::Generation;
    use crate::sink::ResultSink;

    /// Validate the sieving range.
    ///
    /// # Errors
    ///
    /// Returns error if `start > stop` or `stop > MAX_STOP`.
    #[inline]
    pub fn validate_range(start: u64, stop: u64) -> Result<()> {
        if start > stop {
            return Err(PrimeCraftError::invalid_range(start, stop));
        }
        if stop > MAX_STOP {
            return Err(PrimeCraftError::stop_too_large(stop, MAX_STOP));
        }
        Ok(())
    }

    /// Validate the segment size.
    ///
    /// # Errors
    ///
    /// Returns error if `bytes` is outside `[MIN_SEGMENT_BYTES, MAX_SEGMENT_BYTES]`.
    #[inline]
    pub fn validate_segment_bytes(bytes: usize) -> Result<()> {
        if !(MIN_SEGMENT_BYTES..=MAX_SEGMENT_BYTES).contains(&bytes) {
            return Err(PrimeCraftError::invalid_segment_size(
                bytes,
                MIN_SEGMENT_BYTES,
                MAX_SEGMENT_BYTES,
            ));
        }
        Ok(())
    }

    /// Validate the worker thread count.
    ///
    /// # Errors
    ///
    /// Returns error if `threads == 0`.
    #[inline]
    pub fn validate_threads(threads: usize) -> Result<()> {
        if threads == 0 {
            return Err(PrimeCraftError::invalid_thread_count(threads));
        }
        Ok(())
    }

    /// Validate that `sink` can receive `generation` for a run up to `stop`.
    ///
    /// # Errors
    ///
    /// Returns error if tuplets go anywhere but a print sink, or a 32-bit
    /// callback would receive values above `u32::MAX`.
    pub fn validate_output(sink: &ResultSink, generation: Generation, stop: u64) -> Result<()> {
        if matches!(generation, Generation::Tuplets(_)) && !sink.is_print() {
            return Err(PrimeCraftError::unsupported_generation(
                generation.name(),
                sink.name(),
            ));
        }
        if stop > sink.max_value() {
            return Err(PrimeCraftError::callback_overflow(stop, sink.max_value()));
        }
        Ok(())
    }
}

/// Prelude for convenient builder imports.
pub mod prelude {
    pub use super::{PrimeSieveBuilder, DEFAULT_SEGMENT_BYTES, MAX_STOP};
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use crate::core::TupletKind;
    use crate::error::PrimeCraftError;
    use crate::segment::Generation;
    use crate::sink::ResultSink;

    #[test]
    fn test_max_stop() {
        assert_eq!(MAX_STOP, 18_446_744_030_759_878_655);
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(0, 0).is_ok());
        assert!(validate_range(10, 100).is_ok());
        assert!(validate_range(0, MAX_STOP).is_ok());
        assert_eq!(
            validate_range(100, 10),
            Err(PrimeCraftError::invalid_range(100, 10))
        );
        assert_eq!(
            validate_range(0, MAX_STOP + 1),
            Err(PrimeCraftError::stop_too_large(MAX_STOP + 1, MAX_STOP))
        );
    }

    #[test]
    fn test_validate_segment_bytes() {
        assert!(validate_segment_bytes(MIN_SEGMENT_BYTES).is_ok());
        assert!(validate_segment_bytes(DEFAULT_SEGMENT_BYTES).is_ok());
        assert!(validate_segment_bytes(MAX_SEGMENT_BYTES).is_ok());
        assert!(validate_segment_bytes(MIN_SEGMENT_BYTES - 1).is_err());
        assert!(validate_segment_bytes(MAX_SEGMENT_BYTES + 1).is_err());
    }

    #[test]
    fn test_validate_threads() {
        assert!(validate_threads(1).is_ok());
        assert!(validate_threads(64).is_ok());
        assert!(validate_threads(0).is_err());
    }

    #[test]
    fn test_validate_output() {
        let twins = Generation::Tuplets(TupletKind::Twins);
        assert!(validate_output(&ResultSink::print_to(Vec::new()), twins, 100).is_ok());
        assert!(matches!(
            validate_output(&ResultSink::callback64(|_| {}), twins, 100),
            Err(PrimeCraftError::UnsupportedGeneration { .. })
        ));

        let limit = u64::from(u32::MAX);
        let narrow = ResultSink::callback32(|_| {});
        assert!(validate_output(&narrow, Generation::Primes, limit).is_ok());
        assert_eq!(
            validate_output(&narrow, Generation::Primes, limit + 1),
            Err(PrimeCraftError::callback_overflow(limit + 1, limit))
        );
    }
}
