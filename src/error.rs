//! Error types for PrimeCraft operations.
//!
//! Segment processing itself never fails: every input reaching
//! [`SegmentProcessor`](crate::segment::SegmentProcessor) has already been
//! validated. Errors are produced when a run is configured (see
//! [`builder`](crate::builder)) and when buffered output is flushed at the end
//! of a run.
//!
//! # Error Propagation
//!
//! ```
//! use primecraft::{PrimeCraftError, Result};
//! use primecraft::builder::PrimeSieveBuilder;
//!
//! fn twins_below(stop: u64) -> Result<u64> {
//!     let summary = PrimeSieveBuilder::new()
//!         .range(0, stop)
//!         .count(primecraft::TupletKind::Twins)
//!         .build()?
//!         .run()?;
//!     Ok(summary.counts[primecraft::TupletKind::Twins])
//! }
//! # assert_eq!(twins_below(100).unwrap(), 8);
//! ```

#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Result type alias for PrimeCraft operations.
pub type Result<T> = std::result::Result<T, PrimeCraftError>;

/// Errors that can occur while configuring or finishing a sieve run.
///
/// `Clone` + `PartialEq` so tests can compare errors directly. I/O failures
/// are carried as messages for the same reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeCraftError {
    /// Lower bound is greater than the upper bound.
    InvalidRange {
        /// Requested lower bound.
        start: u64,
        /// Requested upper bound.
        stop: u64,
    },

    /// Upper bound leaves no headroom for value arithmetic in the last byte.
    StopTooLarge {
        /// Requested upper bound.
        stop: u64,
        /// Largest supported upper bound.
        max: u64,
    },

    /// Segment size outside the supported window.
    InvalidSegmentSize {
        /// Requested size in bytes.
        bytes: usize,
        /// Minimum allowed size.
        min: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Zero worker threads requested.
    InvalidThreadCount {
        /// Requested thread count.
        threads: usize,
    },

    /// More than one generation mode was configured for a single run.
    ConflictingGeneration {
        /// Mode that was already configured.
        existing: String,
        /// Mode that was rejected.
        requested: String,
    },

    /// The chosen sink cannot receive the requested kind of values.
    UnsupportedGeneration {
        /// Generated values (e.g. "prime triplets").
        generation: String,
        /// Sink kind (e.g. "64-bit callback").
        sink: String,
    },

    /// A 32-bit callback was combined with a range that exceeds `u32::MAX`.
    CallbackOverflow {
        /// Requested upper bound.
        stop: u64,
        /// Largest value the callback can receive.
        max: u64,
    },

    /// Writing generated values failed.
    Output {
        /// Description of the underlying I/O error.
        message: String,
    },

    /// A worker thread panicked while sieving its chunk.
    WorkerPanicked {
        /// Index of the chunk the worker was processing.
        chunk: usize,
    },
}

impl fmt::Display for PrimeCraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { start, stop } => {
                write!(
                    f,
                    "Invalid range [{}, {}]: start must not exceed stop.",
                    start, stop
                )
            }
            Self::StopTooLarge { stop, max } => {
                write!(f, "Stop {} is too large. Maximum supported stop is {}.", stop, max)
            }
            Self::InvalidSegmentSize { bytes, min, max } => {
                write!(
                    f,
                    "Invalid segment size: {} bytes. Must be in range [{}, {}].",
                    bytes, min, max
                )
            }
            Self::InvalidThreadCount { threads } => {
                write!(f, "Invalid thread count: {}. At least one thread is required.", threads)
            }
            Self::ConflictingGeneration { existing, requested } => {
                write!(
                    f,
                    "Cannot enable {}: {} is already enabled and only one generation mode is allowed per run.",
                    requested, existing
                )
            }
            Self::UnsupportedGeneration { generation, sink } => {
                write!(f, "Generation of {} is not supported by the {} sink.", generation, sink)
            }
            Self::CallbackOverflow { stop, max } => {
                write!(
                    f,
                    "Stop {} exceeds the 32-bit callback domain (maximum {}).",
                    stop, max
                )
            }
            Self::Output { message } => write!(f, "Output error: {}.", message),
            Self::WorkerPanicked { chunk } => {
                write!(f, "Worker thread panicked while sieving chunk {}.", chunk)
            }
        }
    }
}

impl std::error::Error for PrimeCraftError {}

impl From<std::io::Error> for PrimeCraftError {
    fn from(err: std::io::Error) -> Self {
        Self::output(err.to_string())
    }
}

impl PrimeCraftError {
    /// Create an `InvalidRange` error.
    #[must_use]
    pub fn invalid_range(start: u64, stop: u64) -> Self {
        Self::InvalidRange { start, stop }
    }

    /// Create a `StopTooLarge` error.
    #[must_use]
    pub fn stop_too_large(stop: u64, max: u64) -> Self {
        Self::StopTooLarge { stop, max }
    }

    /// Create an `InvalidSegmentSize` error.
    #[must_use]
    pub fn invalid_segment_size(bytes: usize, min: usize, max: usize) -> Self {
        Self::InvalidSegmentSize { bytes, min, max }
    }

    /// Create an `InvalidThreadCount` error.
    #[must_use]
    pub fn invalid_thread_count(threads: usize) -> Self {
        Self::InvalidThreadCount { threads }
    }

    /// Create a `ConflictingGeneration` error.
    #[must_use]
    pub fn conflicting_generation(existing: impl Into<String>, requested: impl Into<String>) -> Self {
        Self::ConflictingGeneration {
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Create an `UnsupportedGeneration` error.
    #[must_use]
    pub fn unsupported_generation(generation: impl Into<String>, sink: impl Into<String>) -> Self {
        Self::UnsupportedGeneration {
            generation: generation.into(),
            sink: sink.into(),
        }
    }

    /// Create a `CallbackOverflow` error.
    #[must_use]
    pub fn callback_overflow(stop: u64, max: u64) -> Self {
        Self::CallbackOverflow { stop, max }
    }

    /// Create an `Output` error.
    #[must_use]
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a `WorkerPanicked` error.
    #[must_use]
    pub fn worker_panicked(chunk: usize) -> Self {
        Self::WorkerPanicked { chunk }
    }
}
