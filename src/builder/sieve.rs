//! Builder for [`PrimeSieve`] runs.
//!
//! # Type-State Pattern
//!
//! ```text
//! Initial ──.range()──▶ Complete ──.build()──▶ PrimeSieve
//! ```
//!
//! Optional settings are accepted in either state. Output settings record
//! the first conflict they hit; [`build`](PrimeSieveBuilder::build) reports
//! it together with every other invalid value.
//!
//! # Examples
//!
//! ## Generation Through a Callback
//!
//! ```
//! use primecraft::builder::PrimeSieveBuilder;
//! use std::sync::{Arc, Mutex};
//!
//! let primes = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&primes);
//!
//! PrimeSieveBuilder::new()
//!     .range(10, 30)
//!     .callback64(move |p| sink.lock().unwrap().push(p))
//!     .build()
//!     .unwrap()
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(*primes.lock().unwrap(), vec![11, 13, 17, 19, 23, 29]);
//! ```
//!
//! ## Printing Tuplets
//!
//! ```
//! use primecraft::builder::PrimeSieveBuilder;
//! use primecraft::TupletKind;
//!
//! let sieve = PrimeSieveBuilder::new()
//!     .range(0, 1_000_000)
//!     .print_tuplets(TupletKind::Quadruplets)
//!     .threads(2)
//!     .build()
//!     .unwrap();
//! ```

use super::validation;
use super::DEFAULT_SEGMENT_BYTES;
use crate::core::{KindSet, TupletKind};
use crate::error::{PrimeCraftError, Result};
use crate::run::PrimeSieve;
use crate::segment::Generation;
use crate::sink::{Context, ResultSink};
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;

/// Type-state marker: no range set yet.
pub struct Initial;

/// Type-state marker: range set, ready to build.
pub struct Complete;

/// Builder for sieve runs with type-state guarantees.
///
/// # Type Parameters
///
/// - `State`: current builder state ([`Initial`] or [`Complete`])
pub struct PrimeSieveBuilder<State> {
    start: u64,
    stop: u64,
    kinds: KindSet,
    output: Option<(ResultSink, Generation)>,
    threads: Option<usize>,
    segment_bytes: usize,
    status: bool,
    conflict: Option<PrimeCraftError>,
    _state: PhantomData<State>,
}

impl PrimeSieveBuilder<Initial> {
    /// Create a builder with nothing requested.
    ///
    /// # Examples
    ///
    /// ```
    /// use primecraft::builder::PrimeSieveBuilder;
    ///
    /// let builder = PrimeSieveBuilder::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: 0,
            stop: 0,
            kinds: KindSet::empty(),
            output: None,
            threads: None,
            segment_bytes: DEFAULT_SEGMENT_BYTES,
            status: false,
            conflict: None,
            _state: PhantomData,
        }
    }

    /// Set the inclusive range `[start, stop]` to sieve.
    ///
    /// This is the only required setting. Transitions to `Complete`.
    ///
    /// Before the first segment the run allocates a table of every prime up
    /// to `sqrt(stop)` (4 bytes each) plus a bitset of `sqrt(stop) / 16`
    /// bytes. Near [`MAX_STOP`](super::MAX_STOP) that is about 1 GB.
    #[must_use]
    pub fn range(self, start: u64, stop: u64) -> PrimeSieveBuilder<Complete> {
        PrimeSieveBuilder {
            start,
            stop,
            kinds: self.kinds,
            output: self.output,
            threads: self.threads,
            segment_bytes: self.segment_bytes,
            status: self.status,
            conflict: self.conflict,
            _state: PhantomData,
        }
    }
}

impl Default for PrimeSieveBuilder<Initial> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> PrimeSieveBuilder<State> {
    /// Count `kind`. May be called repeatedly to count several kinds.
    #[must_use]
    pub fn count(mut self, kind: TupletKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Count primes and every tuplet kind.
    #[must_use]
    pub fn count_all(mut self) -> Self {
        self.kinds = KindSet::all();
        self
    }

    /// Print every prime to standard output, one per line.
    #[must_use]
    pub fn print_primes(self) -> Self {
        self.output(ResultSink::stdout(), Generation::Primes)
    }

    /// Print every tuplet of `kind` to standard output as `(a, b, ...)`.
    ///
    /// `TupletKind::Primes` prints single primes.
    #[must_use]
    pub fn print_tuplets(self, kind: TupletKind) -> Self {
        self.output(ResultSink::stdout(), Generation::from(kind))
    }

    /// Print `generation` to `writer` instead of standard output.
    ///
    /// # Examples
    ///
    /// ```
    /// use primecraft::builder::PrimeSieveBuilder;
    /// use primecraft::TupletKind;
    /// use std::io::Write;
    /// use std::sync::{Arc, Mutex};
    ///
    /// #[derive(Clone, Default)]
    /// struct Shared(Arc<Mutex<Vec<u8>>>);
    ///
    /// impl Write for Shared {
    ///     fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    ///         self.0.lock().unwrap().write(buf)
    ///     }
    ///     fn flush(&mut self) -> std::io::Result<()> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let out = Shared::default();
    /// PrimeSieveBuilder::new()
    ///     .range(0, 20)
    ///     .print_to(out.clone(), TupletKind::Twins)
    ///     .build()
    ///     .unwrap()
    ///     .run()
    ///     .unwrap();
    ///
    /// let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
    /// assert_eq!(text, "(3, 5)\n(5, 7)\n(11, 13)\n(17, 19)\n");
    /// ```
    #[must_use]
    pub fn print_to<W, G>(self, writer: W, generation: G) -> Self
    where
        W: Write + Send + 'static,
        G: Into<Generation>,
    {
        self.output(ResultSink::print_to(writer), generation.into())
    }

    /// Deliver every prime to a 32-bit callback. The range must stay within
    /// `u32::MAX`.
    #[must_use]
    pub fn callback32<F: FnMut(u32) + Send + 'static>(self, callback: F) -> Self {
        self.output(ResultSink::callback32(callback), Generation::Primes)
    }

    /// Deliver every prime to a 64-bit callback.
    #[must_use]
    pub fn callback64<F: FnMut(u64) + Send + 'static>(self, callback: F) -> Self {
        self.output(ResultSink::callback64(callback), Generation::Primes)
    }

    /// Deliver every prime to a 32-bit callback together with `context`.
    #[must_use]
    pub fn callback32_with_context<F>(self, callback: F, context: Context) -> Self
    where
        F: FnMut(u32, &Context) + Send + 'static,
    {
        self.output(
            ResultSink::callback32_with_context(callback, context),
            Generation::Primes,
        )
    }

    /// Deliver every prime to a 64-bit callback together with `context`.
    #[must_use]
    pub fn callback64_with_context<F>(self, callback: F, context: Context) -> Self
    where
        F: FnMut(u64, &Context) + Send + 'static,
    {
        self.output(
            ResultSink::callback64_with_context(callback, context),
            Generation::Primes,
        )
    }

    /// Generate `generation` into an arbitrary sink.
    ///
    /// Only one output may be configured per run; a second one is reported
    /// as [`PrimeCraftError::ConflictingGeneration`] by `build`.
    #[must_use]
    pub fn output(mut self, sink: ResultSink, generation: Generation) -> Self {
        let generation = Generation::from(generation.kind());
        match &self.output {
            Some((_, existing)) => {
                if self.conflict.is_none() {
                    self.conflict = Some(PrimeCraftError::conflicting_generation(
                        existing.name(),
                        generation.name(),
                    ));
                }
            }
            None => self.output = Some((sink, generation)),
        }
        self
    }

    /// Number of worker threads. Defaults to the number of logical CPUs.
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Sieve segment size in bytes (30 numbers per byte).
    #[must_use]
    pub fn segment_bytes(mut self, bytes: usize) -> Self {
        self.segment_bytes = bytes;
        self
    }

    /// Track progress and log it at `debug` level.
    #[must_use]
    pub fn status(mut self, enabled: bool) -> Self {
        self.status = enabled;
        self
    }
}

impl PrimeSieveBuilder<Complete> {
    /// Validate the configuration and produce a runnable sieve.
    ///
    /// # Errors
    ///
    /// - [`PrimeCraftError::ConflictingGeneration`] if two outputs were set
    /// - [`PrimeCraftError::InvalidRange`] if `start > stop`
    /// - [`PrimeCraftError::StopTooLarge`] if `stop > MAX_STOP`
    /// - [`PrimeCraftError::InvalidSegmentSize`] if the segment size is out of range
    /// - [`PrimeCraftError::InvalidThreadCount`] if `threads == 0`
    /// - [`PrimeCraftError::UnsupportedGeneration`] if tuplets go to a callback
    /// - [`PrimeCraftError::CallbackOverflow`] if a 32-bit callback would
    ///   receive values above `u32::MAX`
    pub fn build(self) -> Result<PrimeSieve> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }
        validation::validate_range(self.start, self.stop)?;
        validation::validate_segment_bytes(self.segment_bytes)?;
        let threads = self.threads.unwrap_or_else(num_cpus::get);
        validation::validate_threads(threads)?;
        if let Some((sink, generation)) = &self.output {
            validation::validate_output(sink, *generation, self.stop)?;
        }

        Ok(PrimeSieve {
            start: self.start,
            stop: self.stop,
            kinds: self.kinds,
            output: self.output,
            threads,
            segment_bytes: self.segment_bytes,
            status: self.status,
        })
    }
}

impl<State> fmt::Debug for PrimeSieveBuilder<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeSieveBuilder")
            .field("start", &self.start)
            .field("stop", &self.stop)
            .field("kinds", &self.kinds)
            .field("output", &self.output)
            .field("threads", &self.threads)
            .field("segment_bytes", &self.segment_bytes)
            .field("status", &self.status)
            .finish()
    }
}
