//! Destinations for generated primes and prime k-tuplets.
//!
//! A run has exactly one [`ResultSink`]. It is resolved once, before sieving
//! starts, into a boxed [`Emit`] implementation; from then on every value goes
//! through the same `Emit::value` call without re-inspecting the sink kind.
//!
//! # Text Format
//!
//! The print sink writes one record per line:
//!
//! ```text
//! 11
//! 13
//! (11, 13)
//! (17, 19)
//! ```
//!
//! Single values are plain decimal integers; tuplets are parenthesized,
//! comma-separated and ascending.

#![allow(clippy::module_name_repetitions)]

mod buffer;
mod callback;
mod print;

pub use buffer::RecordBuffer;
pub use callback::{Callback32Emitter, Callback64Emitter, ContextCallback32Emitter, ContextCallback64Emitter};
pub use print::PrintEmitter;

use crate::error::Result;
use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Opaque handle passed back unmodified to context-carrying callbacks.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Receiver of generated values.
///
/// Implementations are driven by [`SegmentGenerator`](crate::segment::SegmentGenerator)
/// while the [`OrderingGate`](crate::sync::OrderingGate) is held, so calls for
/// different segments never overlap.
pub trait Emit: Send {
    /// Deliver one prime.
    fn value(&mut self, value: u64);

    /// Deliver one k-tuplet, values ascending.
    ///
    /// The default delivers each member through [`Emit::value`].
    fn group(&mut self, values: &[u64]) {
        for &value in values {
            self.value(value);
        }
    }

    /// Flush buffered output and report the first delivery error, if any.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Short description used in logs.
    fn describe(&self) -> &'static str;
}

/// Boxed closure receiving a 32-bit prime.
pub type Callback32 = Box<dyn FnMut(u32) + Send>;
/// Boxed closure receiving a 64-bit prime.
pub type Callback64 = Box<dyn FnMut(u64) + Send>;
/// Boxed closure receiving a 32-bit prime and the run's context.
pub type ContextCallback32 = Box<dyn FnMut(u32, &Context) + Send>;
/// Boxed closure receiving a 64-bit prime and the run's context.
pub type ContextCallback64 = Box<dyn FnMut(u64, &Context) + Send>;

/// Where a run delivers generated values.
///
/// # Examples
///
/// ```
/// use primecraft::sink::{Emit, ResultSink};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = {
///     let seen = Arc::clone(&seen);
///     ResultSink::callback64(move |p| seen.lock().unwrap().push(p))
/// };
///
/// let mut emitter = sink.into_emitter();
/// emitter.value(7);
/// emitter.value(11);
/// emitter.finish().unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![7, 11]);
/// ```
pub enum ResultSink {
    /// Text output, one record per line.
    Print(Box<dyn Write + Send>),
    /// Closure taking 32-bit primes. The run must not exceed `u32::MAX`.
    Callback32(Callback32),
    /// Closure taking 64-bit primes.
    Callback64(Callback64),
    /// Closure taking 32-bit primes plus an opaque context.
    Callback32WithContext {
        /// Receiver.
        callback: ContextCallback32,
        /// Handle passed to every call.
        context: Context,
    },
    /// Closure taking 64-bit primes plus an opaque context.
    Callback64WithContext {
        /// Receiver.
        callback: ContextCallback64,
        /// Handle passed to every call.
        context: Context,
    },
}

impl ResultSink {
    /// Print to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::Print(Box::new(io::stdout()))
    }

    /// Print to any writer.
    pub fn print_to<W: Write + Send + 'static>(writer: W) -> Self {
        Self::Print(Box::new(writer))
    }

    /// Deliver primes to a 32-bit closure.
    pub fn callback32<F: FnMut(u32) + Send + 'static>(callback: F) -> Self {
        Self::Callback32(Box::new(callback))
    }

    /// Deliver primes to a 64-bit closure.
    pub fn callback64<F: FnMut(u64) + Send + 'static>(callback: F) -> Self {
        Self::Callback64(Box::new(callback))
    }

    /// Deliver primes to a 32-bit closure together with `context`.
    pub fn callback32_with_context<F>(callback: F, context: Context) -> Self
    where
        F: FnMut(u32, &Context) + Send + 'static,
    {
        Self::Callback32WithContext {
            callback: Box::new(callback),
            context,
        }
    }

    /// Deliver primes to a 64-bit closure together with `context`.
    pub fn callback64_with_context<F>(callback: F, context: Context) -> Self
    where
        F: FnMut(u64, &Context) + Send + 'static,
    {
        Self::Callback64WithContext {
            callback: Box::new(callback),
            context,
        }
    }

    /// Sink kind, as used in logs and configuration errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Print(_) => "print",
            Self::Callback32(_) => "32-bit callback",
            Self::Callback64(_) => "64-bit callback",
            Self::Callback32WithContext { .. } => "32-bit context callback",
            Self::Callback64WithContext { .. } => "64-bit context callback",
        }
    }

    /// Whether this sink writes text.
    #[must_use]
    pub const fn is_print(&self) -> bool {
        matches!(self, Self::Print(_))
    }

    /// Largest value the sink can receive.
    #[must_use]
    pub const fn max_value(&self) -> u64 {
        match self {
            Self::Callback32(_) | Self::Callback32WithContext { .. } => u32::MAX as u64,
            _ => u64::MAX,
        }
    }

    /// Resolve the sink into its emitter. This is the only place the sink
    /// kind is inspected.
    #[must_use]
    pub fn into_emitter(self) -> Box<dyn Emit> {
        match self {
            Self::Print(writer) => Box::new(PrintEmitter::new(writer)),
            Self::Callback32(callback) => Box::new(Callback32Emitter::new(callback)),
            Self::Callback64(callback) => Box::new(Callback64Emitter::new(callback)),
            Self::Callback32WithContext { callback, context } => {
                Box::new(ContextCallback32Emitter::new(callback, context))
            }
            Self::Callback64WithContext { callback, context } => {
                Box::new(ContextCallback64Emitter::new(callback, context))
            }
        }
    }
}

impl fmt::Debug for ResultSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultSink").field(&self.name()).finish()
    }
}

/// Emitter that discards everything. Used when a run generates nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl Emit for NullEmitter {
    fn value(&mut self, _value: u64) {}

    fn group(&mut self, _values: &[u64]) {}

    fn describe(&self) -> &'static str {
        "null"
    }
}
