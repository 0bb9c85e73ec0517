//! Closure-backed sinks.
//!
//! The 32-bit variants narrow each value with `as u32`. Runs using them are
//! rejected at build time when `stop > u32::MAX`, so narrowing never drops
//! bits; debug builds assert it anyway.

use super::{Callback32, Callback64, Context, ContextCallback32, ContextCallback64, Emit};

#[inline]
fn narrow(value: u64) -> u32 {
    debug_assert!(value <= u64::from(u32::MAX), "{value} exceeds the 32-bit callback domain");
    value as u32
}

/// Calls a closure with every prime as `u32`.
pub struct Callback32Emitter {
    callback: Callback32,
}

impl Callback32Emitter {
    /// Wrap `callback`.
    #[must_use]
    pub fn new(callback: Callback32) -> Self {
        Self { callback }
    }
}

impl Emit for Callback32Emitter {
    #[inline]
    fn value(&mut self, value: u64) {
        (self.callback)(narrow(value));
    }

    fn describe(&self) -> &'static str {
        "32-bit callback"
    }
}

/// Calls a closure with every prime as `u64`.
pub struct Callback64Emitter {
    callback: Callback64,
}

impl Callback64Emitter {
    /// Wrap `callback`.
    #[must_use]
    pub fn new(callback: Callback64) -> Self {
        Self { callback }
    }
}

impl Emit for Callback64Emitter {
    #[inline]
    fn value(&mut self, value: u64) {
        (self.callback)(value);
    }

    fn describe(&self) -> &'static str {
        "64-bit callback"
    }
}

/// Calls a closure with every prime as `u32` and the run's context.
pub struct ContextCallback32Emitter {
    callback: ContextCallback32,
    context: Context,
}

impl ContextCallback32Emitter {
    /// Wrap `callback`; `context` is handed to every call unmodified.
    #[must_use]
    pub fn new(callback: ContextCallback32, context: Context) -> Self {
        Self { callback, context }
    }
}

impl Emit for ContextCallback32Emitter {
    #[inline]
    fn value(&mut self, value: u64) {
        (self.callback)(narrow(value), &self.context);
    }

    fn describe(&self) -> &'static str {
        "32-bit context callback"
    }
}

/// Calls a closure with every prime as `u64` and the run's context.
pub struct ContextCallback64Emitter {
    callback: ContextCallback64,
    context: Context,
}

impl ContextCallback64Emitter {
    /// Wrap `callback`; `context` is handed to every call unmodified.
    #[must_use]
    pub fn new(callback: ContextCallback64, context: Context) -> Self {
        Self { callback, context }
    }
}

impl Emit for ContextCallback64Emitter {
    #[inline]
    fn value(&mut self, value: u64) {
        (self.callback)(value, &self.context);
    }

    fn describe(&self) -> &'static str {
        "64-bit context callback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_callback32_receives_narrowed_values() {
        let sum = Arc::new(AtomicU64::new(0));
        let mut emitter = {
            let sum = Arc::clone(&sum);
            Callback32Emitter::new(Box::new(move |p: u32| {
                sum.fetch_add(u64::from(p), Ordering::Relaxed);
            }))
        };
        emitter.value(7);
        emitter.value(u64::from(u32::MAX));
        assert_eq!(sum.load(Ordering::Relaxed), 7 + u64::from(u32::MAX));
    }

    #[test]
    fn test_callback64_receives_full_width() {
        let last = Arc::new(AtomicU64::new(0));
        let mut emitter = {
            let last = Arc::clone(&last);
            Callback64Emitter::new(Box::new(move |p| last.store(p, Ordering::Relaxed)))
        };
        emitter.value(18_446_744_030_759_878_681);
        assert_eq!(last.load(Ordering::Relaxed), 18_446_744_030_759_878_681);
    }

    #[test]
    fn test_context_callback64() {
        let ctx: Context = Arc::new(AtomicU64::new(0));
        let mut emitter = ContextCallback64Emitter::new(
            Box::new(|p, ctx: &Context| {
                ctx.downcast_ref::<AtomicU64>().unwrap().fetch_add(p, Ordering::Relaxed);
            }),
            Arc::clone(&ctx),
        );
        emitter.value(11);
        emitter.value(13);
        assert_eq!(ctx.downcast_ref::<AtomicU64>().unwrap().load(Ordering::Relaxed), 24);
    }
}
