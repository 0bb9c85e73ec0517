//! Serialization of generated output across concurrent workers.
//!
//! Counting needs no coordination, but generated values must reach the sink
//! in ascending order and a tuplet record must never be split by another
//! worker's output. The [`OrderingGate`] owns the run's emitter behind a
//! mutex: a worker holds the gate for the whole emission of one segment.
//!
//! Mutual exclusion alone keeps records intact. Ascending order additionally
//! requires that segments enter the gate in ascending order; the parallel
//! driver gets that by numbering its chunks and entering with
//! [`OrderingGate::lock_in_turn`], which waits until every lower-numbered
//! chunk has finished. Workers that are not yet next in line poll with
//! [`OrderingGate::try_lock_in_turn`] and keep sieving while they wait.

use crate::sink::Emit;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};

struct GateState {
    emitter: Box<dyn Emit>,
    turn: u64,
}

/// Mutex-guarded emitter shared by every worker of a run.
///
/// # Examples
///
/// ```
/// use primecraft::sink::ResultSink;
/// use primecraft::sync::OrderingGate;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = {
///     let seen = Arc::clone(&seen);
///     ResultSink::callback64(move |p| seen.lock().unwrap().push(p))
/// };
///
/// let gate = OrderingGate::new(sink.into_emitter());
/// {
///     let mut emitter = gate.lock();
///     emitter.value(7);
///     emitter.value(11);
/// }
/// gate.into_emitter().finish().unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![7, 11]);
/// ```
pub struct OrderingGate {
    state: Mutex<GateState>,
    turn_changed: Condvar,
}

impl OrderingGate {
    /// Gate around `emitter`. The first turn is 0.
    #[must_use]
    pub fn new(emitter: Box<dyn Emit>) -> Self {
        Self {
            state: Mutex::new(GateState { emitter, turn: 0 }),
            turn_changed: Condvar::new(),
        }
    }

    /// Block until the gate is free and hold it until the guard drops.
    pub fn lock(&self) -> GateGuard<'_> {
        GateGuard {
            guard: self.state.lock(),
        }
    }

    /// Like [`lock`](Self::lock), but additionally wait until it is
    /// `ticket`'s turn.
    pub fn lock_in_turn(&self, ticket: u64) -> GateGuard<'_> {
        let mut guard = self.state.lock();
        while guard.turn != ticket {
            self.turn_changed.wait(&mut guard);
        }
        GateGuard { guard }
    }

    /// Non-blocking [`lock_in_turn`](Self::lock_in_turn): `None` unless the
    /// gate is free right now and it is already `ticket`'s turn.
    pub fn try_lock_in_turn(&self, ticket: u64) -> Option<GateGuard<'_>> {
        let guard = self.state.try_lock()?;
        (guard.turn == ticket).then_some(GateGuard { guard })
    }

    /// Reserve turn `ticket`; dropping the returned [`Turn`] passes the turn
    /// to `ticket + 1`.
    #[must_use]
    pub fn turn(&self, ticket: u64) -> Turn<'_> {
        Turn { gate: self, ticket }
    }

    /// Ticket whose turn it currently is.
    #[must_use]
    pub fn current_turn(&self) -> u64 {
        self.state.lock().turn
    }

    /// Wait for `ticket`'s turn, then hand the turn to `ticket + 1`.
    fn advance(&self, ticket: u64) {
        let mut guard = self.state.lock();
        while guard.turn != ticket {
            self.turn_changed.wait(&mut guard);
        }
        guard.turn = ticket + 1;
        drop(guard);
        self.turn_changed.notify_all();
    }

    /// Take the emitter back once every worker is done.
    #[must_use]
    pub fn into_emitter(self) -> Box<dyn Emit> {
        self.state.into_inner().emitter
    }
}

impl fmt::Debug for OrderingGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderingGate").finish_non_exhaustive()
    }
}

/// Exclusive access to the run's emitter.
pub struct GateGuard<'a> {
    guard: MutexGuard<'a, GateState>,
}

impl Deref for GateGuard<'_> {
    type Target = dyn Emit;

    fn deref(&self) -> &Self::Target {
        self.guard.emitter.as_ref()
    }
}

impl DerefMut for GateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.emitter.as_mut()
    }
}

/// A chunk's place in the output order.
///
/// Dropping it, including during unwinding, hands the turn to the next chunk
/// so that a failed worker cannot stall the others forever.
pub struct Turn<'a> {
    gate: &'a OrderingGate,
    ticket: u64,
}

impl Turn<'_> {
    /// The ticket this turn stands for.
    #[must_use]
    pub const fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        self.gate.advance(self.ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct Shared {
        values: Arc<parking_lot::Mutex<Vec<u64>>>,
    }

    impl Emit for Shared {
        fn value(&mut self, value: u64) {
            self.values.lock().push(value);
        }

        fn describe(&self) -> &'static str {
            "shared"
        }
    }

    #[test]
    fn test_turns_are_taken_in_order() {
        let values = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let gate = OrderingGate::new(Box::new(Shared {
            values: Arc::clone(&values),
        }));

        thread::scope(|s| {
            // Later chunks start first and must still wait for earlier ones.
            for ticket in (0..4u64).rev() {
                let gate = &gate;
                s.spawn(move || {
                    let _turn = gate.turn(ticket);
                    for segment in 0..3u64 {
                        let mut emitter = gate.lock_in_turn(ticket);
                        for v in 0..5u64 {
                            emitter.value(ticket * 100 + segment * 10 + v);
                        }
                        drop(emitter);
                        thread::sleep(Duration::from_millis(1));
                    }
                });
            }
        });

        let values = values.lock().clone();
        assert_eq!(values.len(), 4 * 3 * 5);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(gate.current_turn(), 4);
    }

    #[test]
    fn test_turn_advances_without_output() {
        let gate = OrderingGate::new(Box::new(crate::sink::NullEmitter));
        drop(gate.turn(0));
        drop(gate.turn(1));
        assert_eq!(gate.current_turn(), 2);
    }

    #[test]
    fn test_try_lock_in_turn() {
        let gate = OrderingGate::new(Box::new(crate::sink::NullEmitter));
        assert!(gate.try_lock_in_turn(1).is_none());
        {
            let _held = gate.lock();
            assert!(gate.try_lock_in_turn(0).is_none());
        }
        assert!(gate.try_lock_in_turn(0).is_some());

        drop(gate.turn(0));
        assert!(gate.try_lock_in_turn(0).is_none());
        assert!(gate.try_lock_in_turn(1).is_some());
    }

    #[test]
    fn test_plain_lock_excludes() {
        let values = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let gate = OrderingGate::new(Box::new(Shared {
            values: Arc::clone(&values),
        }));

        thread::scope(|s| {
            for t in 0..4u64 {
                let gate = &gate;
                s.spawn(move || {
                    let mut emitter = gate.lock();
                    for v in 0..100u64 {
                        emitter.value(t * 1_000 + v);
                    }
                });
            }
        });

        // Each worker's block of 100 values arrives contiguously.
        let values = values.lock().clone();
        for block in values.chunks(100) {
            let owner = block[0] / 1_000;
            assert!(block.iter().all(|v| v / 1_000 == owner));
        }
    }
}
