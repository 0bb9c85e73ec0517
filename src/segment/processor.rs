//! The engine-facing entry point: one call per sieved segment.

use super::{SegmentCounter, SegmentGenerator};
use crate::core::{Counts, Segment};
use crate::engine::SegmentHandler;
use crate::sink::RecordBuffer;
use crate::sync::OrderingGate;
use std::fmt;

/// Receives the amount of numbers each processed segment covered.
///
/// Called once per segment from whichever worker processed it, so
/// implementations must be thread-safe.
pub trait ProgressHook: Send + Sync {
    /// `numbers` more numbers of the run's range have been sieved.
    fn segment_done(&self, numbers: u64);
}

/// Post-sieve processing for one worker.
///
/// Each call to [`segment_processed`](SegmentHandler::segment_processed) fans
/// out to the counter (lock free, into worker-local counts), the generator
/// (holding the shared [`OrderingGate`] for the whole segment), and finally
/// the progress hook.
///
/// With a ticket ([`in_turn`](Self::in_turn)) the generator writes into a
/// chunk-local [`RecordBuffer`] instead. The buffer is drained into the gate
/// after any segment that finds the turn already held by this chunk, and
/// once more, waiting for the turn, by [`into_counts`](Self::into_counts).
/// Sieving never waits for earlier chunks.
///
/// # Examples
///
/// ```
/// use primecraft::core::{Segment, TupletCountTable};
/// use primecraft::engine::SegmentHandler;
/// use primecraft::segment::{SegmentCounter, SegmentProcessor};
/// use primecraft::{KindSet, TupletKind};
/// use std::sync::Arc;
///
/// let kinds = KindSet::empty().with(TupletKind::Primes);
/// let counter = SegmentCounter::new(kinds, Arc::new(TupletCountTable::build(kinds)));
/// let mut processor = SegmentProcessor::new().with_counter(counter);
///
/// processor.segment_processed(&Segment::from_bytes(&[0xff, 0x01], 0));
/// assert_eq!(processor.counts()[TupletKind::Primes], 9);
/// ```
#[derive(Default)]
pub struct SegmentProcessor<'a> {
    counter: Option<SegmentCounter>,
    generator: Option<(SegmentGenerator, &'a OrderingGate)>,
    ticket: Option<u64>,
    pending: RecordBuffer,
    progress: Option<&'a dyn ProgressHook>,
    counts: Counts,
    segments: u64,
}

impl<'a> SegmentProcessor<'a> {
    /// Processor that does nothing until configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every segment with `counter`.
    #[must_use]
    pub fn with_counter(mut self, counter: SegmentCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Generate every segment with `generator`, emitting through `gate`.
    #[must_use]
    pub fn with_generator(mut self, generator: SegmentGenerator, gate: &'a OrderingGate) -> Self {
        self.generator = Some((generator, gate));
        self
    }

    /// Deliver output only on `ticket`'s turn, staging it until then.
    #[must_use]
    pub fn in_turn(mut self, ticket: u64) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Report every segment's span to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressHook) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Counts accumulated so far by this processor.
    #[must_use]
    pub const fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Number of segments processed so far.
    #[must_use]
    pub const fn segments(&self) -> u64 {
        self.segments
    }

    /// Number of generated records staged for a later turn.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.records()
    }

    /// Consume the processor, returning its accumulated counts.
    ///
    /// Staged output is delivered first; with a ticket this blocks until the
    /// ticket's turn.
    #[must_use]
    pub fn into_counts(mut self) -> Counts {
        if let (Some((_, gate)), Some(ticket)) = (self.generator, self.ticket) {
            if !self.pending.is_empty() {
                self.pending.drain_into(&mut *gate.lock_in_turn(ticket));
            }
        }
        self.counts
    }
}

impl SegmentHandler for SegmentProcessor<'_> {
    fn segment_processed(&mut self, segment: &Segment<'_>) {
        if let Some(counter) = &self.counter {
            self.counts += counter.count(segment);
        }
        if let Some((generator, gate)) = &self.generator {
            match self.ticket {
                Some(ticket) => {
                    generator.generate(segment, &mut self.pending);
                    if let Some(mut emitter) = gate.try_lock_in_turn(ticket) {
                        self.pending.drain_into(&mut *emitter);
                    }
                }
                None => generator.generate(segment, &mut *gate.lock()),
            }
        }
        if let Some(progress) = self.progress {
            progress.segment_done(segment.span());
        }
        self.segments += 1;
        tracing::trace!(low = segment.low(), bytes = segment.len(), "segment processed");
    }
}

impl fmt::Debug for SegmentProcessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentProcessor")
            .field("counter", &self.counter)
            .field("generator", &self.generator.as_ref().map(|(g, _)| g))
            .field("ticket", &self.ticket)
            .field("pending", &self.pending.records())
            .field("counts", &self.counts)
            .field("segments", &self.segments)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KindSet, TupletCountTable, TupletKind};
    use crate::segment::Generation;
    use crate::sink::PrintEmitter;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Progress(AtomicU64);

    impl ProgressHook for Progress {
        fn segment_done(&self, numbers: u64) {
            self.0.fetch_add(numbers, Ordering::Relaxed);
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn counter(kinds: KindSet) -> SegmentCounter {
        SegmentCounter::new(kinds, Arc::new(TupletCountTable::build(kinds)))
    }

    #[test]
    fn test_count_generate_and_progress() {
        let buffer = SharedBuffer::default();
        let gate = OrderingGate::new(Box::new(PrintEmitter::new(buffer.clone())));
        let progress = Progress::default();
        let kinds = KindSet::empty().with(TupletKind::Twins);

        let mut processor = SegmentProcessor::new()
            .with_counter(counter(kinds))
            .with_generator(SegmentGenerator::new(Generation::Tuplets(TupletKind::Twins)), &gate)
            .with_progress(&progress);

        let mut bytes = vec![0u8; 16];
        bytes[0] = 0x06;
        processor.segment_processed(&Segment::from_bytes(&bytes, 0));

        assert_eq!(processor.counts()[TupletKind::Twins], 1);
        assert_eq!(processor.segments(), 1);
        assert_eq!(progress.0.load(Ordering::Relaxed), 16 * 30);

        drop(processor);
        gate.into_emitter().finish().unwrap();
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "(11, 13)\n");
    }

    #[test]
    fn test_later_chunk_sieves_while_earlier_holds_turn() {
        use crate::engine::{sieving_primes, SegmentedSieve};
        use crate::util::isqrt;

        let (start, stop) = (1_000_000_007u64, 1_000_200_000u64);
        let buffer = SharedBuffer::default();
        let gate = OrderingGate::new(Box::new(PrintEmitter::new(buffer.clone())));
        let primes = sieving_primes(isqrt(stop));

        let earlier = gate.turn(0);
        let mut processor = SegmentProcessor::new()
            .with_generator(SegmentGenerator::new(Generation::Primes), &gate)
            .in_turn(1);
        SegmentedSieve::new(start, stop, 1024, &primes).sieve(&mut processor);

        // Every segment was sieved and staged without waiting for turn 0.
        assert!(processor.segments() > 1);
        assert!(processor.pending() > 0);
        assert!(buffer.0.lock().unwrap().is_empty());

        drop(earlier);
        let _ = processor.into_counts();
        gate.into_emitter().finish().unwrap();

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let printed: Vec<u64> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(printed, crate::run::generate_primes(start, stop).unwrap());
    }

    #[test]
    fn test_in_turn_chunk_streams_without_staging() {
        let buffer = SharedBuffer::default();
        let gate = OrderingGate::new(Box::new(PrintEmitter::new(buffer.clone())));
        let mut processor = SegmentProcessor::new()
            .with_generator(SegmentGenerator::new(Generation::Primes), &gate)
            .in_turn(0);

        processor.segment_processed(&Segment::from_bytes(&[0x03], 0));
        assert_eq!(processor.pending(), 0);

        let _ = processor.into_counts();
        gate.into_emitter().finish().unwrap();
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "7\n11\n");
    }

    #[test]
    fn test_empty_segment() {
        let gate = OrderingGate::new(Box::new(PrintEmitter::new(Vec::new())));
        let mut processor = SegmentProcessor::new()
            .with_counter(counter(KindSet::all()))
            .with_generator(SegmentGenerator::new(Generation::Primes), &gate);
        processor.segment_processed(&Segment::from_bytes(&[], 0));
        assert!(processor.counts().is_zero());
    }

    #[test]
    fn test_repeated_segments_accumulate() {
        let mut processor = SegmentProcessor::new().with_counter(counter(KindSet::all()));
        let bytes = [0xffu8; 3];
        for _ in 0..4 {
            processor.segment_processed(&Segment::from_bytes(&bytes, 0));
        }
        let counts = processor.into_counts();
        assert_eq!(counts[TupletKind::Primes], 4 * 24);
        assert_eq!(counts[TupletKind::Twins], 4 * 9);
        assert_eq!(counts[TupletKind::Septuplets], 4 * 3);
    }
}
