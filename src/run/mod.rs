//! Running a configured sieve.
//!
//! [`PrimeSieve::run`] ties the crate together:
//!
//! 1. Resolve the sink into an emitter behind an [`OrderingGate`]
//! 2. Count and emit the records below 7 from a fixed table
//! 3. Sieve the range with [`SegmentedSieve`], one [`SegmentProcessor`] per
//!    worker, either on the calling thread or split into byte-aligned chunks
//! 4. Merge counts, flush the emitter, and report a [`Summary`]
//!
//! # Parallel Runs
//!
//! ```text
//! [start ........ | 30k+7 ........ | 30m+7 ........ stop]
//!     chunk 0          chunk 1          chunk 2
//! ```
//!
//! Chunk boundaries fall between sieve bytes, so no k-tuplet is ever split
//! between two workers. Workers claim chunks in ascending order. When
//! generating, a chunk that is not next in line keeps sieving and stages its
//! records locally; they reach the sink only on the chunk's turn, so output
//! is identical to a sequential run.

mod small;
mod status;

pub use status::Status;

use crate::core::wheel::{segment_low_for, FIRST_WHEEL_VALUE, NUMBERS_PER_BYTE};
use crate::core::{Counts, KindSet, TupletCountTable, TupletKind};
use crate::engine::{sieving_primes, SegmentedSieve};
use crate::error::{PrimeCraftError, Result};
use crate::segment::{Generation, ProgressHook, SegmentCounter, SegmentGenerator, SegmentProcessor};
use crate::sink::{Emit, NullEmitter, ResultSink};
use crate::sync::{AtomicCounts, OrderingGate};
use crate::util::isqrt;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Chunks handed out per worker thread, for load balancing.
const CHUNKS_PER_THREAD: u64 = 4;

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Counts for every requested kind; unrequested kinds stay zero.
    pub counts: Counts,
    /// Wall-clock duration of the run.
    pub seconds: f64,
}

/// A validated, ready-to-run sieve. Built by
/// [`PrimeSieveBuilder`](crate::builder::PrimeSieveBuilder).
#[derive(Debug)]
pub struct PrimeSieve {
    pub(crate) start: u64,
    pub(crate) stop: u64,
    pub(crate) kinds: KindSet,
    pub(crate) output: Option<(ResultSink, Generation)>,
    pub(crate) threads: usize,
    pub(crate) segment_bytes: usize,
    pub(crate) status: bool,
}

/// Per-worker processing setup shared by every chunk of a run.
struct Job {
    counter: Option<SegmentCounter>,
    generator: Option<SegmentGenerator>,
}

impl Job {
    fn processor<'a>(
        &self,
        gate: &'a OrderingGate,
        progress: Option<&'a dyn ProgressHook>,
    ) -> SegmentProcessor<'a> {
        let mut processor = SegmentProcessor::new();
        if let Some(counter) = &self.counter {
            processor = processor.with_counter(counter.clone());
        }
        if let Some(generator) = self.generator {
            processor = processor.with_generator(generator, gate);
        }
        if let Some(progress) = progress {
            processor = processor.with_progress(progress);
        }
        processor
    }
}

impl PrimeSieve {
    /// Lower bound of the range.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Upper bound of the range (inclusive).
    #[must_use]
    pub const fn stop(&self) -> u64 {
        self.stop
    }

    /// Kinds this run counts.
    #[must_use]
    pub const fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// Worker threads this run may use.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Segment size in bytes.
    #[must_use]
    pub const fn segment_bytes(&self) -> usize {
        self.segment_bytes
    }

    /// Sieve the range, counting and generating as configured.
    ///
    /// # Errors
    ///
    /// - [`PrimeCraftError::Output`] if the print sink failed to write
    /// - [`PrimeCraftError::WorkerPanicked`] if a worker thread panicked
    pub fn run(self) -> Result<Summary> {
        let timer = Instant::now();
        let Self {
            start,
            stop,
            kinds,
            output,
            threads,
            segment_bytes,
            status,
        } = self;

        let (emitter, generation) = match output {
            Some((sink, generation)) => (sink.into_emitter(), Some(generation)),
            None => (Box::new(NullEmitter) as Box<dyn Emit>, None),
        };
        tracing::info!(
            start,
            stop,
            threads,
            segment_bytes,
            sink = emitter.describe(),
            "starting sieve run"
        );
        let gate = OrderingGate::new(emitter);

        let mut counts = small::count(start, stop, kinds);
        if let Some(generation) = generation {
            small::generate(start, stop, generation, &mut *gate.lock());
        }

        let job = Job {
            counter: (!kinds.is_empty())
                .then(|| SegmentCounter::new(kinds, Arc::new(TupletCountTable::build(kinds)))),
            generator: generation.map(SegmentGenerator::new),
        };

        if job.counter.is_some() || job.generator.is_some() || status {
            let primes = sieving_primes(isqrt(stop));
            let total_bytes = SegmentedSieve::new(start, stop, segment_bytes, &primes).total_bytes();
            let tracker = status.then(|| Status::new(total_bytes * NUMBERS_PER_BYTE));
            let progress = tracker.as_ref().map(|s| s as &dyn ProgressHook);

            let chunk_bytes = total_bytes
                .div_ceil(threads as u64 * CHUNKS_PER_THREAD)
                .max(segment_bytes as u64);
            counts += if threads > 1 && total_bytes > chunk_bytes {
                let plan = ChunkPlan {
                    start,
                    stop,
                    low: segment_low_for(start),
                    chunk_bytes,
                    chunks: total_bytes.div_ceil(chunk_bytes),
                    segment_bytes,
                };
                run_parallel(&plan, threads, &job, &gate, &primes, progress)?
            } else {
                let mut processor = job.processor(&gate, progress);
                SegmentedSieve::new(start, stop, segment_bytes, &primes).sieve(&mut processor);
                tracing::debug!(segments = processor.segments(), "sequential sieve finished");
                processor.into_counts()
            };
        } else {
            tracing::debug!("nothing requested, skipping sieve");
        }

        gate.into_emitter().finish()?;
        let seconds = timer.elapsed().as_secs_f64();
        tracing::info!(seconds, counts = %counts, "sieve run finished");
        Ok(Summary { counts, seconds })
    }
}

/// Byte-aligned split of a run's range.
struct ChunkPlan {
    start: u64,
    stop: u64,
    low: u64,
    chunk_bytes: u64,
    chunks: u64,
    segment_bytes: usize,
}

impl ChunkPlan {
    /// Inclusive bounds of `chunk`. Inner boundaries sit at `30k + 7`.
    fn bounds(&self, chunk: u64) -> (u64, u64) {
        let span = self.chunk_bytes * NUMBERS_PER_BYTE;
        let first = if chunk == 0 {
            self.start
        } else {
            self.low + chunk * span + FIRST_WHEEL_VALUE
        };
        let last = if chunk + 1 == self.chunks {
            self.stop
        } else {
            self.low + (chunk + 1) * span + FIRST_WHEEL_VALUE - 1
        };
        (first, last)
    }
}

fn run_parallel(
    plan: &ChunkPlan,
    threads: usize,
    job: &Job,
    gate: &OrderingGate,
    primes: &[u32],
    progress: Option<&dyn ProgressHook>,
) -> Result<Counts> {
    let workers = threads.min(usize::try_from(plan.chunks).unwrap_or(usize::MAX));
    let ordered = job.generator.is_some();
    let next_chunk = AtomicU64::new(0);
    let shared = AtomicCounts::new();
    tracing::debug!(
        workers,
        chunks = plan.chunks,
        chunk_bytes = plan.chunk_bytes,
        "starting parallel sieve"
    );

    let (next_chunk, shared) = (&next_chunk, &shared);
    let panicked = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(move || -> Option<u64> {
                    loop {
                        let chunk = next_chunk.fetch_add(1, Ordering::Relaxed);
                        if chunk >= plan.chunks {
                            return None;
                        }
                        let turn = ordered.then(|| gate.turn(chunk));
                        let (first, last) = plan.bounds(chunk);

                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            let mut processor = job.processor(gate, progress);
                            if ordered {
                                processor = processor.in_turn(chunk);
                            }
                            SegmentedSieve::new(first, last, plan.segment_bytes, primes)
                                .sieve(&mut processor);
                            processor.into_counts()
                        }));
                        drop(turn);

                        match outcome {
                            Ok(counts) => {
                                shared.add_counts(&counts);
                                tracing::debug!(chunk, first, last, "chunk finished");
                            }
                            Err(_) => return Some(chunk),
                        }
                    }
                })
            })
            .collect();

        let mut panicked = None;
        for handle in handles {
            match handle.join() {
                Ok(Some(chunk)) => {
                    panicked = Some(panicked.map_or(chunk, |c: u64| c.min(chunk)));
                }
                Ok(None) => {}
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        panicked
    });

    if let Some(chunk) = panicked {
        tracing::warn!(chunk, "worker panicked");
        return Err(PrimeCraftError::worker_panicked(chunk as usize));
    }
    Ok(shared.snapshot())
}

/// Count the primes in `[start, stop]`.
///
/// # Errors
///
/// Returns error if the range is invalid.
///
/// # Examples
///
/// ```
/// assert_eq!(primecraft::count_primes(0, 100).unwrap(), 25);
/// assert_eq!(primecraft::count_primes(100, 200).unwrap(), 21);
/// ```
pub fn count_primes(start: u64, stop: u64) -> Result<u64> {
    count_tuplets(TupletKind::Primes, start, stop)
}

/// Count the k-tuplets of `kind` lying entirely in `[start, stop]`.
///
/// # Errors
///
/// Returns error if the range is invalid.
///
/// # Examples
///
/// ```
/// use primecraft::TupletKind;
///
/// assert_eq!(primecraft::count_tuplets(TupletKind::Twins, 0, 1_000).unwrap(), 35);
/// ```
pub fn count_tuplets(kind: TupletKind, start: u64, stop: u64) -> Result<u64> {
    let summary = crate::builder::PrimeSieveBuilder::new()
        .range(start, stop)
        .count(kind)
        .build()?
        .run()?;
    Ok(summary.counts[kind])
}

/// Collect the primes in `[start, stop]`, ascending.
///
/// # Errors
///
/// Returns error if the range is invalid.
///
/// # Examples
///
/// ```
/// assert_eq!(primecraft::generate_primes(0, 20).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19]);
/// ```
pub fn generate_primes(start: u64, stop: u64) -> Result<Vec<u64>> {
    let primes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&primes);
    crate::builder::PrimeSieveBuilder::new()
        .range(start, stop)
        .callback64(move |p| sink.lock().push(p))
        .build()?
        .run()?;
    let primes = std::mem::take(&mut *primes.lock());
    Ok(primes)
}
