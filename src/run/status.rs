//! Progress tracking for long runs.

use crate::segment::ProgressHook;
use crate::sync::CacheLinePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts sieved numbers and logs each new whole percent at `debug` level.
///
/// # Examples
///
/// ```
/// use primecraft::run::Status;
/// use primecraft::segment::ProgressHook;
///
/// let status = Status::new(1_000);
/// status.segment_done(250);
/// assert_eq!(status.processed(), 250);
/// assert!((status.percent() - 25.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct Status {
    total: u64,
    processed: CacheLinePadded<AtomicU64>,
    logged_percent: CacheLinePadded<AtomicU64>,
}

impl Status {
    /// Tracker for a run covering `total` numbers.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            total,
            processed: CacheLinePadded::new(AtomicU64::new(0)),
            logged_percent: CacheLinePadded::new(AtomicU64::new(0)),
        }
    }

    /// Numbers the tracker expects in total.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Numbers processed so far.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.processed.load()
    }

    /// Completed share of the run, in `[0, 100]`.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        let processed = self.processed().min(self.total);
        processed as f64 * 100.0 / self.total as f64
    }
}

impl ProgressHook for Status {
    fn segment_done(&self, numbers: u64) {
        let processed = self.processed.fetch_add(numbers) + numbers;
        if self.total == 0 {
            return;
        }
        let percent = (u128::from(processed.min(self.total)) * 100 / u128::from(self.total)) as u64;
        let previous = self.logged_percent.get().fetch_max(percent, Ordering::AcqRel);
        if percent > previous {
            tracing::debug!(percent, processed, total = self.total, "sieving progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_percent() {
        let status = Status::new(300);
        assert_eq!(status.percent(), 0.0);
        status.segment_done(150);
        assert!((status.percent() - 50.0).abs() < 1e-9);
        status.segment_done(300);
        assert_eq!(status.percent(), 100.0);
        assert_eq!(status.processed(), 450);
    }

    #[test]
    fn test_empty_run_is_complete() {
        let status = Status::new(0);
        status.segment_done(0);
        assert_eq!(status.percent(), 100.0);
    }

    #[test]
    fn test_concurrent_updates() {
        let status = Arc::new(Status::new(8 * 1_000 * 30));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let status = Arc::clone(&status);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        status.segment_done(30);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(status.processed(), status.total());
        assert_eq!(status.percent(), 100.0);
    }
}
