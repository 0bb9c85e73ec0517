//! Chunk-local staging of generated records.

use super::Emit;

/// Records generated ahead of their turn, replayed later in the same order.
///
/// A parallel worker whose chunk is not yet next in line keeps sieving and
/// stages its output here instead of waiting on the gate.
///
/// # Examples
///
/// ```
/// use primecraft::sink::{Emit, PrintEmitter, RecordBuffer};
///
/// let mut buffer = RecordBuffer::new();
/// buffer.value(7);
/// buffer.group(&[11, 13]);
/// assert_eq!(buffer.records(), 2);
///
/// let mut out = PrintEmitter::new(Vec::new());
/// buffer.drain_into(&mut out);
/// assert!(buffer.is_empty());
/// assert_eq!(out.into_inner().unwrap(), b"7\n(11, 13)\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordBuffer {
    values: Vec<u64>,
    // Members per record; 0 marks a plain value.
    lens: Vec<u8>,
}

impl RecordBuffer {
    /// Empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lens.is_empty()
    }

    /// Number of staged records (values or groups).
    #[must_use]
    pub fn records(&self) -> usize {
        self.lens.len()
    }

    /// Deliver every staged record to `emitter`, in staging order, and clear
    /// the buffer. Capacity is kept for the next segment.
    pub fn drain_into(&mut self, emitter: &mut dyn Emit) {
        let mut begin = 0;
        for &len in &self.lens {
            if len == 0 {
                emitter.value(self.values[begin]);
                begin += 1;
            } else {
                let end = begin + usize::from(len);
                emitter.group(&self.values[begin..end]);
                begin = end;
            }
        }
        self.values.clear();
        self.lens.clear();
    }
}

impl Emit for RecordBuffer {
    fn value(&mut self, value: u64) {
        self.values.push(value);
        self.lens.push(0);
    }

    fn group(&mut self, values: &[u64]) {
        debug_assert!(!values.is_empty() && values.len() <= usize::from(u8::MAX));
        self.values.extend_from_slice(values);
        self.lens.push(values.len() as u8);
    }

    fn describe(&self) -> &'static str {
        "record buffer"
    }
}
