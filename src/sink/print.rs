//! Text output sink.

use super::Emit;
use crate::error::{PrimeCraftError, Result};
use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};

/// Writes primes and tuplets as text through a buffered writer.
///
/// The first write error is latched: nothing more is written after it, and
/// the error is returned by [`Emit::finish`] (or [`PrintEmitter::into_inner`]).
/// Segment processing therefore never has to handle I/O failures.
///
/// # Examples
///
/// ```
/// use primecraft::sink::{Emit, PrintEmitter};
///
/// let mut out = PrintEmitter::new(Vec::new());
/// out.value(7);
/// out.group(&[11, 13]);
/// let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
/// assert_eq!(text, "7\n(11, 13)\n");
/// ```
pub struct PrintEmitter<W: Write> {
    out: BufWriter<W>,
    record: String,
    error: Option<io::Error>,
}

impl<W: Write> PrintEmitter<W> {
    /// Wrap `writer` in a buffered text emitter.
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
            record: String::with_capacity(64),
            error: None,
        }
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns the latched write error, or the error raised by the final flush.
    pub fn into_inner(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out
            .into_inner()
            .map_err(|err| PrimeCraftError::output(err.error().to_string()))
    }

    fn write_record(&mut self) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_all(self.record.as_bytes()) {
            tracing::warn!(error = %err, "output failed, discarding further records");
            self.error = Some(err);
        }
    }
}

impl<W: Write + Send> Emit for PrintEmitter<W> {
    fn value(&mut self, value: u64) {
        self.record.clear();
        // Formatting into a String cannot fail.
        let _ = writeln!(self.record, "{}", value);
        self.write_record();
    }

    fn group(&mut self, values: &[u64]) {
        self.record.clear();
        self.record.push('(');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.record.push_str(", ");
            }
            let _ = write!(self.record, "{}", value);
        }
        self.record.push_str(")\n");
        self.write_record();
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "print"
    }
}
