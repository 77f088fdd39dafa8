use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::record::Record;
use crate::matching::diagnosis::ExceptionEntry;
use crate::matching::engine::Reconciliation;

/// Output of `-` means standard output
pub const STDOUT_PATH: &str = "-";

/// Main output plus exceptions channel.
///
/// Every write is a newline-terminated line appended to the underlying
/// writer. Nothing is guaranteed to reach the destination until
/// [`Sink::flush`] is called.
pub struct Sink<A: Write, D: Write> {
    accepted: A,
    diverted: D,
}

impl<A: Write, D: Write> Sink<A, D> {
    pub fn new(accepted: A, diverted: D) -> Self {
        Self { accepted, diverted }
    }

    /// Pass a header line through unchanged
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the main output cannot be written.
    pub fn write_header(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.accepted, "{line}")
    }

    /// Write a record's original line to the main output
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the main output cannot be written.
    pub fn write_accepted(&mut self, record: &Record) -> io::Result<()> {
        writeln!(self.accepted, "{}", record.raw_line())
    }

    /// # Errors
    ///
    /// Returns an I/O error if the exceptions output cannot be written.
    pub fn write_exception(&mut self, entry: &ExceptionEntry) -> io::Result<()> {
        writeln!(self.diverted, "{entry}")
    }

    /// Write a reconciled group: accepted records first, then its exceptions
    ///
    /// # Errors
    ///
    /// Returns an I/O error if either output cannot be written.
    pub fn write_reconciliation(&mut self, reconciliation: &Reconciliation) -> io::Result<()> {
        for record in &reconciliation.accepted {
            self.write_accepted(record)?;
        }
        for entry in &reconciliation.exceptions {
            self.write_exception(entry)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an I/O error if either output fails to flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.accepted.flush()?;
        self.diverted.flush()
    }

    pub fn into_inner(self) -> (A, D) {
        (self.accepted, self.diverted)
    }
}

/// Open an output destination for appending, creating it if needed.
/// `-` writes to standard output.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened.
pub fn open_append(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == STDOUT_PATH {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Box::new(BufWriter::new(file)))
}
