//! The `OutputWriter` trait implemented by all backends.

use crate::{OutputResult, OutputRow};

/// Trait implemented by the memory, CSV and SQLite sinks.
///
/// Errors never reach the day loop: [`SimOutputObserver`](crate::SimOutputObserver)
/// stores the first one for [`take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Append one day's rows.  Rows already written may arrive again.
    fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()>;

    /// Flush and close underlying handles.  Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        (**self).write_rows(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
