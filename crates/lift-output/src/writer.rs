//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutcomeRow, OutputResult, StatsRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`StatsOutputObserver::take_error`][crate::StatsOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one statistics row.
    fn write_stats(&mut self, row: &StatsRow) -> OutputResult<()>;

    /// Write the challenge outcome.
    fn write_outcome(&mut self, row: &OutcomeRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
