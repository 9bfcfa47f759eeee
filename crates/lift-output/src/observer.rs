//! `StatsOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use lift_sim::{Outcome, SimObserver, Statistics};
use tracing::warn;

use crate::row::{OutcomeRow, StatsRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every statistics notification and the
/// final outcome to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  Check for them with
/// [`take_error`][Self::take_error].  The writer is finished automatically
/// when the challenge ends; call [`finish`][Self::finish] for runs that are
/// stopped early.
pub struct StatsOutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StatsOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Statistics rows successfully written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush the writer without waiting for the challenge to end.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "output write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for StatsOutputObserver<W> {
    fn on_stats(&mut self, stats: &Statistics) {
        let result = self.writer.write_stats(&StatsRow::from(stats));
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_challenge_ended(&mut self, outcome: Outcome, stats: &Statistics) {
        let row = OutcomeRow { outcome, stats: StatsRow::from(stats) };
        let result = self.writer.write_outcome(&row);
        self.store_err(result);
        self.finish();
    }
}
