//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `stats.csv`
//! - `outcome.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutcomeRow, OutputResult, StatsRow};

const STATS_HEADER: [&str; 6] =
    ["elapsed", "transported", "transported_per_sec", "avg_wait", "max_wait", "move_count"];

/// Writes statistics and the outcome to two CSV files.
pub struct CsvWriter {
    stats:    Writer<File>,
    outcome:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut stats = Writer::from_path(dir.join("stats.csv"))?;
        stats.write_record(STATS_HEADER)?;

        let mut outcome = Writer::from_path(dir.join("outcome.csv"))?;
        outcome.write_record(std::iter::once("outcome").chain(STATS_HEADER))?;

        Ok(Self { stats, outcome, finished: false })
    }
}

fn fields(row: &StatsRow) -> [String; 6] {
    [
        format!("{:.3}", row.elapsed),
        row.transported.to_string(),
        format!("{:.4}", row.transported_per_sec),
        format!("{:.3}", row.avg_wait),
        format!("{:.3}", row.max_wait),
        row.move_count.to_string(),
    ]
}

impl OutputWriter for CsvWriter {
    fn write_stats(&mut self, row: &StatsRow) -> OutputResult<()> {
        self.stats.write_record(&fields(row))?;
        Ok(())
    }

    fn write_outcome(&mut self, row: &OutcomeRow) -> OutputResult<()> {
        let outcome = row.outcome.as_str().to_string();
        self.outcome.write_record(std::iter::once(outcome).chain(fields(&row.stats)))?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.stats.flush()?;
        self.outcome.flush()?;
        Ok(())
    }
}
