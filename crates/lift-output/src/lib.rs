//! `lift-output`: statistics writers for the liftsim elevator simulator.
//!
//! | Backend | Files created                 |
//! |---------|-------------------------------|
//! | CSV     | `stats.csv`, `outcome.csv`    |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`StatsOutputObserver`], which implements `lift_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lift_output::{CsvWriter, StatsOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = StatsOutputObserver::new(writer);
//! while !engine.is_challenge_ended() {
//!     engine.tick(1.0 / 60.0, &mut obs);
//! }
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StatsOutputObserver;
pub use row::{OutcomeRow, StatsRow};
pub use writer::OutputWriter;
