//! `ldar-output` — report writers for the LDAR scheduling engine.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                                    |
//! |-----------|---------|----------------------------------------------------------------------------------|
//! | *(none)*  | CSV     | `survey_reports.csv`, `crew_reports.csv`, `daily_summaries.csv`, `site_snapshots.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                                      |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`ReportObserver`], which implements `ldar_sim::ProgramObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ldar_output::{CsvWriter, ReportObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = ReportObserver::new(writer, config.method_names());
//! program.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportObserver;
pub use row::{CrewDayRow, DaySummaryRow, SiteSnapshotRow, SurveyRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
