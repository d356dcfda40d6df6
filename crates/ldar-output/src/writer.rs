//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CrewDayRow, DaySummaryRow, OutputResult, SiteSnapshotRow, SurveyRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are surfaced to the caller here; [`ReportObserver`][crate::ReportObserver]
/// stores the first one because observer hooks cannot fail.
pub trait OutputWriter {
    /// Write a batch of completed surveys.
    fn write_surveys(&mut self, rows: &[SurveyRow]) -> OutputResult<()>;

    /// Write a batch of crew days.
    fn write_crew_days(&mut self, rows: &[CrewDayRow]) -> OutputResult<()>;

    /// Write one daily summary row.
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()>;

    /// Write a batch of site snapshots.
    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
