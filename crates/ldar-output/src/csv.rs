//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `survey_reports.csv`
//! - `crew_reports.csv`
//! - `daily_summaries.csv`
//! - `site_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CrewDayRow, DaySummaryRow, OutputResult, SiteSnapshotRow, SurveyRow};

/// Writes program output to four CSV files.
pub struct CsvWriter {
    surveys:   Writer<File>,
    crews:     Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut surveys = Writer::from_path(dir.join("survey_reports.csv"))?;
        surveys.write_record(["site_id", "method", "date", "measured_rate", "survey_level"])?;

        let mut crews = Writer::from_path(dir.join("crew_reports.csv"))?;
        crews.write_record([
            "crew_id",
            "method",
            "date",
            "sites_visited",
            "travel_time_min",
            "survey_time_min",
            "cost",
        ])?;

        let mut summaries = Writer::from_path(dir.join("daily_summaries.csv"))?;
        summaries.write_record(["day", "date", "surveys", "crew_days", "cost", "flags"])?;

        let mut snapshots = Writer::from_path(dir.join("site_snapshots.csv"))?;
        snapshots.write_record(["site_id", "day", "date", "flagged", "tagging_surveys", "surveys_done"])?;

        Ok(Self {
            surveys,
            crews,
            summaries,
            snapshots,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_surveys(&mut self, rows: &[SurveyRow]) -> OutputResult<()> {
        for row in rows {
            self.surveys.write_record(&[
                row.site_id.to_string(),
                row.method.clone(),
                row.date.clone(),
                row.measured_rate.map(|r| r.to_string()).unwrap_or_default(),
                row.survey_level.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_crew_days(&mut self, rows: &[CrewDayRow]) -> OutputResult<()> {
        for row in rows {
            self.crews.write_record(&[
                row.crew_id.to_string(),
                row.method.clone(),
                row.date.clone(),
                row.sites_visited.to_string(),
                row.travel_time_min.to_string(),
                row.survey_time_min.to_string(),
                row.cost.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.day.to_string(),
            row.date.clone(),
            row.surveys.to_string(),
            row.crew_days.to_string(),
            row.cost.to_string(),
            row.flags.to_string(),
        ])?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.site_id.to_string(),
                row.day.to_string(),
                row.date.clone(),
                (row.flagged as u8).to_string(),
                row.tagging_surveys.to_string(),
                row.surveys_done.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.surveys.flush()?;
        self.crews.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
