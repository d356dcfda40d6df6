//! `ReportObserver<W>`: bridges `ProgramObserver` to an `OutputWriter`.

use ldar_core::{Day, MethodId, NaiveDate};
use ldar_schedule::{CrewDailyReport, MinimalSurveyReport};
use ldar_sim::{DaySummary, ProgramObserver};
use ldar_site::SiteRegistry;

use crate::row::{CrewDayRow, DaySummaryRow, SiteSnapshotRow, SurveyRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`ProgramObserver`] that writes survey reports, crew days, daily
/// summaries and site snapshots to any [`OutputWriter`] backend.
///
/// Survey and crew rows are buffered for the current day and written as one
/// batch from `on_day_end`.
///
/// Errors from the writer are stored internally because observer hooks have
/// no return value. After `program.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct ReportObserver<W: OutputWriter> {
    writer:       W,
    method_names: Vec<String>,
    surveys:      Vec<SurveyRow>,
    crews:        Vec<CrewDayRow>,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> ReportObserver<W> {
    /// Create an observer backed by `writer`. `method_names` is indexed by
    /// `MethodId` and labels the method column.
    pub fn new<S: Into<String>>(writer: W, method_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            writer,
            method_names: method_names.into_iter().map(Into::into).collect(),
            surveys:      Vec::new(),
            crews:        Vec::new(),
            last_error:   None,
        }
    }

    /// Take the stored write error (if any) after `program.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn method_name(&self, method: MethodId) -> String {
        self.method_names
            .get(method.index())
            .cloned()
            .unwrap_or_else(|| method.to_string())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_day(&mut self) {
        if !self.surveys.is_empty() {
            let rows = std::mem::take(&mut self.surveys);
            let result = self.writer.write_surveys(&rows);
            self.store_err(result);
        }
        if !self.crews.is_empty() {
            let rows = std::mem::take(&mut self.crews);
            let result = self.writer.write_crew_days(&rows);
            self.store_err(result);
        }
    }
}

impl<W: OutputWriter> ProgramObserver for ReportObserver<W> {
    fn on_survey(&mut self, report: &MinimalSurveyReport) {
        let row = SurveyRow {
            site_id:       report.site.0,
            method:        self.method_name(report.method),
            date:          report.date.to_string(),
            measured_rate: report.measured_rate,
            survey_level:  report.survey_level.as_str(),
        };
        self.surveys.push(row);
    }

    fn on_crew_day(&mut self, report: &CrewDailyReport) {
        let row = CrewDayRow {
            crew_id:         report.crew.0,
            method:          self.method_name(report.method),
            date:            report.date.to_string(),
            sites_visited:   report.sites_visited,
            travel_time_min: report.travel_time_min,
            survey_time_min: report.survey_time_min,
            cost:            report.cost,
        };
        self.crews.push(row);
    }

    fn on_day_end(&mut self, day: Day, date: NaiveDate, summary: &DaySummary) {
        self.flush_day();
        let row = DaySummaryRow {
            day:       day.0,
            date:      date.to_string(),
            surveys:   summary.surveys as u64,
            crew_days: summary.crew_days as u64,
            cost:      summary.cost,
            flags:     summary.flags,
        };
        let result = self.writer.write_day_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, day: Day, date: NaiveDate, sites: &SiteRegistry) {
        let date = date.to_string();
        let rows: Vec<SiteSnapshotRow> = sites
            .iter()
            .map(|site| SiteSnapshotRow {
                site_id:         site.id().0,
                day:             day.0,
                date:            date.clone(),
                flagged:         site.currently_flagged,
                tagging_surveys: site.tagging_surveys(),
                surveys_done:    (0..site.method_count())
                    .filter_map(|m| MethodId::try_from(m).ok())
                    .filter_map(|m| site.state(m))
                    .map(|s| s.surveys_done_this_year)
                    .sum(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_site_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _days: u32) {
        self.flush_day();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
