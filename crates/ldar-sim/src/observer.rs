//! Program observer trait for progress reporting and data collection.

use ldar_core::{Day, NaiveDate};
use ldar_schedule::{CrewDailyReport, MinimalSurveyReport};
use ldar_site::SiteRegistry;

use crate::DaySummary;

/// Callbacks invoked by [`Program::run`][crate::Program::run] at key points
/// in the daily loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl ProgramObserver for Progress {
///     fn on_day_end(&mut self, _day: Day, date: NaiveDate, summary: &DaySummary) {
///         if date.day() == 1 {
///             println!("{date}: {} surveys", summary.surveys);
///         }
///     }
/// }
/// ```
pub trait ProgramObserver {
    /// Called at the very start of each day, before any method runs.
    fn on_day_start(&mut self, _day: Day, _date: NaiveDate) {}

    /// Called once per completed survey.
    fn on_survey(&mut self, _report: &MinimalSurveyReport) {}

    /// Called once per crew that deployed.
    fn on_crew_day(&mut self, _report: &CrewDailyReport) {}

    /// Called at the end of each day, after triage and the end-of-day site
    /// bookkeeping.
    fn on_day_end(&mut self, _day: Day, _date: NaiveDate, _summary: &DaySummary) {}

    /// Called every `output_interval_days` days with read-only site state.
    fn on_snapshot(&mut self, _day: Day, _date: NaiveDate, _sites: &SiteRegistry) {}

    /// Called once after the final day.
    fn on_sim_end(&mut self, _days: u32) {}
}

/// A [`ProgramObserver`] that does nothing.
pub struct NoopObserver;

impl ProgramObserver for NoopObserver {}
