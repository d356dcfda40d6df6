//! `Workplan` — the sites one method will attempt on one day.

use ldar_core::{MethodId, NaiveDate, SiteId};

use crate::SiteSurveyReport;

/// Ordered reports for the day's candidate sites.
///
/// Order is queue order: crews take sites front to back.  The deployment
/// loop fills the reports in place and the workplan is then handed back to
/// the schedule that produced it.
#[derive(Clone, Debug)]
pub struct Workplan {
    method:  MethodId,
    date:    NaiveDate,
    reports: Vec<SiteSurveyReport>,
}

impl Workplan {
    pub fn new(method: MethodId, date: NaiveDate, reports: Vec<SiteSurveyReport>) -> Self {
        Self { method, date, reports }
    }

    /// An empty workplan; nothing is due.
    pub fn empty(method: MethodId, date: NaiveDate) -> Self {
        Self::new(method, date, Vec::new())
    }

    #[inline]
    pub fn method(&self) -> MethodId {
        self.method
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.reports.iter().map(|r| r.site)
    }

    pub fn reports(&self) -> &[SiteSurveyReport] {
        &self.reports
    }

    pub fn reports_mut(&mut self) -> &mut [SiteSurveyReport] {
        &mut self.reports
    }

    pub fn into_reports(self) -> Vec<SiteSurveyReport> {
        self.reports
    }
}
