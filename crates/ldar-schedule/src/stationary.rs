//! `StationarySchedule` — fixed sensors that watch every site every day.

use std::sync::Arc;

use ldar_core::{MethodId, NaiveDate, SiteId};
use ldar_site::SiteRegistry;

use crate::{DeploymentWindow, Schedule, ScheduleError, ScheduleResult, SiteSurveyReport, SurveyLevel, Workplan};

/// Every deployable site is in the workplan on every day of the deployment
/// window.  No queue, no quota, no crews.
pub struct StationarySchedule {
    method: MethodId,
    level:  SurveyLevel,
    window: Arc<DeploymentWindow>,
    sites:  Vec<SiteId>,
}

impl StationarySchedule {
    pub fn new(method: MethodId, level: SurveyLevel, window: DeploymentWindow, sites: &SiteRegistry) -> Self {
        let sites = sites.iter().filter(|s| s.is_deployable(method)).map(|s| s.id()).collect();
        Self { method, level, window: Arc::new(window), sites }
    }

    /// Sites covered by a sensor.
    pub fn monitored_sites(&self) -> &[SiteId] {
        &self.sites
    }
}

impl Schedule for StationarySchedule {
    fn method(&self) -> MethodId {
        self.method
    }

    fn get_workplan(&mut self, date: NaiveDate, _sites: &SiteRegistry) -> Workplan {
        if !self.window.allows(date) {
            return Workplan::empty(self.method, date);
        }
        let reports = self
            .sites
            .iter()
            .map(|&site| SiteSurveyReport::new(site, self.method, self.level))
            .collect();
        Workplan::new(self.method, date, reports)
    }

    fn update(&mut self, workplan: Workplan, sites: &mut SiteRegistry) -> ScheduleResult<Vec<SiteSurveyReport>> {
        if workplan.method() != self.method {
            return Err(ScheduleError::MethodMismatch { expected: self.method, got: workplan.method() });
        }
        let date = workplan.date();
        let mut completed = Vec::new();
        for report in workplan.into_reports() {
            if !report.survey_complete {
                continue;
            }
            let site = sites.get_mut(report.site)?;
            site.record_survey(self.method, date);
            if report.survey_level.tags_emissions() {
                site.tag_emissions_at_component(date, self.method);
            }
            completed.push(report);
        }
        Ok(completed)
    }

    fn get_due_sites(&self) -> Vec<SiteId> {
        Vec::new()
    }
}
