//! `GenericSchedule` — quota-driven surveys for screening and regular methods.

use std::cmp::Reverse;
use std::sync::Arc;

use ldar_core::{MethodId, NaiveDate, SiteId};
use ldar_site::SiteRegistry;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    CrewCapacity, DeploymentWindow, Schedule, ScheduleError, ScheduleResult, ScheduledSurveyPlanner,
    SiteSurveyReport, SurveyLevel, SurveyPriority, SurveyQueue, Workplan,
};

/// One `ScheduledSurveyPlanner` per deployable site, a shared survey queue,
/// and the reports of surveys that ran out of time mid-site.
pub struct GenericSchedule {
    method:   MethodId,
    level:    SurveyLevel,
    capacity: CrewCapacity,
    window:   Arc<DeploymentWindow>,

    planners: Vec<ScheduledSurveyPlanner>,
    /// `SiteId` → index into `planners`.
    index:    FxHashMap<SiteId, usize>,

    queue:       SurveyQueue<SiteId>,
    in_progress: FxHashMap<SiteId, SiteSurveyReport>,
}

impl GenericSchedule {
    /// Create planners for every site `method` may deploy to.
    pub fn new(
        method:            MethodId,
        level:             SurveyLevel,
        capacity:          CrewCapacity,
        window:            DeploymentWindow,
        min_interval_days: u32,
        sites:             &SiteRegistry,
        start_date:        NaiveDate,
    ) -> Self {
        let window = Arc::new(window);
        let planners: Vec<ScheduledSurveyPlanner> = sites
            .iter()
            .filter(|s| s.is_deployable(method))
            .map(|s| ScheduledSurveyPlanner::new(s, method, Arc::clone(&window), min_interval_days, start_date))
            .collect();
        let index = planners.iter().enumerate().map(|(i, p)| (p.site(), i)).collect();

        Self {
            method,
            level,
            capacity,
            window,
            planners,
            index,
            queue: SurveyQueue::new(),
            in_progress: FxHashMap::default(),
        }
    }

    pub fn capacity(&self) -> CrewCapacity {
        self.capacity
    }

    pub fn survey_level(&self) -> SurveyLevel {
        self.level
    }

    pub fn planner(&self, site: SiteId) -> Option<&ScheduledSurveyPlanner> {
        self.index.get(&site).map(|&i| &self.planners[i])
    }

    pub fn planners(&self) -> &[ScheduledSurveyPlanner] {
        &self.planners
    }

    pub fn queue(&self) -> &SurveyQueue<SiteId> {
        &self.queue
    }

    /// Partial report carried over for `site`, if its survey is unfinished.
    pub fn in_progress(&self, site: SiteId) -> Option<&SiteSurveyReport> {
        self.in_progress.get(&site)
    }

    /// Ask every planner whether its site is due today and enqueue the ones
    /// that are.  Same-day arrivals are ordered most-neglected first.
    fn enqueue_due(&mut self, date: NaiveDate, sites: &SiteRegistry) -> usize {
        let mut due: Vec<(u32, SiteId)> = Vec::new();
        for planner in &mut self.planners {
            planner.update_date(date);
            let Ok(site) = sites.get(planner.site()) else {
                continue;
            };
            if planner.queue_site_for_survey(site) {
                due.push((site.time_since_last_survey(self.method), site.id()));
            }
        }
        due.sort_by_key(|&(since, _)| Reverse(since));
        for &(_, site) in &due {
            self.queue.push(site, SurveyPriority::Default);
        }
        due.len()
    }

    /// A report `update` can apply: the site exists and has a plan.
    fn check_report(&self, report: &SiteSurveyReport, sites: &SiteRegistry) -> ScheduleResult<()> {
        sites.get(report.site)?;
        if !self.index.contains_key(&report.site) {
            return Err(ScheduleError::UnknownPlan(report.site));
        }
        Ok(())
    }

    /// Put a rejected workplan back on the queue untouched.
    fn requeue(&mut self, reports: Vec<SiteSurveyReport>) {
        for report in reports {
            if report.survey_in_progress {
                self.queue.push(report.site, SurveyPriority::Unfinished);
                self.in_progress.insert(report.site, report);
            } else {
                self.queue.push(report.site, SurveyPriority::Skipped);
            }
        }
    }

    fn planner_mut(&mut self, site: SiteId) -> ScheduleResult<&mut ScheduledSurveyPlanner> {
        let &i = self.index.get(&site).ok_or(ScheduleError::UnknownPlan(site))?;
        Ok(&mut self.planners[i])
    }
}

impl Schedule for GenericSchedule {
    fn method(&self) -> MethodId {
        self.method
    }

    fn get_workplan(&mut self, date: NaiveDate, sites: &SiteRegistry) -> Workplan {
        let newly_due = self.enqueue_due(date, sites);
        if !self.window.allows(date) {
            return Workplan::empty(self.method, date);
        }

        let reports: Vec<SiteSurveyReport> = self
            .queue
            .pop_many(self.capacity.daily_slots())
            .into_iter()
            .map(|(site, _)| {
                let mut report = self
                    .in_progress
                    .remove(&site)
                    .unwrap_or_else(|| SiteSurveyReport::new(site, self.method, self.level));
                report.begin_day();
                report
            })
            .collect();

        debug!(
            method = %self.method,
            %date,
            newly_due,
            workplan = reports.len(),
            queued = self.queue.len(),
            "workplan"
        );
        Workplan::new(self.method, date, reports)
    }

    fn update(&mut self, workplan: Workplan, sites: &mut SiteRegistry) -> ScheduleResult<Vec<SiteSurveyReport>> {
        if workplan.method() != self.method {
            return Err(ScheduleError::MethodMismatch { expected: self.method, got: workplan.method() });
        }
        let date = workplan.date();
        let reports = workplan.into_reports();
        if let Some(err) = reports.iter().find_map(|r| self.check_report(r, sites).err()) {
            self.requeue(reports);
            return Err(err);
        }
        let mut completed = Vec::new();

        for report in reports {
            let site = sites.get_mut(report.site)?;
            if report.dispatched {
                site.mark_attempted(self.method);
            }

            if report.survey_complete {
                site.record_survey(self.method, date);
                if report.survey_level.tags_emissions() {
                    site.tag_emissions_at_component(date, self.method);
                }
                self.planner_mut(report.site)?.add_to_surveys_done(date);
                completed.push(report);
            } else if report.survey_in_progress {
                self.queue.push(report.site, SurveyPriority::Unfinished);
                self.in_progress.insert(report.site, report);
            } else {
                self.queue.push(report.site, SurveyPriority::Skipped);
            }
        }
        Ok(completed)
    }

    fn get_due_sites(&self) -> Vec<SiteId> {
        self.queue.keys_in_order()
    }

    fn queued_priority(&self, site: SiteId) -> Option<SurveyPriority> {
        self.queue.priority_of(site)
    }
}
