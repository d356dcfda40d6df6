//! `FollowUpSchedule` — surveys triggered by another method's detections.

use std::collections::BTreeMap;

use ldar_core::{MethodId, NaiveDate, SiteId};
use ldar_site::SiteRegistry;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    CrewCapacity, DeploymentWindow, FollowUpQueue, FollowUpSurveyPlanner, Schedule, ScheduleError, ScheduleResult,
    SiteSurveyReport, SurveyLevel, SurveyPriority, SurveyQueue, Workplan,
};

/// Pending follow-ups keyed by site, drained by one follow-up method's crews.
///
/// Sites arrive through [`FollowUpQueue::add_to_survey_queue`], called by
/// the triage of a screening method.  A completed follow-up removes the
/// planner and resolves the site's flag.
pub struct FollowUpSchedule {
    method:   MethodId,
    level:    SurveyLevel,
    capacity: CrewCapacity,
    window:   DeploymentWindow,

    planners:    BTreeMap<SiteId, FollowUpSurveyPlanner>,
    queue:       SurveyQueue<SiteId>,
    in_progress: FxHashMap<SiteId, SiteSurveyReport>,
}

impl FollowUpSchedule {
    pub fn new(method: MethodId, level: SurveyLevel, capacity: CrewCapacity, window: DeploymentWindow) -> Self {
        Self {
            method,
            level,
            capacity,
            window,
            planners: BTreeMap::new(),
            queue: SurveyQueue::new(),
            in_progress: FxHashMap::default(),
        }
    }

    pub fn capacity(&self) -> CrewCapacity {
        self.capacity
    }

    pub fn planner(&self, site: SiteId) -> Option<&FollowUpSurveyPlanner> {
        self.planners.get(&site)
    }

    pub fn queue(&self) -> &SurveyQueue<SiteId> {
        &self.queue
    }

    /// Number of sites with a pending follow-up.
    pub fn pending(&self) -> usize {
        self.planners.len()
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
}

impl FollowUpQueue for FollowUpSchedule {
    fn add_to_survey_queue(&mut self, mut planner: FollowUpSurveyPlanner) -> bool {
        let site = planner.site();
        if self.planners.contains_key(&site) {
            return false;
        }
        planner.set_queued(true);
        self.queue.push(site, SurveyPriority::Default);
        self.planners.insert(site, planner);
        true
    }

    fn get_plan_from_queue(&mut self, site: SiteId) -> Option<&mut FollowUpSurveyPlanner> {
        self.planners.get_mut(&site)
    }

    fn get_site_id_queue_list(&self) -> Vec<SiteId> {
        self.planners.keys().copied().collect()
    }
}

impl Schedule for FollowUpSchedule {
    fn method(&self) -> MethodId {
        self.method
    }

    fn get_workplan(&mut self, date: NaiveDate, sites: &SiteRegistry) -> Workplan {
        if !self.window.allows(date) {
            return Workplan::empty(self.method, date);
        }

        let slots = self.capacity.daily_slots();
        let mut reports = Vec::with_capacity(slots);
        let mut resolved = 0usize;
        while reports.len() < slots {
            let Some((site, _)) = self.queue.pop() else {
                break;
            };
            let Some(planner) = self.planners.get(&site) else {
                continue;
            };
            if tagged_since_detection(planner, sites) {
                // A tagging survey already covered this detection.
                self.planners.remove(&site);
                self.in_progress.remove(&site);
                resolved += 1;
                continue;
            }
            let mut report = self
                .in_progress
                .remove(&site)
                .unwrap_or_else(|| SiteSurveyReport::new(site, self.method, self.level));
            report.begin_day();
            reports.push(report);
        }

        debug!(
            method = %self.method,
            %date,
            workplan = reports.len(),
            resolved,
            pending = self.planners.len(),
            "follow-up workplan"
        );
        Workplan::new(self.method, date, reports)
    }

    fn update(&mut self, workplan: Workplan, sites: &mut SiteRegistry) -> ScheduleResult<Vec<SiteSurveyReport>> {
        if workplan.method() != self.method {
            return Err(ScheduleError::MethodMismatch { expected: self.method, got: workplan.method() });
        }
        let date = workplan.date();
        let reports = workplan.into_reports();
        if let Some(err) = reports.iter().find_map(|r| sites.get(r.site).err()) {
            self.requeue(reports);
            return Err(err.into());
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
                } else {
                    site.clear_flag();
                }
                self.planners.remove(&report.site);
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

    fn as_follow_up_queue(&mut self) -> Option<&mut dyn FollowUpQueue> {
        Some(self)
    }
}

fn tagged_since_detection(planner: &FollowUpSurveyPlanner, sites: &SiteRegistry) -> bool {
    sites
        .get(planner.site())
        .ok()
        .and_then(|s| s.latest_tagging_survey_date())
        .is_some_and(|tagged| planner.latest_detection_date() < tagged)
}
