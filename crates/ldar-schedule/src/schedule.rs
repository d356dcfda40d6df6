//! The `Schedule` trait — one method's survey queue and daily workplan.

use ldar_core::{MethodId, NaiveDate, SiteId};
use ldar_site::SiteRegistry;

use crate::{FollowUpSurveyPlanner, ScheduleResult, SiteSurveyReport, SurveyPriority, Workplan};

/// Per-method survey scheduling.
///
/// The program calls [`get_workplan`][Self::get_workplan] once per day, lets
/// the method's crews fill in the reports, then hands the workplan back to
/// [`update`][Self::update].  Schedules are owned by exactly one method and
/// one replicate, so nothing here needs to be `Sync`.
pub trait Schedule: Send {
    /// The method this schedule belongs to.
    fn method(&self) -> MethodId;

    /// Decide which sites become due on `date`, enqueue them, and pop the
    /// day's workplan.
    fn get_workplan(&mut self, date: NaiveDate, sites: &SiteRegistry) -> Workplan;

    /// Absorb the surveyed workplan.
    ///
    /// Completed surveys are recorded on the site and the plan; unfinished
    /// ones go back on the queue.  Returns the completed reports.
    fn update(&mut self, workplan: Workplan, sites: &mut SiteRegistry) -> ScheduleResult<Vec<SiteSurveyReport>>;

    /// Sites currently waiting in the queue, in pop order.
    fn get_due_sites(&self) -> Vec<SiteId>;

    /// Queue priority of `site`, if it is waiting.
    fn queued_priority(&self, _site: SiteId) -> Option<SurveyPriority> {
        None
    }

    /// Follow-up schedules expose their queue to the triage of screening
    /// methods.  Default: not a follow-up schedule.
    fn as_follow_up_queue(&mut self) -> Option<&mut dyn FollowUpQueue> {
        None
    }
}

/// The narrow interface follow-up triage uses to hand sites to another
/// method's schedule.
pub trait FollowUpQueue {
    /// Enqueue a newly flagged site.  Returns `false` if the site already
    /// has a pending follow-up; the planner is dropped in that case.
    fn add_to_survey_queue(&mut self, planner: FollowUpSurveyPlanner) -> bool;

    /// The pending follow-up for `site`, if any.
    fn get_plan_from_queue(&mut self, site: SiteId) -> Option<&mut FollowUpSurveyPlanner>;

    /// Sites with a pending follow-up, queued or in progress.
    fn get_site_id_queue_list(&self) -> Vec<SiteId>;
}

// ── CrewCapacity ──────────────────────────────────────────────────────────────

/// How many queue entries a method pops per day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrewCapacity {
    pub crews:             u32,
    /// Estimated surveys one crew completes per day.
    pub est_daily_surveys: u32,
}

impl CrewCapacity {
    pub fn new(crews: u32, est_daily_surveys: u32) -> Self {
        Self { crews, est_daily_surveys: est_daily_surveys.max(1) }
    }

    /// `max(1, floor(work_minutes / (survey_minutes + travel_minutes)))`.
    pub fn estimate(crews: u32, work_minutes: f64, mean_survey_min: f64, mean_travel_min: f64) -> Self {
        let per_site = mean_survey_min + mean_travel_min;
        let est = if per_site > 0.0 && work_minutes.is_finite() {
            (work_minutes / per_site).floor().max(1.0) as u32
        } else {
            1
        };
        Self::new(crews, est)
    }

    /// Workplan size cap for one day.
    #[inline]
    pub fn daily_slots(&self) -> usize {
        self.crews as usize * self.est_daily_surveys as usize
    }
}
