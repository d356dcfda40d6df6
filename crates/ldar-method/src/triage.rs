//! Follow-up triage: turn a screening method's detections into follow-up
//! surveys for another method.
//!
//! # States of a detected site
//!
//! ```text
//! not considered ──rate ≥ threshold──────────────▶ candidate
//!        │                                             │ batch release
//!        └──rate ≥ instant threshold──▶ queued ◀───────┘
//! ```
//!
//! A candidate or queued site that is detected again is updated in place by
//! its redundancy filter.  Candidates accumulate until `delay_days` have
//! passed since the first candidate of the batch; the release then promotes
//! the highest-rate candidates according to the interaction priority.

use std::collections::VecDeque;

use ldar_core::{MethodId, NaiveDate, SiteId};
use ldar_schedule::{FollowUpQueue, FollowUpSurveyPlanner, MinimalSurveyReport};
use ldar_site::SiteRegistry;
use tracing::debug;

use crate::{FollowUpConfig, InteractionPriority, TriageScope};

/// Running totals of one triage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TriageCounters {
    /// Detections with a positive measured rate.
    pub detections:      u64,
    /// Sites flagged for follow-up.
    pub flags:           u64,
    /// Detections at sites that were already flagged.
    pub redundant_flags: u64,
}

/// Triage owned by one screening method, feeding one follow-up method.
#[derive(Clone, Debug)]
pub struct FollowUpTriage {
    screening: MethodId,
    target:    MethodId,
    config:    FollowUpConfig,

    /// Candidates in arrival order.
    candidates:      Vec<FollowUpSurveyPlanner>,
    batch_start:     Option<NaiveDate>,
    detection_count: u32,

    /// Results waiting out the reporting delay.
    pending: VecDeque<MinimalSurveyReport>,

    counters: TriageCounters,
}

impl FollowUpTriage {
    pub fn new(screening: MethodId, target: MethodId, config: FollowUpConfig) -> Self {
        Self {
            screening,
            target,
            config,
            candidates: Vec::new(),
            batch_start: None,
            detection_count: 0,
            pending: VecDeque::new(),
            counters: TriageCounters::default(),
        }
    }

    #[inline]
    pub fn screening_method(&self) -> MethodId {
        self.screening
    }

    #[inline]
    pub fn target_method(&self) -> MethodId {
        self.target
    }

    pub fn scope(&self) -> TriageScope {
        self.config.scope
    }

    pub fn counters(&self) -> TriageCounters {
        self.counters
    }

    /// Candidates in arrival order.
    pub fn candidates(&self) -> &[FollowUpSurveyPlanner] {
        &self.candidates
    }

    pub fn candidate_sites(&self) -> Vec<SiteId> {
        self.candidates.iter().map(FollowUpSurveyPlanner::site).collect()
    }

    /// Detections seen since the last release, sub-threshold ones included.
    pub fn detection_count(&self) -> u32 {
        self.detection_count
    }

    /// Add a candidate directly, starting the batch clock if needed.
    pub fn add_candidate(&mut self, planner: FollowUpSurveyPlanner, date: NaiveDate) {
        self.candidates.push(planner);
        self.batch_start.get_or_insert(date);
    }

    /// Feed today's completed surveys of the screening method, then release
    /// any batch that is due.
    pub fn process_detections(
        &mut self,
        reports: &[MinimalSurveyReport],
        date:    NaiveDate,
        sites:   &mut SiteRegistry,
        queue:   &mut dyn FollowUpQueue,
    ) {
        self.pending
            .extend(reports.iter().filter(|r| r.method == self.screening && r.measured_rate.is_some()).cloned());

        let delay = self.config.reporting_delay_days as i64;
        while let Some(front) = self.pending.front() {
            if (date - front.date).num_days() < delay {
                break;
            }
            if let Some(report) = self.pending.pop_front() {
                self.process_one(&report, date, sites, queue);
            }
        }

        self.update_candidates_for_flags(date, sites, queue);
    }

    fn process_one(
        &mut self,
        report: &MinimalSurveyReport,
        date:   NaiveDate,
        sites:  &mut SiteRegistry,
        queue:  &mut dyn FollowUpQueue,
    ) {
        let Some(rate) = report.measured_rate.filter(|r| *r > 0.0) else {
            return;
        };
        let Ok(site) = sites.get_mut(report.site) else {
            return;
        };
        if site.latest_tagging_survey_date().is_some_and(|tagged| tagged > report.date) {
            return;
        }
        if !site.is_deployable(self.target) {
            return;
        }

        self.counters.detections += 1;
        self.detection_count += 1;

        if site.currently_flagged {
            self.counters.redundant_flags += 1;
            if let Some(plan) = queue.get_plan_from_queue(report.site) {
                plan.update_with_latest_survey(rate, report.date);
            }
            return;
        }
        if let Some(plan) = queue.get_plan_from_queue(report.site) {
            plan.update_with_latest_survey(rate, report.date);
            return;
        }
        if let Some(candidate) = self.candidates.iter_mut().find(|c| c.site() == report.site) {
            candidate.update_with_latest_survey(rate, report.date);
            return;
        }
        if rate < self.config.threshold {
            return;
        }

        let planner =
            FollowUpSurveyPlanner::new(report.site, rate, report.date, self.screening, self.config.redundancy_filter);
        if self.config.instant_threshold.is_some_and(|instant| rate >= instant) {
            if site.flag(date, self.screening) {
                self.counters.flags += 1;
                queue.add_to_survey_queue(planner);
            }
        } else {
            self.add_candidate(planner, date);
        }
    }

    /// Release the current batch if `delay_days` have elapsed since its
    /// first candidate.  Returns the promoted sites.
    pub fn update_candidates_for_flags(
        &mut self,
        date:  NaiveDate,
        sites: &mut SiteRegistry,
        queue: &mut dyn FollowUpQueue,
    ) -> Vec<SiteId> {
        let Some(start) = self.batch_start else {
            return Vec::new();
        };
        if self.candidates.is_empty() {
            self.batch_start = None;
            return Vec::new();
        }
        if (date - start).num_days() < self.config.delay_days as i64 {
            return Vec::new();
        }

        // Highest rate first; stable, so ties keep arrival order.
        let mut order: Vec<usize> = (0..self.candidates.len()).collect();
        order.sort_by(|&a, &b| self.candidates[b].rate_at_site().total_cmp(&self.candidates[a].rate_at_site()));

        let threshold = self.config.threshold;
        let above = |i: &usize| self.candidates[*i].rate_at_site() >= threshold;
        let chosen: Vec<usize> = match self.config.interaction_priority {
            InteractionPriority::Threshold => {
                let kept: Vec<usize> = order.iter().copied().filter(above).collect();
                let n = (kept.len() as f64 * self.config.proportion).ceil() as usize;
                kept.into_iter().take(n).collect()
            }
            InteractionPriority::Proportion => {
                let n = (self.detection_count as f64 * self.config.proportion).ceil() as usize;
                order.iter().copied().take(n.min(order.len())).filter(above).collect()
            }
        };

        let mut promoted = Vec::with_capacity(chosen.len());
        let mut by_index: Vec<Option<FollowUpSurveyPlanner>> = self.candidates.drain(..).map(Some).collect();

        for i in chosen {
            let Some(planner) = by_index[i].take() else {
                continue;
            };
            let site_id = planner.site();
            let Ok(site) = sites.get_mut(site_id) else {
                continue;
            };
            if site.flag(date, self.screening) {
                self.counters.flags += 1;
                queue.add_to_survey_queue(planner);
                promoted.push(site_id);
            } else {
                self.counters.redundant_flags += 1;
            }
        }
        self.candidates = by_index.into_iter().flatten().collect();
        self.detection_count = 0;
        self.batch_start = if self.candidates.is_empty() { None } else { Some(date) };

        debug!(
            screening = %self.screening,
            target = %self.target,
            scope = ?self.config.scope,
            %date,
            promoted = promoted.len(),
            candidates = self.candidates.len(),
            "follow-up batch released"
        );
        promoted
    }
}
