//! Quota-driven survey planning for one site and one method.
//!
//! # Survey plan
//!
//! Each year a site owes a method `RS` surveys (its annual quota).  The
//! planner spreads them evenly over the method's active days: every calendar
//! day falling inside an active deployment month, in order.  Target `i` is
//!
//! ```text
//! active_days[ floor(i * (active_days.len() - 1) / RS) ]
//! ```
//!
//! so inactive months are skipped with exact calendar arithmetic rather than
//! an average month length.  A site becomes due once its next unmet target
//! date has arrived; it then stays queued until a crew completes the survey.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ldar_core::{Datelike, MethodId, NaiveDate, SiteId, days_in_month};
use ldar_site::Site;

use crate::{ScheduleError, ScheduleResult};

// ── DeploymentWindow ──────────────────────────────────────────────────────────

/// Calendar years and months in which a method operates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeploymentWindow {
    /// Empty means "every year".
    years:  BTreeSet<i32>,
    /// Always non-empty, values in 1..=12.
    months: BTreeSet<u32>,
}

impl Default for DeploymentWindow {
    fn default() -> Self {
        Self { years: BTreeSet::new(), months: (1..=12).collect() }
    }
}

impl DeploymentWindow {
    /// Build a window.  An empty `years` list means every year; an empty
    /// `months` list means every month.
    pub fn new(years: impl IntoIterator<Item = i32>, months: impl IntoIterator<Item = u32>) -> ScheduleResult<Self> {
        let years: BTreeSet<i32> = years.into_iter().collect();
        let mut months: BTreeSet<u32> = months.into_iter().collect();
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ScheduleError::Config(format!("deployment month {bad} is not in 1..=12")));
        }
        if months.is_empty() {
            months = (1..=12).collect();
        }
        Ok(Self { years, months })
    }

    pub fn allows_year(&self, year: i32) -> bool {
        self.years.is_empty() || self.years.contains(&year)
    }

    pub fn allows_month(&self, month: u32) -> bool {
        self.months.contains(&month)
    }

    /// `true` if the method may deploy at all on `date`.
    pub fn allows(&self, date: NaiveDate) -> bool {
        self.allows_year(date.year()) && self.allows_month(date.month())
    }

    pub fn months(&self) -> &BTreeSet<u32> {
        &self.months
    }
}

// ── Evenly spaced target dates ────────────────────────────────────────────────

/// Spread `count` target dates evenly over the active days of `year`.
///
/// Returns an empty plan for `count == 0` or no active days.  If `count`
/// exceeds the number of active days some targets share a date.
pub fn generate_evenly_spaced_dates(year: i32, months: &BTreeSet<u32>, count: u32) -> Vec<NaiveDate> {
    if count == 0 {
        return Vec::new();
    }
    let active_days: Vec<NaiveDate> = months
        .iter()
        .flat_map(|&m| (1..=days_in_month(year, m)).filter_map(move |d| NaiveDate::from_ymd_opt(year, m, d)))
        .collect();
    if active_days.is_empty() {
        return Vec::new();
    }

    let span = (active_days.len() - 1) as u64;
    (0..count as u64)
        .map(|i| active_days[(i * span / count as u64) as usize])
        .collect()
}

// ── SurveyCounter ─────────────────────────────────────────────────────────────

/// Quota bookkeeping for one calendar year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyCounter {
    pub required_surveys: u32,
    pub surveys_done:     u32,
}

impl SurveyCounter {
    #[inline]
    pub fn is_met(&self) -> bool {
        self.surveys_done >= self.required_surveys
    }
}

// ── ScheduledSurveyPlanner ────────────────────────────────────────────────────

/// Decides when one site becomes due for one quota-driven method.
///
/// Created once per (deployable site, method) when the method is built.
/// The planner never holds the `Site` itself; callers pass it in.
#[derive(Clone, Debug)]
pub struct ScheduledSurveyPlanner {
    site:              SiteId,
    method:            MethodId,
    window:            Arc<DeploymentWindow>,
    required_surveys:  u32,
    min_interval_days: u32,

    current_date: Option<NaiveDate>,
    survey_plan:  BTreeMap<i32, Vec<NaiveDate>>,
    counters:     BTreeMap<i32, SurveyCounter>,
    queued:       bool,
}

impl ScheduledSurveyPlanner {
    /// Build the planner and the survey plan for `start_date`'s year.
    pub fn new(
        site:              &Site,
        method:            MethodId,
        window:            Arc<DeploymentWindow>,
        min_interval_days: u32,
        start_date:        NaiveDate,
    ) -> Self {
        let mut planner = Self {
            site: site.id(),
            method,
            window,
            required_surveys: site.required_surveys(method),
            min_interval_days,
            current_date: None,
            survey_plan: BTreeMap::new(),
            counters: BTreeMap::new(),
            queued: false,
        };
        planner.update_date(start_date);
        planner
    }

    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    #[inline]
    pub fn method(&self) -> MethodId {
        self.method
    }

    #[inline]
    pub fn is_queued(&self) -> bool {
        self.queued
    }

    /// Set the planner's notion of "today".  Entering a new year generates
    /// that year's plan and counter.
    pub fn update_date(&mut self, date: NaiveDate) {
        self.current_date = Some(date);
        let year = date.year();
        if !self.survey_plan.contains_key(&year) {
            let plan = generate_evenly_spaced_dates(year, self.window.months(), self.required_surveys);
            self.survey_plan.insert(year, plan);
            self.counters.insert(year, SurveyCounter {
                required_surveys: self.required_surveys,
                surveys_done:     0,
            });
        }
    }

    /// Target dates for `year`, if generated.
    pub fn survey_plan(&self, year: i32) -> Option<&[NaiveDate]> {
        self.survey_plan.get(&year).map(Vec::as_slice)
    }

    /// Quota counter for `year`, if generated.
    pub fn counter(&self, year: i32) -> Option<SurveyCounter> {
        self.counters.get(&year).copied()
    }

    /// `true` exactly once per target date: the site is due and not yet
    /// queued.  Sets `queued` on success.
    ///
    /// Requires today's year and month to be inside the deployment window,
    /// the site to be deployable, the year's quota to be unmet, the next
    /// unmet target date to have arrived and the minimum interval since the
    /// last completed survey to have elapsed.
    pub fn queue_site_for_survey(&mut self, site: &Site) -> bool {
        if self.queued || !site.is_deployable(self.method) {
            return false;
        }
        let Some(today) = self.current_date else {
            return false;
        };
        if !self.window.allows(today) {
            return false;
        }

        let year = today.year();
        let Some(counter) = self.counters.get(&year) else {
            return false;
        };
        if counter.is_met() {
            return false;
        }
        let Some(&target) = self
            .survey_plan
            .get(&year)
            .and_then(|plan| plan.get(counter.surveys_done as usize))
        else {
            return false;
        };
        if target > today {
            return false;
        }

        if self.min_interval_days > 0 {
            let last = site.state(self.method).and_then(|s| s.last_survey_date);
            if let Some(last) = last {
                if (today - last).num_days() < self.min_interval_days as i64 {
                    return false;
                }
            }
        }

        self.queued = true;
        true
    }

    /// Count a completed survey against `date`'s year and clear `queued`.
    ///
    /// The count saturates at the year's quota.
    pub fn add_to_surveys_done(&mut self, date: NaiveDate) {
        self.update_date(date);
        if let Some(counter) = self.counters.get_mut(&date.year()) {
            if counter.surveys_done < counter.required_surveys {
                counter.surveys_done += 1;
            }
        }
        self.queued = false;
    }
}
