//! The `Site` type and its per-method attributes and state.

use ldar_core::{GeoPoint, MethodId, NaiveDate, SiteId};

// ── Per-method attributes ─────────────────────────────────────────────────────

/// Fixed, per-method survey attributes of one site.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteMethodParams {
    /// Required surveys per calendar year (the annual quota, "RS").
    pub surveys_per_year: u32,
    /// On-site minutes needed to complete one survey.
    pub survey_time_min: f64,
    /// `false` excludes the site from this method entirely.
    pub deployable: bool,
}

impl Default for SiteMethodParams {
    fn default() -> Self {
        Self { surveys_per_year: 0, survey_time_min: 0.0, deployable: true }
    }
}

// ── Per-method mutable state ──────────────────────────────────────────────────

/// Mutable scheduling state of one site for one method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteMethodState {
    /// Days since this method last completed a survey here.  Starts at 0 and
    /// grows by one every simulated day.
    pub time_since_last_survey: u32,
    /// Completed surveys in the current calendar year.
    pub surveys_done_this_year: u32,
    /// A crew reached (or tried to reach) the site today.
    pub attempted_today: bool,
    /// Date of the most recent completed survey.
    pub last_survey_date: Option<NaiveDate>,
}

// ── Site ──────────────────────────────────────────────────────────────────────

/// An inspection target.
///
/// Identity, location and per-method attributes are fixed for the run; the
/// scheduling state (`SiteMethodState`, flag status, tagging date) is mutated
/// by planners, schedules and follow-up triage.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    id:       SiteId,
    pub name:     String,
    pub location: GeoPoint,

    params: Vec<SiteMethodParams>,
    state:  Vec<SiteMethodState>,

    /// Flagged for follow-up and not yet resolved.
    pub currently_flagged: bool,
    pub date_flagged:      Option<NaiveDate>,
    pub flagged_by:        Option<MethodId>,

    latest_tagging_survey_date: Option<NaiveDate>,
    tagging_surveys:            u32,
}

impl Site {
    /// Create a site with one `SiteMethodParams` entry per method, in
    /// `MethodId` order.
    pub fn new(id: SiteId, name: impl Into<String>, location: GeoPoint, params: Vec<SiteMethodParams>) -> Self {
        let state = vec![SiteMethodState::default(); params.len()];
        Self {
            id,
            name: name.into(),
            location,
            params,
            state,
            currently_flagged: false,
            date_flagged: None,
            flagged_by: None,
            latest_tagging_survey_date: None,
            tagging_surveys: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> SiteId {
        self.id
    }

    /// Number of methods this site carries attributes for.
    pub fn method_count(&self) -> usize {
        self.params.len()
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// Attributes for `method`, or `None` if the id is out of range.
    pub fn params(&self, method: MethodId) -> Option<&SiteMethodParams> {
        self.params.get(method.index())
    }

    /// `true` if `method` may survey this site at all.
    pub fn is_deployable(&self, method: MethodId) -> bool {
        self.params(method).is_some_and(|p| p.deployable)
    }

    /// Annual quota for `method` (0 if unknown).
    pub fn required_surveys(&self, method: MethodId) -> u32 {
        self.params(method).map_or(0, |p| p.surveys_per_year)
    }

    /// On-site minutes for one `method` survey (0 if unknown).
    pub fn survey_time(&self, method: MethodId) -> f64 {
        self.params(method).map_or(0.0, |p| p.survey_time_min)
    }

    // ── Scheduling state ──────────────────────────────────────────────────

    pub fn state(&self, method: MethodId) -> Option<&SiteMethodState> {
        self.state.get(method.index())
    }

    pub fn state_mut(&mut self, method: MethodId) -> Option<&mut SiteMethodState> {
        self.state.get_mut(method.index())
    }

    pub fn time_since_last_survey(&self, method: MethodId) -> u32 {
        self.state(method).map_or(0, |s| s.time_since_last_survey)
    }

    /// Record a completed survey by `method` on `date`.
    pub fn record_survey(&mut self, method: MethodId, date: NaiveDate) {
        if let Some(s) = self.state_mut(method) {
            s.time_since_last_survey = 0;
            s.surveys_done_this_year += 1;
            s.last_survey_date = Some(date);
        }
    }

    pub fn mark_attempted(&mut self, method: MethodId) {
        if let Some(s) = self.state_mut(method) {
            s.attempted_today = true;
        }
    }

    /// End-of-day bookkeeping: one more day since every method's last survey.
    pub fn advance_day(&mut self) {
        for s in &mut self.state {
            s.time_since_last_survey = s.time_since_last_survey.saturating_add(1);
        }
    }

    /// Start-of-day bookkeeping.
    pub fn reset_daily(&mut self) {
        for s in &mut self.state {
            s.attempted_today = false;
        }
    }

    /// Quota counters restart every calendar year.
    pub fn reset_annual(&mut self) {
        for s in &mut self.state {
            s.surveys_done_this_year = 0;
        }
    }

    // ── Flagging ──────────────────────────────────────────────────────────

    /// Flag the site for follow-up.  Returns `false` (and changes nothing)
    /// if it is already flagged.
    pub fn flag(&mut self, date: NaiveDate, by: MethodId) -> bool {
        if self.currently_flagged {
            return false;
        }
        self.currently_flagged = true;
        self.date_flagged = Some(date);
        self.flagged_by = Some(by);
        true
    }

    pub fn clear_flag(&mut self) {
        self.currently_flagged = false;
        self.date_flagged = None;
        self.flagged_by = None;
    }

    // ── Tagging ───────────────────────────────────────────────────────────

    /// Date of the most recent survey able to tag emissions for repair.
    pub fn latest_tagging_survey_date(&self) -> Option<NaiveDate> {
        self.latest_tagging_survey_date
    }

    /// Never moves the date backwards.
    pub fn set_latest_tagging_survey_date(&mut self, date: NaiveDate) {
        if self.latest_tagging_survey_date.is_none_or(|d| d < date) {
            self.latest_tagging_survey_date = Some(date);
        }
    }

    /// Hook for a component-level survey that tags the site's emissions for
    /// repair.  The emission lifecycle is owned elsewhere; here the survey
    /// resolves the flag and records the tagging date.
    pub fn tag_emissions_at_component(&mut self, date: NaiveDate, _method: MethodId) {
        self.set_latest_tagging_survey_date(date);
        self.tagging_surveys += 1;
        self.clear_flag();
    }

    /// Number of tagging surveys completed at this site.
    pub fn tagging_surveys(&self) -> u32 {
        self.tagging_surveys
    }
}
