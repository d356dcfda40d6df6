//! Per-visit and per-crew-day survey records.

use ldar_core::{CrewId, MethodId, NaiveDate, SiteId};

/// Granularity of a survey.  Only component-level surveys can tag
/// emissions for repair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SurveyLevel {
    #[default]
    Component,
    Equipment,
    Site,
}

impl SurveyLevel {
    #[inline]
    pub fn tags_emissions(self) -> bool {
        matches!(self, SurveyLevel::Component)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SurveyLevel::Component => "component",
            SurveyLevel::Equipment => "equipment",
            SurveyLevel::Site => "site",
        }
    }
}

// ── SiteSurveyReport ──────────────────────────────────────────────────────────

/// Running record of one site's survey by one method.
///
/// A report survives across days while the survey is in progress: the
/// schedule keeps it and hands it back in the next workplan so crews resume
/// where they stopped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteSurveyReport {
    pub site:         SiteId,
    pub method:       MethodId,
    pub survey_level: SurveyLevel,

    pub survey_started:     bool,
    pub survey_complete:    bool,
    pub survey_in_progress: bool,

    /// Total on-site minutes across all days of this survey.
    pub time_surveyed_min:             f64,
    /// On-site minutes spent today.
    pub time_surveyed_current_day_min: f64,
    pub travel_time_min:               f64,

    pub measured_rate: Option<f64>,

    pub survey_start_date:    Option<NaiveDate>,
    pub survey_complete_date: Option<NaiveDate>,
    pub crew:                 Option<CrewId>,

    /// A crew set out for the site today, whether or not it got there.
    pub dispatched: bool,
}

impl SiteSurveyReport {
    pub fn new(site: SiteId, method: MethodId, survey_level: SurveyLevel) -> Self {
        Self {
            site,
            method,
            survey_level,
            survey_started: false,
            survey_complete: false,
            survey_in_progress: false,
            time_surveyed_min: 0.0,
            time_surveyed_current_day_min: 0.0,
            travel_time_min: 0.0,
            measured_rate: None,
            survey_start_date: None,
            survey_complete_date: None,
            crew: None,
            dispatched: false,
        }
    }

    /// Clear the per-day fields before the report enters a new workplan.
    pub fn begin_day(&mut self) {
        self.time_surveyed_current_day_min = 0.0;
        self.travel_time_min = 0.0;
        self.crew = None;
        self.dispatched = false;
    }

    /// Compact record for observers.  `None` until the survey completes.
    pub fn to_minimal(&self) -> Option<MinimalSurveyReport> {
        if !self.survey_complete {
            return None;
        }
        Some(MinimalSurveyReport {
            site:          self.site,
            method:        self.method,
            date:          self.survey_complete_date?,
            measured_rate: self.measured_rate,
            survey_level:  self.survey_level,
        })
    }
}

/// One completed survey, as emitted to observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimalSurveyReport {
    pub site:          SiteId,
    pub method:        MethodId,
    pub date:          NaiveDate,
    pub measured_rate: Option<f64>,
    pub survey_level:  SurveyLevel,
}

/// One crew's day.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewDailyReport {
    pub crew:            CrewId,
    pub method:          MethodId,
    pub date:            NaiveDate,
    pub sites_visited:   u32,
    pub travel_time_min: f64,
    pub survey_time_min: f64,
    pub cost:            f64,
}

impl CrewDailyReport {
    pub fn new(crew: CrewId, method: MethodId, date: NaiveDate) -> Self {
        Self {
            crew,
            method,
            date,
            sites_visited: 0,
            travel_time_min: 0.0,
            survey_time_min: 0.0,
            cost: 0.0,
        }
    }

    /// `true` if the crew left the base today.
    pub fn deployed(&self) -> bool {
        self.sites_visited > 0 || self.travel_time_min > 0.0 || self.survey_time_min > 0.0
    }
}
