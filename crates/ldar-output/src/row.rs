//! Flat row types written by output backends.
//!
//! Dates are ISO-8601 strings so every backend stores them the same way.

/// One completed survey.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRow {
    pub site_id:       u32,
    pub method:        String,
    pub date:          String,
    /// `None` when the sensor reported nothing.
    pub measured_rate: Option<f64>,
    pub survey_level:  &'static str,
}

/// One crew's working day.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewDayRow {
    pub crew_id:         u16,
    pub method:          String,
    pub date:            String,
    pub sites_visited:   u32,
    pub travel_time_min: f64,
    pub survey_time_min: f64,
    pub cost:            f64,
}

/// Program-wide totals for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummaryRow {
    pub day:       u32,
    pub date:      String,
    pub surveys:   u64,
    pub crew_days: u64,
    pub cost:      f64,
    pub flags:     u64,
}

/// State of one site at a snapshot day.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSnapshotRow {
    pub site_id:         u32,
    pub day:             u32,
    pub date:            String,
    pub flagged:         bool,
    pub tagging_surveys: u32,
    /// Surveys completed this year, summed over methods.
    pub surveys_done:    u32,
}
