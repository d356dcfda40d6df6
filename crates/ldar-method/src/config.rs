//! Method configuration, as it appears in the program JSON.
//!
//! ```json
//! {
//!   "name": "aircraft",
//!   "n_crews": 1,
//!   "max_work_hours": 8,
//!   "deployment_months": [4, 5, 6, 7, 8, 9],
//!   "travel_time_min": { "min": 10, "max": 30 },
//!   "cost": { "per_day": 1500 },
//!   "survey_level": "site",
//!   "follow_up": {
//!     "target_method": "ogi_fu",
//!     "threshold": 0.5,
//!     "proportion": 0.5,
//!     "delay_days": 7,
//!     "interaction_priority": "threshold",
//!     "redundancy_filter": "max"
//!   }
//! }
//! ```

use ldar_schedule::{DeploymentWindow, RedundancyFilter, SurveyLevel};
use serde::{Deserialize, Serialize};

use crate::{MethodError, MethodResult};

/// How a method reaches sites.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentType {
    /// Crews travel between sites (trucks, aircraft, OGI teams).
    #[default]
    Mobile,
    /// Fixed sensors; every site every day.
    Stationary,
}

/// Which candidates win when a follow-up batch is released.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionPriority {
    /// Filter by threshold, then promote a proportion of what remains.
    #[default]
    Threshold,
    /// Promote a proportion of every detection, then drop sub-threshold ones.
    Proportion,
}

/// Which triage a follow-up block drives.  Both share one state machine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageScope {
    #[default]
    Site,
    EquipmentGroup,
}

/// Uniform travel-time range in minutes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelRange {
    pub min: f64,
    pub max: f64,
}

impl Default for TravelRange {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

impl TravelRange {
    #[inline]
    pub fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Survey cost charged to the method.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Charged once per completed site survey.
    #[serde(default)]
    pub per_site: f64,
    /// Charged once per crew per deployed day.
    #[serde(default)]
    pub per_day:  f64,
}

/// Minimum detection limit and relative quantification error of the sensor.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub mdl: f64,
    #[serde(default)]
    pub quantification_error: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { mdl: 0.0, quantification_error: 0.0 }
    }
}

/// Follow-up triage settings for a screening method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowUpConfig {
    /// Name of the follow-up method whose queue receives flagged sites.
    pub target_method: String,

    /// Minimum aggregated rate for a site to become a candidate.
    pub threshold: f64,

    /// Rates at or above this skip the candidate stage.
    #[serde(default)]
    pub instant_threshold: Option<f64>,

    /// Share of candidates (or detections) promoted per release.
    #[serde(default = "default_proportion")]
    pub proportion: f64,

    /// Days candidates accumulate before a batch is released.
    #[serde(default)]
    pub delay_days: u32,

    /// Days between a survey and its results reaching triage.
    #[serde(default)]
    pub reporting_delay_days: u32,

    #[serde(default)]
    pub interaction_priority: InteractionPriority,

    #[serde(default = "default_filter")]
    pub redundancy_filter: RedundancyFilter,

    #[serde(default)]
    pub scope: TriageScope,
}

fn default_proportion() -> f64 {
    1.0
}

fn default_filter() -> RedundancyFilter {
    RedundancyFilter::Max
}

impl FollowUpConfig {
    pub fn new(target_method: impl Into<String>, threshold: f64) -> Self {
        Self {
            target_method:        target_method.into(),
            threshold,
            instant_threshold:    None,
            proportion:           default_proportion(),
            delay_days:           0,
            reporting_delay_days: 0,
            interaction_priority: InteractionPriority::default(),
            redundancy_filter:    default_filter(),
            scope:                TriageScope::default(),
        }
    }

    pub fn validate(&self) -> MethodResult<()> {
        if !(0.0..=1.0).contains(&self.proportion) {
            return Err(MethodError::Config(format!("follow-up proportion {} is not in [0, 1]", self.proportion)));
        }
        if self.threshold < 0.0 {
            return Err(MethodError::Config(format!("follow-up threshold {} is negative", self.threshold)));
        }
        if let Some(instant) = self.instant_threshold {
            if instant < self.threshold {
                return Err(MethodError::Config(format!(
                    "instant threshold {instant} is below the follow-up threshold {}",
                    self.threshold
                )));
            }
        }
        if let RedundancyFilter::RollingAverage { short_window, long_window } = self.redundancy_filter {
            if short_window == 0 || long_window < short_window {
                return Err(MethodError::Config(format!(
                    "rolling_average windows must satisfy 0 < short ({short_window}) <= long ({long_window})"
                )));
            }
        }
        Ok(())
    }
}

// ── MethodConfig ──────────────────────────────────────────────────────────────

/// One detection method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    pub name: String,

    #[serde(default)]
    pub deployment_type: DeploymentType,

    #[serde(default)]
    pub survey_level: SurveyLevel,

    /// Surveys sites flagged by another method's triage instead of following
    /// an annual quota.
    #[serde(default)]
    pub is_follow_up: bool,

    #[serde(default = "default_crews")]
    pub n_crews: u32,

    #[serde(default = "default_work_hours")]
    pub max_work_hours: f64,

    /// Clip the working day to daylight hours.
    #[serde(default)]
    pub consider_daylight: bool,

    /// Skip sites whose weather does not allow deployment.
    #[serde(default = "default_true")]
    pub consider_weather: bool,

    /// Empty means every month.
    #[serde(default)]
    pub deployment_months: Vec<u32>,

    /// Empty means every year.
    #[serde(default)]
    pub deployment_years: Vec<i32>,

    #[serde(default)]
    pub travel_time_min: TravelRange,

    /// When set, travel between sites is distance / speed instead of a draw
    /// from `travel_time_min`.
    #[serde(default)]
    pub travel_speed_kmh: Option<f64>,

    #[serde(default)]
    pub cost: CostModel,

    #[serde(default)]
    pub sensor: SensorConfig,

    /// Minimum days between two completed surveys of one site.
    #[serde(default)]
    pub min_interval_days: u32,

    #[serde(default)]
    pub follow_up: Option<FollowUpConfig>,
}

fn default_crews() -> u32 {
    1
}

fn default_work_hours() -> f64 {
    8.0
}

fn default_true() -> bool {
    true
}

impl MethodConfig {
    /// A mobile, quota-driven method with one 8-hour crew.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:              name.into(),
            deployment_type:   DeploymentType::default(),
            survey_level:      SurveyLevel::default(),
            is_follow_up:      false,
            n_crews:           default_crews(),
            max_work_hours:    default_work_hours(),
            consider_daylight: false,
            consider_weather:  true,
            deployment_months: Vec::new(),
            deployment_years:  Vec::new(),
            travel_time_min:   TravelRange::default(),
            travel_speed_kmh:  None,
            cost:              CostModel::default(),
            sensor:            SensorConfig::default(),
            min_interval_days: 0,
            follow_up:         None,
        }
    }

    #[inline]
    pub fn max_work_minutes(&self) -> f64 {
        self.max_work_hours * 60.0
    }

    pub fn window(&self) -> MethodResult<DeploymentWindow> {
        Ok(DeploymentWindow::new(
            self.deployment_years.iter().copied(),
            self.deployment_months.iter().copied(),
        )?)
    }

    /// Reject settings no schedule can run with.
    pub fn validate(&self) -> MethodResult<()> {
        let bad = |msg: String| Err(MethodError::Config(format!("method {:?}: {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(MethodError::Config("method name must not be empty".into()));
        }
        if self.deployment_type == DeploymentType::Mobile && self.n_crews == 0 {
            return bad("mobile methods need at least one crew".into());
        }
        if self.n_crews > u32::from(u16::MAX) {
            return bad(format!("n_crews {} exceeds the limit of {}", self.n_crews, u16::MAX));
        }
        if !(self.max_work_hours > 0.0 && self.max_work_hours <= 24.0) {
            return bad(format!("max_work_hours {} is not in (0, 24]", self.max_work_hours));
        }
        if self.travel_time_min.min < 0.0 || self.travel_time_min.max < self.travel_time_min.min {
            return bad(format!(
                "travel_time_min range [{}, {}] is invalid",
                self.travel_time_min.min, self.travel_time_min.max
            ));
        }
        if self.travel_speed_kmh.is_some_and(|v| v <= 0.0) {
            return bad("travel_speed_kmh must be positive".into());
        }
        if self.is_follow_up && self.deployment_type == DeploymentType::Stationary {
            return bad("a stationary method cannot be a follow-up method".into());
        }
        self.window()?;
        if let Some(fu) = &self.follow_up {
            fu.validate()?;
        }
        Ok(())
    }
}
