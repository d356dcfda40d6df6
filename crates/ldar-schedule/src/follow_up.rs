//! Detection-driven survey planning.
//!
//! A `FollowUpSurveyPlanner` is created the first time a screening method
//! measures a site above its follow-up threshold.  Until the follow-up survey
//! happens, every further detection at the same site is folded into the same
//! planner by the configured [`RedundancyFilter`], so a site never holds more
//! than one pending follow-up.

use std::collections::VecDeque;

use ldar_core::{MethodId, NaiveDate, SiteId};

use crate::{ScheduleError, ScheduleResult};

// ── RedundancyFilter ──────────────────────────────────────────────────────────

/// How repeated detections at one site are aggregated before follow-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", try_from = "FilterSpec"))]
pub enum RedundancyFilter {
    /// Keep the newest rate.
    Recent,
    /// Mean of every rate seen.
    Average,
    /// Largest rate seen.
    Max,
    /// Moving averages over the last `short_window` and `long_window` rates.
    /// `rate_at_site` follows the short window.
    RollingAverage {
        short_window: usize,
        long_window:  usize,
    },
}

impl RedundancyFilter {
    /// Parse the configuration spelling (`recent`, `average`, `max`,
    /// `rolling_average`).  Rolling windows default to 3 and 10.
    pub fn parse(name: &str) -> ScheduleResult<Self> {
        match name.trim() {
            "recent" => Ok(Self::Recent),
            "average" => Ok(Self::Average),
            "max" => Ok(Self::Max),
            "rolling_average" => Ok(Self::RollingAverage {
                short_window: DEFAULT_SHORT_WINDOW,
                long_window:  DEFAULT_LONG_WINDOW,
            }),
            other => Err(ScheduleError::Config(format!(
                "unknown redundancy filter {other:?}: expected recent, average, max or rolling_average"
            ))),
        }
    }

    /// Most rates a planner must remember under this filter.
    fn retained(self) -> Option<usize> {
        match self {
            Self::RollingAverage { short_window, long_window } => Some(short_window.max(long_window).max(1)),
            Self::Recent | Self::Max => Some(1),
            Self::Average => None,
        }
    }
}

const DEFAULT_SHORT_WINDOW: usize = 3;
const DEFAULT_LONG_WINDOW: usize = 10;

/// Accepted configuration forms: a bare name (`"max"`, `"rolling_average"`)
/// or `{ "rolling_average": { "short_window": 2, "long_window": 5 } }`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FilterSpec {
    Name(String),
    Rolling { rolling_average: RollingWindows },
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RollingWindows {
    #[serde(default = "default_short_window")]
    short_window: usize,
    #[serde(default = "default_long_window")]
    long_window:  usize,
}

#[cfg(feature = "serde")]
fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

#[cfg(feature = "serde")]
fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}

#[cfg(feature = "serde")]
impl TryFrom<FilterSpec> for RedundancyFilter {
    type Error = ScheduleError;

    fn try_from(spec: FilterSpec) -> ScheduleResult<Self> {
        match spec {
            FilterSpec::Name(name) => Self::parse(&name),
            FilterSpec::Rolling { rolling_average: w } => {
                Ok(Self::RollingAverage { short_window: w.short_window, long_window: w.long_window })
            }
        }
    }
}

// ── FollowUpSurveyPlanner ─────────────────────────────────────────────────────

/// A pending follow-up for one site.
#[derive(Clone, Debug)]
pub struct FollowUpSurveyPlanner {
    site:        SiteId,
    detected_by: MethodId,
    filter:      RedundancyFilter,

    rates:           VecDeque<f64>,
    rate_sum:        f64,
    detection_count: u32,

    rate_at_site:     f64,
    long_window_rate: f64,

    first_detection_date:  NaiveDate,
    latest_detection_date: NaiveDate,

    queued: bool,
}

impl FollowUpSurveyPlanner {
    pub fn new(site: SiteId, rate: f64, date: NaiveDate, detected_by: MethodId, filter: RedundancyFilter) -> Self {
        let mut planner = Self {
            site,
            detected_by,
            filter,
            rates: VecDeque::new(),
            rate_sum: 0.0,
            detection_count: 0,
            rate_at_site: rate,
            long_window_rate: rate,
            first_detection_date: date,
            latest_detection_date: date,
            queued: false,
        };
        planner.record(rate);
        planner
    }

    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    #[inline]
    pub fn detected_by(&self) -> MethodId {
        self.detected_by
    }

    /// Aggregated rate used to rank follow-up candidates.
    #[inline]
    pub fn rate_at_site(&self) -> f64 {
        self.rate_at_site
    }

    /// Long-window output of `RollingAverage`; equals `rate_at_site` for the
    /// other filters.
    #[inline]
    pub fn long_window_rate(&self) -> f64 {
        self.long_window_rate
    }

    /// Rates still remembered, oldest first.
    pub fn detected_rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.rates.iter().copied()
    }

    pub fn detection_count(&self) -> u32 {
        self.detection_count
    }

    pub fn first_detection_date(&self) -> NaiveDate {
        self.first_detection_date
    }

    pub fn latest_detection_date(&self) -> NaiveDate {
        self.latest_detection_date
    }

    #[inline]
    pub fn is_queued(&self) -> bool {
        self.queued
    }

    pub(crate) fn set_queued(&mut self, queued: bool) {
        self.queued = queued;
    }

    /// Fold a newer detection at the same site into the planner.
    pub fn update_with_latest_survey(&mut self, rate: f64, date: NaiveDate) {
        if date > self.latest_detection_date {
            self.latest_detection_date = date;
        }
        self.record(rate);
    }

    fn record(&mut self, rate: f64) {
        self.detection_count += 1;
        self.rate_sum += rate;
        let prev_max = self.rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        self.rates.push_back(rate);
        if let Some(limit) = self.filter.retained() {
            while self.rates.len() > limit {
                self.rates.pop_front();
            }
        }

        self.rate_at_site = match self.filter {
            RedundancyFilter::Recent => rate,
            RedundancyFilter::Average => self.rate_sum / self.detection_count as f64,
            RedundancyFilter::Max => {
                let m = prev_max.max(rate);
                // Only the maximum is retained.
                self.rates.clear();
                self.rates.push_back(m);
                m
            }
            RedundancyFilter::RollingAverage { short_window, long_window } => {
                self.long_window_rate = self.tail_mean(long_window);
                self.tail_mean(short_window)
            }
        };

        if !matches!(self.filter, RedundancyFilter::RollingAverage { .. }) {
            self.long_window_rate = self.rate_at_site;
        }
    }

    /// Mean of the newest `window` retained rates.
    fn tail_mean(&self, window: usize) -> f64 {
        let n = window.max(1).min(self.rates.len());
        if n == 0 {
            return 0.0;
        }
        self.rates.iter().rev().take(n).sum::<f64>() / n as f64
    }
}
