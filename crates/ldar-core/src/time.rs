//! Simulation time model.
//!
//! # Design
//!
//! The simulation advances one calendar day per step.  The canonical time
//! unit is a `Day` counter from the first simulated date; `SimClock` maps it
//! back to a `NaiveDate`:
//!
//!   date = start_date + day
//!
//! Survey plans, flag dates and quota years are all expressed as calendar
//! dates, so the clock exposes both views.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

use crate::{LdarError, LdarResult};

// ── Day ──────────────────────────────────────────────────────────────────────

/// An absolute simulation day counter (day 0 = `SimConfig::start_date`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub u32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Return the day `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Day {
        Day(self.0 + n)
    }
}

impl std::ops::Add<u32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: u32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Day) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── Calendar helpers ─────────────────────────────────────────────────────────

/// Number of days in `month` (1-12) of `year`.  Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map(|n| (n - first).num_days() as u32).unwrap_or(0)
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between day counts and calendar dates.
///
/// `SimClock` is cheap to copy and holds no heap data.  It is passed by
/// reference to every component that needs "today"; nothing keeps a private
/// copy of the current date.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Calendar date of day 0.
    pub start_date: NaiveDate,
    /// The current day — advanced by `SimClock::advance()` each iteration.
    pub current_day: Day,
}

impl SimClock {
    pub fn new(start_date: NaiveDate) -> Self {
        Self { start_date, current_day: Day::ZERO }
    }

    /// Advance the clock by one day.
    #[inline]
    pub fn advance(&mut self) {
        self.current_day = Day(self.current_day.0 + 1);
    }

    /// Calendar date for an arbitrary day counter.
    #[inline]
    pub fn date_of(&self, day: Day) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(day.0 as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Calendar date of `current_day`.
    #[inline]
    pub fn current_date(&self) -> NaiveDate {
        self.date_of(self.current_day)
    }

    /// `true` on the first simulated day and on every 1 January after it.
    /// Annual quota counters roll over on these days.
    pub fn is_new_year(&self) -> bool {
        let d = self.current_date();
        self.current_day == Day::ZERO || (d.month() == 1 && d.day() == 1)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_day, self.current_date())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from the program JSON file by `ldar-sim` and passed to
/// the program runner.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// First simulated date.
    pub start_date: NaiveDate,

    /// Last simulated date (inclusive).
    pub end_date: NaiveDate,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon for replicate batches.  `None`
    /// uses all logical cores.
    #[cfg_attr(feature = "serde", serde(default))]
    pub num_threads: Option<usize>,

    /// Fire the snapshot hook every N days.  1 = daily.
    #[cfg_attr(feature = "serde", serde(default = "default_output_interval"))]
    pub output_interval_days: u32,
}

#[cfg(feature = "serde")]
fn default_output_interval() -> u32 {
    1
}

impl SimConfig {
    /// Number of simulated days, both endpoints included.  Zero if the end
    /// date precedes the start date.
    pub fn total_days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 { 0 } else { span as u32 + 1 }
    }

    /// The day at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_day(&self) -> Day {
        Day(self.total_days())
    }

    /// Calendar years touched by the run, ascending.
    pub fn years(&self) -> Vec<i32> {
        if self.end_date < self.start_date {
            return Vec::new();
        }
        (self.start_date.year()..=self.end_date.year()).collect()
    }

    /// Reject date ranges and intervals the daily loop cannot run.
    pub fn validate(&self) -> LdarResult<()> {
        if self.end_date < self.start_date {
            return Err(LdarError::InvertedDates { start: self.start_date, end: self.end_date });
        }
        if self.output_interval_days == 0 {
            return Err(LdarError::Config("output_interval_days must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(LdarError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_date)
    }
}
