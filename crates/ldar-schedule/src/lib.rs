//! `ldar-schedule` — survey planners, the survey queue, and per-method
//! schedules.
//!
//! # Crate layout
//!
//! | Module                 | Contents                                                   |
//! |------------------------|------------------------------------------------------------|
//! | [`queue`]              | `SurveyQueue` (binary heap on `(priority, sequence)`)      |
//! | [`planner`]            | `ScheduledSurveyPlanner`, `SurveyCounter`, `DeploymentWindow`, `generate_evenly_spaced_dates` |
//! | [`follow_up`]          | `FollowUpSurveyPlanner`, `RedundancyFilter`                |
//! | [`report`]             | `SiteSurveyReport`, `CrewDailyReport`, `MinimalSurveyReport`, `SurveyLevel` |
//! | [`workplan`]           | `Workplan` (one method, one day)                           |
//! | [`schedule`]           | `Schedule` and `FollowUpQueue` traits, `CrewCapacity`      |
//! | [`generic`]            | `GenericSchedule` (quota-driven screening/regular surveys) |
//! | [`follow_up_schedule`] | `FollowUpSchedule` (detection-driven surveys)              |
//! | [`stationary`]         | `StationarySchedule` (fixed sensors)                       |
//! | [`error`]              | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Daily cycle (summary)
//!
//! ```text
//! get_workplan(date)  → planners decide who is due → push at DEFAULT
//!                     → pop crews × est_daily_surveys entries
//! (crews survey the workplan — ldar-method)
//! update(workplan)    → complete:     planner.add_to_surveys_done
//!                       in progress:  re-queue at UNFINISHED (1)
//!                       not started:  re-queue at SKIPPED (2)
//! ```

pub mod error;
pub mod follow_up;
pub mod follow_up_schedule;
pub mod generic;
pub mod planner;
pub mod queue;
pub mod report;
pub mod schedule;
pub mod stationary;
pub mod workplan;


pub use error::{ScheduleError, ScheduleResult};
pub use follow_up::{FollowUpSurveyPlanner, RedundancyFilter};
pub use follow_up_schedule::FollowUpSchedule;
pub use generic::GenericSchedule;
pub use planner::{DeploymentWindow, ScheduledSurveyPlanner, SurveyCounter, generate_evenly_spaced_dates};
pub use queue::{SurveyPriority, SurveyQueue};
pub use report::{CrewDailyReport, MinimalSurveyReport, SiteSurveyReport, SurveyLevel};
pub use schedule::{CrewCapacity, FollowUpQueue, Schedule};
pub use stationary::StationarySchedule;
pub use workplan::Workplan;
