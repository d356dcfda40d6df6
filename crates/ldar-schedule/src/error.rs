use ldar_core::{MethodId, SiteId};
use ldar_site::SiteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule configuration error: {0}")]
    Config(String),

    #[error("workplan for {got} handed to the schedule of {expected}")]
    MethodMismatch {
        expected: MethodId,
        got:      MethodId,
    },

    #[error("no survey plan for site {0}")]
    UnknownPlan(SiteId),

    #[error(transparent)]
    Site(#[from] SiteError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
