use ldar_schedule::ScheduleError;
use ldar_site::SiteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MethodError {
    #[error("method configuration error: {0}")]
    Config(String),

    #[error("unknown method {0:?}")]
    UnknownMethod(String),

    #[error("follow-up target {target:?} of method {method:?} is not a follow-up method")]
    NotFollowUp {
        method: String,
        target: String,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Site(#[from] SiteError),
}

pub type MethodResult<T> = Result<T, MethodError>;
