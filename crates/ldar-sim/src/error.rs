use ldar_core::{LdarError, MethodId};
use ldar_method::MethodError;
use ldar_schedule::ScheduleError;
use ldar_site::SiteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("program configuration error: {0}")]
    Config(String),

    #[error("invalid program JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("follow-up target {0} has no follow-up queue")]
    NoFollowUpQueue(MethodId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Core(#[from] LdarError),
}

pub type ProgramResult<T> = Result<T, ProgramError>;
