//! Errors raised by the core types.
//!
//! Sub-crates wrap `LdarError` as one variant of their own enum via
//! `#[from]`.

use thiserror::Error;

use crate::NaiveDate;

#[derive(Debug, Error)]
pub enum LdarError {
    #[error("end date {end} precedes start date {start}")]
    InvertedDates { start: NaiveDate, end: NaiveDate },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type LdarResult<T> = Result<T, LdarError>;
