use ldar_core::{MethodId, SiteId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site parse error: {0}")]
    Parse(String),

    #[error("site {0} not found")]
    UnknownSite(SiteId),

    #[error("site {site} has {got} method entries, expected {expected}")]
    MethodCountMismatch {
        site:     String,
        expected: usize,
        got:      usize,
    },

    #[error("method {0} is out of range for this site registry")]
    UnknownMethod(MethodId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;
