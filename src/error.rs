//! Error types
//!
//! Everything that can go wrong before a request reaches the backend, plus a
//! transparent wrapper for whatever the backend itself reports.

use crate::validator::ValidationErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more validation rules failed; every message is kept
    #[error("{0}")]
    Validation(ValidationErrors),

    /// A malformed identity field rejected before the aggregated checks are reported
    #[error("{field} invalid")]
    InvalidField { field: &'static str },

    #[error("request canceled")]
    Canceled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl Error {
    /// Validation messages, if this is an aggregated validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errs) => Some(errs),
            _ => None,
        }
    }

    /// Whether the caller can fix this error by changing the request
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidField { .. })
    }
}
