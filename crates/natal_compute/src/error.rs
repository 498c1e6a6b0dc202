//! Fatal errors and structured compute failures.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid subject id: {0:?}")]
    InvalidSubject(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Fatal orchestrator errors. Domain failures are reported as
/// [`ComputeFailure`] values instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComputeError {
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("persistence timed out after {0:?}")]
    PersistenceTimeout(Duration),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Machine-readable failure codes of the compute endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    MissingFields,
    AmbiguousLocalTime,
    NonexistentLocalTime,
    PrecisionOutOfRange,
    InvalidInput,
    ProfileNotFound,
}

impl FailureCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::AmbiguousLocalTime => "AMBIGUOUS_LOCAL_TIME",
            Self::NonexistentLocalTime => "NONEXISTENT_LOCAL_TIME",
            Self::PrecisionOutOfRange => "PRECISION_OUT_OF_RANGE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
        }
    }

    pub const fn http_status(self) -> u16 {
        match self {
            Self::AmbiguousLocalTime => 409,
            Self::ProfileNotFound => 404,
            Self::MissingFields
            | Self::NonexistentLocalTime
            | Self::PrecisionOutOfRange
            | Self::InvalidInput => 422,
        }
    }
}

/// A recoverable, caller-visible failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeFailure {
    pub code: FailureCode,
    pub message: String,
    pub details: serde_json::Value,
    pub http_status: u16,
}

impl ComputeFailure {
    pub fn new(code: FailureCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            http_status: code.http_status(),
        }
    }
}
