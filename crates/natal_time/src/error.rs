//! Error types for calendar conversion and local-time resolution.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDateTime, Utc};

/// One of the two UTC instants an ambiguous local time can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldCandidate {
    /// 0 = earlier occurrence (still on daylight time), 1 = later occurrence.
    pub fold: u8,
    pub utc: DateTime<Utc>,
    pub utc_offset_minutes: i32,
}

/// Errors from calendar conversion and local-time resolution.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// The IANA zone identifier is not in the tz database.
    UnknownTimeZone(String),
    /// Fold must be 0 or 1.
    InvalidFold(u8),
    /// The local civil time occurs twice and no fold was supplied.
    AmbiguousLocalTime {
        local: NaiveDateTime,
        zone: String,
        candidates: [FoldCandidate; 2],
    },
    /// The local civil time falls into a spring-forward gap.
    NonexistentLocalTime { local: NaiveDateTime, zone: String },
    /// Calendar fields or a Julian Date outside the representable range.
    InvalidDate(String),
}

impl TimeError {
    /// Stable machine-readable code, shared with the compute endpoint.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownTimeZone(_) => "UNKNOWN_TIME_ZONE",
            Self::InvalidFold(_) => "INVALID_FOLD",
            Self::AmbiguousLocalTime { .. } => "AMBIGUOUS_LOCAL_TIME",
            Self::NonexistentLocalTime { .. } => "NONEXISTENT_LOCAL_TIME",
            Self::InvalidDate(_) => "INVALID_DATE",
        }
    }
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTimeZone(zone) => write!(f, "unknown time zone: {zone}"),
            Self::InvalidFold(fold) => write!(f, "fold must be 0 or 1, got {fold}"),
            Self::AmbiguousLocalTime { local, zone, .. } => write!(
                f,
                "local time {local} is ambiguous in {zone}; \
                 supply fold=0 (earlier) or fold=1 (later)"
            ),
            Self::NonexistentLocalTime { local, zone } => write!(
                f,
                "local time {local} does not exist in {zone} (skipped by a DST transition)"
            ),
            Self::InvalidDate(msg) => write!(f, "invalid date: {msg}"),
        }
    }
}

impl Error for TimeError {}
