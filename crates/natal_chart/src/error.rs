//! Error types for chart calculations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from house, pillar and fusion calculations.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChartError {
    /// Latitude at or beyond a pole, or otherwise unusable.
    InvalidLatitude(f64),
    /// A required angle was NaN or infinite.
    NonFinite(&'static str),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLatitude(lat) => {
                write!(f, "invalid latitude {lat}: house angles are undefined at the poles")
            }
            Self::NonFinite(what) => write!(f, "non-finite input: {what}"),
        }
    }
}

impl Error for ChartError {}
