//! Adapter errors.

use natal_core::EngineError;
use natal_time::TimeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("invalid observer: {0}")]
    InvalidObserver(String),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("time error: {0}")]
    Time(#[from] TimeError),
}
