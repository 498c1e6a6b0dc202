//! Cached adapter over the natal position engine.
//!
//! [`Ephemeris`] owns an [`Engine`] and a private [`ComputeCache`]; each
//! adapter instance has its own cache, so independent callers (and tests)
//! never share hidden state.
//!
//! ```rust,ignore
//! use natal_rs::*;
//!
//! let eph = Ephemeris::new(EphemerisConfig::default())?;
//! let mars = eph.planet_position(Body::Mars, instant).await?;
//! println!("Mars: {:.4}°", mars.lon_deg);
//! ```

pub mod cache;
pub mod ephemeris;
pub mod error;

pub use cache::{
    CacheConfig, CacheKey, CacheStats, Clock, ComputeCache, ManualClock, SystemClock, TransformKind,
};
pub use ephemeris::{Ephemeris, EphemerisConfig, MoonState, Observer, SkyPosition, SolarSystemState};
pub use error::EphemerisError;

// Re-export core types so callers don't need to depend on natal_core directly.
pub use natal_core::{
    Body, CelestialPosition, Confidence, Engine, EngineConfig, MoonPhase, MoonPhaseName,
};
pub use natal_frames::{Equatorial, Horizontal};
pub use natal_time::JulianMoment;
