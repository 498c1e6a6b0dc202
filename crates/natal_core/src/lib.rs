//! Geocentric apparent positions of the Sun, Moon and planets.
//!
//! [`Engine`] evaluates analytical theories only, with no external data
//! files:
//! - Earth (and hence the Sun): truncated VSOP87D
//! - Moon: abridged ELP-2000/82
//! - Mercury–Neptune: truncated VSOP87D
//! - Pluto: Chapront–Francou periodic series, J2000 frame
//!
//! Results are apparent ecliptic coordinates of date: precession, nutation
//! in longitude, light-time and annual aberration are applied. Each body
//! has a high-accuracy window; outside it the position is still returned,
//! marked [`Confidence::Reduced`].

pub mod elp_moon;
pub mod lunar;
pub mod pluto;
pub mod series;
pub mod vsop87;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use natal_frames::{
    Equatorial, Horizontal, Nutation, Spherical, cartesian_to_spherical, ecliptic_to_equatorial,
    equatorial_to_horizontal, general_precession_deg, nutation, spherical_to_cartesian,
};
use natal_time::{JulianMoment, julian::decimal_year, normalize_deg};
use serde::{Deserialize, Serialize};

pub use lunar::{MoonPhase, MoonPhaseName, moon_phase};

/// Astronomical unit, km.
pub const AU_KM: f64 = 149_597_870.7;

/// Light travel time per AU, days.
const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Constant of aberration, arcseconds.
const ABERRATION_ARCSEC: f64 = 20.495_52;

/// Bodies with geocentric positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Self::Sun,
        Self::Moon,
        Self::Mercury,
        Self::Venus,
        Self::Mars,
        Self::Jupiter,
        Self::Saturn,
        Self::Uranus,
        Self::Neptune,
        Self::Pluto,
    ];

    /// Stable lowercase identifier.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }

    /// Calendar years `[start, end)` inside which the theory for this body
    /// meets its stated accuracy.
    pub const fn accuracy_window(self) -> (f64, f64) {
        match self {
            Self::Moon => (1500.0, 2500.0),
            Self::Pluto => (1885.0, 2100.0),
            _ => (1000.0, 3000.0),
        }
    }

    /// False when the theory covers only a short span around the present,
    /// so a reduced-confidence result is routine rather than exceptional.
    pub const fn has_long_term_theory(self) -> bool {
        !matches!(self, Self::Pluto)
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownBody(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Reduced,
}

/// Apparent geocentric ecliptic position of date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub body: Body,
    /// [0, 360)
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance_au: f64,
    pub distance_km: f64,
    pub confidence: Confidence,
    pub jd_tt: f64,
}

impl CelestialPosition {
    pub fn equatorial(&self, obliquity_deg: f64) -> Equatorial {
        ecliptic_to_equatorial(self.lon_deg, self.lat_deg, obliquity_deg)
    }

    pub fn horizontal(&self, obliquity_deg: f64, latitude_deg: f64, lst_deg: f64) -> Horizontal {
        let eq = self.equatorial(obliquity_deg);
        equatorial_to_horizontal(eq.ra_deg, eq.dec_deg, latitude_deg, lst_deg)
    }
}

/// Most light-time refinements [`EngineConfig`] accepts.
pub const MAX_LIGHT_TIME_ITERATIONS: u32 = 8;

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Planet positions are re-evaluated this many times at the retarded
    /// epoch after the first geometric pass.
    pub light_time_iterations: u32,
    pub apply_aberration: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            light_time_iterations: 2,
            apply_aberration: true,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.light_time_iterations == 0 {
            return Err(EngineError::InvalidConfig(
                "light_time_iterations must be greater than zero",
            ));
        }
        if self.light_time_iterations > MAX_LIGHT_TIME_ITERATIONS {
            return Err(EngineError::InvalidConfig(
                "light_time_iterations exceeds MAX_LIGHT_TIME_ITERATIONS",
            ));
        }
        Ok(())
    }
}

/// Core engine errors.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    InvalidConfig(&'static str),
    NonFiniteEpoch { jd_tt: f64 },
    UnknownBody(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::NonFiniteEpoch { jd_tt } => write!(f, "non-finite epoch: {jd_tt}"),
            Self::UnknownBody(id) => write!(f, "unknown body: {id}"),
        }
    }
}

impl Error for EngineError {}

/// Quantities shared by every body at one epoch.
struct EpochContext {
    t: f64,
    year: f64,
    nutation: Nutation,
    precession_deg: f64,
    earth: vsop87::Heliocentric,
    earth_of_date: [f64; 3],
    earth_j2000: [f64; 3],
    /// Geometric Sun longitude (FK5), for aberration.
    sun_true_lon_deg: f64,
}

/// Position engine. Stateless apart from its config, so it is `Send + Sync`
/// and can be shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn context(&self, moment: &JulianMoment) -> Result<EpochContext, EngineError> {
        if !moment.is_finite() {
            return Err(EngineError::NonFiniteEpoch { jd_tt: moment.jd_tt });
        }
        let t = moment.centuries_tt();
        let earth = vsop87::earth_heliocentric(moment.millennia_tt());
        let precession_deg = general_precession_deg(t);
        let earth_j2000 = spherical_to_cartesian(&Spherical {
            lon_deg: earth.lon_rad.to_degrees() - precession_deg,
            lat_deg: earth.lat_rad.to_degrees(),
            radius: earth.radius_au,
        });
        let sun_geometric = normalize_deg(earth.lon_rad.to_degrees() + 180.0);
        Ok(EpochContext {
            t,
            year: decimal_year(moment.jd_tt),
            nutation: nutation(t),
            precession_deg,
            earth,
            earth_of_date: earth.to_cartesian(),
            earth_j2000,
            sun_true_lon_deg: sun_geometric - 0.090_33 / 3600.0,
        })
    }

    fn confidence(body: Body, year: f64) -> Confidence {
        let (start, end) = body.accuracy_window();
        if (start..end).contains(&year) {
            Confidence::High
        } else {
            tracing::warn!(
                body = body.id(),
                year,
                "position outside high-accuracy window; marked reduced"
            );
            Confidence::Reduced
        }
    }

    fn sun(&self, ctx: &EpochContext) -> (f64, f64, f64) {
        let t = ctx.t;
        let beta = -ctx.earth.lat_rad.to_degrees();
        let lp = (ctx.sun_true_lon_deg - 1.397 * t - 0.000_31 * t * t).to_radians();
        let beta_fk5 = beta + 0.039_16 / 3600.0 * (lp.cos() - lp.sin());
        let aberration = -20.4898 / 3600.0 / ctx.earth.radius_au;
        let lon = ctx.sun_true_lon_deg + ctx.nutation.dpsi_deg + aberration;
        (normalize_deg(lon), beta_fk5, ctx.earth.radius_au)
    }

    fn moon(&self, ctx: &EpochContext) -> (f64, f64, f64) {
        let m = elp_moon::moon_geocentric(ctx.t);
        (
            normalize_deg(m.lon_deg + ctx.nutation.dpsi_deg),
            m.lat_deg,
            m.distance_km / AU_KM,
        )
    }

    fn planet(&self, ctx: &EpochContext, body: Body) -> (f64, f64, f64) {
        let series = vsop87::planet_series(body);
        let heliocentric = |t: f64| match series {
            Some(series) => series.heliocentric(t / 10.0).to_cartesian(),
            None => spherical_to_cartesian(&pluto::pluto_heliocentric(t)),
        };
        // Pluto's series is referred to J2000, the VSOP87D series to the date.
        let j2000 = series.is_none();
        let e = if j2000 { ctx.earth_j2000 } else { ctx.earth_of_date };

        let mut light_time_days = 0.0;
        let mut geo = [0.0; 3];
        for _ in 0..=self.config.light_time_iterations {
            let p = heliocentric(ctx.t - light_time_days / 36_525.0);
            geo = [p[0] - e[0], p[1] - e[1], p[2] - e[2]];
            let dist = (geo[0] * geo[0] + geo[1] * geo[1] + geo[2] * geo[2]).sqrt();
            light_time_days = LIGHT_TIME_DAYS_PER_AU * dist;
        }
        let sph = cartesian_to_spherical(&geo);

        let (mut lon, mut lat) = (sph.lon_deg, sph.lat_deg);
        if j2000 {
            lon += ctx.precession_deg;
        } else {
            // VSOP dynamical frame to FK5, Meeus 32.3.
            let t = ctx.t;
            let lp = (lon - 1.397 * t - 0.000_31 * t * t).to_radians();
            let (sin_lp, cos_lp) = lp.sin_cos();
            lon += (-0.090_33 + 0.039_16 * (cos_lp + sin_lp) * lat.to_radians().tan()) / 3600.0;
            lat += 0.039_16 * (cos_lp - sin_lp) / 3600.0;
        }

        if self.config.apply_aberration {
            // Annual aberration, Meeus 23.2 without the e-terms.
            let k = ABERRATION_ARCSEC / 3600.0;
            let (sin_d, cos_d) = (ctx.sun_true_lon_deg - lon).to_radians().sin_cos();
            let (sin_b, cos_b) = lat.to_radians().sin_cos();
            lon -= k * cos_d / cos_b;
            lat -= k * sin_d * sin_b;
        }

        (normalize_deg(lon + ctx.nutation.dpsi_deg), lat, sph.radius)
    }

    fn position_in(&self, ctx: &EpochContext, body: Body, jd_tt: f64) -> CelestialPosition {
        let (lon_deg, lat_deg, distance_au) = match body {
            Body::Sun => self.sun(ctx),
            Body::Moon => self.moon(ctx),
            _ => self.planet(ctx, body),
        };
        CelestialPosition {
            body,
            lon_deg,
            lat_deg,
            distance_au,
            distance_km: distance_au * AU_KM,
            confidence: Self::confidence(body, ctx.year),
            jd_tt,
        }
    }

    /// Apparent geocentric position of one body.
    pub fn position(
        &self,
        body: Body,
        moment: &JulianMoment,
    ) -> Result<CelestialPosition, EngineError> {
        let ctx = self.context(moment)?;
        Ok(self.position_in(&ctx, body, moment.jd_tt))
    }

    /// Positions of every [`Body`], sharing one Earth and nutation evaluation.
    pub fn positions(&self, moment: &JulianMoment) -> Result<Vec<CelestialPosition>, EngineError> {
        let ctx = self.context(moment)?;
        Ok(Body::ALL
            .iter()
            .map(|&body| self.position_in(&ctx, body, moment.jd_tt))
            .collect())
    }

    /// Lunar phase at `moment`.
    pub fn moon_phase(&self, moment: &JulianMoment) -> Result<MoonPhase, EngineError> {
        let ctx = self.context(moment)?;
        let sun = self.position_in(&ctx, Body::Sun, moment.jd_tt);
        let moon = self.position_in(&ctx, Body::Moon, moment.jd_tt);
        Ok(moon_phase(&sun, &moon))
    }
}
