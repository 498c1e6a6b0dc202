//! Full natal profile from validated birth data.
//!
//! Stages run in dependency order: local time → UTC → Julian moment →
//! positions → house angles → Four Pillars → fusion and harmony.

use chrono::{NaiveDate, NaiveTime};
use natal_chart::{
    BaziInput, ChartError, ElementBalance, ElementHarmony, FourPillars, FusionSignature,
    HouseFrame, SignPosition, element_balance, element_harmony, four_pillars, fusion_signature,
    sign_of,
};
use natal_core::{Body, CelestialPosition, Confidence, MoonPhase};
use natal_rs::{Ephemeris, EphemerisError};
use natal_time::{JulianMoment, MODEL_VERSION, ResolvedInstant, TimeError, resolve_local_time};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::record::{SignAnchors, ValidationStatus};

/// Birth data after field parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthData {
    pub date: NaiveDate,
    /// `None` when the birth time is unknown.
    pub time: Option<NaiveTime>,
    pub zone: String,
    pub fold: Option<u8>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A body with its sign placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    #[serde(flatten)]
    pub position: CelestialPosition,
    pub sign: SignPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WesternChart {
    pub sun: Placement,
    pub moon: Placement,
    pub bodies: Vec<Placement>,
    /// Absent when the birth time is unknown.
    pub houses: Option<HouseFrame>,
    pub moon_phase: MoonPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub status: ValidationStatus,
    pub warnings: Vec<String>,
    /// Bodies outside their high-accuracy window.
    pub reduced_bodies: Vec<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMeta {
    pub model_version: &'static str,
    pub hour_known: bool,
    pub moment: JulianMoment,
}

/// Everything computed for one birth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalProfile {
    pub instant: ResolvedInstant,
    pub western: WesternChart,
    pub bazi: FourPillars,
    pub element_balance: ElementBalance,
    pub fusion: FusionSignature,
    pub harmony: ElementHarmony,
    pub validation: Validation,
    pub meta: ProfileMeta,
}

impl NatalProfile {
    pub fn anchors(&self) -> SignAnchors {
        SignAnchors {
            sun_sign: Some(self.western.sun.sign.sign.name().to_string()),
            moon_sign: Some(self.western.moon.sign.sign.name().to_string()),
            asc_sign: self
                .western
                .houses
                .as_ref()
                .map(|h| h.ascendant.sign.name().to_string()),
        }
    }
}

fn placement(position: CelestialPosition) -> Placement {
    Placement {
        position,
        sign: sign_of(position.lon_deg),
    }
}

/// Local noon stands in for an unknown birth time.
fn noon() -> NaiveTime {
    NaiveTime::MIN + chrono::TimeDelta::hours(12)
}

pub async fn compute_profile(
    eph: &Ephemeris,
    birth: &BirthData,
) -> Result<NatalProfile, PipelineError> {
    if !birth.latitude_deg.is_finite() || birth.latitude_deg.abs() > 90.0 {
        return Err(PipelineError::InvalidInput(format!(
            "latitude {} outside [-90, 90]",
            birth.latitude_deg
        )));
    }
    if !birth.longitude_deg.is_finite() || birth.longitude_deg.abs() > 180.0 {
        return Err(PipelineError::InvalidInput(format!(
            "longitude {} outside [-180, 180]",
            birth.longitude_deg
        )));
    }

    let hour_known = birth.time.is_some();
    let local_time = birth.time.unwrap_or_else(noon);
    let instant = resolve_local_time(birth.date, local_time, &birth.zone, birth.fold)?;
    let moment = JulianMoment::from_utc(&instant.utc);
    debug!(utc = %instant.utc, jd_ut = moment.jd_ut, "resolved birth instant");

    let state = eph.solar_system_state(instant.utc, None).await?;
    let mut positions = Vec::with_capacity(10);
    positions.push(state.sun);
    positions.push(state.moon.position);
    positions.extend(state.planets.iter().copied());
    debug!(count = positions.len(), "positions computed");

    let houses = if hour_known {
        Some(HouseFrame::for_moment(&moment, birth.latitude_deg, birth.longitude_deg)?)
    } else {
        None
    };

    let bazi = four_pillars(&BaziInput {
        local_date: instant.local.date(),
        utc: instant.utc,
        longitude_deg: birth.longitude_deg,
        sun_longitude_deg: state.sun.lon_deg,
        hour_known,
    })?;
    let balance = element_balance(&bazi);
    let sun = placement(state.sun);
    let fusion = fusion_signature(bazi.day_master_element(), sun.sign.sign);
    let harmony = element_harmony(&bazi, &positions);
    debug!(notation = %bazi.notation, "pillars computed");

    let reduced_bodies: Vec<Body> = positions
        .iter()
        .filter(|p| p.confidence == Confidence::Reduced)
        .map(|p| p.body)
        .collect();
    let mut warnings = Vec::new();
    if !hour_known {
        warnings.push("birth time unknown: houses and hour pillar omitted, noon used".to_string());
    }
    for body in &reduced_bodies {
        warnings.push(format!("{body} outside its high-accuracy window"));
    }
    if let Some(h) = &houses {
        for (name, angle) in [("ascendant", &h.ascendant), ("midheaven", &h.midheaven)] {
            if angle.sign_sensitive {
                warnings.push(format!("{name} within one minute of a sign boundary"));
            }
        }
    }
    let status = if hour_known && reduced_bodies.is_empty() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::ReducedPrecision
    };

    Ok(NatalProfile {
        western: WesternChart {
            sun,
            moon: placement(state.moon.position),
            bodies: positions.iter().copied().map(placement).collect(),
            houses,
            moon_phase: state.moon.phase,
        },
        element_balance: balance,
        fusion,
        harmony,
        validation: Validation {
            status,
            warnings,
            reduced_bodies,
        },
        meta: ProfileMeta {
            model_version: MODEL_VERSION,
            hour_known,
            moment,
        },
        instant,
        bazi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use natal_chart::ZodiacSign;
    use natal_rs::EphemerisConfig;

    fn hanover(time: Option<NaiveTime>) -> BirthData {
        BirthData {
            date: NaiveDate::from_ymd_opt(1980, 6, 24).unwrap(),
            time,
            zone: "Europe/Berlin".into(),
            fold: None,
            latitude_deg: 52.3759,
            longitude_deg: 9.7320,
        }
    }

    #[tokio::test]
    async fn hanover_profile() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        let p = compute_profile(&eph, &hanover(NaiveTime::from_hms_opt(15, 20, 0)))
            .await
            .unwrap();
        assert_eq!(p.instant.utc.to_rfc3339(), "1980-06-24T13:20:00+00:00");
        assert_eq!(p.western.sun.sign.sign, ZodiacSign::Cancer);
        let anchors = p.anchors();
        assert_eq!(anchors.sun_sign.as_deref(), Some("Cancer"));
        assert_eq!(anchors.asc_sign.as_deref(), Some("Libra"));
        assert_eq!(p.validation.status, ValidationStatus::Valid);
        assert_eq!(p.western.bodies.len(), 10);
        assert!(p.bazi.hour.is_some());
    }

    #[tokio::test]
    async fn unknown_time_reduces_precision() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        let p = compute_profile(&eph, &hanover(None)).await.unwrap();
        assert!(p.western.houses.is_none());
        assert!(p.bazi.hour.is_none());
        assert!(p.anchors().asc_sign.is_none());
        assert_eq!(p.validation.status, ValidationStatus::ReducedPrecision);
        assert!(!p.meta.hour_known);
    }

    #[tokio::test]
    async fn bad_latitude_rejected() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        let mut b = hanover(None);
        b.latitude_deg = 95.0;
        assert!(matches!(
            compute_profile(&eph, &b).await,
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
