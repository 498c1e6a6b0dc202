//! Persisted birth record and compute status fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a profile's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    #[default]
    Ready,
    Computing,
    Computed,
    Error,
}

/// Outcome of the last computation, always stored explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Every position inside its high-accuracy window and the hour known.
    Valid,
    /// Computed, with at least one reduced-confidence component.
    ReducedPrecision,
    MissingFields,
    AmbiguousLocalTime,
    NonexistentLocalTime,
    PrecisionOutOfRange,
    InvalidInput,
}

/// Sun, Moon and Ascendant sign names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignAnchors {
    pub sun_sign: Option<String>,
    pub moon_sign: Option<String>,
    /// Absent when the birth hour is unknown.
    pub asc_sign: Option<String>,
}

/// One subject's stored profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileRow {
    pub subject_id: String,
    /// YYYY-MM-DD
    pub birth_date: Option<String>,
    /// HH:MM or HH:MM:SS local civil time.
    pub birth_time: Option<String>,
    /// Set when the subject does not know the birth time.
    #[serde(default)]
    pub birth_time_unknown: bool,
    pub iana_time_zone: Option<String>,
    pub fold: Option<u8>,
    pub birth_lat: Option<f64>,
    pub birth_lng: Option<f64>,
    pub birth_elevation_m: Option<f64>,

    pub result: Option<serde_json::Value>,
    pub compute_hash: Option<String>,
    pub computed_at: Option<DateTime<Utc>>,
    pub validation_status: Option<ValidationStatus>,
    pub validation_details: Option<serde_json::Value>,
    pub anchors: Option<SignAnchors>,
    #[serde(default)]
    pub input_status: InputStatus,
}

impl ProfileRow {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    /// Names of required birth fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.birth_date.as_deref().is_none_or(str::is_empty) {
            missing.push("birth_date");
        }
        if !self.birth_time_unknown && self.birth_time.as_deref().is_none_or(str::is_empty) {
            missing.push("birth_time");
        }
        if self.iana_time_zone.as_deref().is_none_or(str::is_empty) {
            missing.push("iana_time_zone");
        }
        if self.birth_lat.is_none() {
            missing.push("birth_lat");
        }
        if self.birth_lng.is_none() {
            missing.push("birth_lng");
        }
        missing
    }
}
